use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::db::HashDb;
use crate::error::Result;
use crate::format::{
    HashAlg, IDX_DELIM, IDX_HEAD_NAME_STR, IDX_HEAD_STR, IDX_SUFFIX, NAME_MAXLEN, SQLITE_MAGIC,
};
use crate::name::name_from_path;

/// Seekable line-oriented stream backing a legacy index.
pub trait IndexStream: BufRead + Seek {}

impl<T: BufRead + Seek> IndexStream for T {}

/// Which representation an open index uses.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum IndexKind {
    Legacy,
    Structured,
}

/// An open index attached to a [`HashDb`].
pub enum IndexHandle {
    Legacy(LegacyIndex),
    Structured(StructuredIndex),
}

impl IndexHandle {
    pub fn kind(&self) -> IndexKind {
        match self {
            IndexHandle::Legacy(_) => IndexKind::Legacy,
            IndexHandle::Structured(_) => IndexKind::Structured,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            IndexHandle::Legacy(index) => &index.path,
            IndexHandle::Structured(index) => &index.path,
        }
    }
}

/// Sorted text index whose first two lines are a version line and a name
/// record line.
pub struct LegacyIndex {
    path: PathBuf,
    stream: Box<dyn IndexStream>,
}

impl LegacyIndex {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Ok(Self::from_reader(path, file))
    }

    pub fn from_reader<R: Read + Seek + 'static>(path: impl Into<PathBuf>, reader: R) -> Self {
        Self {
            path: path.into(),
            stream: Box::new(BufReader::new(reader)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewinds the stream and reads the two header lines.
    ///
    /// Each line is capped at `NAME_MAXLEN - 1` bytes; a longer line is split
    /// and its remainder is read as the following line. Running out of input
    /// before either line is read yields `UnexpectedEof`.
    pub fn header_lines(&mut self) -> io::Result<(Vec<u8>, Vec<u8>)> {
        self.stream.seek(SeekFrom::Start(0))?;
        let version = self.read_header_line()?;
        let record = self.read_header_line()?;
        Ok((version, record))
    }

    fn read_header_line(&mut self) -> io::Result<Vec<u8>> {
        let mut line = Vec::new();
        let limit = (NAME_MAXLEN - 1) as u64;
        let n = (&mut self.stream).take(limit).read_until(b'\n', &mut line)?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "index header truncated",
            ));
        }
        Ok(line)
    }
}

/// Database-backed index. Its contents are only reachable through the
/// structured index engine, so nothing here reads them.
#[derive(Debug, Clone)]
pub struct StructuredIndex {
    path: PathBuf,
}

impl StructuredIndex {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Index primitives a [`HashDb`] relies on.
pub trait IndexBackend {
    /// Reports whether an index for `alg` exists. When one is found and the
    /// handle has none attached yet, it is opened and attached to `db`.
    fn has_index(&self, db: &mut HashDb, alg: HashAlg) -> bool;

    /// Creates an empty on-disk index for source type `db_type` and attaches
    /// it to `db`.
    fn initialize_index(&self, db: &mut HashDb, db_type: &str) -> Result<()>;
}

/// Index backend over plain files next to the database.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsIndexBackend;

impl FsIndexBackend {
    /// Location of the index for `db_path`. A path that already names an
    /// index file is used as-is; otherwise `<db_path>-<alg>.idx`.
    pub fn index_path(db_path: &Path, alg: HashAlg) -> PathBuf {
        let is_index = db_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&IDX_SUFFIX[1..]));
        if is_index {
            return db_path.to_path_buf();
        }
        let mut path = db_path.as_os_str().to_os_string();
        path.push(format!("-{}{}", alg.label(), IDX_SUFFIX));
        PathBuf::from(path)
    }

    fn open_index(path: &Path) -> io::Result<IndexHandle> {
        let mut file = File::open(path)?;
        let mut magic = Vec::with_capacity(SQLITE_MAGIC.len());
        (&mut file)
            .take(SQLITE_MAGIC.len() as u64)
            .read_to_end(&mut magic)?;
        if magic == SQLITE_MAGIC {
            return Ok(IndexHandle::Structured(StructuredIndex::new(path)));
        }
        file.seek(SeekFrom::Start(0))?;
        Ok(IndexHandle::Legacy(LegacyIndex::from_reader(path, file)))
    }
}

impl IndexBackend for FsIndexBackend {
    fn has_index(&self, db: &mut HashDb, alg: HashAlg) -> bool {
        if db.index().is_some() {
            return true;
        }

        let path = Self::index_path(db.db_path(), alg);
        match Self::open_index(&path) {
            Ok(index) => {
                debug!(path = %path.display(), kind = ?index.kind(), "opened index");
                db.set_index(index);
                true
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => false,
            Err(err) => {
                if db.config().verbose {
                    warn!(path = %path.display(), error = %err, "failed to open index");
                } else {
                    debug!(path = %path.display(), error = %err, "failed to open index");
                }
                false
            }
        }
    }

    fn initialize_index(&self, db: &mut HashDb, db_type: &str) -> Result<()> {
        let path = Self::index_path(db.db_path(), HashAlg::Md5);
        let name = if db.name().is_empty() {
            name_from_path(db.db_path())
        } else {
            db.name().clone()
        };

        let mut file = File::create(&path)?;
        let delim = char::from(IDX_DELIM);
        writeln!(file, "{IDX_HEAD_STR}{delim}{db_type}")?;
        file.write_all(IDX_HEAD_NAME_STR.as_bytes())?;
        file.write_all(&[IDX_DELIM])?;
        file.write_all(name.as_bytes())?;
        file.write_all(b"\n")?;
        file.flush()?;
        drop(file);

        // The previous index stays attached until the new one is readable.
        let index = LegacyIndex::open(&path)?;
        debug!(path = %path.display(), db_type, "initialized empty index");
        db.set_index(IndexHandle::Legacy(index));
        Ok(())
    }
}
