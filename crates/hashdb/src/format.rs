//! Layout constants for legacy text indexes and md5sum-style source files.

/// Size of the hash-set name buffer, including the terminating NUL.
pub const NAME_MAXLEN: usize = 512;

/// Marker opening the first (version) line of a legacy index header.
pub const IDX_HEAD_STR: &str = "hdb_index";

/// Marker opening the second (name record) line of a legacy index header.
pub const IDX_HEAD_NAME_STR: &str = "hdb_hash_name";

/// Separates a header marker from its value.
pub const IDX_DELIM: u8 = b'|';

/// File extension of index files.
pub const IDX_SUFFIX: &str = ".idx";

/// Source type label used for every index this crate initializes.
pub const DBTYPE_MD5SUM_STR: &str = "md5sum";

/// Leading bytes of an SQLite database file.
pub const SQLITE_MAGIC: &[u8; 16] = b"SQLite format 3\0";

/// Hash algorithm IDs.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HashAlg {
    Md5,
}

impl HashAlg {
    /// Short label used when naming index files (`<db>-md5.idx`).
    pub fn label(self) -> &'static str {
        match self {
            HashAlg::Md5 => "md5",
        }
    }
}
