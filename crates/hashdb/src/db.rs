use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::idxonly;
use crate::index::{IndexBackend, IndexHandle};
use crate::lookup::{EntryMatch, LookupFlags};
use crate::name::{DbName, name_from_path};

/// Runtime options for a [`HashDb`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HashDbConfig {
    /// Emit diagnostics when a name lookup falls back to the file name.
    pub verbose: bool,
}

/// What a [`HashDb`] can read hash records from.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BackingMode {
    /// The original md5sum-style hash-set is present.
    FullDatabase,
    /// Only a legacy text index remains.
    IndexOnly,
    /// Only a structured (database-backed) index remains.
    StructuredIndex,
}

/// An open hash-set.
pub struct HashDb {
    db_path: PathBuf,
    mode: BackingMode,
    config: HashDbConfig,
    name: DbName,
    index: Option<IndexHandle>,
}

impl HashDb {
    /// Creates a handle without touching the filesystem. The name stays
    /// empty and no index is attached.
    pub fn new(db_path: impl Into<PathBuf>, mode: BackingMode, config: HashDbConfig) -> Self {
        Self {
            db_path: db_path.into(),
            mode,
            config,
            name: DbName::new(),
            index: None,
        }
    }

    /// Opens a handle and resolves its name.
    ///
    /// A full database must exist on disk. Handles without a source take
    /// their name from the index header when there is one.
    pub fn open(
        db_path: impl Into<PathBuf>,
        mode: BackingMode,
        config: HashDbConfig,
        backend: &dyn IndexBackend,
    ) -> Result<Self> {
        let mut db = Self::new(db_path, mode, config);
        match mode {
            BackingMode::FullDatabase => {
                std::fs::metadata(&db.db_path)?;
                db.set_name_from_path();
            }
            BackingMode::IndexOnly | BackingMode::StructuredIndex => {
                idxonly::resolve_name(&mut db, backend);
            }
        }
        debug!(path = %db.db_path.display(), name = %db.name, ?mode, "opened hash database");
        Ok(db)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn mode(&self) -> BackingMode {
        self.mode
    }

    pub fn config(&self) -> &HashDbConfig {
        &self.config
    }

    pub fn name(&self) -> &DbName {
        &self.name
    }

    pub fn set_name(&mut self, name: &[u8]) {
        self.name.set(name);
    }

    pub fn set_name_from_path(&mut self) {
        self.name = name_from_path(&self.db_path);
    }

    pub(crate) fn name_mut(&mut self) -> &mut DbName {
        &mut self.name
    }

    pub fn index(&self) -> Option<&IndexHandle> {
        self.index.as_ref()
    }

    pub fn index_mut(&mut self) -> Option<&mut IndexHandle> {
        self.index.as_mut()
    }

    pub fn set_index(&mut self, index: IndexHandle) {
        self.index = Some(index);
    }

    pub fn take_index(&mut self) -> Option<IndexHandle> {
        self.index.take()
    }

    /// Looks up the source record for `hash` at `offset` through the entry
    /// source for this handle's mode.
    pub fn get_entry(
        &self,
        hash: &str,
        offset: u64,
        flags: LookupFlags,
        action: &mut dyn FnMut(&EntryMatch<'_>) -> Result<()>,
    ) -> Result<()> {
        self.mode
            .entry_source()
            .get_entry(self, hash, offset, flags, action)
    }

    /// Creates an empty index for this handle.
    pub fn make_index(&mut self, backend: &dyn IndexBackend, db_type: &str) -> Result<()> {
        idxonly::make_index(self, backend, db_type)
    }
}
