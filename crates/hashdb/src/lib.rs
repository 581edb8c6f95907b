//! Hash database handles that keep working after their source is gone.
//!
//! A hash-set is normally a text file of hash records plus a sorted lookup
//! index built from it. When only the index survives, [`idxonly`] still names
//! the hash-set from the index header and can recreate an empty index, while
//! every attempt to read back a source record is refused.

pub mod db;
pub mod error;
pub mod format;
pub mod idxonly;
pub mod index;
pub mod lookup;
pub mod name;

pub use crate::db::{BackingMode, HashDb, HashDbConfig};
pub use crate::error::{ErrorKind, HashDbError, Result};
pub use crate::index::{FsIndexBackend, IndexBackend, IndexHandle, IndexKind};
pub use crate::lookup::{EntryMatch, EntrySource, LookupFlags};
pub use crate::name::DbName;
