//! Operations for hash-sets where only the lookup index survives.
//!
//! Without the source file the index can still name the hash-set (from its
//! header) and be recreated empty, but a hit can never be turned back into a
//! source record.

use tracing::{debug, warn};

use crate::db::HashDb;
use crate::error::{HashDbError, Result};
use crate::format::{DBTYPE_MD5SUM_STR, HashAlg};
use crate::index::{IndexBackend, IndexHandle};
use crate::lookup::{EntryMatch, EntrySource, IndexOnly, LookupFlags};
use crate::name::parse_name_record;

/// Context attached to index initialization failures.
pub const MAKE_INDEX_CONTEXT: &str = "idxonly_makeindex";

enum NameSource {
    Header(Vec<u8>),
    Malformed,
    Structured,
    Missing,
}

/// Sets the name of `db` from its index header, falling back to the file
/// name. Never fails.
///
/// Checking for the index attaches it to `db` when one is found.
pub fn resolve_name(db: &mut HashDb, backend: &dyn IndexBackend) {
    db.name_mut().clear();

    if !backend.has_index(db, HashAlg::Md5) {
        if db.config().verbose {
            warn!(
                path = %db.db_path().display(),
                "failed to get name from index (index does not exist); using file name instead"
            );
        }
        db.set_name_from_path();
        return;
    }

    let source = match db.index_mut() {
        None => NameSource::Missing,
        Some(IndexHandle::Structured(_)) => NameSource::Structured,
        Some(IndexHandle::Legacy(index)) => match index.header_lines() {
            Ok((_, record)) => match parse_name_record(&record) {
                Some(name) => NameSource::Header(name.to_vec()),
                None => NameSource::Malformed,
            },
            Err(err) => {
                debug!(path = %index.path().display(), error = %err, "index header unreadable");
                NameSource::Malformed
            }
        },
    };

    match source {
        NameSource::Header(name) => {
            db.name_mut().set(&name);
        }
        // The structured layout has no header to read.
        NameSource::Structured => db.set_name_from_path(),
        NameSource::Malformed | NameSource::Missing => {
            if db.config().verbose {
                warn!(
                    path = %db.db_path().display(),
                    "failed to read name from index; using file name instead"
                );
            }
            db.set_name_from_path();
        }
    }
}

/// Creates an empty index for `db`.
///
/// `requested_type` is accepted for interface compatibility only: the index
/// is always initialized for [`DBTYPE_MD5SUM_STR`].
pub fn make_index(db: &mut HashDb, backend: &dyn IndexBackend, requested_type: &str) -> Result<()> {
    debug!(requested_type, db_type = DBTYPE_MD5SUM_STR, "initializing index");
    backend
        .initialize_index(db, DBTYPE_MD5SUM_STR)
        .map_err(|source| {
            if db.config().verbose {
                warn!(path = %db.db_path().display(), error = %source, "index initialization failed");
            }
            HashDbError::Initialization {
                context: MAKE_INDEX_CONTEXT,
                source: Box::new(source),
            }
        })
}

/// Always fails with [`HashDbError::Unsupported`]: there are no source
/// records to read. `action` is never called.
pub fn get_entry(
    db: &HashDb,
    hash: &str,
    offset: u64,
    flags: LookupFlags,
    action: &mut dyn FnMut(&EntryMatch<'_>) -> Result<()>,
) -> Result<()> {
    IndexOnly.get_entry(db, hash, offset, flags, action)
}
