//! Per-mode resolution of source records found by an index lookup.
//!
//! An index hit only yields a hash and the byte offset of its record in the
//! original hash-set. Turning that into a file name needs the source file,
//! so each [`BackingMode`] picks an [`EntrySource`] that either reads it or
//! refuses.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::ops::BitOr;

use hashdb_input::{parse_md5_hex, parse_md5sum_record};

use crate::db::{BackingMode, HashDb};
use crate::error::{HashDbError, Result};
use crate::format::NAME_MAXLEN;

/// Lookup behaviour flags.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct LookupFlags(u32);

impl LookupFlags {
    /// Only report whether the hash is present.
    pub const QUICK: LookupFlags = LookupFlags(0x01);
    /// Report extended record details where the source has them.
    pub const EXT: LookupFlags = LookupFlags(0x02);

    pub const fn empty() -> Self {
        LookupFlags(0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: LookupFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for LookupFlags {
    type Output = LookupFlags;

    fn bitor(self, rhs: LookupFlags) -> LookupFlags {
        LookupFlags(self.0 | rhs.0)
    }
}

/// A source record matched by a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMatch<'a> {
    pub hash: &'a str,
    pub name: &'a str,
    pub offset: u64,
}

/// Reads the source record for a hash at a known offset.
pub trait EntrySource {
    /// Resolves `hash` at `offset` and reports each matching record to
    /// `action`. An error from `action` stops the lookup and is returned.
    fn get_entry(
        &self,
        db: &HashDb,
        hash: &str,
        offset: u64,
        flags: LookupFlags,
        action: &mut dyn FnMut(&EntryMatch<'_>) -> Result<()>,
    ) -> Result<()>;
}

impl BackingMode {
    pub fn entry_source(self) -> &'static dyn EntrySource {
        match self {
            BackingMode::FullDatabase => &TextDatabase,
            BackingMode::IndexOnly | BackingMode::StructuredIndex => &IndexOnly,
        }
    }
}

/// Entry source for handles whose hash-set file is gone. Every lookup fails
/// with [`HashDbError::Unsupported`] and the callback never runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndexOnly;

impl EntrySource for IndexOnly {
    fn get_entry(
        &self,
        _db: &HashDb,
        _hash: &str,
        _offset: u64,
        _flags: LookupFlags,
        _action: &mut dyn FnMut(&EntryMatch<'_>) -> Result<()>,
    ) -> Result<()> {
        Err(HashDbError::Unsupported)
    }
}

/// Entry source over an md5sum-style text hash-set.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextDatabase;

impl EntrySource for TextDatabase {
    fn get_entry(
        &self,
        db: &HashDb,
        hash: &str,
        offset: u64,
        _flags: LookupFlags,
        action: &mut dyn FnMut(&EntryMatch<'_>) -> Result<()>,
    ) -> Result<()> {
        let Some(wanted) = parse_md5_hex(hash) else {
            return Err(HashDbError::InvalidHash(hash.to_string()));
        };

        let mut file = File::open(db.db_path())?;
        file.seek(SeekFrom::Start(offset))?;
        let mut line = Vec::new();
        let n = BufReader::new(file)
            .take(NAME_MAXLEN as u64 * 2)
            .read_until(b'\n', &mut line)?;
        if n == 0 {
            return Err(HashDbError::MissingEntry(offset));
        }

        let line = String::from_utf8_lossy(&line);
        let Some(record) = parse_md5sum_record(&line) else {
            return Err(HashDbError::MalformedEntry(offset));
        };
        if record.hash != wanted {
            return Err(HashDbError::HashMismatch {
                offset,
                hash: hash.to_string(),
            });
        }

        action(&EntryMatch {
            hash,
            name: record.name.unwrap_or(""),
            offset,
        })
    }
}
