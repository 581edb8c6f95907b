#![no_main]

use std::io::Cursor;

use hashdb::format::{HashAlg, NAME_MAXLEN};
use hashdb::idxonly::resolve_name;
use hashdb::index::{IndexHandle, LegacyIndex};
use hashdb::name::parse_name_record;
use hashdb::{BackingMode, HashDb, HashDbConfig, IndexBackend, Result};
use libfuzzer_sys::fuzz_target;

struct FuzzBackend(Vec<u8>);

impl IndexBackend for FuzzBackend {
    fn has_index(&self, db: &mut HashDb, _alg: HashAlg) -> bool {
        let index = LegacyIndex::from_reader("fuzz.idx", Cursor::new(self.0.clone()));
        db.set_index(IndexHandle::Legacy(index));
        true
    }

    fn initialize_index(&self, _db: &mut HashDb, _db_type: &str) -> Result<()> {
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    if let Some(name) = parse_name_record(data) {
        assert!(name.len() < data.len());
        assert!(!name.iter().any(|&b| matches!(b, b'\r' | b'\n' | 0)));
    }

    let mut db = HashDb::new("fuzz.idx", BackingMode::IndexOnly, HashDbConfig::default());
    resolve_name(&mut db, &FuzzBackend(data.to_vec()));
    let name = db.name();
    assert!(name.len() < NAME_MAXLEN);
    assert_eq!(name.as_raw()[NAME_MAXLEN - 1], 0);
});
