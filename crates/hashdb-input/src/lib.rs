//! Input parsing utilities for hash-set files and hash arguments.

/// A parsed line of an md5sum-style hash-set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashRecord<'a> {
    pub hash: [u8; 16],
    pub name: Option<&'a str>,
}

/// Decode a 32-hex MD5 digest (either case).
pub fn parse_md5_hex(s: &str) -> Option<[u8; 16]> {
    if !is_hex32(s) {
        return None;
    }
    let mut out = [0u8; 16];
    hex::decode_to_slice(s.as_bytes(), &mut out).ok()?;
    Some(out)
}

/// Parse one md5sum record.
///
/// Accepts the GNU layout (`<hash>  <name>` or `<hash> *<name>`), the BSD
/// layout (`MD5 (<name>) = <hash>`), and a bare hash with no name.
pub fn parse_md5sum_record(line: &str) -> Option<HashRecord<'_>> {
    let line = line.trim_end_matches(['\r', '\n']);

    if let Some(rest) = line.strip_prefix("MD5 (") {
        let (name, hash) = rest.rsplit_once(") = ")?;
        return Some(HashRecord {
            hash: parse_md5_hex(hash.trim())?,
            name: Some(name),
        });
    }

    let trimmed = line.trim_start();
    let (hash, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((hash, rest)) => (hash, Some(rest)),
        None => (trimmed, None),
    };
    let hash = parse_md5_hex(hash)?;
    let name = rest
        .map(|rest| rest.trim_start_matches(' ').trim_start_matches('*'))
        .filter(|name| !name.is_empty());
    Some(HashRecord { hash, name })
}

/// Extract a raw 16-byte MD5 hash from a line.
///
/// Accepts a bare 32-hex string or any md5sum record.
pub fn extract_md5_hash(line: &str) -> Option<[u8; 16]> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    parse_md5sum_record(trimmed).map(|record| record.hash)
}

fn is_hex32(s: &str) -> bool {
    s.len() == 32 && s.bytes().all(|b| b.is_ascii_hexdigit())
}
