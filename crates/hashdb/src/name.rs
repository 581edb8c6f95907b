use std::borrow::Cow;
use std::fmt;
use std::path::Path;

use crate::format::{IDX_DELIM, IDX_HEAD_NAME_STR, IDX_SUFFIX, NAME_MAXLEN};

/// Fixed-size, NUL-terminated hash-set name.
///
/// The buffer always keeps at least one trailing NUL, so at most
/// [`DbName::CAPACITY`] bytes of name are stored. Longer input is truncated.
#[derive(Clone, PartialEq, Eq)]
pub struct DbName {
    buf: [u8; NAME_MAXLEN],
}

impl DbName {
    pub const CAPACITY: usize = NAME_MAXLEN - 1;

    pub fn new() -> Self {
        Self {
            buf: [0u8; NAME_MAXLEN],
        }
    }

    pub fn clear(&mut self) {
        self.buf.fill(0);
    }

    /// Replaces the name with `bytes`, truncated to [`DbName::CAPACITY`].
    /// Returns the number of bytes stored.
    pub fn set(&mut self, bytes: &[u8]) -> usize {
        self.clear();
        let len = bytes.len().min(Self::CAPACITY);
        self.buf[..len].copy_from_slice(&bytes[..len]);
        len
    }

    /// Name bytes up to the first NUL.
    pub fn as_bytes(&self) -> &[u8] {
        let end = self
            .buf
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(Self::CAPACITY);
        &self.buf[..end]
    }

    pub fn as_raw(&self) -> &[u8; NAME_MAXLEN] {
        &self.buf
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf[0] == 0
    }
}

impl Default for DbName {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DbName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DbName").field(&self.to_string_lossy()).finish()
    }
}

impl fmt::Display for DbName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

/// Extracts the hash-set name from the name record line of a legacy index
/// header (`<IDX_HEAD_NAME_STR>|<name>\r\n`).
///
/// Returns `None` when the marker or the delimiter is missing. The name runs
/// from just after the first delimiter to the first CR, LF or NUL.
pub fn parse_name_record(line: &[u8]) -> Option<&[u8]> {
    if !line.starts_with(IDX_HEAD_NAME_STR.as_bytes()) {
        return None;
    }
    let delim = line.iter().position(|&b| b == IDX_DELIM)?;
    let value = &line[delim + 1..];
    let end = value
        .iter()
        .position(|&b| matches!(b, b'\r' | b'\n' | 0))
        .unwrap_or(value.len());
    Some(&value[..end])
}

/// Derives a display name from a database path: the file name with any
/// trailing `.idx` extension removed.
pub fn name_from_path(path: &Path) -> DbName {
    let base = match path.file_name() {
        Some(file_name) => file_name.to_string_lossy(),
        None => path.to_string_lossy(),
    };
    let stem = strip_suffix_ignore_case(&base, IDX_SUFFIX).unwrap_or(&*base);

    let mut name = DbName::new();
    name.set(stem.as_bytes());
    name
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    if s.len() <= suffix.len() {
        return None;
    }
    let split = s.len() - suffix.len();
    if !s.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = s.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

#[cfg(test)]
mod tests {
    use super::{DbName, name_from_path, parse_name_record};
    use crate::format::NAME_MAXLEN;
    use std::path::Path;

    #[test]
    fn parses_name_record_with_crlf() {
        let name = parse_name_record(b"hdb_hash_name|ExampleSet\r\n");
        assert_eq!(name, Some(&b"ExampleSet"[..]));
    }

    #[test]
    fn name_stops_at_first_line_break() {
        let name = parse_name_record(b"hdb_hash_name|Known Good\nsecond");
        assert_eq!(name, Some(&b"Known Good"[..]));
    }

    #[test]
    fn name_keeps_later_delimiters() {
        let name = parse_name_record(b"hdb_hash_name|a|b\n");
        assert_eq!(name, Some(&b"a|b"[..]));
    }

    #[test]
    fn rejects_missing_marker_or_delimiter() {
        assert!(parse_name_record(b"garbage\n").is_none());
        assert!(parse_name_record(b"hdb_hash_name\n").is_none());
        assert!(parse_name_record(b"hdb_hash_name").is_none());
        assert!(parse_name_record(b"").is_none());
    }

    #[test]
    fn delimiter_at_end_yields_empty_name() {
        assert_eq!(parse_name_record(b"hdb_hash_name|"), Some(&b""[..]));
    }

    #[test]
    fn set_truncates_and_keeps_terminator() {
        let mut name = DbName::new();
        let long = vec![b'x'; NAME_MAXLEN * 2];
        assert_eq!(name.set(&long), DbName::CAPACITY);
        assert_eq!(name.len(), NAME_MAXLEN - 1);
        assert_eq!(name.as_raw()[NAME_MAXLEN - 1], 0);

        name.set(b"short");
        assert_eq!(name.as_bytes(), b"short");
        assert!(name.as_raw()[5..].iter().all(|&b| b == 0));
    }

    #[test]
    fn path_name_strips_index_extension() {
        assert_eq!(
            name_from_path(Path::new("/cases/NSRLFile-md5.idx")).as_bytes(),
            b"NSRLFile-md5"
        );
        assert_eq!(
            name_from_path(Path::new("/cases/known.IDX")).as_bytes(),
            b"known"
        );
        assert_eq!(
            name_from_path(Path::new("/cases/known.txt")).as_bytes(),
            b"known.txt"
        );
        assert_eq!(name_from_path(Path::new(".idx")).as_bytes(), b".idx");
    }
}
