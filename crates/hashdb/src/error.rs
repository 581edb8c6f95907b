use thiserror::Error;

/// Coarse classification of a [`HashDbError`], used by callers that only
/// care about which class of failure they hit.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ErrorKind {
    /// The operation cannot be performed with the given handle or arguments.
    Argument,
    /// Creating the on-disk index failed.
    Initialization,
    /// A source record did not have the expected shape.
    Corrupt,
    /// Reading or writing an index or source file failed.
    Io,
}

#[derive(Debug, Error)]
pub enum HashDbError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("operation unsupported: no source database backing this index")]
    Unsupported,
    #[error("{source}; {context}")]
    Initialization {
        context: &'static str,
        source: Box<HashDbError>,
    },
    #[error("invalid md5 hash value {0:?}")]
    InvalidHash(String),
    #[error("no record at offset {0}")]
    MissingEntry(u64),
    #[error("malformed record at offset {0}")]
    MalformedEntry(u64),
    #[error("record at offset {offset} does not match hash {hash}")]
    HashMismatch { offset: u64, hash: String },
}

impl HashDbError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HashDbError::Io(_) => ErrorKind::Io,
            HashDbError::Unsupported | HashDbError::InvalidHash(_) => ErrorKind::Argument,
            HashDbError::Initialization { .. } => ErrorKind::Initialization,
            HashDbError::MissingEntry(_)
            | HashDbError::MalformedEntry(_)
            | HashDbError::HashMismatch { .. } => ErrorKind::Corrupt,
        }
    }

    /// Secondary context attached on top of the underlying failure, if any.
    pub fn context(&self) -> Option<&'static str> {
        match self {
            HashDbError::Initialization { context, .. } => Some(context),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, HashDbError>;

#[cfg(test)]
mod tests {
    use super::{ErrorKind, HashDbError};

    #[test]
    fn initialization_message_keeps_primitive_text() {
        let err = HashDbError::Initialization {
            context: "idxonly_makeindex",
            source: Box::new(HashDbError::Io(std::io::Error::other("disk full"))),
        };
        assert_eq!(err.kind(), ErrorKind::Initialization);
        assert_eq!(err.context(), Some("idxonly_makeindex"));
        assert_eq!(err.to_string(), "io error: disk full; idxonly_makeindex");
        assert!(std::error::Error::source(&err).is_some());
    }
}
