// ❗ Lookup Errors - typed outcomes for every query entry point
//
// Two classes only:
// - InvalidInput: rejected before touching any table
// - NotFound: a normal, expected "nothing matched" outcome
//
// A record naming an unknown politician is NOT an error here; see
// `linker::UnresolvedName`.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("invalid ZIP code '{0}': expected exactly five digits")]
    InvalidZip(String),

    #[error("search query is empty")]
    EmptyQuery,

    #[error("ZIP code {0} not found in district table")]
    ZipNotFound(String),

    #[error("no politician matches '{0}'")]
    NotFound(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
}

impl LookupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LookupError::InvalidZip(_) | LookupError::EmptyQuery => ErrorKind::InvalidInput,
            LookupError::ZipNotFound(_) | LookupError::NotFound(_) => ErrorKind::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(LookupError::InvalidZip("1".into()).kind(), ErrorKind::InvalidInput);
        assert_eq!(LookupError::EmptyQuery.kind(), ErrorKind::InvalidInput);
        assert_eq!(LookupError::ZipNotFound("99999".into()).kind(), ErrorKind::NotFound);
        assert_eq!(LookupError::NotFound("x".into()).kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            LookupError::InvalidZip("abcde".into()).to_string(),
            "invalid ZIP code 'abcde': expected exactly five digits"
        );
        assert_eq!(
            LookupError::ZipNotFound("99999".into()).to_string(),
            "ZIP code 99999 not found in district table"
        );
    }
}
