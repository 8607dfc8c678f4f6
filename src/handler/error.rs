//! Failure taxonomy of the file-serving pipeline.

use crate::importmap::ImportMapError;
use std::io;
use thiserror::Error;

/// What went wrong while producing a response body.
///
/// Filesystem errors are classified here, at the point of the call that
/// raised them; the router performs a single error-to-status mapping and
/// never interprets raw I/O failures itself.
#[derive(Debug, Error)]
pub enum ServeError {
    /// Target does not exist, or exists but is not a regular file
    #[error("not found")]
    NotFound,
    /// The filesystem denied the read
    #[error("access denied")]
    AccessDenied,
    /// Import-map generation failed
    #[error("import map generation failed: {0}")]
    ImportMap(#[from] ImportMapError),
    /// Any other read or transform failure
    #[error("transform failure: {0}")]
    Transform(io::Error),
}

impl From<io::Error> for ServeError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::AccessDenied,
            _ => Self::Transform(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_classify_by_kind() {
        let e = ServeError::from(io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(e, ServeError::NotFound));

        let e = ServeError::from(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(e, ServeError::AccessDenied));

        let e = ServeError::from(io::Error::from(io::ErrorKind::TimedOut));
        assert!(matches!(e, ServeError::Transform(_)));
    }
}
