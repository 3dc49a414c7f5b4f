//! Crate-level error type

use crate::repository::VoteError;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type
#[derive(Debug)]
pub enum Error {
    /// A vote was rejected by the repository
    Vote(VoteError),
    /// The requested poll does not exist
    NotFound(String),
    /// The request was malformed or failed validation
    InvalidRequest(String),
    /// Snapshot serialization failed
    Json(serde_json::Error),
    /// Socket or listener error
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Vote(e) => write!(f, "{}", e),
            Error::NotFound(id) => write!(f, "Poll not found: {}", id),
            Error::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            Error::Json(e) => write!(f, "Serialization error: {}", e),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Vote(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::Io(e) => Some(e),
            Error::NotFound(_) | Error::InvalidRequest(_) => None,
        }
    }
}

impl From<VoteError> for Error {
    fn from(e: VoteError) -> Self {
        Error::Vote(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
