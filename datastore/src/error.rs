//! Error types for datastore operations.

use common::EngineError;

/// Error type for datastore operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A supplied key, prefix, or range bound does not match the store's
    /// key type. Detected before any engine I/O.
    KeyTypeMismatch,

    /// The requested key is not present.
    NotFound,

    /// Opaque failure from the underlying engine, propagated unchanged.
    Engine(String),
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::KeyTypeMismatch => write!(f, "key type does not match"),
            Error::NotFound => write!(f, "key not found"),
            Error::Engine(msg) => write!(f, "engine error: {}", msg),
        }
    }
}

impl From<EngineError> for Error {
    fn from(err: EngineError) -> Self {
        Error::Engine(err.to_string())
    }
}

/// Result type alias for datastore operations.
pub type Result<T> = std::result::Result<T, Error>;
