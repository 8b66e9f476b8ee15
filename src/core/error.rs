use thiserror::Error;

/// Failure of the request transport itself, as opposed to a server that
/// answered `Result: false`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Transport closed")]
    Closed,
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        TransportError::Decode(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The account actor has shut down.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Account handle unavailable")]
pub struct HandleError;
