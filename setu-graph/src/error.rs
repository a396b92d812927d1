//! Error types for SetuGraph

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// SetuGraph error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Graph operation invoked out of sequence (programming defect)
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// Registration attempted on empty or degenerate input
    #[error("Insufficient data: {0}")]
    DataInsufficient(String),

    /// Non-finite data that should have been removed upstream
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Whether the session loop may drop the current candidate and continue.
    ///
    /// Malformed input reaching the estimator is handled like missing data.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::DataInsufficient(_) | Error::MalformedInput(_))
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
