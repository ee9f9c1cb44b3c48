//! Data source errors

/// Error returned when the data source cannot produce a collection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to fetch collection: {message}")]
pub struct SourceError {
    /// Error message.
    pub message: String,
}

impl SourceError {
    /// Creates a new source error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}
