//! Unknown field errors

/// A field key was referenced that the registry does not declare.
///
/// This is a configuration error: a view, sort or column toggle names a field
/// the explorer was never set up with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown field '{key}'")]
pub struct UnknownFieldError {
    /// The unregistered key.
    pub key: String,
}

impl UnknownFieldError {
    /// Creates a new unknown field error.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}
