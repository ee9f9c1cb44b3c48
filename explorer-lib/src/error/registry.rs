//! Field registry construction errors

/// Error returned when a field registry cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// No field descriptors were supplied.
    #[error("A field registry needs at least one field")]
    Empty,

    /// Two descriptors share the same key.
    #[error("Field '{key}' is registered more than once")]
    DuplicateKey { key: String },

    /// A categorical field declares the same option value twice.
    #[error("Field '{key}' declares option '{value}' more than once")]
    DuplicateOption { key: String, value: String },
}
