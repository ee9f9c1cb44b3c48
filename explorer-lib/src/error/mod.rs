//! Error types

mod action;
mod field;
mod registry;
mod source;
mod view;

pub use action::*;
pub use field::*;
pub use registry::*;
pub use source::*;
pub use view::*;

/// Top-level error for explorer operations.
///
/// Each component has its own error type; this enum lets callers that drive
/// several components propagate any of them with `?`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    UnknownField(#[from] UnknownFieldError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    Action(#[from] crate::action::ActionFailure),

    #[error(transparent)]
    Source(#[from] SourceError),
}
