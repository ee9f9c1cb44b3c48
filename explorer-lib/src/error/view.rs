//! View state transition errors

use super::UnknownFieldError;

/// Error returned when a view state transition is rejected.
///
/// A rejected transition never produces a partially-applied view: the caller
/// keeps the state it had before the edit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// The edit references a field that is not registered.
    #[error(transparent)]
    UnknownField(#[from] UnknownFieldError),

    /// The facet value is not one of the field's declared options.
    #[error("'{value}' is not a declared option of field '{field}'")]
    InvalidFilterValue { field: String, value: String },

    /// The field declares no options, so it cannot be used as a facet.
    #[error("Field '{field}' has no options to filter on")]
    NotFacetable { field: String },

    /// The facet is gated behind a feature that is not enabled.
    #[error("Facet '{field}' requires feature '{feature}'")]
    FacetUnavailable { field: String, feature: String },

    /// The field cannot be sorted on.
    #[error("Field '{field}' is not sortable")]
    NotSortable { field: String },

    /// The edit would leave the view in an invalid state.
    #[error("Invalid state transition: {reason}")]
    InvalidStateTransition { reason: String },
}

impl ViewError {
    /// Creates a new invalid filter value error.
    pub fn invalid_filter_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidFilterValue {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a new invalid state transition error.
    pub fn invalid_transition(reason: impl Into<String>) -> Self {
        Self::InvalidStateTransition {
            reason: reason.into(),
        }
    }
}
