//! Row action errors

/// Error reported by a data client call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ClientError {
    /// Error message.
    pub message: String,
}

impl ClientError {
    /// Creates a new client error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for ClientError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ClientError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Error produced while invoking a row action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// No action is registered under the requested name.
    #[error("no action named '{name}' is registered")]
    UnknownAction { name: String },

    /// The dispatcher has no data client to hand to the action.
    #[error("no data client is available")]
    MissingClient,

    /// The action works on a column that is not currently visible.
    #[error("column '{column}' is not visible")]
    ColumnNotVisible { column: String },

    /// The data client call failed.
    #[error("client error: {0}")]
    Client(#[from] ClientError),

    /// The action panicked.
    #[error("action panicked")]
    Panicked,

    /// The action reported a failure of its own.
    #[error("{0}")]
    Failed(String),
}

impl ActionError {
    /// Creates an action-specific failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}
