//! Data client used by row actions

use async_trait::async_trait;

use crate::error::ClientError;

/// The backend client handed to row actions.
///
/// Actions call mutation endpoints through this trait. It is the only
/// network boundary an action touches; timeouts and cancellation are the
/// client's business.
#[async_trait]
pub trait DataClient: Send + Sync {
    /// Calls the backend `operation` with a JSON payload.
    async fn execute(
        &self,
        operation: &str,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, ClientError>;
}
