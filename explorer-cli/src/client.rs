//! A data client with no backend.

use async_trait::async_trait;
use explorer_lib::action::DataClient;
use explorer_lib::error::ClientError;
use log::info;

/// Logs every call and answers with the payload it received.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoClient;

#[async_trait]
impl DataClient for EchoClient {
    async fn execute(
        &self,
        operation: &str,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, ClientError> {
        info!("[client] {} {}", operation, payload);
        Ok(payload)
    }
}
