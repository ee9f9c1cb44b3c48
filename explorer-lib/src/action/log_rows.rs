//! Column autofill action
//!
//! Collects the rows of its column and logs them. There is no completion
//! step yet: the backend has no endpoint that writes suggested values back.

use std::sync::Arc;

use async_trait::async_trait;
use log::info;

use super::DataClient;
use super::RowAction;
use super::RowSet;
use crate::error::ActionError;

/// Logs the rows it receives and succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogRowsAction;

#[async_trait]
impl RowAction for LogRowsAction {
    async fn run(&self, rows: RowSet, _client: Arc<dyn DataClient>) -> Result<(), ActionError> {
        info!(
            "[action] autofill requested for {} rows over columns {:?}",
            rows.len(),
            rows.columns
        );
        for row in &rows.rows {
            info!("[action] {} {:?}", row.id, row.cells);
        }
        Ok(())
    }
}
