//! Row action dispatcher
//!
//! Lets the caller attach asynchronous actions (bulk enrichment and the like)
//! to the table's context menu. An action receives the rows currently rendered
//! and a [`DataClient`]; the dispatcher turns every outcome, including a
//! missing client or a panicking handler, into an [`ActionResult`].
//!
//! Invocation is split in two steps. [`RowActionDispatcher::prepare`] takes an
//! owned snapshot of the rows, and [`PreparedAction::run`] awaits the handler
//! without borrowing the explorer, so filter and sort edits can continue while
//! an action is in flight.

mod client;
mod log_rows;
mod rows;

pub use client::DataClient;
pub use log_rows::LogRowsAction;
pub use rows::RowSet;
pub use rows::RowSnapshot;

use std::collections::BTreeMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use log::info;
use log::warn;

use crate::error::ActionError;

/// An asynchronous operation over the rendered rows.
#[async_trait]
pub trait RowAction: Send + Sync {
    /// Runs the action. The dispatcher requests a re-fetch when this succeeds.
    async fn run(&self, rows: RowSet, client: Arc<dyn DataClient>) -> Result<(), ActionError>;
}

/// Adapts a closure into a [`RowAction`]. Created by [`action_fn`].
pub struct ActionFn<F>(F);

/// Wraps an async closure as a [`RowAction`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use explorer_lib::action::{action_fn, DataClient, RowActionDispatcher, RowSet};
/// use explorer_lib::error::ActionError;
///
/// let mut dispatcher = RowActionDispatcher::new();
/// dispatcher.register_action(
///     "close-all",
///     action_fn(|rows: RowSet, client: Arc<dyn DataClient>| async move {
///         let ids: Vec<_> = rows.rows.iter().map(|r| r.id.clone()).collect();
///         client.execute("close", serde_json::json!({ "ids": ids })).await?;
///         Ok::<(), ActionError>(())
///     }),
/// );
/// ```
pub fn action_fn<F, Fut>(f: F) -> ActionFn<F>
where
    F: Fn(RowSet, Arc<dyn DataClient>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
{
    ActionFn(f)
}

#[async_trait]
impl<F, Fut> RowAction for ActionFn<F>
where
    F: Fn(RowSet, Arc<dyn DataClient>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
{
    async fn run(&self, rows: RowSet, client: Arc<dyn DataClient>) -> Result<(), ActionError> {
        (self.0)(rows, client).await
    }
}

/// Which columns an action receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionScope {
    /// Every visible column.
    VisibleColumns,
    /// A single column, which must be visible.
    Column(String),
}

struct Registered {
    scope: ActionScope,
    action: Arc<dyn RowAction>,
}

/// Outcome of a successful action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    /// The action name.
    pub action: String,
    /// How many rows the action received.
    pub rows: usize,
    /// Whether the collection should be fetched again.
    pub refresh_requested: bool,
}

/// A failed action, naming the action and the reason.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("action '{action}' failed: {error}")]
pub struct ActionFailure {
    /// The action name.
    pub action: String,
    /// Why it failed.
    pub error: ActionError,
}

/// Result of invoking an action.
pub type ActionResult = Result<ActionReport, ActionFailure>;

/// Registry of named row actions and the client they run against.
#[derive(Default)]
pub struct RowActionDispatcher {
    actions: BTreeMap<String, Registered>,
    client: Option<Arc<dyn DataClient>>,
}

impl RowActionDispatcher {
    /// Creates a dispatcher with no actions and no client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the data client (builder pattern).
    pub fn with_client(mut self, client: Arc<dyn DataClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Sets or removes the data client.
    pub fn set_client(&mut self, client: Option<Arc<dyn DataClient>>) {
        self.client = client;
    }

    /// Returns `true` if a data client is available.
    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    /// Registers `action` under `name`, receiving every visible column.
    ///
    /// Replaces any action already registered under that name.
    pub fn register_action(&mut self, name: impl Into<String>, action: impl RowAction + 'static) {
        self.register_scoped(name, ActionScope::VisibleColumns, action);
    }

    /// Registers `action` under `name`, receiving only the column `column`.
    pub fn register_column_action(
        &mut self,
        name: impl Into<String>,
        column: impl Into<String>,
        action: impl RowAction + 'static,
    ) {
        self.register_scoped(name, ActionScope::Column(column.into()), action);
    }

    fn register_scoped(
        &mut self,
        name: impl Into<String>,
        scope: ActionScope,
        action: impl RowAction + 'static,
    ) {
        self.actions.insert(
            name.into(),
            Registered {
                scope,
                action: Arc::new(action),
            },
        );
    }

    /// Returns the registered action names, sorted.
    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    /// Returns the scope of the action `name`.
    pub fn scope(&self, name: &str) -> Option<&ActionScope> {
        self.actions.get(name).map(|r| &r.scope)
    }

    /// Binds the action `name` to a snapshot of the rendered rows.
    ///
    /// Resolution errors (unknown action, missing client, hidden column) are
    /// reported when the prepared action runs, so every path ends in an
    /// [`ActionResult`].
    pub fn prepare(&self, name: &str, rows: RowSet) -> PreparedAction {
        let binding = match self.actions.get(name) {
            None => Err(ActionError::UnknownAction {
                name: name.to_string(),
            }),
            Some(registered) => self
                .client
                .clone()
                .ok_or(ActionError::MissingClient)
                .and_then(|client| {
                    let rows = match &registered.scope {
                        ActionScope::VisibleColumns => rows,
                        ActionScope::Column(column) => {
                            rows.only_column(column)
                                .ok_or_else(|| ActionError::ColumnNotVisible {
                                    column: column.clone(),
                                })?
                        }
                    };
                    Ok(Binding {
                        action: Arc::clone(&registered.action),
                        client,
                        rows,
                    })
                }),
        };

        PreparedAction {
            name: name.to_string(),
            binding,
        }
    }

    /// Runs the action `name` over `rows`.
    pub async fn invoke(&self, name: &str, rows: RowSet) -> ActionResult {
        self.prepare(name, rows).run().await
    }
}

impl std::fmt::Debug for RowActionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowActionDispatcher")
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .field("has_client", &self.client.is_some())
            .finish()
    }
}

struct Binding {
    action: Arc<dyn RowAction>,
    client: Arc<dyn DataClient>,
    rows: RowSet,
}

/// An action bound to its rows, ready to run.
///
/// Owns everything it needs, so it can be awaited while the explorer keeps
/// handling edits.
pub struct PreparedAction {
    name: String,
    binding: Result<Binding, ActionError>,
}

impl PreparedAction {
    /// Returns the action name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the action. Never panics and never returns an unhandled error.
    pub async fn run(self) -> ActionResult {
        let name = self.name;
        let result = match self.binding {
            Err(error) => Err(error),
            Ok(Binding {
                action,
                client,
                rows,
            }) => {
                let count = rows.len();
                info!("[action] running '{}' on {} rows", name, count);
                match AssertUnwindSafe(action.run(rows, client))
                    .catch_unwind()
                    .await
                {
                    Ok(Ok(())) => Ok(count),
                    Ok(Err(error)) => Err(error),
                    Err(_) => Err(ActionError::Panicked),
                }
            }
        };

        match result {
            Ok(rows) => Ok(ActionReport {
                action: name,
                rows,
                refresh_requested: true,
            }),
            Err(error) => {
                let failure = ActionFailure {
                    action: name,
                    error,
                };
                warn!("[action] {}", failure);
                Err(failure)
            }
        }
    }
}
