//! Explorer facade
//!
//! Wires the registry, view state, toolbar, selection coordinator and row
//! action dispatcher into the single object a renderer talks to.

use std::time::Instant;

use log::debug;
use log::info;
use log::warn;

use crate::action::ActionReport;
use crate::action::PreparedAction;
use crate::action::RowActionDispatcher;
use crate::action::RowSet;
use crate::config::ExplorerConfig;
use crate::error::Error;
use crate::error::SourceError;
use crate::error::UnknownFieldError;
use crate::error::ViewError;
use crate::model::Record;
use crate::query;
use crate::query::FacetCount;
use crate::query::TextMatch;
use crate::registry::FieldDescriptor;
use crate::registry::FieldRegistry;
use crate::selection::SelectionChange;
use crate::selection::SelectionCoordinator;
use crate::selection::SelectionState;
use crate::source::DataSource;
use crate::toolbar::Entitlements;
use crate::toolbar::ToolbarController;
use crate::toolbar::ToolbarEvent;
use crate::toolbar::ToolbarOutcome;
use crate::view::ViewState;

/// An interactive view over a record collection.
///
/// All state changes go through `&mut self`, so a collection refresh always
/// completes, selection invalidation included, before the next click is
/// handled.
///
/// # Example
///
/// ```
/// use std::time::Instant;
///
/// use explorer_lib::config::ExplorerConfig;
/// use explorer_lib::model::DynRecord;
/// use explorer_lib::registry::{FieldDescriptor, FieldOption, FieldRegistry};
/// use explorer_lib::toolbar::ToolbarEvent;
/// use explorer_lib::Explorer;
///
/// let registry = FieldRegistry::new([
///     FieldDescriptor::field("title", "Title"),
///     FieldDescriptor::field("status", "Status")
///         .with_options([FieldOption::from("open"), FieldOption::from("closed")]),
/// ])
/// .unwrap();
/// let records = vec![
///     DynRecord::new("1").set("title", "Printer").set("status", "open"),
///     DynRecord::new("2").set("title", "Badge").set("status", "closed"),
/// ];
///
/// let mut explorer = Explorer::mount(registry, records, ExplorerConfig::default());
/// explorer.toolbar(ToolbarEvent::toggle_facet("status", "open"), Instant::now());
/// assert_eq!(explorer.rows().unwrap().len(), 1);
///
/// explorer.click_row(&"2".to_string());
/// explorer.apply_collection(vec![DynRecord::new("1")]);
/// assert!(!explorer.selection().panel_open());
/// ```
pub struct Explorer<R: Record> {
    registry: FieldRegistry<R>,
    records: Vec<R>,
    view: ViewState,
    selection: SelectionCoordinator<R>,
    toolbar: ToolbarController,
    actions: RowActionDispatcher,
    text_match: TextMatch,
}

impl<R: Record> Explorer<R> {
    /// Mounts an explorer over `records` with the default view.
    pub fn mount(registry: FieldRegistry<R>, records: Vec<R>, config: ExplorerConfig) -> Self {
        let view = ViewState::defaults(&registry);
        let text_match = config.toolbar.text_match;
        debug!(
            "[explorer] mounted with {} fields and {} records",
            registry.len(),
            records.len()
        );
        Self {
            registry,
            records,
            view,
            selection: SelectionCoordinator::new(),
            toolbar: ToolbarController::new(config.toolbar),
            actions: RowActionDispatcher::new(),
            text_match,
        }
    }

    /// Sets the entitlements gating toolbar facets.
    pub fn with_entitlements(mut self, entitlements: impl Entitlements + 'static) -> Self {
        self.toolbar = self.toolbar.with_entitlements(entitlements);
        self
    }

    /// Sets the row action dispatcher.
    pub fn with_actions(mut self, actions: RowActionDispatcher) -> Self {
        self.actions = actions;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the field registry.
    pub fn registry(&self) -> &FieldRegistry<R> {
        &self.registry
    }

    /// Returns the full collection, unfiltered.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Returns the current view state.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Returns the detail panel state.
    pub fn selection(&self) -> &SelectionState<R> {
        self.selection.state()
    }

    /// Returns the toolbar controller.
    pub fn toolbar_controller(&self) -> &ToolbarController {
        &self.toolbar
    }

    /// Returns the row action dispatcher.
    pub fn actions_mut(&mut self) -> &mut RowActionDispatcher {
        &mut self.actions
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Returns the rows to render, in order.
    pub fn rows(&self) -> Result<Vec<&R>, UnknownFieldError> {
        query::evaluate(&self.records, &self.registry, &self.view, self.text_match)
    }

    /// Returns the visible columns in declaration order.
    pub fn visible_columns(&self) -> Vec<&FieldDescriptor<R>> {
        self.registry
            .iter()
            .filter(|f| self.view.is_visible(f.key()))
            .collect()
    }

    /// Returns the facets the toolbar should offer.
    pub fn visible_facets(&self) -> Vec<&FieldDescriptor<R>> {
        self.toolbar.visible_facets(&self.registry)
    }

    /// Returns per-option counts for the facet `key`.
    pub fn facet_counts(&self, key: &str) -> Result<Vec<FacetCount>, ViewError> {
        query::facet_counts(&self.records, &self.registry, &self.view, key, self.text_match)
    }

    // =========================================================================
    // Toolbar
    // =========================================================================

    /// Handles a toolbar event. Applied edits replace the view.
    pub fn toolbar(&mut self, event: ToolbarEvent, now: Instant) -> ToolbarOutcome {
        let outcome = self.toolbar.handle(&self.registry, &self.view, event, now);
        if let ToolbarOutcome::Applied(view) = &outcome {
            self.view = view.clone();
        }
        outcome
    }

    /// Commits debounced search text whose window has elapsed.
    ///
    /// Returns `true` if the view changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.toolbar.poll(&self.view, now) {
            Some(view) => {
                self.view = view;
                true
            }
            None => false,
        }
    }

    /// Commits debounced search text immediately.
    ///
    /// Returns `true` if the view changed.
    pub fn flush(&mut self) -> bool {
        match self.toolbar.flush(&self.view) {
            Some(view) => {
                self.view = view;
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Opens the detail panel on the record with ID `id`.
    ///
    /// Returns `false` if no record has that ID.
    pub fn click_row(&mut self, id: &R::Id) -> bool {
        self.selection.select_by_id(&self.records, id)
    }

    /// Closes the detail panel.
    pub fn close_panel(&mut self) {
        self.selection.close();
    }

    /// Replaces the collection with a fresh snapshot.
    ///
    /// The selection is reconciled in the same call: the panel follows the
    /// refreshed copy of its record or closes if the record is gone.
    pub fn apply_collection(&mut self, records: Vec<R>) -> SelectionChange {
        self.records = records;
        let change = self.selection.on_collection_changed(&self.records);
        debug!(
            "[explorer] collection replaced ({} records), selection {:?}",
            self.records.len(),
            change
        );
        change
    }

    /// Fetches a fresh collection from `source` and applies it.
    ///
    /// On failure the current collection and selection are kept.
    pub async fn refresh(
        &mut self,
        source: &dyn DataSource<R>,
    ) -> Result<SelectionChange, SourceError> {
        match source.fetch_collection().await {
            Ok(records) => Ok(self.apply_collection(records)),
            Err(err) => {
                warn!("[explorer] refresh failed: {}", err);
                Err(err)
            }
        }
    }

    /// Tears the explorer down: the panel closes and pending input is dropped.
    pub fn unmount(&mut self) {
        self.selection.clear();
        self.toolbar.cancel();
        debug!("[explorer] unmounted");
    }

    // =========================================================================
    // Row actions
    // =========================================================================

    /// Snapshots the rendered rows and binds them to the action `name`.
    ///
    /// The returned action owns its data; the explorer stays free for edits
    /// while it runs.
    pub fn prepare_action(&self, name: &str) -> Result<PreparedAction, UnknownFieldError> {
        let rows = self.rows()?;
        let set = RowSet::from_rendered(&rows, &self.registry, &self.view)?;
        Ok(self.actions.prepare(name, set))
    }

    /// Runs the action `name` over the rendered rows, then re-fetches from
    /// `source` if the action asks for it.
    ///
    /// An `Err` means the action did not complete. Once it has run, the
    /// outcome is always `Ok`, and a failed re-fetch is reported in
    /// [`ActionRun::refresh`] with the collection and selection left as they
    /// were.
    pub async fn run_action(
        &mut self,
        name: &str,
        source: &dyn DataSource<R>,
    ) -> Result<ActionRun, Error> {
        let report = self.prepare_action(name)?.run().await?;
        info!("[explorer] action '{}' done on {} rows", name, report.rows);

        let refresh = if report.refresh_requested {
            Some(self.refresh(source).await)
        } else {
            None
        };
        Ok(ActionRun { report, refresh })
    }
}

/// Outcome of [`Explorer::run_action`] for an action that completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRun {
    /// What the action did.
    pub report: ActionReport,
    /// The re-fetch that followed, if the action requested one.
    pub refresh: Option<Result<SelectionChange, SourceError>>,
}

impl ActionRun {
    /// Returns `true` if the collection was re-fetched and applied.
    pub fn refreshed(&self) -> bool {
        matches!(self.refresh, Some(Ok(_)))
    }
}

impl<R: Record> std::fmt::Debug for Explorer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Explorer")
            .field("records", &self.records.len())
            .field("view", &self.view)
            .field("panel_open", &self.selection.state().panel_open())
            .field("toolbar", &self.toolbar)
            .field("actions", &self.actions)
            .finish()
    }
}
