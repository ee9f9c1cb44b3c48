//! Selection coordinator
//!
//! Owns which record, if any, the detail panel shows. The panel is modelled
//! as a two-state machine so "open without a record" cannot be represented,
//! and collection refreshes are an explicit event that either re-points the
//! panel at the refreshed copy of its record or closes it.

use log::debug;

use crate::model::Record;

/// State of the detail panel.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionState<R> {
    /// No record selected; the panel is closed.
    Closed,
    /// The panel is open on this record.
    Open(R),
}

impl<R: Record> SelectionState<R> {
    /// Returns `true` if the panel is open.
    pub fn panel_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    /// Returns the ID of the selected record.
    pub fn selected_id(&self) -> Option<R::Id> {
        match self {
            Self::Closed => None,
            Self::Open(record) => Some(record.id()),
        }
    }

    /// Returns the selected record.
    pub fn record(&self) -> Option<&R> {
        match self {
            Self::Closed => None,
            Self::Open(record) => Some(record),
        }
    }
}

/// What a collection refresh did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// Nothing was selected.
    Unchanged,
    /// The selected record is still present; the panel now shows its new copy.
    Refreshed,
    /// The selected record disappeared; the panel was closed.
    Evicted,
}

/// Keeps the detail panel in sync with the selected record.
///
/// # Example
///
/// ```
/// use explorer_lib::model::DynRecord;
/// use explorer_lib::selection::{SelectionChange, SelectionCoordinator};
///
/// let mut selection = SelectionCoordinator::new();
/// selection.select_row(DynRecord::new("2"));
/// assert!(selection.state().panel_open());
///
/// let change = selection.on_collection_changed(&[DynRecord::new("1")]);
/// assert_eq!(change, SelectionChange::Evicted);
/// assert!(!selection.state().panel_open());
/// ```
#[derive(Debug, Clone)]
pub struct SelectionCoordinator<R> {
    state: SelectionState<R>,
}

impl<R: Record> Default for SelectionCoordinator<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> SelectionCoordinator<R> {
    /// Creates a coordinator with the panel closed.
    pub fn new() -> Self {
        Self {
            state: SelectionState::Closed,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> &SelectionState<R> {
        &self.state
    }

    /// Opens the panel on `record`, replacing any previous selection.
    pub fn select_row(&mut self, record: R) {
        debug!("[selection] open {}", record.id());
        self.state = SelectionState::Open(record);
    }

    /// Opens the panel on the record of `records` with ID `id`.
    ///
    /// Returns `false` and leaves the state untouched if no record has that ID.
    pub fn select_by_id(&mut self, records: &[R], id: &R::Id) -> bool {
        match records.iter().find(|r| &r.id() == id) {
            Some(record) => {
                self.select_row(record.clone());
                true
            }
            None => {
                debug!("[selection] ignoring click on unknown row {}", id);
                false
            }
        }
    }

    /// Closes the panel.
    pub fn close(&mut self) {
        if self.state.panel_open() {
            debug!("[selection] close");
        }
        self.state = SelectionState::Closed;
    }

    /// Reconciles the selection with a new snapshot of the collection.
    ///
    /// If the selected record is gone the panel closes; otherwise the panel
    /// switches to the refreshed copy so it never shows stale fields.
    pub fn on_collection_changed(&mut self, records: &[R]) -> SelectionChange {
        let Some(id) = self.state.selected_id() else {
            return SelectionChange::Unchanged;
        };

        match records.iter().find(|r| r.id() == id) {
            Some(fresh) => {
                self.state = SelectionState::Open(fresh.clone());
                SelectionChange::Refreshed
            }
            None => {
                debug!("[selection] {} left the collection, closing panel", id);
                self.state = SelectionState::Closed;
                SelectionChange::Evicted
            }
        }
    }

    /// Drops the selection, as when the explorer unmounts.
    pub fn clear(&mut self) {
        self.state = SelectionState::Closed;
    }
}
