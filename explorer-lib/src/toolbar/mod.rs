//! Toolbar controller
//!
//! Translates discrete toolbar events into view state transitions. The only
//! logic here is input normalization: free text is trimmed and debounced, and
//! gated facets are refused when their feature is off. Everything else is
//! delegated to [`ViewState`].

mod debounce;
mod entitlements;

pub use debounce::Debouncer;
pub use entitlements::AllowAll;
pub use entitlements::Entitlements;
pub use entitlements::FeatureSet;

use std::sync::Arc;
use std::time::Instant;

use log::debug;
use log::warn;

use crate::config::ToolbarConfig;
use crate::error::ViewError;
use crate::model::Record;
use crate::registry::FieldDescriptor;
use crate::registry::FieldRegistry;
use crate::view::Direction;
use crate::view::ViewState;

/// A user edit in the toolbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarEvent {
    /// The search box now contains this text.
    TextInput(String),
    /// An option of a facet menu was ticked or unticked.
    ToggleFacet { field: String, value: String },
    /// A facet's "clear" button was pressed.
    ClearFacet(String),
    /// A sort was picked from a column menu.
    SortBy {
        field: String,
        direction: Option<Direction>,
    },
    /// A column header was clicked.
    CycleSort(String),
    /// A column was ticked or unticked in the column menu.
    ToggleColumn(String),
    /// A column's visibility was set explicitly.
    SetColumnVisible { field: String, visible: bool },
    /// The "reset view" button was pressed.
    Reset,
}

impl ToolbarEvent {
    /// Creates a facet toggle event.
    pub fn toggle_facet(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::ToggleFacet {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a sort event.
    pub fn sort_by(field: impl Into<String>, direction: Option<Direction>) -> Self {
        Self::SortBy {
            field: field.into(),
            direction,
        }
    }

    /// Creates a column visibility event.
    pub fn set_column_visible(field: impl Into<String>, visible: bool) -> Self {
        Self::SetColumnVisible {
            field: field.into(),
            visible,
        }
    }
}

/// Result of handling a toolbar event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarOutcome {
    /// The view changed.
    Applied(ViewState),
    /// Text input is waiting for the debounce window.
    Pending,
    /// The edit was valid but changed nothing.
    Unchanged,
    /// The edit was refused; the view is unchanged.
    Rejected(ViewError),
}

impl ToolbarOutcome {
    /// Returns the new view, if the edit changed it.
    pub fn into_view(self) -> Option<ViewState> {
        match self {
            Self::Applied(view) => Some(view),
            _ => None,
        }
    }
}

/// Drives view state edits from toolbar events.
pub struct ToolbarController {
    config: ToolbarConfig,
    debouncer: Debouncer,
    entitlements: Arc<dyn Entitlements>,
}

impl ToolbarController {
    /// Creates a controller with every feature enabled.
    pub fn new(config: ToolbarConfig) -> Self {
        let debouncer = Debouncer::new(config.debounce());
        Self {
            config,
            debouncer,
            entitlements: Arc::new(AllowAll),
        }
    }

    /// Sets the entitlements consulted for gated facets.
    pub fn with_entitlements(mut self, entitlements: impl Entitlements + 'static) -> Self {
        self.entitlements = Arc::new(entitlements);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ToolbarConfig {
        &self.config
    }

    /// Returns the search text not yet committed to the view.
    pub fn pending_text(&self) -> Option<&str> {
        self.debouncer.pending()
    }

    /// Returns when pending text will be committed, so callers can schedule a poll.
    pub fn deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Returns the facets the toolbar should offer.
    pub fn visible_facets<'a, R: Record>(
        &self,
        registry: &'a FieldRegistry<R>,
    ) -> Vec<&'a FieldDescriptor<R>> {
        registry
            .facets()
            .filter(|f| self.facet_enabled(f))
            .collect()
    }

    /// Applies `event` to `view`.
    pub fn handle<R: Record>(
        &mut self,
        registry: &FieldRegistry<R>,
        view: &ViewState,
        event: ToolbarEvent,
        now: Instant,
    ) -> ToolbarOutcome {
        debug!("[toolbar] {:?}", event);

        let result = match event {
            ToolbarEvent::TextInput(text) => {
                let text = text.trim().to_string();
                if self.debouncer.window().is_zero() {
                    self.debouncer.cancel();
                    Ok(view.set_free_text(text))
                } else {
                    self.debouncer.input(text, now);
                    return ToolbarOutcome::Pending;
                }
            }
            ToolbarEvent::ToggleFacet { field, value } => self
                .check_facet(registry, &field)
                .and_then(|()| view.toggle_facet_option(registry, &field, &value)),
            ToolbarEvent::ClearFacet(field) => self
                .check_facet(registry, &field)
                .and_then(|()| view.clear_facet(registry, &field)),
            ToolbarEvent::SortBy { field, direction } => {
                view.set_sort(registry, &field, direction)
            }
            ToolbarEvent::CycleSort(field) => view.cycle_sort(registry, &field),
            ToolbarEvent::ToggleColumn(field) => view.toggle_column(registry, &field),
            ToolbarEvent::SetColumnVisible { field, visible } => {
                view.set_column_visible(registry, &field, visible)
            }
            ToolbarEvent::Reset => {
                self.debouncer.cancel();
                Ok(view.reset(registry))
            }
        };

        match result {
            Ok(next) if &next == view => ToolbarOutcome::Unchanged,
            Ok(next) => ToolbarOutcome::Applied(next),
            Err(err) => {
                warn!("[toolbar] edit rejected: {}", err);
                ToolbarOutcome::Rejected(err)
            }
        }
    }

    /// Commits pending search text if its debounce window has elapsed.
    pub fn poll(&mut self, view: &ViewState, now: Instant) -> Option<ViewState> {
        let text = self.debouncer.poll(now)?;
        Self::commit_text(view, text)
    }

    /// Commits pending search text immediately, e.g. when Enter is pressed.
    pub fn flush(&mut self, view: &ViewState) -> Option<ViewState> {
        let text = self.debouncer.take()?;
        Self::commit_text(view, text)
    }

    /// Drops pending search text without committing it.
    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }

    fn commit_text(view: &ViewState, text: String) -> Option<ViewState> {
        if view.free_text() == text {
            None
        } else {
            Some(view.set_free_text(text))
        }
    }

    fn facet_enabled<R>(&self, field: &FieldDescriptor<R>) -> bool {
        field
            .feature()
            .is_none_or(|feature| self.entitlements.is_enabled(feature))
    }

    fn check_facet<R: Record>(
        &self,
        registry: &FieldRegistry<R>,
        key: &str,
    ) -> Result<(), ViewError> {
        let field = registry.get(key)?;
        if self.facet_enabled(field) {
            return Ok(());
        }
        Err(ViewError::FacetUnavailable {
            field: key.to_string(),
            feature: field.feature().unwrap_or_default().to_string(),
        })
    }
}

impl Default for ToolbarController {
    fn default() -> Self {
        Self::new(ToolbarConfig::default())
    }
}

impl std::fmt::Debug for ToolbarController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolbarController")
            .field("config", &self.config)
            .field("debouncer", &self.debouncer)
            .finish_non_exhaustive()
    }
}
