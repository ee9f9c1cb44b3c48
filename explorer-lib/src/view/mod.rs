//! View state store
//!
//! A [`ViewState`] is the combined free-text, facet, sort and column
//! configuration that drives what the explorer renders. Every edit is a pure
//! transition: it takes the current state by reference and returns a new one,
//! or an error and no new state at all.

mod order;

pub use order::Direction;
pub use order::SortSpec;

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::error::UnknownFieldError;
use crate::error::ViewError;
use crate::model::Record;
use crate::registry::FieldRegistry;

/// Filter, sort and column-visibility configuration of an explorer.
///
/// Invariants, upheld by every transition:
///
/// - `visible_columns` is a non-empty subset of the registry's keys.
/// - facet selections only hold declared option values of facet fields.
/// - a field with an empty selection has no entry at all.
///
/// # Example
///
/// ```
/// use explorer_lib::model::DynRecord;
/// use explorer_lib::registry::{FieldDescriptor, FieldOption, FieldRegistry};
/// use explorer_lib::view::ViewState;
///
/// let registry = FieldRegistry::new([
///     FieldDescriptor::<DynRecord>::field("title", "Title"),
///     FieldDescriptor::field("status", "Status")
///         .with_options([FieldOption::from("open"), FieldOption::from("closed")]),
/// ])
/// .unwrap();
///
/// let view = ViewState::defaults(&registry)
///     .toggle_facet_option(&registry, "status", "open")
///     .unwrap();
/// assert!(view.is_option_selected("status", "open"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    free_text: String,
    facets: BTreeMap<String, BTreeSet<String>>,
    sort: Option<SortSpec>,
    visible: BTreeSet<String>,
}

impl ViewState {
    /// Creates the view a freshly mounted explorer starts with.
    ///
    /// No query, no facets, no sort. Columns declared default-visible are
    /// shown; when every field is hidden by default the first one is shown.
    pub fn defaults<R: Record>(registry: &FieldRegistry<R>) -> Self {
        let mut visible: BTreeSet<String> = registry
            .iter()
            .filter(|f| f.is_default_visible())
            .map(|f| f.key().to_string())
            .collect();
        if visible.is_empty()
            && let Some(first) = registry.keys().next()
        {
            visible.insert(first.to_string());
        }

        Self {
            free_text: String::new(),
            facets: BTreeMap::new(),
            sort: None,
            visible,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the free-text query.
    pub fn free_text(&self) -> &str {
        &self.free_text
    }

    /// Returns the active facet selections, keyed by field.
    pub fn facet_filters(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.facets
    }

    /// Returns the selected options of one facet, if any are selected.
    pub fn facet_selection(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.facets.get(key)
    }

    /// Returns `true` if `value` is selected in the facet `key`.
    pub fn is_option_selected(&self, key: &str, value: &str) -> bool {
        self.facets.get(key).is_some_and(|set| set.contains(value))
    }

    /// Returns the active sort.
    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Returns the keys of the visible columns.
    pub fn visible_columns(&self) -> &BTreeSet<String> {
        &self.visible
    }

    /// Returns `true` if the column `key` is visible.
    pub fn is_visible(&self, key: &str) -> bool {
        self.visible.contains(key)
    }

    /// Returns `true` if the view filters rows in any way.
    pub fn is_filtered(&self) -> bool {
        !self.free_text.is_empty() || !self.facets.is_empty()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Replaces the free-text query.
    pub fn set_free_text(&self, text: impl Into<String>) -> ViewState {
        Self {
            free_text: text.into(),
            ..self.clone()
        }
    }

    /// Adds `value` to the facet `key` if absent, removes it if present.
    ///
    /// Applying the same toggle twice returns the original view.
    pub fn toggle_facet_option<R: Record>(
        &self,
        registry: &FieldRegistry<R>,
        key: &str,
        value: &str,
    ) -> Result<ViewState, ViewError> {
        let field = registry.get(key)?;
        if !field.is_facet() {
            return Err(ViewError::NotFacetable {
                field: key.to_string(),
            });
        }
        if !field.has_option(value) {
            return Err(ViewError::invalid_filter_value(key, value));
        }

        let mut next = self.clone();
        let selection = next.facets.entry(key.to_string()).or_default();
        if !selection.remove(value) {
            selection.insert(value.to_string());
        }
        if selection.is_empty() {
            next.facets.remove(key);
        }
        Ok(next)
    }

    /// Clears every selected option of the facet `key`.
    pub fn clear_facet<R: Record>(
        &self,
        registry: &FieldRegistry<R>,
        key: &str,
    ) -> Result<ViewState, ViewError> {
        registry.get(key)?;
        let mut next = self.clone();
        next.facets.remove(key);
        Ok(next)
    }

    /// Sorts by `key` in `direction`, or removes the sort when `direction` is `None`.
    pub fn set_sort<R: Record>(
        &self,
        registry: &FieldRegistry<R>,
        key: &str,
        direction: Option<Direction>,
    ) -> Result<ViewState, ViewError> {
        let field = registry.get(key)?;
        let sort = match direction {
            Some(direction) => {
                if !field.is_sortable() {
                    return Err(ViewError::NotSortable {
                        field: key.to_string(),
                    });
                }
                Some(SortSpec::new(key, direction))
            }
            None => None,
        };
        Ok(Self {
            sort,
            ..self.clone()
        })
    }

    /// Advances the sort on `key` the way a header click does:
    /// unsorted, ascending, descending, unsorted.
    ///
    /// Clicking a different column starts again at ascending.
    pub fn cycle_sort<R: Record>(
        &self,
        registry: &FieldRegistry<R>,
        key: &str,
    ) -> Result<ViewState, ViewError> {
        let next = match &self.sort {
            Some(sort) if sort.key == key => match sort.direction {
                Direction::Asc => Some(Direction::Desc),
                Direction::Desc => None,
            },
            _ => Some(Direction::Asc),
        };
        self.set_sort(registry, key, next)
    }

    /// Shows or hides the column `key`.
    ///
    /// Hiding the last visible column is rejected with
    /// [`ViewError::InvalidStateTransition`].
    pub fn set_column_visible<R: Record>(
        &self,
        registry: &FieldRegistry<R>,
        key: &str,
        visible: bool,
    ) -> Result<ViewState, ViewError> {
        registry.get(key)?;
        let mut next = self.clone();
        if visible {
            next.visible.insert(key.to_string());
        } else {
            if self.visible.len() == 1 && self.visible.contains(key) {
                return Err(ViewError::invalid_transition(format!(
                    "cannot hide '{}', it is the last visible column",
                    key
                )));
            }
            next.visible.remove(key);
        }
        Ok(next)
    }

    /// Flips the visibility of the column `key`.
    pub fn toggle_column<R: Record>(
        &self,
        registry: &FieldRegistry<R>,
        key: &str,
    ) -> Result<ViewState, ViewError> {
        let visible = self.is_visible(key);
        self.set_column_visible(registry, key, !visible)
    }

    /// Returns the default view for `registry`.
    pub fn reset<R: Record>(&self, registry: &FieldRegistry<R>) -> ViewState {
        Self::defaults(registry)
    }

    /// Checks that every field this view references is registered.
    pub fn validate<R: Record>(&self, registry: &FieldRegistry<R>) -> Result<(), UnknownFieldError> {
        let keys = self
            .visible
            .iter()
            .chain(self.facets.keys())
            .chain(self.sort.iter().map(|s| &s.key));
        for key in keys {
            registry.get(key)?;
        }
        Ok(())
    }
}
