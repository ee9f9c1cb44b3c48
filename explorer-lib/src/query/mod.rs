//! Query evaluation
//!
//! Turns a record collection and a [`ViewState`] into the ordered rows to
//! render. Evaluation is a pure function: it keeps no state between calls and
//! the same inputs always yield the same output.
//!
//! Steps, in order:
//!
//! 1. free text: a record matches when any visible field contains the query
//!    (case-insensitive); an empty query matches everything.
//! 2. facets: OR within one facet's selected options, AND across facets.
//! 3. sort: stable sort on the sort field, ties keep collection order.

mod predicate;
mod text;

pub use predicate::BoundPredicate;
pub use predicate::Predicate;
pub use text::TextMatch;

use crate::error::UnknownFieldError;
use crate::error::ViewError;
use crate::model::Record;
use crate::model::Value;
use crate::registry::FieldRegistry;
use crate::view::Direction;
use crate::view::ViewState;

/// Returns the rows of `records` that `view` shows, in display order.
///
/// Fails only when `view` references a field `registry` does not declare,
/// which means the view was built for a different registry.
///
/// # Example
///
/// ```
/// use explorer_lib::model::DynRecord;
/// use explorer_lib::query::{evaluate, TextMatch};
/// use explorer_lib::registry::{FieldDescriptor, FieldOption, FieldRegistry};
/// use explorer_lib::view::ViewState;
///
/// let registry = FieldRegistry::new([
///     FieldDescriptor::field("status", "Status")
///         .with_options([FieldOption::from("open"), FieldOption::from("closed")]),
/// ])
/// .unwrap();
/// let records = vec![
///     DynRecord::new("1").set("status", "open"),
///     DynRecord::new("2").set("status", "closed"),
/// ];
///
/// let view = ViewState::defaults(&registry)
///     .toggle_facet_option(&registry, "status", "open")
///     .unwrap();
/// let rows = evaluate(&records, &registry, &view, TextMatch::Substring).unwrap();
/// assert_eq!(rows.len(), 1);
/// ```
pub fn evaluate<'r, R: Record>(
    records: &'r [R],
    registry: &FieldRegistry<R>,
    view: &ViewState,
    mode: TextMatch,
) -> Result<Vec<&'r R>, UnknownFieldError> {
    view.validate(registry)?;

    let predicate = Predicate::from_view(view, mode);
    let mut bound = predicate.bind(registry)?;
    let rows: Vec<&R> = records.iter().filter(|r| bound.matches(r)).collect();

    let Some(sort) = view.sort() else {
        return Ok(rows);
    };
    let field = registry.get(&sort.key)?;

    let mut keyed: Vec<(Value, &R)> = rows.into_iter().map(|r| (field.value(r), r)).collect();
    // slice::sort_by is stable; descending compares b to a so ties keep their order
    match sort.direction {
        Direction::Asc => keyed.sort_by(|a, b| a.0.compare(&b.0)),
        Direction::Desc => keyed.sort_by(|a, b| b.0.compare(&a.0)),
    }
    Ok(keyed.into_iter().map(|(_, r)| r).collect())
}

/// Number of rows an option of a facet would match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetCount {
    /// The option key.
    pub value: String,
    /// The option label.
    pub label: String,
    /// Rows matching this option and every other active constraint.
    pub count: usize,
    /// Whether the option is currently selected.
    pub selected: bool,
}

/// Counts, for each declared option of facet `key`, how many records match it
/// together with the rest of the view.
///
/// The facet's own selection is ignored so counts stay stable while the user
/// ticks options of the same facet.
pub fn facet_counts<R: Record>(
    records: &[R],
    registry: &FieldRegistry<R>,
    view: &ViewState,
    key: &str,
    mode: TextMatch,
) -> Result<Vec<FacetCount>, ViewError> {
    view.validate(registry)?;
    let field = registry.get(key)?;
    let Some(options) = field.options() else {
        return Err(ViewError::NotFacetable {
            field: key.to_string(),
        });
    };

    let predicate = Predicate::from_view_without_facet(view, mode, key);
    let mut bound = predicate.bind(registry)?;

    let mut counts: Vec<FacetCount> = options
        .iter()
        .map(|o| FacetCount {
            value: o.value.clone(),
            label: o.label.clone(),
            count: 0,
            selected: view.is_option_selected(key, &o.value),
        })
        .collect();

    for record in records.iter().filter(|r| bound.matches(r)) {
        let keys = field.value(record).facet_keys();
        for count in counts.iter_mut() {
            if keys.contains(&count.value) {
                count.count += 1;
            }
        }
    }

    Ok(counts)
}
