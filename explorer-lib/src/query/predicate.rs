//! Row predicates compiled from a view

use std::collections::BTreeSet;

use super::text::TextMatch;
use super::text::TextMatcher;
use crate::error::UnknownFieldError;
use crate::model::Record;
use crate::registry::FieldDescriptor;
use crate::registry::FieldRegistry;
use crate::view::ViewState;

/// A filter condition over records, built from a [`ViewState`].
///
/// The tree is plain data so callers can inspect what a view filters on.
/// It references fields by key; [`Predicate::bind`] resolves the keys against
/// a registry before any record is tested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Matches every record.
    All,
    /// Any of `fields` contains `needle`.
    Text {
        fields: Vec<String>,
        needle: String,
        mode: TextMatch,
    },
    /// The value of `field` is one of `values`.
    OneOf {
        field: String,
        values: BTreeSet<String>,
    },
    /// Logical AND of multiple predicates.
    And(Vec<Predicate>),
}

impl Predicate {
    /// Builds the predicate selecting the rows `view` shows.
    ///
    /// The free-text query is trimmed and searched in the visible columns.
    /// Each facet with a selection contributes one `OneOf`; facets combine
    /// with AND, options within a facet with OR.
    pub fn from_view(view: &ViewState, mode: TextMatch) -> Self {
        Self::build(view, mode, None)
    }

    /// Like [`Predicate::from_view`] but ignoring the facet `skip`.
    ///
    /// Used for facet counts: an option's count reflects every other
    /// constraint so the user sees what selecting it would add.
    pub fn from_view_without_facet(view: &ViewState, mode: TextMatch, skip: &str) -> Self {
        Self::build(view, mode, Some(skip))
    }

    fn build(view: &ViewState, mode: TextMatch, skip: Option<&str>) -> Self {
        let mut parts = Vec::new();

        let needle = view.free_text().trim();
        if !needle.is_empty() {
            parts.push(Predicate::Text {
                fields: view.visible_columns().iter().cloned().collect(),
                needle: needle.to_string(),
                mode,
            });
        }

        for (field, values) in view.facet_filters() {
            if Some(field.as_str()) == skip || values.is_empty() {
                continue;
            }
            parts.push(Predicate::OneOf {
                field: field.clone(),
                values: values.clone(),
            });
        }

        match parts.len() {
            0 => Predicate::All,
            1 => parts.remove(0),
            _ => Predicate::And(parts),
        }
    }

    /// Resolves field keys against `registry`.
    pub fn bind<'a, R: Record>(
        &'a self,
        registry: &'a FieldRegistry<R>,
    ) -> Result<BoundPredicate<'a, R>, UnknownFieldError> {
        let bound = match self {
            Predicate::All => Bound::All,
            Predicate::Text {
                fields,
                needle,
                mode,
            } => Bound::Text {
                fields: fields
                    .iter()
                    .map(|key| registry.get(key))
                    .collect::<Result<_, _>>()?,
                matcher: TextMatcher::new(needle, *mode),
            },
            Predicate::OneOf { field, values } => Bound::OneOf {
                field: registry.get(field)?,
                values,
            },
            Predicate::And(parts) => Bound::And(
                parts
                    .iter()
                    .map(|p| p.bind(registry).map(|b| b.inner))
                    .collect::<Result<_, _>>()?,
            ),
        };
        Ok(BoundPredicate { inner: bound })
    }
}

/// A [`Predicate`] whose fields have been resolved, ready to test records.
pub struct BoundPredicate<'a, R> {
    inner: Bound<'a, R>,
}

impl<R: Record> BoundPredicate<'_, R> {
    /// Returns `true` if `record` satisfies the predicate.
    pub fn matches(&mut self, record: &R) -> bool {
        self.inner.matches(record)
    }
}

enum Bound<'a, R> {
    All,
    Text {
        fields: Vec<&'a FieldDescriptor<R>>,
        matcher: TextMatcher,
    },
    OneOf {
        field: &'a FieldDescriptor<R>,
        values: &'a BTreeSet<String>,
    },
    And(Vec<Bound<'a, R>>),
}

impl<R: Record> Bound<'_, R> {
    fn matches(&mut self, record: &R) -> bool {
        match self {
            Bound::All => true,
            Bound::Text { fields, matcher } => fields
                .iter()
                .any(|field| matcher.is_match(&field.value(record).display())),
            Bound::OneOf { field, values } => field
                .value(record)
                .facet_keys()
                .iter()
                .any(|key| values.contains(key)),
            Bound::And(parts) => parts.iter_mut().all(|p| p.matches(record)),
        }
    }
}
