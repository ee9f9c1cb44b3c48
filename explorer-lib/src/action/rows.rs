//! Row snapshots handed to row actions

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::UnknownFieldError;
use crate::model::Record;
use crate::model::Value;
use crate::registry::FieldRegistry;
use crate::view::ViewState;

/// One rendered row, reduced to its visible cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowSnapshot {
    /// The record ID, as text.
    pub id: String,
    /// Cell values keyed by field key.
    pub cells: BTreeMap<String, Value>,
}

impl RowSnapshot {
    /// Returns the value of the cell `key`.
    pub fn cell(&self, key: &str) -> Option<&Value> {
        self.cells.get(key)
    }
}

/// The rows a row action operates on.
///
/// Holds exactly the rows the explorer currently renders, in render order,
/// with only the visible columns. Filtered-out rows and hidden columns never
/// reach an action.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RowSet {
    /// Visible column keys, in declaration order.
    pub columns: Vec<String>,
    /// Rendered rows.
    pub rows: Vec<RowSnapshot>,
}

impl RowSet {
    /// Projects rendered `rows` onto the visible columns of `view`.
    pub fn from_rendered<R: Record>(
        rows: &[&R],
        registry: &FieldRegistry<R>,
        view: &ViewState,
    ) -> Result<Self, UnknownFieldError> {
        view.validate(registry)?;
        let fields: Vec<_> = registry
            .iter()
            .filter(|f| view.is_visible(f.key()))
            .collect();

        let rows = rows
            .iter()
            .map(|record| RowSnapshot {
                id: record.id().to_string(),
                cells: fields
                    .iter()
                    .map(|f| (f.key().to_string(), f.value(record)))
                    .collect(),
            })
            .collect();

        Ok(Self {
            columns: fields.iter().map(|f| f.key().to_string()).collect(),
            rows,
        })
    }

    /// Narrows the set to a single column.
    ///
    /// Returns `None` if the column is not part of this set.
    pub fn only_column(&self, key: &str) -> Option<RowSet> {
        if !self.columns.iter().any(|c| c == key) {
            return None;
        }
        let rows = self
            .rows
            .iter()
            .map(|row| RowSnapshot {
                id: row.id.clone(),
                cells: row
                    .cells
                    .iter()
                    .filter(|(k, _)| k.as_str() == key)
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            })
            .collect();
        Some(RowSet {
            columns: vec![key.to_string()],
            rows,
        })
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
