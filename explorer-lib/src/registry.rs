//! Field registry
//!
//! Declares, for one record type, which fields the explorer can display,
//! search, facet and sort on. The registry is built once and is read-only
//! afterwards, so views can hold field keys without them going stale.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::error::RegistryError;
use crate::error::UnknownFieldError;
use crate::model::DynRecord;
use crate::model::Record;
use crate::model::Value;

/// A declared categorical option of a field, e.g. a status or priority.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FieldOption {
    /// The option key, compared against the field's display value.
    pub value: String,
    /// The human-readable label.
    pub label: String,
}

impl FieldOption {
    /// Creates a new option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

impl From<&str> for FieldOption {
    fn from(value: &str) -> Self {
        Self::new(value, value)
    }
}

type Accessor<R> = Arc<dyn Fn(&R) -> Value + Send + Sync>;

/// Describes one field of a record type.
///
/// # Example
///
/// ```
/// use explorer_lib::registry::{FieldDescriptor, FieldOption};
/// use explorer_lib::model::DynRecord;
///
/// let status = FieldDescriptor::<DynRecord>::field("status", "Status")
///     .with_options([FieldOption::new("open", "Open"), FieldOption::new("closed", "Closed")]);
///
/// assert!(status.is_facet());
/// ```
pub struct FieldDescriptor<R> {
    key: String,
    label: String,
    accessor: Accessor<R>,
    options: Option<Vec<FieldOption>>,
    sortable: bool,
    default_visible: bool,
    feature: Option<String>,
}

impl<R> FieldDescriptor<R> {
    /// Creates a descriptor reading its value through `accessor`.
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        accessor: impl Fn(&R) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            accessor: Arc::new(accessor),
            options: None,
            sortable: true,
            default_visible: true,
            feature: None,
        }
    }

    /// Restricts the field to a closed set of options, making it a facet.
    pub fn with_options(mut self, options: impl IntoIterator<Item = FieldOption>) -> Self {
        self.options = Some(options.into_iter().collect());
        self
    }

    /// Marks the field as not sortable.
    pub fn not_sortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Hides the column until the user turns it on.
    pub fn hidden(mut self) -> Self {
        self.default_visible = false;
        self
    }

    /// Gates the facet behind a named feature.
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self
    }

    /// Returns the field key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Reads the field's value from a record.
    pub fn value(&self, record: &R) -> Value {
        (self.accessor)(record)
    }

    /// Returns the declared options, if this field is categorical.
    pub fn options(&self) -> Option<&[FieldOption]> {
        self.options.as_deref()
    }

    /// Returns `true` if the field declares options.
    pub fn is_facet(&self) -> bool {
        self.options.is_some()
    }

    /// Returns `true` if `value` is one of the declared options.
    pub fn has_option(&self, value: &str) -> bool {
        self.options
            .as_deref()
            .is_some_and(|options| options.iter().any(|o| o.value == value))
    }

    /// Returns `true` if the field can be sorted on.
    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// Returns `true` if the column is shown in a fresh view.
    pub fn is_default_visible(&self) -> bool {
        self.default_visible
    }

    /// Returns the feature gating this facet, if any.
    pub fn feature(&self) -> Option<&str> {
        self.feature.as_deref()
    }
}

impl FieldDescriptor<DynRecord> {
    /// Creates a descriptor reading the field of the same key from a [`DynRecord`].
    pub fn field(key: impl Into<String>, label: impl Into<String>) -> Self {
        let key = key.into();
        let lookup = key.clone();
        Self::new(key, label, move |record: &DynRecord| record.value(&lookup))
    }
}

impl<R> Clone for FieldDescriptor<R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            accessor: Arc::clone(&self.accessor),
            options: self.options.clone(),
            sortable: self.sortable,
            default_visible: self.default_visible,
            feature: self.feature.clone(),
        }
    }
}

impl<R> fmt::Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("options", &self.options)
            .field("sortable", &self.sortable)
            .field("default_visible", &self.default_visible)
            .field("feature", &self.feature)
            .finish_non_exhaustive()
    }
}

/// The set of fields declared for a record type, in declaration order.
#[derive(Debug, Clone)]
pub struct FieldRegistry<R> {
    fields: Vec<FieldDescriptor<R>>,
}

impl<R: Record> FieldRegistry<R> {
    /// Builds a registry from descriptors.
    ///
    /// Keys must be unique and at least one field must be declared.
    pub fn new(
        descriptors: impl IntoIterator<Item = FieldDescriptor<R>>,
    ) -> Result<Self, RegistryError> {
        let fields: Vec<_> = descriptors.into_iter().collect();
        if fields.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.key.as_str()) {
                return Err(RegistryError::DuplicateKey {
                    key: field.key.clone(),
                });
            }
            if let Some(options) = &field.options {
                let mut values = HashSet::new();
                for option in options {
                    if !values.insert(option.value.as_str()) {
                        return Err(RegistryError::DuplicateOption {
                            key: field.key.clone(),
                            value: option.value.clone(),
                        });
                    }
                }
            }
        }

        Ok(Self { fields })
    }

    /// Returns the descriptor for `key`.
    pub fn get(&self, key: &str) -> Result<&FieldDescriptor<R>, UnknownFieldError> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .ok_or_else(|| UnknownFieldError::new(key))
    }

    /// Returns `true` if `key` is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.fields.iter().any(|f| f.key == key)
    }

    /// Returns all field keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.key.as_str())
    }

    /// Returns all descriptors in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor<R>> {
        self.fields.iter()
    }

    /// Returns the fields that declare options.
    pub fn facets(&self) -> impl Iterator<Item = &FieldDescriptor<R>> {
        self.fields.iter().filter(|f| f.is_facet())
    }

    /// Returns the number of registered fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always `false`: a registry holds at least one field.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
