//! Records shown by the explorer

use std::collections::HashMap;
use std::fmt::Debug;
use std::fmt::Display;
use std::hash::Hash;

use super::Value;

/// A uniquely identified entity of a homogeneous collection.
///
/// Records are owned by the data layer. The explorer only clones and reads
/// them; it never mutates one.
///
/// # Example
///
/// ```
/// use explorer_lib::model::Record;
///
/// #[derive(Clone)]
/// struct Case {
///     id: u32,
///     title: String,
/// }
///
/// impl Record for Case {
///     type Id = u32;
///
///     fn id(&self) -> u32 {
///         self.id
///     }
/// }
/// ```
pub trait Record: Clone + Send + Sync + 'static {
    /// The identity type. Stable across refreshes of the same entity.
    type Id: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static;

    /// Returns the record's identity.
    fn id(&self) -> Self::Id;
}

/// A dynamic record holding its fields in a map.
///
/// Used when the record shape is only known at runtime, for example when a
/// data set is loaded from JSON. The `id` is also readable as the `"id"`
/// field so it can be displayed and searched like any other column.
///
/// # Example
///
/// ```
/// use explorer_lib::model::DynRecord;
///
/// let record = DynRecord::new("42")
///     .set("title", "Printer on fire")
///     .set("priority", 1i64);
///
/// assert_eq!(record.value("title").display(), "Printer on fire");
/// assert!(record.value("owner").is_null());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DynRecord {
    pub(crate) id: String,

    /// The field values, including `"id"`.
    pub(crate) fields: HashMap<String, Value>,
}

impl DynRecord {
    /// Creates a new record with the given ID and no other fields.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let mut fields = HashMap::new();
        fields.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        Self { id, fields }
    }

    /// Returns the field value, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns a clone of the field value, or `Value::Null` when absent.
    pub fn value(&self, field: &str) -> Value {
        self.fields.get(field).cloned().unwrap_or_default()
    }

    /// Returns `true` if `field` is set, even to `Null`.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns every field, `"id"` included.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Sets a field and returns the record.
    ///
    /// The `"id"` field is kept in sync with the record identity and cannot be
    /// overwritten here.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Inserts a field value. Writes to `"id"` are ignored.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        if field == ID_FIELD {
            return;
        }
        self.fields.insert(field, value.into());
    }
}

impl Record for DynRecord {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }
}

/// Name of the field that mirrors a [`DynRecord`]'s identity.
pub const ID_FIELD: &str = "id";
