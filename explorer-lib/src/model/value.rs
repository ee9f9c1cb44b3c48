//! Value enum for dynamic field values

use std::cmp::Ordering;

use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// A dynamic value produced by a field accessor.
///
/// Every field the explorer can display, search, facet or sort on is read
/// through its accessor as a `Value`. Two views of a value matter:
///
/// - [`Value::display`] is the text shown in a cell and searched by the
///   free-text query.
/// - [`Value::compare`] is the total order used when sorting a column.
///
/// # Example
///
/// ```
/// use explorer_lib::model::Value;
///
/// let status = Value::from("open");
/// let priority = Value::from(2i64);
/// let empty = Value::Null;
///
/// assert_eq!(status.display(), "open");
/// assert!(empty.compare(&priority).is_lt());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null/empty value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Date and time (tried before `String` so RFC 3339 text parses as a date).
    DateTime(DateTime<Utc>),
    /// String value.
    String(String),
    /// Multi-valued field, such as a list of indicators.
    List(Vec<Value>),
    /// Fallback for JSON objects.
    Json(serde_json::Value),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::DateTime(_) => "datetime",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Json(_) => "json",
        }
    }

    /// Returns the display text of this value.
    ///
    /// Null renders as an empty string and lists are joined with `", "`.
    /// Timestamps render the way they serialize, with a `Z` suffix.
    pub fn display(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            Value::String(s) => s.clone(),
            Value::List(items) => items
                .iter()
                .map(Value::display)
                .collect::<Vec<_>>()
                .join(", "),
            Value::Json(json) => json.to_string(),
        }
    }

    /// Returns the option keys this value carries for facet matching.
    ///
    /// A list yields one key per element, anything else yields its display
    /// text. Null yields nothing, so it never matches a facet.
    pub fn facet_keys(&self) -> Vec<String> {
        match self {
            Value::Null => Vec::new(),
            Value::List(items) => items.iter().flat_map(Value::facet_keys).collect(),
            other => vec![other.display()],
        }
    }

    /// Total order used for sorting.
    ///
    /// Values of different kinds order by kind: null, bool, number, datetime,
    /// string, list, json. Integers and floats compare numerically with each
    /// other. Strings compare case-insensitively.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Int(a), Value::Float(b)) => compare_int_float(*a, *b),
            (Value::Float(a), Value::Int(b)) => compare_int_float(*b, *a).reverse(),
            (Value::Float(a), Value::Float(b)) => compare_floats(*a, *b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (Value::List(a), Value::List(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    let ord = x.compare(y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            (Value::Json(a), Value::Json(b)) => a.to_string().cmp(&b.to_string()),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::DateTime(_) => 3,
            Value::String(_) => 4,
            Value::List(_) => 5,
            Value::Json(_) => 6,
        }
    }
}

/// Compares an integer with a float exactly, without rounding the integer.
///
/// NaN sorts after every number when positive and before when negative,
/// matching [`f64::total_cmp`].
fn compare_int_float(int: i64, float: f64) -> Ordering {
    // 2^63, the first float above i64::MAX
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if float.is_nan() {
        return if float.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if float >= LIMIT {
        return Ordering::Less;
    }
    if float < -LIMIT {
        return Ordering::Greater;
    }

    let floor = float.floor();
    match int.cmp(&(floor as i64)) {
        Ordering::Equal if float > floor => Ordering::Less,
        ord => ord,
    }
}

/// Numeric order for floats; `-0.0` equals `0.0` so the order agrees with
/// [`compare_int_float`]. NaN falls back to [`f64::total_cmp`].
fn compare_floats(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.display(), "");
        assert_eq!(Value::from(42i64).display(), "42");
        assert_eq!(Value::from(vec!["vip", "escalated"]).display(), "vip, escalated");
    }

    #[test]
    fn test_facet_keys() {
        assert!(Value::Null.facet_keys().is_empty());
        assert_eq!(Value::from("open").facet_keys(), vec!["open"]);
        assert_eq!(
            Value::from(vec!["a", "b"]).facet_keys(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_compare_numbers_across_kinds() {
        assert_eq!(Value::from(2i64).compare(&Value::from(2.5)), Ordering::Less);
        assert_eq!(Value::from(3.0).compare(&Value::from(3i64)), Ordering::Equal);
    }

    #[test]
    fn test_compare_numbers_beyond_f64_precision() {
        let two_53 = 1i64 << 53;
        let a = Value::Int(two_53);
        let b = Value::Float(two_53 as f64);
        let c = Value::Int(two_53 + 1);

        assert_eq!(a.compare(&b), Ordering::Equal);
        assert_eq!(b.compare(&c), Ordering::Less);
        assert_eq!(c.compare(&b), Ordering::Greater);
        assert_eq!(a.compare(&c), Ordering::Less);
        assert_eq!(Value::Int(i64::MAX).compare(&Value::Float(i64::MAX as f64)), Ordering::Less);
        assert_eq!(Value::Int(i64::MIN).compare(&Value::Float(i64::MIN as f64)), Ordering::Equal);
    }

    #[test]
    fn test_compare_fractions_and_special_floats() {
        assert_eq!(Value::Int(-3).compare(&Value::Float(-2.5)), Ordering::Less);
        assert_eq!(Value::Int(-2).compare(&Value::Float(-2.5)), Ordering::Greater);
        assert_eq!(Value::Int(0).compare(&Value::Float(-0.0)), Ordering::Equal);
        assert_eq!(Value::Float(-0.0).compare(&Value::Float(0.0)), Ordering::Equal);
        assert_eq!(Value::Int(i64::MAX).compare(&Value::Float(f64::INFINITY)), Ordering::Less);
        assert_eq!(Value::Int(i64::MIN).compare(&Value::Float(f64::NEG_INFINITY)), Ordering::Greater);
        assert_eq!(Value::Int(5).compare(&Value::Float(f64::NAN)), Ordering::Less);
        assert_eq!(Value::Float(f64::NAN).compare(&Value::Float(1.0)), Ordering::Greater);
    }

    #[test]
    fn test_sort_mixed_numbers_near_f64_precision() {
        let base = 1i64 << 53;
        let mut values: Vec<Value> = (0..200i64)
            .rev()
            .map(|i| {
                if i % 3 == 0 {
                    Value::Float((base + i) as f64)
                } else {
                    Value::Int(base + i)
                }
            })
            .collect();
        values.sort_by(Value::compare);

        for pair in values.windows(2) {
            assert_ne!(pair[0].compare(&pair[1]), Ordering::Greater);
        }
        let ints: Vec<i64> = values
            .iter()
            .filter_map(|v| match v {
                Value::Int(n) => Some(*n),
                _ => None,
            })
            .collect();
        assert!(ints.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_datetime_displays_as_serialized() {
        let v: Value = serde_json::from_str("\"2024-03-01T09:30:00Z\"").unwrap();
        assert_eq!(v.display(), "2024-03-01T09:30:00Z");
        assert_eq!(serde_json::to_value(&v).unwrap(), "2024-03-01T09:30:00Z");

        let v: Value = serde_json::from_str("\"2024-03-01T09:30:00.250Z\"").unwrap();
        assert_eq!(v.display(), "2024-03-01T09:30:00.250Z");
    }

    #[test]
    fn test_compare_strings_ignores_case() {
        assert_eq!(Value::from("apple").compare(&Value::from("Banana")), Ordering::Less);
        assert_eq!(Value::from("ABC").compare(&Value::from("abc")), Ordering::Equal);
    }

    #[test]
    fn test_null_sorts_first() {
        assert_eq!(Value::Null.compare(&Value::from("a")), Ordering::Less);
        assert_eq!(Value::from(false).compare(&Value::Null), Ordering::Greater);
    }

    #[test]
    fn test_deserialize_untagged() {
        let v: Value = serde_json::from_str("3").unwrap();
        assert_eq!(v, Value::Int(3));
        let v: Value = serde_json::from_str("3.5").unwrap();
        assert_eq!(v, Value::Float(3.5));
        let v: Value = serde_json::from_str("\"open\"").unwrap();
        assert_eq!(v, Value::from("open"));
        let v: Value = serde_json::from_str("\"2024-01-02T03:04:05Z\"").unwrap();
        assert_eq!(v.type_name(), "datetime");
        let v: Value = serde_json::from_str("null").unwrap();
        assert!(v.is_null());
    }
}
