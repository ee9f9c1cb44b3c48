//! Sort specification

/// Sort direction for ordering rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Direction::Asc),
            "desc" | "descending" => Ok(Direction::Desc),
            other => Err(format!("unknown sort direction '{}'", other)),
        }
    }
}

/// Sorts rows by one field.
///
/// # Example
///
/// ```
/// use explorer_lib::view::{Direction, SortSpec};
///
/// let sort = SortSpec::desc("priority");
/// assert_eq!(sort.direction, Direction::Desc);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortSpec {
    /// The field to sort by.
    pub key: String,
    /// The sort direction.
    pub direction: Direction,
}

impl SortSpec {
    /// Creates a sort on a field in the given direction.
    pub fn new(key: impl Into<String>, direction: Direction) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }

    /// Creates an ascending sort on a field.
    pub fn asc(key: impl Into<String>) -> Self {
        Self::new(key, Direction::Asc)
    }

    /// Creates a descending sort on a field.
    pub fn desc(key: impl Into<String>) -> Self {
        Self::new(key, Direction::Desc)
    }
}
