//! Sort state and the header toggle cycle.

use std::str::FromStr;

use crate::error::TuiError;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// The other direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Header marker.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Ascending => " ↑",
            Self::Descending => " ↓",
        }
    }
}

impl FromStr for SortDirection {
    type Err = TuiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(TuiError::InvalidSort(format!("unknown direction '{other}'"))),
        }
    }
}

/// Direction a column takes on its first sort press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FirstSort {
    /// Descending for numeric values, ascending for text.
    #[default]
    Auto,
    /// Always ascending.
    Ascending,
    /// Always descending.
    Descending,
}

/// One sorted column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSort {
    /// Column id.
    pub column: String,
    /// Direction.
    pub direction: SortDirection,
}

/// Ordered sort keys. Header presses keep at most one active.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortState {
    keys: Vec<ColumnSort>,
}

impl SortState {
    /// No sorting.
    #[must_use]
    pub fn unsorted() -> Self {
        Self::default()
    }

    /// Sorted by one column.
    #[must_use]
    pub fn by(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            keys: vec![ColumnSort {
                column: column.into(),
                direction,
            }],
        }
    }

    /// Active sort keys, most significant first.
    #[must_use]
    pub fn keys(&self) -> &[ColumnSort] {
        &self.keys
    }

    /// Whether no column is sorted.
    #[must_use]
    pub fn is_unsorted(&self) -> bool {
        self.keys.is_empty()
    }

    /// Direction of `column`, if sorted.
    #[must_use]
    pub fn direction_of(&self, column: &str) -> Option<SortDirection> {
        self.keys
            .iter()
            .find(|k| k.column == column)
            .map(|k| k.direction)
    }

    /// Advance `column` through unsorted → `first` → reversed → unsorted.
    /// Sorting a new column replaces any other.
    pub fn toggle(&mut self, column: &str, first: SortDirection) {
        let next = match self.direction_of(column) {
            None => Some(first),
            Some(current) if current == first => Some(first.reversed()),
            Some(_) => None,
        };
        self.keys.clear();
        if let Some(direction) = next {
            self.keys.push(ColumnSort {
                column: column.to_string(),
                direction,
            });
        }
    }

    /// Drop all keys.
    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

/// `column` or `column:asc|desc`, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Column id.
    pub column: String,
    /// Explicit direction; `None` uses the column's first direction.
    pub direction: Option<SortDirection>,
}

impl FromStr for SortSpec {
    type Err = TuiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, direction) = match s.split_once(':') {
            Some((column, direction)) => (column, Some(direction.parse()?)),
            None => (s, None),
        };
        if column.is_empty() {
            return Err(TuiError::InvalidSort(format!("missing column in '{s}'")));
        }
        Ok(Self {
            column: column.to_string(),
            direction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_toggle_cycle_descending_first() {
        let mut sort = SortState::unsorted();

        sort.toggle("age", SortDirection::Descending);
        assert_eq!(sort.direction_of("age"), Some(SortDirection::Descending));

        sort.toggle("age", SortDirection::Descending);
        assert_eq!(sort.direction_of("age"), Some(SortDirection::Ascending));

        sort.toggle("age", SortDirection::Descending);
        assert!(sort.is_unsorted());

        sort.toggle("age", SortDirection::Descending);
        assert_eq!(sort.direction_of("age"), Some(SortDirection::Descending));
    }

    #[test]
    fn test_toggle_cycle_ascending_first() {
        let mut sort = SortState::unsorted();
        sort.toggle("name", SortDirection::Ascending);
        assert_eq!(sort.direction_of("name"), Some(SortDirection::Ascending));
        sort.toggle("name", SortDirection::Ascending);
        assert_eq!(sort.direction_of("name"), Some(SortDirection::Descending));
        sort.toggle("name", SortDirection::Ascending);
        assert!(sort.is_unsorted());
    }

    #[test]
    fn test_new_column_replaces_sort() {
        let mut sort = SortState::by("age", SortDirection::Ascending);
        sort.toggle("name", SortDirection::Ascending);
        assert_eq!(sort.keys().len(), 1);
        assert_eq!(sort.direction_of("age"), None);
        assert_eq!(sort.direction_of("name"), Some(SortDirection::Ascending));
    }

    #[test_case("name", "name", None ; "bare column")]
    #[test_case("age:desc", "age", Some(SortDirection::Descending) ; "descending")]
    #[test_case("age:ASC", "age", Some(SortDirection::Ascending) ; "uppercase direction")]
    fn test_sort_spec_parse(input: &str, column: &str, direction: Option<SortDirection>) {
        let spec: SortSpec = input.parse().unwrap();
        assert_eq!(spec.column, column);
        assert_eq!(spec.direction, direction);
    }

    #[test_case(":asc" ; "missing column")]
    #[test_case("age:sideways" ; "bad direction")]
    fn test_sort_spec_invalid(input: &str) {
        assert!(input.parse::<SortSpec>().is_err());
    }
}
