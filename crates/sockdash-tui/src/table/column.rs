//! Column definitions and cell values.

use std::cmp::Ordering;
use std::fmt;

use ratatui::style::Style;

use super::sort::{FirstSort, SortDirection};

/// Typed value read from a row for sorting, filtering and plain display.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Missing value; displays as `-`.
    Empty,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point.
    Float(f64),
    /// Text.
    Text(String),
}

impl CellValue {
    /// Whether the value sorts numerically.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Bool(_) => 1,
            Self::Int(_) | Self::Float(_) => 2,
            Self::Text(_) => 3,
        }
    }

    /// Total order used by the table: empty < bool < number < text.
    /// Text compares case-insensitively first, then exactly.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Int(a), Self::Float(b)) => (*a as f64).total_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.total_cmp(&(*b as f64)),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("-"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&String> for CellValue {
    fn from(v: &String) -> Self {
        Self::Text(v.clone())
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for CellValue {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u64> for CellValue {
    fn from(v: u64) -> Self {
        Self::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Empty, Into::into)
    }
}

/// Rendered cell: display text plus style.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellText {
    /// Text shown in the cell and matched by the filter.
    pub text: String,
    /// Terminal style.
    pub style: Style,
}

impl CellText {
    /// Unstyled text.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::default(),
        }
    }

    /// Styled text.
    #[must_use]
    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// How a column turns a row into cell text.
pub enum CellRender<R> {
    /// The accessor value's string form.
    Plain,
    /// A column-specific renderer.
    Custom(fn(&R) -> CellText),
}

impl<R> Clone for CellRender<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for CellRender<R> {}

impl<R> fmt::Debug for CellRender<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => f.write_str("Plain"),
            Self::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// One table column over rows of type `R`.
pub struct Column<R> {
    id: String,
    header: String,
    accessor: fn(&R) -> CellValue,
    render: CellRender<R>,
    width: Option<u16>,
    first_sort: FirstSort,
    sortable: bool,
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            accessor: self.accessor,
            render: self.render,
            width: self.width,
            first_sort: self.first_sort,
            sortable: self.sortable,
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("render", &self.render)
            .field("width", &self.width)
            .field("first_sort", &self.first_sort)
            .field("sortable", &self.sortable)
            .finish_non_exhaustive()
    }
}

impl<R> Column<R> {
    /// Column `id` titled `header`, reading its value with `accessor`.
    pub fn new(id: impl Into<String>, header: impl Into<String>, accessor: fn(&R) -> CellValue) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            accessor,
            render: CellRender::Plain,
            width: None,
            first_sort: FirstSort::Auto,
            sortable: true,
        }
    }

    /// Render cells with `render` instead of the value's string form.
    #[must_use]
    pub fn render_with(mut self, render: fn(&R) -> CellText) -> Self {
        self.render = CellRender::Custom(render);
        self
    }

    /// Fixed width in terminal cells.
    #[must_use]
    pub const fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// First header press sorts ascending.
    #[must_use]
    pub const fn ascending_first(mut self) -> Self {
        self.first_sort = FirstSort::Ascending;
        self
    }

    /// First header press sorts descending.
    #[must_use]
    pub const fn descending_first(mut self) -> Self {
        self.first_sort = FirstSort::Descending;
        self
    }

    /// Header presses do nothing.
    #[must_use]
    pub const fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Column id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Header text.
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Fixed width, if any.
    #[must_use]
    pub const fn fixed_width(&self) -> Option<u16> {
        self.width
    }

    /// Whether the column can be sorted.
    #[must_use]
    pub const fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// Typed value of this column for `row`.
    pub fn value(&self, row: &R) -> CellValue {
        (self.accessor)(row)
    }

    /// Rendered cell for `row`.
    pub fn cell(&self, row: &R) -> CellText {
        match self.render {
            CellRender::Plain => CellText::plain(self.value(row).to_string()),
            CellRender::Custom(render) => render(row),
        }
    }

    /// Direction of the first sort press.
    ///
    /// `Auto` sorts numeric columns descending and everything else
    /// ascending, judged by the first row; with no rows it is descending.
    pub fn first_direction(&self, rows: &[R]) -> SortDirection {
        match self.first_sort {
            FirstSort::Ascending => SortDirection::Ascending,
            FirstSort::Descending => SortDirection::Descending,
            FirstSort::Auto => match rows.first().map(|row| self.value(row)) {
                Some(CellValue::Text(_)) => SortDirection::Ascending,
                _ => SortDirection::Descending,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;
    use test_case::test_case;

    struct Person {
        name: &'static str,
        age: u32,
    }

    fn name_column() -> Column<Person> {
        Column::new("name", "Name", |p: &Person| p.name.into())
    }

    fn age_column() -> Column<Person> {
        Column::new("age", "Age", |p: &Person| p.age.into())
    }

    #[test_case(CellValue::Int(2), CellValue::Int(10), Ordering::Less ; "ints")]
    #[test_case(CellValue::Float(2.5), CellValue::Int(2), Ordering::Greater ; "float vs int")]
    #[test_case(CellValue::from("alice"), CellValue::from("Bob"), Ordering::Less ; "text ignores case")]
    #[test_case(CellValue::from("Bob"), CellValue::from("bob"), Ordering::Less ; "case breaks ties")]
    #[test_case(CellValue::Empty, CellValue::Int(0), Ordering::Less ; "empty first")]
    #[test_case(CellValue::Int(99), CellValue::from("1"), Ordering::Less ; "numbers before text")]
    fn test_compare(a: CellValue, b: CellValue, expected: Ordering) {
        assert_eq!(a.compare(&b), expected);
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Empty.to_string(), "-");
        assert_eq!(CellValue::Float(2.5).to_string(), "2.5");
        assert_eq!(CellValue::from(Some(3_u64)).to_string(), "3");
        assert_eq!(CellValue::from(None::<String>).to_string(), "-");
    }

    #[test]
    fn test_plain_and_custom_render() {
        let row = Person { name: "Alice", age: 30 };
        assert_eq!(name_column().cell(&row), CellText::plain("Alice"));

        let custom = age_column().render_with(|p| {
            CellText::styled(format!("{}y", p.age), Style::default().fg(Color::Cyan))
        });
        let cell = custom.cell(&row);
        assert_eq!(cell.text, "30y");
        assert_eq!(cell.style.fg, Some(Color::Cyan));
    }

    #[test]
    fn test_auto_first_direction() {
        let rows = [Person { name: "Alice", age: 30 }];
        assert_eq!(age_column().first_direction(&rows), SortDirection::Descending);
        assert_eq!(name_column().first_direction(&rows), SortDirection::Ascending);
        assert_eq!(age_column().first_direction(&[]), SortDirection::Descending);
    }

    #[test]
    fn test_explicit_first_direction() {
        let rows = [Person { name: "Alice", age: 30 }];
        assert_eq!(
            age_column().ascending_first().first_direction(&rows),
            SortDirection::Ascending
        );
        assert_eq!(
            name_column().descending_first().first_direction(&rows),
            SortDirection::Descending
        );
    }
}
