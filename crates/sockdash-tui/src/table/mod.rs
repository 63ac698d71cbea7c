//! Generic data table: typed columns, header sorting, free-text filtering.
//!
//! A table is a list of [`Column`]s over some row type plus a
//! [`SortState`] and a filter string. [`visible_rows`] derives the rows to
//! show; [`DataTable`] adds selection, key and mouse handling, and drawing.

mod column;
mod plain;
mod sort;
mod view;

pub use column::{CellRender, CellText, CellValue, Column};
pub use plain::render_plain;
pub use sort::{ColumnSort, FirstSort, SortDirection, SortSpec, SortState};
pub use view::{DataTable, TableState};

/// Whether any cell of `row` contains `needle` (already lowercased).
fn row_matches<R>(row: &R, columns: &[Column<R>], needle: &str) -> bool {
    needle.is_empty()
        || columns
            .iter()
            .any(|column| column.cell(row).text.to_lowercase().contains(needle))
}

/// Indices into `rows` that pass `filter`, ordered by `sort`.
///
/// The filter is a case-insensitive substring match against every rendered
/// cell. Sorting is stable, so equal keys keep their input order.
pub fn visible_indices<R>(rows: &[R], columns: &[Column<R>], sort: &SortState, filter: &str) -> Vec<usize> {
    let needle = filter.to_lowercase();
    let mut indices: Vec<usize> = (0..rows.len())
        .filter(|&i| row_matches(&rows[i], columns, &needle))
        .collect();

    let keys: Vec<(&Column<R>, SortDirection)> = sort
        .keys()
        .iter()
        .filter_map(|key| {
            columns
                .iter()
                .find(|c| c.id() == key.column)
                .map(|c| (c, key.direction))
        })
        .collect();
    if keys.is_empty() {
        return indices;
    }

    let mut decorated: Vec<(usize, Vec<CellValue>)> = indices
        .drain(..)
        .map(|i| (i, keys.iter().map(|(c, _)| c.value(&rows[i])).collect()))
        .collect();
    decorated.sort_by(|(_, a), (_, b)| {
        keys.iter()
            .enumerate()
            .map(|(k, (_, direction))| {
                let ordering = a[k].compare(&b[k]);
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            })
            .find(|o| o.is_ne())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    decorated.into_iter().map(|(i, _)| i).collect()
}

/// Rows of `rows` that pass `filter`, ordered by `sort`.
pub fn visible_rows<'a, R>(rows: &'a [R], columns: &[Column<R>], sort: &SortState, filter: &str) -> Vec<&'a R> {
    visible_indices(rows, columns, sort, filter)
        .into_iter()
        .map(|i| &rows[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        name: String,
        age: u32,
    }

    fn person(name: &str, age: u32) -> Person {
        Person {
            name: name.to_string(),
            age,
        }
    }

    fn people() -> Vec<Person> {
        vec![person("Alice", 30), person("Bob", 25), person("Charlie", 35)]
    }

    fn columns() -> Vec<Column<Person>> {
        vec![
            Column::new("name", "Name", |p: &Person| (&p.name).into()),
            Column::new("age", "Age", |p: &Person| p.age.into()),
        ]
    }

    fn ages(rows: &[&Person]) -> Vec<u32> {
        rows.iter().map(|p| p.age).collect()
    }

    #[test]
    fn test_unsorted_unfiltered_is_identity() {
        let rows = people();
        let visible = visible_rows(&rows, &columns(), &SortState::unsorted(), "");
        assert_eq!(ages(&visible), vec![30, 25, 35]);
    }

    #[test]
    fn test_sort_by_age_both_directions() {
        let rows = people();
        let cols = columns();

        let desc = visible_rows(&rows, &cols, &SortState::by("age", SortDirection::Descending), "");
        assert_eq!(ages(&desc), vec![35, 30, 25]);

        let asc = visible_rows(&rows, &cols, &SortState::by("age", SortDirection::Ascending), "");
        assert_eq!(ages(&asc), vec![25, 30, 35]);
    }

    #[test]
    fn test_filter_matches_substring_case_insensitive() {
        let rows = people();
        let visible = visible_rows(&rows, &columns(), &SortState::unsorted(), "ali");
        assert_eq!(visible, vec![&rows[0]]);

        let visible = visible_rows(&rows, &columns(), &SortState::unsorted(), "Ali");
        assert_eq!(visible, vec![&rows[0]]);
    }

    #[test]
    fn test_filter_matches_numeric_cells() {
        let rows = people();
        let visible = visible_rows(&rows, &columns(), &SortState::unsorted(), "35");
        assert_eq!(visible, vec![&rows[2]]);
    }

    #[test]
    fn test_filter_with_no_match_is_empty() {
        let rows = people();
        assert!(visible_rows(&rows, &columns(), &SortState::unsorted(), "zed").is_empty());
    }

    #[test]
    fn test_unknown_sort_column_is_ignored() {
        let rows = people();
        let visible = visible_rows(&rows, &columns(), &SortState::by("height", SortDirection::Ascending), "");
        assert_eq!(ages(&visible), vec![30, 25, 35]);
    }

    #[test]
    fn test_sort_is_stable() {
        let rows = vec![person("b", 1), person("a", 1), person("c", 0)];
        let visible = visible_rows(&rows, &columns(), &SortState::by("age", SortDirection::Descending), "");
        let names: Vec<&str> = visible.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    fn arb_people() -> impl Strategy<Value = Vec<Person>> {
        prop::collection::vec(("[a-zA-Z]{1,8}", 0u32..100), 0..20)
            .prop_map(|v| v.into_iter().map(|(name, age)| Person { name, age }).collect())
    }

    proptest! {
        #[test]
        fn prop_filter_result_is_subset(rows in arb_people(), filter in "[a-z]{0,3}") {
            let visible = visible_indices(&rows, &columns(), &SortState::unsorted(), &filter);
            prop_assert!(visible.len() <= rows.len());
            let mut sorted = visible.clone();
            sorted.sort_unstable();
            prop_assert_eq!(sorted, visible);
        }

        #[test]
        fn prop_longer_filter_never_adds_rows(rows in arb_people(), filter in "[a-z]{0,3}", extra in "[a-z]") {
            let cols = columns();
            let short = visible_indices(&rows, &cols, &SortState::unsorted(), &filter);
            let long = visible_indices(&rows, &cols, &SortState::unsorted(), &format!("{filter}{extra}"));
            prop_assert!(long.iter().all(|i| short.contains(i)));
        }

        #[test]
        fn prop_sort_is_permutation(rows in arb_people()) {
            let mut visible = visible_indices(&rows, &columns(), &SortState::by("age", SortDirection::Ascending), "");
            visible.sort_unstable();
            prop_assert_eq!(visible, (0..rows.len()).collect::<Vec<_>>());
        }

        #[test]
        fn prop_descending_keys_reverse_ascending(rows in arb_people()) {
            let cols = columns();
            let asc: Vec<u32> = visible_rows(&rows, &cols, &SortState::by("age", SortDirection::Ascending), "")
                .iter().map(|p| p.age).collect();
            let mut desc: Vec<u32> = visible_rows(&rows, &cols, &SortState::by("age", SortDirection::Descending), "")
                .iter().map(|p| p.age).collect();
            desc.reverse();
            prop_assert_eq!(asc, desc);
        }
    }
}
