//! One-shot snapshot commands printing plain text instead of the dashboard.

use std::io::Write;

use sockdash_api::ApiClient;
use tracing::warn;

use crate::cli::ViewArgs;
use crate::columns;
use crate::error::{TuiError, TuiResult};
use crate::table::{render_plain, Column, SortSpec, SortState};
use crate::widgets::format_uptime;

/// Resolve a `col[:dir]` argument against `columns`. Without a direction
/// the column's first header-press direction for `rows` is used.
///
/// # Errors
///
/// Returns [`TuiError::InvalidSort`] for a malformed argument or an
/// unsortable column, and [`TuiError::UnknownColumn`] for an unknown id.
pub fn resolve_sort<R>(spec: Option<&str>, columns: &[Column<R>], rows: &[R]) -> TuiResult<SortState> {
    let Some(spec) = spec else {
        return Ok(SortState::unsorted());
    };
    let spec: SortSpec = spec.parse()?;
    let column = columns
        .iter()
        .find(|column| column.id() == spec.column)
        .ok_or_else(|| TuiError::UnknownColumn {
            column: spec.column.clone(),
            available: columns
                .iter()
                .filter(|column| column.is_sortable())
                .map(Column::id)
                .collect::<Vec<_>>()
                .join(", "),
        })?;
    if !column.is_sortable() {
        return Err(TuiError::InvalidSort(format!("column '{}' cannot be sorted", spec.column)));
    }
    let direction = spec.direction.unwrap_or_else(|| column.first_direction(rows));
    Ok(SortState::by(spec.column, direction))
}

fn print_table<R>(out: &mut impl Write, rows: &[R], columns: &[Column<R>], view: &ViewArgs) -> TuiResult<()> {
    let sort = resolve_sort(view.sort.as_deref(), columns, rows)?;
    let filter = view.filter.as_deref().unwrap_or_default();
    out.write_all(render_plain(rows, columns, &sort, filter).as_bytes())?;
    Ok(())
}

/// Backend health and status summary.
///
/// An unreachable backend is reported as `DOWN` rather than as an error.
///
/// # Errors
///
/// Returns an error only when writing to `out` fails.
pub async fn print_status(api: &ApiClient, out: &mut impl Write) -> TuiResult<()> {
    let base = api.base_url();
    let health = match api.health().await {
        Ok(health) => health,
        Err(err) => {
            writeln!(out, "Backend ({base}): DOWN ({err})")?;
            return Ok(());
        }
    };
    writeln!(
        out,
        "Backend ({base}): {} (uptime: {})",
        if health.status.eq_ignore_ascii_case("ok") { "UP" } else { health.status.as_str() },
        format_uptime(health.uptime_seconds)
    )?;

    match api.status().await {
        Ok(status) => {
            writeln!(out, "  Backend type: {}", status.backend_type)?;
            writeln!(out, "  Instance: {}", status.instance_id)?;
            writeln!(out, "  Containers: {}", status.containers)?;
            writeln!(out, "  Active resources: {}", status.active_resources)?;
        }
        Err(err) => warn!(error = %err, "status request failed after healthy probe"),
    }
    Ok(())
}

/// Tracked cloud resources; only active ones unless `all`.
///
/// # Errors
///
/// Returns an error if the request fails, the sort argument is invalid or
/// writing fails.
pub async fn print_resources(api: &ApiClient, all: bool, view: &ViewArgs, out: &mut impl Write) -> TuiResult<()> {
    let rows = api.resources(!all).await?;
    print_table(out, &rows, &columns::resources(), view)
}

/// Containers known to the backend.
///
/// # Errors
///
/// Returns an error if the request fails, the sort argument is invalid or
/// writing fails.
pub async fn print_containers(api: &ApiClient, view: &ViewArgs, out: &mut impl Write) -> TuiResult<()> {
    let rows = api.containers().await?;
    print_table(out, &rows, &columns::containers(), view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{CellValue, SortDirection};

    struct Person {
        name: &'static str,
        age: i64,
    }

    fn columns() -> Vec<Column<Person>> {
        vec![
            Column::new("name", "Name", |p: &Person| p.name.into()),
            Column::new("age", "Age", |p: &Person| CellValue::Int(p.age)),
            Column::new("notes", "Notes", |_: &Person| CellValue::Empty).unsortable(),
        ]
    }

    fn people() -> Vec<Person> {
        vec![Person { name: "Alice", age: 30 }, Person { name: "Bob", age: 25 }]
    }

    #[test]
    fn test_no_sort_argument_is_unsorted() {
        assert!(resolve_sort(None, &columns(), &people()).unwrap().is_unsorted());
    }

    #[test]
    fn test_sort_without_direction_uses_first_direction() {
        let sort = resolve_sort(Some("age"), &columns(), &people()).unwrap();
        assert_eq!(sort.direction_of("age"), Some(SortDirection::Descending));
        let sort = resolve_sort(Some("name"), &columns(), &people()).unwrap();
        assert_eq!(sort.direction_of("name"), Some(SortDirection::Ascending));
    }

    #[test]
    fn test_sort_with_direction() {
        let sort = resolve_sort(Some("age:asc"), &columns(), &people()).unwrap();
        assert_eq!(sort.direction_of("age"), Some(SortDirection::Ascending));
    }

    #[test]
    fn test_unknown_column_lists_sortable_ids() {
        let err = resolve_sort(Some("size"), &columns(), &people()).unwrap_err();
        assert_eq!(err.to_string(), "unknown column 'size' (available: name, age)");
    }

    #[test]
    fn test_unsortable_column_is_rejected() {
        let err = resolve_sort(Some("notes"), &columns(), &people()).unwrap_err();
        assert!(matches!(err, TuiError::InvalidSort(_)));
    }

    #[test]
    fn test_bad_direction_is_rejected() {
        assert!(resolve_sort(Some("age:up"), &columns(), &people()).is_err());
    }
}
