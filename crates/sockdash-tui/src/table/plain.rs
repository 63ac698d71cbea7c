//! Plain-text table output for the snapshot commands.

use super::column::Column;
use super::sort::SortState;
use super::visible_rows;

const MAX_CELL_WIDTH: usize = 48;
const GAP: &str = "  ";

/// Render the visible rows as aligned plain text, one line per row after
/// an uppercase header. Sorted columns carry a direction marker.
pub fn render_plain<R>(rows: &[R], columns: &[Column<R>], sort: &SortState, filter: &str) -> String {
    let visible = visible_rows(rows, columns, sort, filter);

    let headers: Vec<String> = columns
        .iter()
        .map(|c| {
            let marker = sort.direction_of(c.id()).map_or("", |d| d.marker());
            format!("{}{marker}", c.header().to_uppercase())
        })
        .collect();
    let cells: Vec<Vec<String>> = visible
        .iter()
        .map(|row| columns.iter().map(|c| c.cell(row).text).collect())
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            cells
                .iter()
                .map(|line| line[i].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
                .min(MAX_CELL_WIDTH)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, &headers, &widths);
    for line in &cells {
        push_line(&mut out, line, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str(GAP);
        }
        line.push_str(&fit(cell, *width));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

fn fit(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len > width {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    } else {
        format!("{text}{}", " ".repeat(width - len))
    }
}
