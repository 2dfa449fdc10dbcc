//! Table rendering
//!
//! Plain-text views of raw and linked rows, used by the `tgrid` binary and
//! handy when debugging a filing:
//!
//! ```text
//! Item | Three Months Ended | <
//! ^    | 2019               | 2018
//! ```
//!
//! In the text view a link placeholder is shown as `^` and a continuation as
//! `<`. The TSV view resolves every placeholder to its owner's text.

use crate::core::table::{Cell, CellBody, Row, Table};

/// Marker for a position carried down from the row above
pub const LINK_MARKER: &str = "^";
/// Marker for a position carried over from the cell on the left
pub const CONTINUATION_MARKER: &str = "<";

fn rows_of(table: &Table, linked: bool) -> &[Row] {
    if linked {
        table.linked_rows()
    } else {
        table.rows()
    }
}

fn marker_text(cell: &Cell) -> &str {
    match cell.body() {
        CellBody::Content(text) => text.as_str(),
        CellBody::Link(_) => LINK_MARKER,
        CellBody::Continuation(_) => CONTINUATION_MARKER,
    }
}

/// Render rows as aligned columns separated by ` | `
pub fn render_text(table: &Table, linked: bool) -> String {
    let rows: Vec<Vec<&str>> = rows_of(table, linked)
        .iter()
        .map(|row| row.iter().map(marker_text).collect())
        .collect();

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; columns];
    for row in &rows {
        for (col, text) in row.iter().enumerate() {
            widths[col] = widths[col].max(text.chars().count());
        }
    }

    let mut output = String::new();
    for row in &rows {
        let line = row
            .iter()
            .enumerate()
            .map(|(col, text)| format!("{:<width$}", text, width = widths[col]))
            .collect::<Vec<_>>()
            .join(" | ");
        output.push_str(line.trim_end());
        output.push('\n');
    }
    output
}

/// Render rows as tab-separated values
///
/// Tabs and line breaks inside cell text become spaces.
pub fn render_tsv(table: &Table, linked: bool) -> String {
    let mut output = String::new();
    for row in rows_of(table, linked) {
        let line = row
            .iter()
            .map(|cell| {
                table
                    .resolve(cell)
                    .text()
                    .unwrap_or("")
                    .replace(['\t', '\n', '\r'], " ")
            })
            .collect::<Vec<_>>()
            .join("\t");
        output.push_str(&line);
        output.push('\n');
    }
    output
}

/// Render the table as a JSON document
///
/// ```json
/// {"columns": 2, "linked": true, "rows": [[{"kind": "td", "text": "A", ...}, {"link": {"row": 0, "column": 1}}]]}
/// ```
#[cfg(feature = "json")]
pub fn render_json(table: &Table, linked: bool) -> Result<String, serde_json::Error> {
    use serde_json::{json, Value};

    let anchor = |id| {
        table
            .anchor(id)
            .map(|a| json!({ "row": a.row, "column": a.column }))
            .unwrap_or(Value::Null)
    };

    let rows: Vec<Value> = rows_of(table, linked)
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| match cell.body() {
                    CellBody::Content(text) => json!({
                        "kind": cell.kind().tag(),
                        "text": text,
                        "rowspan": cell.row_span(),
                        "colspan": cell.col_span(),
                    }),
                    CellBody::Link(id) => json!({ "link": anchor(*id) }),
                    CellBody::Continuation(id) => json!({ "continuation": anchor(*id) }),
                })
                .collect()
        })
        .collect();

    serde_json::to_string_pretty(&json!({
        "columns": table.column_count(),
        "linked": linked && table.is_linked(),
        "rows": rows,
    }))
}
