//! Row and cell parser
//!
//! Turns normalized table markup into ragged rows: each row lists only the
//! cells that *start* in it, in source order. Resolving which grid column a
//! cell lands in is the linker's job.

use lazy_static::lazy_static;
use regex::Regex;

use super::cell::{Cell, CellKind, Row};
use crate::core::markup::span_attributes;
use crate::core::options::GridOptions;
use crate::utils::error::{SpanAttribute, TableError, TableResult};

lazy_static! {
    static ref ROW: Regex = Regex::new(r"(?is)<tr\b.*?</tr\s*>").unwrap();
    static ref CELL_OPEN: Regex = Regex::new(r"(?i)<t[dh]\b").unwrap();
    static ref TD_CLOSE: Regex = Regex::new(r"(?i)</td\s*>").unwrap();
    static ref TH_CLOSE: Regex = Regex::new(r"(?i)</th\s*>").unwrap();
}

/// Split table markup into `<tr ...>...</tr>` spans
///
/// Spans are non-overlapping and taken left to right. Nested tables are not
/// supported.
pub fn parse_rows(normalized: &str) -> Vec<&str> {
    ROW.find_iter(normalized).map(|m| m.as_str()).collect()
}

/// Parse one `<tr>` span into a row of raw cells
///
/// Error offsets are byte offsets into `row_markup`.
pub fn parse_row(row_markup: &str, options: &GridOptions) -> TableResult<Row> {
    let mut row = Row::new();
    let mut pos = 0;

    while let Some(open) = CELL_OPEN.find_at(row_markup, pos) {
        let whole = (open.start(), open.end());
        let tag = open.as_str()[1..].to_ascii_lowercase();
        let kind = CellKind::from_tag(&tag);

        let close_pattern: &Regex = match kind {
            CellKind::Normal => &*TD_CLOSE,
            CellKind::Header => &*TH_CLOSE,
        };
        let close = close_pattern
            .find_at(row_markup, whole.1)
            .ok_or_else(|| TableError::unterminated(tag.as_str(), whole.0))?;

        // attributes ... '>' content
        let inner = &row_markup[whole.1..close.start()];
        let gt = inner
            .find('>')
            .ok_or_else(|| TableError::unterminated(tag.as_str(), whole.0))?;

        let (row_span, col_span) = parse_span_options(&inner[..gt])?;
        let content = options.clean_content(&inner[gt + 1..]);

        row.push(Cell::new(kind, row_span, col_span, content));
        pos = close.end();
    }

    Ok(row)
}

/// Parse every row of normalized table markup
pub fn parse_table_rows(normalized: &str, options: &GridOptions) -> TableResult<Vec<Row>> {
    parse_rows(normalized)
        .into_iter()
        .map(|row_markup| parse_row(row_markup, options))
        .collect()
}

/// Extract `rowspan` and `colspan` from the attribute text of a cell tag
///
/// Missing attributes default to 1. Values must be integers from 1 to the
/// HTML limit (1000 for colspan, 65534 for rowspan). When an attribute
/// repeats, the first occurrence wins.
pub fn parse_span_options(options: &str) -> TableResult<(usize, usize)> {
    let mut row_span = None;
    let mut col_span = None;

    for (name, value) in span_attributes(options) {
        let (attribute, slot) = if name == "rowspan" {
            (SpanAttribute::RowSpan, &mut row_span)
        } else {
            (SpanAttribute::ColSpan, &mut col_span)
        };

        if slot.is_none() {
            *slot = Some(parse_span_value(attribute, value)?);
        }
    }

    Ok((row_span.unwrap_or(1), col_span.unwrap_or(1)))
}

fn parse_span_value(attribute: SpanAttribute, value: &str) -> TableResult<usize> {
    match value.trim().parse::<usize>() {
        Ok(n) if (1..=attribute.max_value()).contains(&n) => Ok(n),
        _ => Err(TableError::invalid_span(attribute, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(row: &Row) -> Vec<&str> {
        row.iter().filter_map(Cell::text).collect()
    }

    #[test]
    fn test_parse_rows_splits_tr_spans() {
        let markup = "<tr><td>A</td></tr><tr><td>B</td></tr>";
        assert_eq!(
            parse_rows(markup),
            vec!["<tr><td>A</td></tr>", "<tr><td>B</td></tr>"]
        );
    }

    #[test]
    fn test_parse_rows_ignores_text_outside_rows() {
        let markup = "caption<tr><td>A</td></tr>footer";
        assert_eq!(parse_rows(markup), vec!["<tr><td>A</td></tr>"]);
    }

    #[test]
    fn test_parse_row_kinds_and_content() {
        let row = parse_row("<tr><th> Year </th><td>2019</td></tr>", &GridOptions::default()).unwrap();
        assert_eq!(row.len(), 2);
        assert_eq!(row.cells[0].kind(), CellKind::Header);
        assert_eq!(row.cells[1].kind(), CellKind::Normal);
        assert_eq!(texts(&row), vec!["Year", "2019"]);
    }

    #[test]
    fn test_parse_row_canonical_spans() {
        let row = parse_row(
            "<tr><td rowspan:2 >A</td><th colspan:3  rowspan:4 >B</th></tr>",
            &GridOptions::default(),
        )
        .unwrap();
        assert_eq!((row.cells[0].row_span(), row.cells[0].col_span()), (2, 1));
        assert_eq!((row.cells[1].row_span(), row.cells[1].col_span()), (4, 3));
    }

    #[test]
    fn test_parse_row_raw_html_spans() {
        let row = parse_row(
            r#"<tr><td class="x" rowspan="2">A</td><td colspan='3'>B</td><td COLSPAN=2>C</td></tr>"#,
            &GridOptions::default(),
        )
        .unwrap();
        assert_eq!(row.cells[0].row_span(), 2);
        assert_eq!(row.cells[1].col_span(), 3);
        assert_eq!(row.cells[2].col_span(), 2);
        assert_eq!(row.span_width(), 6);
    }

    #[test]
    fn test_parse_row_empty_cell() {
        let row = parse_row("<tr><td></td><td> </td></tr>", &GridOptions::default()).unwrap();
        assert_eq!(texts(&row), vec!["", ""]);
    }

    #[test]
    fn test_parse_row_decodes_entities() {
        let row = parse_row("<tr><td>R&amp;D&nbsp;expense</td></tr>", &GridOptions::default()).unwrap();
        assert_eq!(texts(&row), vec!["R&D expense"]);

        let row = parse_row("<tr><td>R&amp;D</td></tr>", &GridOptions::verbatim()).unwrap();
        assert_eq!(texts(&row), vec!["R&amp;D"]);
    }

    #[test]
    fn test_parse_row_unterminated() {
        let err = parse_row("<tr><td>A</td><td>B</tr>", &GridOptions::default()).unwrap_err();
        assert_eq!(err, TableError::unterminated("td", 14));
    }

    #[test]
    fn test_parse_row_header_needs_th_close() {
        let err = parse_row("<tr><th>A</td></tr>", &GridOptions::default()).unwrap_err();
        assert!(matches!(err, TableError::UnterminatedCell { ref tag, .. } if tag == "th"));
    }

    #[test]
    fn test_parse_span_defaults() {
        assert_eq!(parse_span_options("").unwrap(), (1, 1));
        assert_eq!(parse_span_options(r#" class="a" "#).unwrap(), (1, 1));
    }

    #[test]
    fn test_parse_span_first_occurrence_wins() {
        assert_eq!(parse_span_options(" rowspan:2  rowspan:5 ").unwrap(), (2, 1));
    }

    #[test]
    fn test_parse_span_rejects_zero_and_garbage() {
        assert_eq!(
            parse_span_options(" rowspan:0 "),
            Err(TableError::invalid_span(SpanAttribute::RowSpan, "0"))
        );
        assert_eq!(
            parse_span_options(r#" colspan="two""#),
            Err(TableError::invalid_span(SpanAttribute::ColSpan, "two"))
        );
        assert_eq!(
            parse_span_options(" colspan: "),
            Err(TableError::invalid_span(SpanAttribute::ColSpan, ""))
        );
    }

    #[test]
    fn test_parse_span_html_limits() {
        assert_eq!(parse_span_options(" colspan:1000  rowspan:65534 ").unwrap(), (65534, 1000));
        assert_eq!(
            parse_span_options(" colspan:1001 "),
            Err(TableError::invalid_span(SpanAttribute::ColSpan, "1001"))
        );
        assert_eq!(
            parse_span_options(r#" rowspan="65535""#),
            Err(TableError::invalid_span(SpanAttribute::RowSpan, "65535"))
        );
        assert_eq!(
            parse_span_options(" colspan:18446744073709551616 "),
            Err(TableError::invalid_span(
                SpanAttribute::ColSpan,
                "18446744073709551616"
            ))
        );
    }
}
