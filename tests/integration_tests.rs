//! Integration tests for tablegrid grid reconstruction

use tablegrid::{
    diagnostics::check_fragment,
    markup::{extract_table, normalize_tags},
    read_table,
    render::{render_text, render_tsv},
    search_rows,
    source::{read_table_from, MemoryFragmentSource},
    CellBody, CellKind, FetchError, GridOptions, RowQuery, StatementKind, StatementSet, Table,
    TableError,
};

/// Balance sheet fragment as published in a filing page
const BALANCE_SHEET: &str = r#"
<html><head><title>R2.htm</title></head><body>
<table class="report" border="0" cellspacing="2" id="idm139">
  <tr>
    <th class="tl" colspan="1" rowspan="2"><div style="width: 200px;"><strong>CONSOLIDATED BALANCE SHEETS - USD ($)<br> $ in Millions</strong></div></th>
    <th class="th"><div>Sep. 28, 2019</div></th>
    <th class="th"><div>Sep. 29, 2018</div></th>
  </tr>
  <tr>
    <th class="th" colspan="2"><div>Audited</div></th>
  </tr>
  <tr class="re">
    <td class="pl"><a class="a" href="javascript:void(0);">Cash and cash equivalents</a></td>
    <td class="nump">$ 48,844<span></span></td>
    <td class="nump">$ 25,913<span></span></td>
  </tr>
  <tr class="ro">
    <td class="pl"><a>Total current assets</a></td>
    <td class="nump">162,819</td>
    <td class="nump">131,339</td>
  </tr>
  <!-- <tr><td>hidden</td></tr> -->
  <tr class="rh">
    <td class="pl"><a>Research &amp; development</a></td>
    <td class="nump">16,217</td>
    <td class="nump">14,236</td>
  </tr>
</table>
</body></html>
"#;

// ============================================================================
// Scenarios
// ============================================================================

mod scenarios {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rowspan_link() {
        let table =
            read_table("<table><tr><td>A</td><td rowspan:2>B</td></tr><tr><td>C</td></tr></table>").unwrap();
        assert_eq!(table.column_count(), 2);

        let row1 = table.linked_row_at(1).unwrap();
        assert_eq!(row1.cells[0].text(), Some("C"));
        let id = row1.cells[1].owner().unwrap();
        let anchor = table.anchor(id).unwrap();
        assert_eq!((anchor.row, anchor.column), (0, 1));
        assert_eq!(table.owner(id).unwrap().row_span(), 2);
    }

    #[test]
    fn test_short_row() {
        let err = read_table("<table><tr><td colspan=3>A</td></tr><tr><td>1</td><td>2</td></tr></table>")
            .unwrap_err();
        assert_eq!(err, TableError::column_mismatch(1, 3, 2));
    }

    #[test]
    fn test_full_width_header() {
        let table = read_table(
            "<table><tr><td>a</td><td>b</td><td>c</td></tr><tr><th colspan:3>Total</th></tr></table>",
        )
        .unwrap();
        let row = table.linked_row_at(1).unwrap();
        assert_eq!(row.len(), 3);
        assert_eq!(row.cells[0].kind(), CellKind::Header);
        assert!(matches!(row.cells[1].body(), CellBody::Continuation(_)));
        assert!(matches!(row.cells[2].body(), CellBody::Continuation(_)));
    }

    #[test]
    fn test_no_table() {
        assert_eq!(read_table("<p>Cover page</p>"), Err(TableError::TableNotFound));
    }

    #[test]
    fn test_filing_balance_sheet() {
        let table = read_table(BALANCE_SHEET).unwrap();

        assert_eq!(table.column_count(), 3);
        assert_eq!(table.row_count(), 5);
        assert_eq!(
            table.linked_row_texts(1).unwrap(),
            vec![
                "CONSOLIDATED BALANCE SHEETS - USD ($) $ in Millions",
                "Audited",
                "Audited"
            ]
        );
        assert_eq!(
            table.linked_row_texts(2).unwrap(),
            vec!["Cash and cash equivalents", "$ 48,844", "$ 25,913"]
        );
        assert_eq!(table.cell_text(4, 0, true), Some("Research & development"));
    }
}

// ============================================================================
// Markup Filter
// ============================================================================

mod filter {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_first_table_only() {
        let fragment = "<table><tr><td>1</td></tr></table><table><tr><td>2</td></tr></table>";
        assert_eq!(
            extract_table(fragment).unwrap(),
            "<table><tr><td>1</td></tr></table>"
        );
    }

    #[test]
    fn test_filing_markup_normalized() {
        let normalized = normalize_tags(extract_table(BALANCE_SHEET).unwrap());
        assert!(normalized.starts_with("<tr><th colspan:1  rowspan:2 >"));
        assert!(!normalized.contains("class"));
        assert!(!normalized.contains("hidden"));
        assert!(!normalized.contains("<div"));
        assert_eq!(normalize_tags(&normalized), normalized);
    }

    #[test]
    fn test_comparison_text_survives() {
        let table = read_table("<table><tr><td>Ratio <5% and >3%</td></tr></table>").unwrap();
        assert_eq!(table.cell_text(0, 0, true), Some("Ratio <5% and >3%"));
    }

    #[test]
    fn test_raw_and_canonical_forms_agree() {
        let raw = read_table(r#"<table><tr><td rowspan="2">A</td><td>B</td></tr><tr><td>C</td></tr></table>"#)
            .unwrap();
        let canonical =
            read_table("<table><tr><td rowspan:2 >A</td><td>B</td></tr><tr><td>C</td></tr></table>").unwrap();
        assert_eq!(raw, canonical);
    }
}

// ============================================================================
// Errors
// ============================================================================

mod errors {
    use super::*;
    use pretty_assertions::assert_eq;
    use tablegrid::utils::error::SpanAttribute;

    #[test]
    fn test_invalid_span_values() {
        for value in ["0", "-1", "two", "1.5"] {
            let fragment = format!("<table><tr><td colspan=\"{}\">A</td></tr></table>", value);
            assert_eq!(
                read_table(&fragment),
                Err(TableError::invalid_span(SpanAttribute::ColSpan, value)),
                "{}",
                value
            );
        }
    }

    #[test]
    fn test_oversized_span_values() {
        for value in ["1001", "18446744073709551615", "18446744073709551616"] {
            let fragment = format!(
                "<table><tr><td>x</td><td colspan=\"{}\">y</td></tr></table>",
                value
            );
            assert_eq!(
                read_table(&fragment),
                Err(TableError::invalid_span(SpanAttribute::ColSpan, value)),
                "{}",
                value
            );
        }
        assert_eq!(
            read_table("<table><tr><td rowspan:65535 >A</td></tr></table>"),
            Err(TableError::invalid_span(SpanAttribute::RowSpan, "65535"))
        );
    }

    #[test]
    fn test_unterminated_cell() {
        let err = read_table("<table><tr><th>Year<td>2019</td></tr></table>").unwrap_err();
        assert!(matches!(err, TableError::UnterminatedCell { ref tag, offset: 4 } if tag == "th"));
    }

    #[test]
    fn test_missing_end_tag() {
        assert_eq!(
            read_table("<table><tr><td>A</td></tr>"),
            Err(TableError::TableNotFound)
        );
    }

    #[test]
    fn test_errors_are_displayable() {
        let err = read_table("<table><tr><td>A</td><td>B</td></tr><tr><td>C</td></tr></table>").unwrap_err();
        assert_eq!(err.to_string(), "row 1 covers 1 columns but the table declares 2");
    }
}

// ============================================================================
// Options
// ============================================================================

mod options {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_cleans_content() {
        let table = read_table("<table><tr><td>  Net\n  sales&nbsp;&#8212; total </td></tr></table>").unwrap();
        assert_eq!(table.cell_text(0, 0, true), Some("Net sales \u{2014} total"));
    }

    #[test]
    fn test_verbatim() {
        let table = Table::read_linked(
            "<table><tr><td>  Net\n  sales&nbsp; </td></tr></table>",
            &GridOptions::verbatim(),
        )
        .unwrap();
        assert_eq!(table.cell_text(0, 0, true), Some("Net\n  sales&nbsp;"));
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_toml_config() {
        let opts = GridOptions::from_toml_str("decode_entities = false").unwrap();
        assert!(!opts.decode_entities);
        assert!(opts.collapse_whitespace);
        assert!(GridOptions::from_toml_str("decode_entities = 3").is_err());
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

mod diagnostics {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_filing_is_clean() {
        let result = check_fragment(BALANCE_SHEET, &GridOptions::default());
        assert!(result.is_empty(), "{}", result.summary());
        assert_eq!(result.summary(), "no issues found");
    }

    #[test]
    fn test_clipped_and_error() {
        let result = check_fragment(
            "<table><tr><td rowspan=9>A</td></tr></table>",
            &GridOptions::default(),
        );
        assert_eq!(result.summary(), "1 warning");

        let result = check_fragment("<div></div>", &GridOptions::default());
        assert!(result.has_errors());
    }
}

// ============================================================================
// Search and Statements
// ============================================================================

mod search {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_search_filing() {
        let table = read_table(BALANCE_SHEET).unwrap();
        let outcome = search_rows(&table, &RowQuery::new().any_of(["total", "research"]));
        let rows: Vec<usize> = outcome.matches.iter().map(|m| m.row).collect();
        assert_eq!(rows, vec![3, 4]);
        assert_eq!(outcome.matches[0].cells[1], "162,819");
    }

    #[test]
    fn test_statement_set_from_source() {
        let mut source = MemoryFragmentSource::new();
        source.add_fragment("R1.htm", "<p>Document and Entity Information</p>");
        source.add_fragment("R2.htm", BALANCE_SHEET);

        let mut set = StatementSet::new();
        set.insert(
            "CONSOLIDATED BALANCE SHEETS",
            read_table_from(&source, "R2.htm").unwrap(),
        );

        let (title, table) = set.find(StatementKind::BalanceSheet).unwrap();
        assert_eq!(title, "CONSOLIDATED BALANCE SHEETS");
        assert_eq!(table.column_count(), 3);

        assert!(matches!(
            read_table_from(&source, "R1.htm"),
            Err(FetchError::Table(TableError::TableNotFound))
        ));
    }
}

// ============================================================================
// Rendering
// ============================================================================

mod render {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_and_tsv_agree_on_shape() {
        let table = read_table(BALANCE_SHEET).unwrap();
        let text = render_text(&table, true);
        let tsv = render_tsv(&table, true);

        assert_eq!(text.lines().count(), 5);
        assert!(tsv.lines().all(|line| line.split('\t').count() == 3));
        assert!(text.lines().nth(1).unwrap().starts_with('^'));
    }
}

// ============================================================================
// Properties
// ============================================================================

mod properties {
    use super::*;
    use proptest::prelude::*;

    /// A generated table: markup plus the owner label expected at every position
    struct Layout {
        markup: String,
        expected: Vec<Vec<String>>,
        columns: usize,
    }

    /// Tile a `rows x columns` grid with spanning cells driven by `choices`
    fn tile(rows: usize, columns: usize, choices: &[u8]) -> Layout {
        let mut picks = choices.iter().cycle().map(|&b| b as usize);
        let mut expected = vec![vec![String::new(); columns]; rows];
        let mut covered = vec![vec![false; columns]; rows];
        let mut markup = String::from("<table>");

        for r in 0..rows {
            markup.push_str("<tr>");
            let mut c = 0;
            while c < columns {
                if covered[r][c] {
                    c += 1;
                    continue;
                }

                let free_run = (c..columns).take_while(|&cc| !covered[r][cc]).count();
                let col_span = 1 + picks.next().unwrap_or(0) % free_run;
                let free_rows = (r..rows)
                    .take_while(|&rr| (c..c + col_span).all(|cc| !covered[rr][cc]))
                    .count();
                let row_span = 1 + picks.next().unwrap_or(0) % free_rows;

                let label = format!("r{}c{}", r, c);
                for rr in r..r + row_span {
                    for cc in c..c + col_span {
                        covered[rr][cc] = true;
                        expected[rr][cc] = label.clone();
                    }
                }
                markup.push_str(&format!(
                    "<td rowspan=\"{}\" colspan=\"{}\">{}</td>",
                    row_span, col_span, label
                ));
                c += col_span;
            }
            markup.push_str("</tr>");
        }
        markup.push_str("</table>");

        Layout {
            markup,
            expected,
            columns,
        }
    }

    proptest! {
        #[test]
        fn linked_rows_have_declared_width(
            rows in 1usize..7,
            columns in 1usize..7,
            choices in prop::collection::vec(any::<u8>(), 1..32),
        ) {
            let layout = tile(rows, columns, &choices);
            let table = read_table(&layout.markup).unwrap();

            prop_assert_eq!(table.column_count(), layout.columns);
            prop_assert_eq!(table.linked_row_count(), rows);
            for row in table.linked_rows() {
                prop_assert_eq!(row.len(), layout.columns);
            }
        }

        #[test]
        fn placeholders_resolve_to_covering_owner(
            rows in 1usize..7,
            columns in 1usize..7,
            choices in prop::collection::vec(any::<u8>(), 1..32),
        ) {
            let layout = tile(rows, columns, &choices);
            let table = read_table(&layout.markup).unwrap();

            for (r, expected) in layout.expected.iter().enumerate() {
                let texts = table.linked_row_texts(r).unwrap();
                prop_assert_eq!(&texts, expected);
            }
        }

        #[test]
        fn single_span_cells_are_never_link_targets(
            rows in 1usize..7,
            columns in 1usize..7,
            choices in prop::collection::vec(any::<u8>(), 1..32),
        ) {
            let layout = tile(rows, columns, &choices);
            let table = read_table(&layout.markup).unwrap();

            for row in table.linked_rows() {
                for cell in row {
                    if let Some(id) = cell.owner() {
                        prop_assert!(table.owner(id).unwrap().is_spanning());
                    }
                }
            }
        }

        #[test]
        fn linking_is_idempotent(
            rows in 1usize..7,
            columns in 1usize..7,
            choices in prop::collection::vec(any::<u8>(), 1..32),
        ) {
            let layout = tile(rows, columns, &choices);
            let mut table = read_table(&layout.markup).unwrap();
            let first = table.clone();
            table.link_rows().unwrap();
            prop_assert_eq!(first, table);
        }

        #[test]
        fn normalizing_is_idempotent(
            rows in 1usize..7,
            columns in 1usize..7,
            choices in prop::collection::vec(any::<u8>(), 1..32),
        ) {
            let layout = tile(rows, columns, &choices);
            let once = normalize_tags(&layout.markup);
            prop_assert_eq!(normalize_tags(&once), once.clone());
        }

        #[test]
        fn single_span_rows_round_trip(
            labels in prop::collection::vec("[a-z]{1,8}", 1..8),
        ) {
            let cells: String = labels.iter().map(|l| format!("<td>{}</td>", l)).collect();
            let table = read_table(&format!("<table><tr>{}</tr></table>", cells)).unwrap();
            prop_assert_eq!(table.linked_row_at(0), table.row_at(0, false));
            prop_assert_eq!(table.linked_row_texts(0).unwrap(), labels.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }
}
