//! Keyword row search
//!
//! Finds rows of a reconstructed table whose text contains a set of
//! keywords, e.g. the "Net income" line of a statement of operations:
//!
//! ```rust
//! use tablegrid::search::{search_rows, RowQuery};
//! use tablegrid::table::Table;
//!
//! let table = Table::read_linked(
//!     "<table><tr><td>Revenue</td><td>10</td></tr><tr><td>Net income</td><td>3</td></tr></table>",
//!     &Default::default(),
//! ).unwrap();
//!
//! let outcome = search_rows(&table, &RowQuery::new().all_of(["net", "income"]));
//! assert_eq!(outcome.matches[0].row, 1);
//! ```
//!
//! Matching is case-insensitive and runs on the joined text of a row.
//! Linked rows are searched when the table is linked, with placeholders
//! answering their owner's text; raw rows are searched otherwise.

use crate::core::table::{Row, Table};
use crate::utils::diagnostics::Diagnostic;

/// Keyword constraints for [`search_rows`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowQuery {
    /// Every keyword must occur
    pub all: Vec<String>,
    /// At least one keyword must occur (ignored when empty)
    pub any: Vec<String>,
    /// No keyword may occur
    pub none: Vec<String>,
}

impl RowQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all_of<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.all.extend(keywords.into_iter().map(Into::into));
        self
    }

    pub fn any_of<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.any.extend(keywords.into_iter().map(Into::into));
        self
    }

    pub fn none_of<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.none.extend(keywords.into_iter().map(Into::into));
        self
    }

    /// Whether the query constrains nothing once blank keywords are dropped
    pub fn is_empty(&self) -> bool {
        [&self.all, &self.any, &self.none]
            .iter()
            .all(|set| set.iter().all(|k| k.trim().is_empty()))
    }
}

/// A matching row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMatch {
    /// Row index
    pub row: usize,
    /// Joined row text, each spanning cell counted once
    pub text: String,
    /// Text per cell; per grid column for linked rows
    pub cells: Vec<String>,
}

/// Matches plus the diagnostics produced while searching
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub matches: Vec<RowMatch>,
    pub diagnostics: Vec<Diagnostic>,
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn first(&self) -> Option<&RowMatch> {
        self.matches.first()
    }
}

/// Lower-cased keyword set with blank entries removed
struct Keywords(Vec<String>);

impl Keywords {
    fn prepare(raw: &[String], set: &str, diagnostics: &mut Vec<Diagnostic>) -> Self {
        let mut keywords = Vec::with_capacity(raw.len());
        for keyword in raw {
            let trimmed = keyword.trim();
            if trimmed.is_empty() {
                diagnostics.push(
                    Diagnostic::warning(format!("blank keyword in `{}` set ignored", set))
                        .with_source(format!("{:?}", keyword)),
                );
            } else {
                keywords.push(trimmed.to_lowercase());
            }
        }
        Keywords(keywords)
    }

    fn all_in(&self, haystack: &str) -> bool {
        self.0.iter().all(|k| haystack.contains(k.as_str()))
    }

    fn any_in(&self, haystack: &str) -> bool {
        self.0.iter().any(|k| haystack.contains(k.as_str()))
    }
}

/// Search the rows of a table
pub fn search_rows(table: &Table, query: &RowQuery) -> SearchOutcome {
    let mut diagnostics = Vec::new();

    let all = Keywords::prepare(&query.all, "all", &mut diagnostics);
    let any = Keywords::prepare(&query.any, "any", &mut diagnostics);
    let none = Keywords::prepare(&query.none, "none", &mut diagnostics);

    if query.is_empty() {
        diagnostics.push(Diagnostic::info("query has no keywords; every row matches"));
    }

    let linked = table.is_linked();
    if !linked {
        diagnostics.push(
            Diagnostic::info("table is not linked; searching raw rows")
                .with_suggestion("link the table so spanning labels are found in every row they cover"),
        );
    }

    let rows = if linked { table.linked_rows() } else { table.rows() };
    let mut matches = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let cells = row_texts(table, row);
        let text = joined_text(row, &cells);
        let haystack = text.to_lowercase();

        let accepted = all.all_in(&haystack)
            && (any.0.is_empty() || any.any_in(&haystack))
            && !none.any_in(&haystack);

        if accepted {
            matches.push(RowMatch {
                row: index,
                text,
                cells,
            });
        }
    }

    log::debug!("row search matched {} of {} rows", matches.len(), rows.len());

    if matches.is_empty() {
        diagnostics.push(Diagnostic::info("no row matches the query"));
    }

    SearchOutcome {
        matches,
        diagnostics,
    }
}

/// Text of every cell in a row, placeholders resolved
fn row_texts(table: &Table, row: &Row) -> Vec<String> {
    row.iter()
        .map(|cell| table.resolve(cell).text().unwrap_or("").to_string())
        .collect()
}

/// Join a row's non-empty texts, skipping continuation columns
fn joined_text(row: &Row, texts: &[String]) -> String {
    row.iter()
        .zip(texts)
        .filter(|(cell, text)| !cell.is_continuation() && !text.is_empty())
        .map(|(_, text)| text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
