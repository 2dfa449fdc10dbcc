//! Table diagnostics
//!
//! Reports structural oddities of a reconstructed table that are not hard
//! errors but usually point at a defect in the source markup:
//!
//! - Raw rows without any cells
//! - Row spans that reach past the last row
//! - Spanning cells with no text
//! - Tables with no rows, or not yet linked
//!
//! ## Example
//!
//! ```rust
//! use tablegrid::diagnostics::{check_fragment, DiagnosticLevel};
//! use tablegrid::GridOptions;
//!
//! let result = check_fragment(
//!     "<table><tr><td rowspan=3>A</td></tr></table>",
//!     &GridOptions::default(),
//! );
//! assert_eq!(result.warnings, 1);
//! assert!(result.diagnostics.iter().all(|d| d.level != DiagnosticLevel::Error));
//! ```

use std::fmt;

use crate::core::options::GridOptions;
use crate::core::table::{Cell, Table};
use crate::utils::error::TableError;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    /// Informational note
    Info,
    /// Warning - the grid was built but may not match the source
    Warning,
    /// Error - the grid could not be built
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Info => write!(f, "info"),
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity level
    pub level: DiagnosticLevel,
    /// Human-readable message
    pub message: String,
    /// Row index (0-based)
    pub row: Option<usize>,
    /// Grid column (0-based)
    pub column: Option<usize>,
    /// Relevant cell text
    pub source_text: Option<String>,
    /// Suggested fix
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            row: None,
            column: None,
            source_text: None,
            suggestion: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Error, message)
    }

    /// Add a row without a column
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Add grid location
    pub fn with_location(mut self, row: usize, column: usize) -> Self {
        self.row = Some(row);
        self.column = Some(column);
        self
    }

    /// Add source text
    pub fn with_source(mut self, text: impl Into<String>) -> Self {
        self.source_text = Some(text.into());
        self
    }

    /// Add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: level: message
        //         --> row 3, column 1
        //         |
        //         | cell text
        //         = help: suggestion

        write!(f, "{}: {}", self.level, self.message)?;

        match (self.row, self.column) {
            (Some(row), Some(col)) => write!(f, "\n  --> row {}, column {}", row, col)?,
            (Some(row), None) => write!(f, "\n  --> row {}", row)?,
            _ => {}
        }

        if let Some(ref source) = self.source_text {
            write!(f, "\n  |\n  | {}", source)?;
        }

        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\n  = help: {}", suggestion)?;
        }

        Ok(())
    }
}

impl From<&TableError> for Diagnostic {
    fn from(err: &TableError) -> Self {
        let diag = Diagnostic::error(err.to_string());
        match err {
            TableError::TableNotFound => {
                diag.with_suggestion("the fragment must contain `<table ...> ... </table>`")
            }
            TableError::UnterminatedCell { tag, .. } => {
                diag.with_suggestion(format!("close the cell with </{}>", tag))
            }
            TableError::InvalidSpan { attribute, .. } => {
                diag.with_suggestion(format!(
                    "{} must be a whole number from 1 to {}",
                    attribute,
                    attribute.max_value()
                ))
            }
            TableError::GridTooLarge { .. } => {
                diag.with_suggestion("check the column spans of the first row")
            }
            TableError::ColumnMismatch { row, .. } => diag.with_row(*row),
        }
    }
}

/// Check result with summary
#[derive(Debug, Default, Clone)]
pub struct CheckResult {
    /// All diagnostics
    pub diagnostics: Vec<Diagnostic>,
    /// Number of errors
    pub errors: usize,
    /// Number of warnings
    pub warnings: usize,
    /// Number of info messages
    pub infos: usize,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn add(&mut self, diag: Diagnostic) {
        match diag.level {
            DiagnosticLevel::Error => self.errors += 1,
            DiagnosticLevel::Warning => self.warnings += 1,
            DiagnosticLevel::Info => self.infos += 1,
        }
        self.diagnostics.push(diag);
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Check if there are any issues at all
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// One-line tally such as `1 error, 2 warnings`
    pub fn summary(&self) -> String {
        let parts: Vec<String> = [
            (self.errors, "error"),
            (self.warnings, "warning"),
            (self.infos, "note"),
        ]
        .into_iter()
        .filter(|&(count, _)| count > 0)
        .map(|(count, noun)| format!("{} {}{}", count, noun, if count == 1 { "" } else { "s" }))
        .collect();

        if parts.is_empty() {
            "no issues found".to_string()
        } else {
            parts.join(", ")
        }
    }

}

/// Check a read table for structural issues
pub fn check_table(table: &Table) -> CheckResult {
    let mut result = CheckResult::new();

    if table.row_count() == 0 {
        result.add(Diagnostic::warning("table has no rows"));
        return result;
    }

    check_empty_rows(table, &mut result);

    if !table.is_linked() {
        result.add(
            Diagnostic::info("table is not linked; spans were not resolved")
                .with_suggestion("call Table::link_rows before querying grid columns"),
        );
        return result;
    }

    check_clipped_spans(table, &mut result);
    check_empty_owners(table, &mut result);

    result
}

/// Read, link and check a raw fragment
///
/// Read and link failures are reported as a single error diagnostic.
pub fn check_fragment(fragment: &str, options: &GridOptions) -> CheckResult {
    match Table::read_linked(fragment, options) {
        Ok(table) => check_table(&table),
        Err(err) => {
            let mut result = CheckResult::new();
            result.add(Diagnostic::from(&err));
            result
        }
    }
}

fn check_empty_rows(table: &Table, result: &mut CheckResult) {
    for (index, row) in table.rows().iter().enumerate() {
        if row.is_empty() {
            let mut diag = Diagnostic::warning("row has no cells").with_row(index);
            if index == 0 {
                diag = diag.with_suggestion("the first row declares the column count");
            }
            result.add(diag);
        }
    }
}

fn check_clipped_spans(table: &Table, result: &mut CheckResult) {
    for &id in table.clipped_spans() {
        let Some(anchor) = table.anchor(id) else {
            continue;
        };
        let Some(cell) = table.owner(id) else {
            continue;
        };
        let available = table.linked_row_count() - anchor.row;
        result.add(
            Diagnostic::warning(format!(
                "rowspan {} reaches past the last row; clipped to {}",
                cell.row_span(),
                available
            ))
            .with_location(anchor.row, anchor.column)
            .with_source(cell.text().unwrap_or_default()),
        );
    }
}

fn check_empty_owners(table: &Table, result: &mut CheckResult) {
    for (index, row) in table.linked_rows().iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            if is_empty_spanning(cell) {
                result.add(
                    Diagnostic::info(format!(
                        "empty {} cell spans {} row(s) and {} column(s)",
                        cell.kind().tag(),
                        cell.row_span(),
                        cell.col_span()
                    ))
                    .with_location(index, col),
                );
            }
        }
    }
}

fn is_empty_spanning(cell: &Cell) -> bool {
    cell.is_spanning() && cell.text().is_some_and(|text| text.trim().is_empty())
}

const RESET: &str = "\x1b[0m";

impl DiagnosticLevel {
    fn ansi_color(&self) -> &'static str {
        match self {
            DiagnosticLevel::Error => "\x1b[31m",
            DiagnosticLevel::Warning => "\x1b[33m",
            DiagnosticLevel::Info => "\x1b[34m",
        }
    }
}

/// Format check results for terminal output
///
/// Each diagnostic is followed by a blank line; the last line is the summary.
pub fn format_diagnostics(result: &CheckResult, use_color: bool) -> String {
    let paint = |color: &str, text: String| {
        if use_color {
            format!("{}{}{}", color, text, RESET)
        } else {
            text
        }
    };

    let mut output: String = result
        .diagnostics
        .iter()
        .map(|diag| paint(diag.level.ansi_color(), diag.to_string()) + "\n\n")
        .collect();

    // Green only when nothing worse than a note was found
    let summary_color = result
        .diagnostics
        .iter()
        .map(|diag| diag.level)
        .max()
        .filter(|&level| level > DiagnosticLevel::Info)
        .map_or("\x1b[32m", |level| level.ansi_color());
    output.push_str(&paint(summary_color, format!("Summary: {}", result.summary())));
    output
}
