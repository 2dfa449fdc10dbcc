//! Error handling for table reconstruction
//!
//! This module provides the error taxonomy shared by the markup filter,
//! the row/cell parser and the grid linker, plus the error type used by
//! fragment sources.

use thiserror::Error;

/// Span attribute that failed to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanAttribute {
    RowSpan,
    ColSpan,
}

impl SpanAttribute {
    /// Attribute name as it appears in markup
    pub fn name(&self) -> &'static str {
        match self {
            SpanAttribute::RowSpan => "rowspan",
            SpanAttribute::ColSpan => "colspan",
        }
    }

    /// Largest value HTML allows for the attribute
    pub fn max_value(&self) -> usize {
        match self {
            SpanAttribute::RowSpan => 65534,
            SpanAttribute::ColSpan => 1000,
        }
    }
}

impl std::fmt::Display for SpanAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Table reconstruction error
///
/// None of these are retryable: they all describe a permanent defect of the
/// input markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// The fragment has no `<table` ... `/table>` region
    #[error("no <table> element found in fragment")]
    TableNotFound,

    /// A `<td>`/`<th>` open tag without its closing tag
    #[error("unterminated <{tag}> cell starting at byte {offset}")]
    UnterminatedCell { tag: String, offset: usize },

    /// A rowspan/colspan value that is not an integer in `1..=max_value()`
    #[error(
        "invalid {attribute} value '{value}': expected an integer from 1 to {}",
        .attribute.max_value()
    )]
    InvalidSpan {
        attribute: SpanAttribute,
        value: String,
    },

    /// A row whose spans do not tile the declared table width
    #[error("row {row} covers {found} columns but the table declares {expected}")]
    ColumnMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A grid with more positions than the linker will allocate
    #[error("{rows} rows x {columns} columns exceeds the linkable grid size")]
    GridTooLarge { rows: usize, columns: usize },
}

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;

// Convenience constructors for errors
impl TableError {
    pub fn unterminated(tag: impl Into<String>, offset: usize) -> Self {
        TableError::UnterminatedCell {
            tag: tag.into(),
            offset,
        }
    }

    pub fn invalid_span(attribute: SpanAttribute, value: impl Into<String>) -> Self {
        TableError::InvalidSpan {
            attribute,
            value: value.into(),
        }
    }

    pub fn column_mismatch(row: usize, expected: usize, found: usize) -> Self {
        TableError::ColumnMismatch {
            row,
            expected,
            found,
        }
    }
}

/// Error type for fragment sources
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("fragment not found: {0}")]
    NotFound(String),
    #[error("read error: {0}")]
    Read(String),
    #[error("not supported: {0}")]
    NotSupported(String),
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        SourceError::Read(err.to_string())
    }
}

/// Error returned when fetching and reconstructing a table in one step
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Table(#[from] TableError),
}
