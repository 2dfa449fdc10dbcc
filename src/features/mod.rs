//! Feature modules - consumers of reconstructed tables
//!
//! This module contains the downstream helpers built on the `Table` facade:
//! - Keyword row search
//! - Financial statement classification
//! - Text, TSV and JSON rendering

pub mod render;
pub mod search;
pub mod statements;

// Re-export commonly used types
pub use search::{search_rows, RowMatch, RowQuery, SearchOutcome};
pub use statements::{classify_title, StatementKind, StatementSet};
