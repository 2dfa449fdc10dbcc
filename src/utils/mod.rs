//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Diagnostics and error reporting
//! - Fragment sources (the upstream storage boundary)
//! - Error types and result types

pub mod diagnostics;
pub mod error;
pub mod source;

// Re-export commonly used items
pub use diagnostics::{
    check_fragment, check_table, format_diagnostics, CheckResult, Diagnostic, DiagnosticLevel,
};
pub use error::{FetchError, SourceError, SpanAttribute, TableError, TableResult};
pub use source::{read_table_from, FragmentSource, MemoryFragmentSource, NoopFragmentSource};

#[cfg(not(target_arch = "wasm32"))]
pub use source::DirFragmentSource;
