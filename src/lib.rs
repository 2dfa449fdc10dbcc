//! # tablegrid
//!
//! Reconstructs a dense, rectangular grid from HTML tables whose cells span
//! several rows and/or columns, as found in financial statement filings.
//!
//! ## Features
//!
//! - **Markup Filter**: Reduces any fragment to `tr`/`td`/`th` and their span counts
//! - **Grid Linker**: Fills the positions implied by `rowspan`/`colspan` with placeholders
//! - **Diagnostics**: Reports clipped spans, empty rows and other markup defects
//! - **Row Search**: Case-insensitive keyword search over linked rows
//! - **Statement Classification**: Maps statement titles to statement kinds
//!
//! ## Usage Examples
//!
//! ### Reading a Table
//!
//! ```rust
//! use tablegrid::Table;
//!
//! let mut table = Table::read(r#"
//!     <table>
//!       <tr><th rowspan="2">Item</th><th colspan="2">Three Months Ended</th></tr>
//!       <tr><th>2019</th><th>2018</th></tr>
//!       <tr><td>Net income</td><td>12</td><td>9</td></tr>
//!     </table>
//! "#).unwrap();
//! table.link_rows().unwrap();
//!
//! assert_eq!(table.column_count(), 3);
//! assert_eq!(table.linked_row_count(), 3);
//! assert_eq!(table.cell_text(1, 0, true), Some("Item"));
//! ```
//!
//! ### Searching Rows
//!
//! ```rust
//! use tablegrid::{search_rows, GridOptions, RowQuery, Table};
//!
//! let table = Table::read_linked(
//!     "<table><tr><td>Revenue</td><td>10</td></tr><tr><td>Net income</td><td>3</td></tr></table>",
//!     &GridOptions::default(),
//! ).unwrap();
//!
//! let outcome = search_rows(&table, &RowQuery::new().all_of(["net income"]));
//! assert_eq!(outcome.matches[0].cells, vec!["Net income", "3"]);
//! ```

/// Core reconstruction modules
pub mod core;

/// Feature modules - search, classification, rendering
pub mod features;

/// Utility modules
pub mod utils;

// Re-export core modules
pub use core::markup;
pub use core::options::GridOptions;
pub use core::table;
pub use core::table::{Cell, CellBody, CellId, CellKind, Row, Table};

// Re-export feature modules
pub use features::render;
pub use features::search;
pub use features::statements;
pub use features::{classify_title, search_rows, RowQuery, StatementKind, StatementSet};

// Re-export utilities
pub use utils::diagnostics;
pub use utils::error::{FetchError, SourceError, TableError, TableResult};
pub use utils::source;

/// Read a fragment and link its rows with default options
pub fn read_table(fragment: &str) -> TableResult<Table> {
    Table::read_linked(fragment, &GridOptions::default())
}

/// Extract and normalize the table region of a fragment
///
/// Returns the markup the row/cell parser works on.
pub fn normalize_fragment(fragment: &str) -> TableResult<String> {
    markup::filter_fragment(fragment)
}
