//! Table Grid Reconstruction
//!
//! Rebuilds a rectangular grid from HTML table markup whose cells span
//! several rows and/or columns.
//!
//! # Architecture
//!
//! The source markup only records cells where they *start*; a cell with
//! `rowspan="3"` is simply absent from the next two rows. The pipeline
//! recovers the implicit positions:
//!
//! ```text
//! Normalized markup -> Row/Cell Parser (ragged rows) -> Grid Linker (dense rows)
//! ```
//!
//! Every linked row has exactly [`Table::column_count`] cells. A position
//! covered by a span holds a placeholder that refers to its owning cell
//! through a [`CellId`].
//!
//! # Example
//!
//! ```rust
//! use tablegrid::table::Table;
//!
//! let mut table = Table::read(
//!     "<table><tr><td>A</td><td rowspan=2>B</td></tr><tr><td>C</td></tr></table>",
//! ).unwrap();
//! table.link_rows().unwrap();
//!
//! assert_eq!(table.column_count(), 2);
//! assert_eq!(table.cell_text(1, 1, true), Some("B"));
//! ```

mod cell;
mod grid;
mod linker;
mod parser;


// Re-export public API
pub use cell::{Anchor, Cell, CellBody, CellId, CellKind, Row};
pub use grid::Table;
pub use linker::{
    declared_columns, link_rows, GridLinker, LinkedGrid, SpanState, MAX_GRID_POSITIONS,
};
pub use parser::{parse_row, parse_rows, parse_span_options, parse_table_rows};
