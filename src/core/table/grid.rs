//! Table facade
//!
//! Owns the raw rows produced by the parser and the linked rows produced by
//! the linker, and answers row/cell queries for downstream consumers.

use super::cell::{Anchor, Cell, CellId, Row};
use super::linker::{declared_columns, link_rows, LinkedGrid};
use super::parser::parse_table_rows;
use crate::core::markup::filter_fragment;
use crate::core::options::GridOptions;
use crate::utils::error::TableResult;

/// A table reconstructed from markup
///
/// Built once with [`Table::read`], then linked with [`Table::link_rows`].
/// Reading another fragment requires a new `Table`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Row>,
    num_columns: usize,
    linked: Option<LinkedGrid>,
}

impl Table {
    /// Read a table from a raw fragment with default options
    pub fn read(fragment: &str) -> TableResult<Self> {
        Self::read_with_options(fragment, &GridOptions::default())
    }

    /// Read a table from a raw fragment
    ///
    /// Runs the markup filter and the row/cell parser. The column count is
    /// fixed here, from the first row.
    pub fn read_with_options(fragment: &str, options: &GridOptions) -> TableResult<Self> {
        let normalized = filter_fragment(fragment)?;
        let rows = parse_table_rows(&normalized, options)?;
        log::debug!("parsed {} raw rows", rows.len());
        Ok(Self::from_rows(rows))
    }

    /// Build a table from already parsed raw rows
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let num_columns = declared_columns(&rows);
        Table {
            rows,
            num_columns,
            linked: None,
        }
    }

    /// Read and link in one step
    pub fn read_linked(fragment: &str, options: &GridOptions) -> TableResult<Self> {
        let mut table = Self::read_with_options(fragment, options)?;
        table.link_rows()?;
        Ok(table)
    }

    /// Densify the raw rows into linked rows
    ///
    /// Linking again recomputes the same rows from the unchanged raw rows.
    /// On error the table keeps its previous linked state.
    pub fn link_rows(&mut self) -> TableResult<()> {
        let grid = link_rows(&self.rows, self.num_columns)?;
        self.linked = Some(grid);
        Ok(())
    }

    /// Number of raw rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of grid columns declared by the first row
    pub fn column_count(&self) -> usize {
        self.num_columns
    }

    pub fn is_linked(&self) -> bool {
        self.linked.is_some()
    }

    /// Number of linked rows (0 before linking)
    pub fn linked_row_count(&self) -> usize {
        self.linked.as_ref().map_or(0, |grid| grid.rows.len())
    }

    /// Raw rows
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Linked rows (empty before linking)
    pub fn linked_rows(&self) -> &[Row] {
        self.linked
            .as_ref()
            .map(|grid| grid.rows.as_slice())
            .unwrap_or(&[])
    }

    /// Row at `index`, raw or linked
    pub fn row_at(&self, index: usize, linked: bool) -> Option<&Row> {
        if linked {
            self.linked_row_at(index)
        } else {
            self.rows.get(index)
        }
    }

    pub fn linked_row_at(&self, index: usize) -> Option<&Row> {
        self.linked.as_ref()?.rows.get(index)
    }

    /// Text at a position
    ///
    /// For raw rows `col` indexes the row's own cells; for linked rows it is
    /// the grid column, and placeholders answer with their owner's text.
    pub fn cell_text(&self, row: usize, col: usize, linked: bool) -> Option<&str> {
        let cell = self.row_at(row, linked)?.cell_at(col)?;
        self.resolve(cell).text()
    }

    /// Grid position of a spanning owner
    pub fn anchor(&self, id: CellId) -> Option<Anchor> {
        self.linked.as_ref()?.owners.get(id.index()).copied()
    }

    /// Owning cell registered under `id`
    pub fn owner(&self, id: CellId) -> Option<&Cell> {
        let anchor = self.anchor(id)?;
        self.linked_row_at(anchor.row)?.cell_at(anchor.column)
    }

    /// Follow a placeholder to its owning cell; owning cells resolve to
    /// themselves
    pub fn resolve<'a>(&'a self, cell: &'a Cell) -> &'a Cell {
        cell.owner()
            .and_then(|id| self.owner(id))
            .unwrap_or(cell)
    }

    /// Owners whose row span was clipped at the last row
    pub fn clipped_spans(&self) -> &[CellId] {
        self.linked
            .as_ref()
            .map(|grid| grid.clipped.as_slice())
            .unwrap_or(&[])
    }

    /// Texts of a linked row with placeholders resolved, one per grid column
    pub fn linked_row_texts(&self, index: usize) -> Option<Vec<&str>> {
        let row = self.linked_row_at(index)?;
        Some(
            row.iter()
                .map(|cell| self.resolve(cell).text().unwrap_or(""))
                .collect(),
        )
    }
}
