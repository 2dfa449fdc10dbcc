//! State-aware grid linker
//!
//! Densifies ragged rows (each listing only the cells that start in it) into
//! linked rows of exactly `num_columns` cells. Every grid position holds
//! either the owning cell that starts there or a placeholder referring to the
//! owner whose span covers it:
//!
//! ```text
//! raw:     [A] [B rowspan=2]        linked:  [A] [B]
//!          [C]                               [C] [^B]
//! ```
//!
//! The linker keeps a `rows × num_columns` matrix of [`SpanState`] recording
//! which positions of later rows are already covered by spans from earlier
//! rows.

use super::cell::{Anchor, Cell, CellId, CellKind, Row};
use crate::utils::error::{TableError, TableResult};

/// Coverage of one grid position by spans from earlier rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpanState {
    /// Free: the row's next own cell starts here
    #[default]
    Unlinked,
    /// Leading column of a span from an earlier row
    LinkedTo(CellId),
    /// Non-leading column of a span from an earlier row; never a link target
    Continuation(CellId),
}

/// Registered owner of a span
#[derive(Debug, Clone, Copy)]
struct Owner {
    anchor: Anchor,
    kind: CellKind,
}

/// Output of the linker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkedGrid {
    /// One dense row per raw row
    pub rows: Vec<Row>,
    /// Grid position of each spanning owner, indexed by [`CellId`]
    pub owners: Vec<Anchor>,
    /// Owners whose row span reaches past the last row
    pub clipped: Vec<CellId>,
}

/// Largest number of grid positions the linker allocates
pub const MAX_GRID_POSITIONS: usize = 1 << 20;

/// Grid linker state machine
pub struct GridLinker {
    num_rows: usize,
    num_columns: usize,
    /// Row-major coverage matrix
    state: Vec<SpanState>,
    owners: Vec<Owner>,
    clipped: Vec<CellId>,
}

impl GridLinker {
    /// Create a linker for a grid of the given size
    ///
    /// Fails with [`TableError::GridTooLarge`] above [`MAX_GRID_POSITIONS`].
    pub fn new(num_rows: usize, num_columns: usize) -> TableResult<Self> {
        let positions = num_rows
            .checked_mul(num_columns)
            .filter(|&n| n <= MAX_GRID_POSITIONS)
            .ok_or(TableError::GridTooLarge {
                rows: num_rows,
                columns: num_columns,
            })?;

        Ok(GridLinker {
            num_rows,
            num_columns,
            state: vec![SpanState::Unlinked; positions],
            owners: Vec::new(),
            clipped: Vec::new(),
        })
    }

    /// Coverage state of a grid position
    pub fn state_at(&self, row: usize, col: usize) -> SpanState {
        if row < self.num_rows && col < self.num_columns {
            self.state[row * self.num_columns + col]
        } else {
            SpanState::Unlinked
        }
    }

    fn mark(&mut self, row: usize, col: usize, state: SpanState) {
        self.state[row * self.num_columns + col] = state;
    }

    fn register(&mut self, anchor: Anchor, kind: CellKind) -> CellId {
        let id = CellId(self.owners.len());
        self.owners.push(Owner { anchor, kind });
        id
    }

    fn owner_kind(&self, id: CellId) -> CellKind {
        self.owners
            .get(id.0)
            .map(|owner| owner.kind)
            .unwrap_or_default()
    }

    /// Link raw row `index`
    ///
    /// Rows must be linked in order, since each row's spans mark coverage of
    /// the rows below it.
    pub fn link_row(&mut self, index: usize, raw: &Row) -> TableResult<Row> {
        let width = self.num_columns;
        let mut linked = Row {
            cells: Vec::with_capacity(width),
        };
        let mut col = 0;
        let mut own = raw.cells.iter();

        loop {
            // Emit placeholders for positions covered from earlier rows
            while col < width {
                match self.state_at(index, col) {
                    SpanState::Unlinked => break,
                    SpanState::LinkedTo(id) => linked.push(Cell::link(self.owner_kind(id), id)),
                    SpanState::Continuation(id) => {
                        linked.push(Cell::continuation(self.owner_kind(id), id))
                    }
                }
                col += 1;
            }

            let Some(cell) = own.next() else {
                break;
            };

            // Saturating arithmetic keeps oversized spans a mismatch
            let end = col.saturating_add(cell.col_span());
            let overlaps = (col..end.min(width))
                .any(|c| self.state_at(index, c) != SpanState::Unlinked);
            if end > width || overlaps {
                let found = own.map(Cell::col_span).fold(end, usize::saturating_add);
                return Err(TableError::column_mismatch(index, width, found));
            }

            self.place(index, col, cell, &mut linked);
            col = end;
        }

        if col != width {
            return Err(TableError::column_mismatch(index, width, col));
        }

        Ok(linked)
    }

    /// Append an owning cell at `(row, col)` and mark the positions it covers
    fn place(&mut self, row: usize, col: usize, cell: &Cell, linked: &mut Row) {
        linked.push(cell.clone());
        if !cell.is_spanning() {
            return;
        }

        let id = self.register(Anchor { row, column: col }, cell.kind());
        for _ in 1..cell.col_span() {
            linked.push(Cell::continuation(cell.kind(), id));
        }

        for p in 1..cell.row_span() {
            let target = row + p;
            if target >= self.num_rows {
                log::warn!(
                    "rowspan {} of cell at row {}, column {} reaches past the last row; clipped",
                    cell.row_span(),
                    row,
                    col
                );
                self.clipped.push(id);
                break;
            }
            for q in 0..cell.col_span() {
                let state = if q == 0 {
                    SpanState::LinkedTo(id)
                } else {
                    SpanState::Continuation(id)
                };
                self.mark(target, col + q, state);
            }
        }
    }

    /// Consume the linker and return the owner arena with the linked rows
    pub fn finish(self, rows: Vec<Row>) -> LinkedGrid {
        LinkedGrid {
            rows,
            owners: self.owners.into_iter().map(|owner| owner.anchor).collect(),
            clipped: self.clipped,
        }
    }
}

/// Declared width of a table: the column span sum of its first row
pub fn declared_columns(rows: &[Row]) -> usize {
    rows.first().map(Row::span_width).unwrap_or(0)
}

/// Link all raw rows of a table
///
/// A table whose first row is missing or empty declares no columns; linking
/// it is a no-op that yields no linked rows.
pub fn link_rows(rows: &[Row], num_columns: usize) -> TableResult<LinkedGrid> {
    if num_columns == 0 {
        log::debug!("table declares no columns; nothing to link");
        return Ok(LinkedGrid::default());
    }

    let mut linker = GridLinker::new(rows.len(), num_columns)?;
    let linked = rows
        .iter()
        .enumerate()
        .map(|(index, row)| linker.link_row(index, row))
        .collect::<TableResult<Vec<_>>>()?;

    let grid = linker.finish(linked);
    log::debug!(
        "linked {} rows x {} columns ({} spanning owners)",
        grid.rows.len(),
        num_columns,
        grid.owners.len()
    );
    Ok(grid)
}
