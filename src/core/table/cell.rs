//! Cell and row types for table reconstruction

/// Kind of a cell, taken from its tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellKind {
    /// `<td>`
    #[default]
    Normal,
    /// `<th>`
    Header,
}

impl CellKind {
    /// Kind for a tag name (`td` or `th`)
    pub fn from_tag(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("th") {
            CellKind::Header
        } else {
            CellKind::Normal
        }
    }

    /// Tag name for this kind
    pub fn tag(&self) -> &'static str {
        match self {
            CellKind::Normal => "td",
            CellKind::Header => "th",
        }
    }
}

/// Stable index of an owning cell in a table's owner arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub(crate) usize);

impl CellId {
    /// Raw arena index
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Grid position of an owning cell in the linked rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Anchor {
    pub row: usize,
    pub column: usize,
}

/// What a cell holds: its own content, or a reference to the cell that owns
/// the position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellBody {
    /// Owning cell
    Content(String),
    /// Leading column of a span carried down from an earlier row
    Link(CellId),
    /// Non-leading column of a span
    Continuation(CellId),
}

/// A table cell
///
/// A cell is either owning (holds content) or linked (holds the id of its
/// owner); the two are mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    kind: CellKind,
    row_span: usize,
    col_span: usize,
    body: CellBody,
}

impl Cell {
    /// Create an owning cell
    ///
    /// Spans below 1 are raised to 1; the parser rejects them before a cell
    /// is ever built.
    pub fn new(kind: CellKind, row_span: usize, col_span: usize, content: impl Into<String>) -> Self {
        Cell {
            kind,
            row_span: row_span.max(1),
            col_span: col_span.max(1),
            body: CellBody::Content(content.into()),
        }
    }

    /// Create a single-span normal cell
    pub fn normal(content: impl Into<String>) -> Self {
        Cell::new(CellKind::Normal, 1, 1, content)
    }

    /// Create a single-span header cell
    pub fn header(content: impl Into<String>) -> Self {
        Cell::new(CellKind::Header, 1, 1, content)
    }

    /// Placeholder for the leading column of a span from an earlier row
    pub(crate) fn link(kind: CellKind, owner: CellId) -> Self {
        Cell {
            kind,
            row_span: 1,
            col_span: 1,
            body: CellBody::Link(owner),
        }
    }

    /// Placeholder for a non-leading column of a span
    pub(crate) fn continuation(kind: CellKind, owner: CellId) -> Self {
        Cell {
            kind,
            row_span: 1,
            col_span: 1,
            body: CellBody::Continuation(owner),
        }
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    pub fn row_span(&self) -> usize {
        self.row_span
    }

    pub fn col_span(&self) -> usize {
        self.col_span
    }

    pub fn body(&self) -> &CellBody {
        &self.body
    }

    /// Text of an owning cell; `None` for placeholders
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            CellBody::Content(text) => Some(text),
            CellBody::Link(_) | CellBody::Continuation(_) => None,
        }
    }

    /// Owner of a placeholder; `None` for owning cells
    pub fn owner(&self) -> Option<CellId> {
        match self.body {
            CellBody::Content(_) => None,
            CellBody::Link(id) | CellBody::Continuation(id) => Some(id),
        }
    }

    pub fn is_linked(&self) -> bool {
        self.owner().is_some()
    }

    pub fn is_owning(&self) -> bool {
        !self.is_linked()
    }

    pub fn is_continuation(&self) -> bool {
        matches!(self.body, CellBody::Continuation(_))
    }

    /// Whether this cell covers more than its own grid position
    pub fn is_spanning(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }
}

/// A table row
///
/// In raw rows the cell order is source order; in linked rows the index of a
/// cell is its grid column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell_at(&self, col: usize) -> Option<&Cell> {
        self.cells.get(col)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    /// Total number of grid columns covered by this row's own cells
    ///
    /// Saturates at `usize::MAX`.
    pub fn span_width(&self) -> usize {
        self.cells
            .iter()
            .map(Cell::col_span)
            .fold(0, usize::saturating_add)
    }
}

impl FromIterator<Cell> for Row {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Row {
            cells: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}
