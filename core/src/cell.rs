use core::fmt;
use serde::{Deserialize, Serialize};

/// What a cell holds, fixed when the field is built.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    Mine,
    /// Safe cell carrying the number of mines among its neighbours.
    Empty(u8),
}

impl Default for CellKind {
    fn default() -> Self {
        Self::Empty(0)
    }
}

/// Player marker on a hidden cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Annotation {
    #[default]
    Unmarked,
    Flagged,
    Questioned,
}

/// What a player sees at one position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symbol {
    Mine,
    Count(u8),
    Flagged,
    Questioned,
    Unmarked,
}

impl Symbol {
    pub const MINE: char = 'b';
    pub const FLAGGED: char = 'X';
    pub const QUESTIONED: char = '?';
    pub const UNMARKED: char = '-';

    pub const fn as_char(self) -> char {
        match self {
            Self::Mine => Self::MINE,
            // counts never exceed 8
            Self::Count(count) => (b'0' + count) as char,
            Self::Flagged => Self::FLAGGED,
            Self::Questioned => Self::QUESTIONED,
            Self::Unmarked => Self::UNMARKED,
        }
    }

    /// Whether the symbol shows the cell's contents rather than a marker.
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Mine | Self::Count(_))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        f.write_char(self.as_char())
    }
}

/// One grid position. Every operation is legal in every state, revealing
/// only changes which part of the state [`Cell::symbol`] reports.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    kind: CellKind,
    revealed: bool,
    annotation: Annotation,
}

impl Cell {
    pub const fn mine() -> Self {
        Self::new(CellKind::Mine)
    }

    pub const fn empty() -> Self {
        Self::new(CellKind::Empty(0))
    }

    pub const fn new(kind: CellKind) -> Self {
        Self {
            kind,
            revealed: false,
            annotation: Annotation::Unmarked,
        }
    }

    pub const fn kind(&self) -> CellKind {
        self.kind
    }

    pub const fn is_mine(&self) -> bool {
        matches!(self.kind, CellKind::Mine)
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub const fn annotation(&self) -> Annotation {
        self.annotation
    }

    /// Mines around an empty cell; always 0 for a mine.
    pub const fn adjacent_mine_count(&self) -> u8 {
        match self.kind {
            CellKind::Mine => 0,
            CellKind::Empty(count) => count,
        }
    }

    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    pub fn flag(&mut self) {
        self.annotation = Annotation::Flagged;
    }

    pub fn mark(&mut self) {
        self.annotation = Annotation::Questioned;
    }

    pub fn clear_annotation(&mut self) {
        self.annotation = Annotation::Unmarked;
    }

    /// Only called while the field is being built. A mine has no count to keep.
    pub(crate) fn increment_adjacent_mine_count(&mut self) {
        if let CellKind::Empty(count) = &mut self.kind {
            *count = count.saturating_add(1);
        }
    }

    pub const fn symbol(&self) -> Symbol {
        if self.revealed {
            return match self.kind {
                CellKind::Mine => Symbol::Mine,
                CellKind::Empty(count) => Symbol::Count(count),
            };
        }

        match self.annotation {
            Annotation::Unmarked => Symbol::Unmarked,
            Annotation::Flagged => Symbol::Flagged,
            Annotation::Questioned => Symbol::Questioned,
        }
    }
}
