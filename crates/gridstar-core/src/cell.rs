//! The [`Cell`] type and its display/passability tag [`CellState`].

use crate::geom::Pos;

/// What a cell currently is, for both search and display purposes.
///
/// Exactly one tag applies at a time. Only [`CellState::Barrier`] affects the
/// search; every other tag is display state derived from search progress or
/// from the roles a caller assigned.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    #[default]
    Unvisited,
    /// Discovered and waiting in the frontier.
    Frontier,
    /// Expanded.
    Closed,
    Start,
    End,
    /// Intermediate cell of the discovered path.
    Path,
    Barrier,
}

impl CellState {
    /// Whether the search may walk through a cell in this state.
    #[inline]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Barrier)
    }

    /// Whether this tag was produced by a search run (and is cleared by
    /// [`Grid::reset_search_marks`](crate::Grid::reset_search_marks)).
    #[inline]
    pub const fn is_search_mark(self) -> bool {
        matches!(self, Self::Frontier | Self::Closed | Self::Path)
    }

    /// Whether the tag is owned by the caller and must survive search marks.
    #[inline]
    pub const fn is_fixed(self) -> bool {
        matches!(self, Self::Start | Self::End | Self::Barrier)
    }
}

/// A single grid cell: its position, state and cached neighbours.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pos: Pos,
    pub(crate) state: CellState,
    pub(crate) neighbors: Vec<Pos>,
}

impl Cell {
    pub(crate) fn new(pos: Pos) -> Self {
        Self {
            pos,
            state: CellState::Unvisited,
            neighbors: Vec::new(),
        }
    }

    #[inline]
    pub fn pos(&self) -> Pos {
        self.pos
    }

    #[inline]
    pub fn state(&self) -> CellState {
        self.state
    }

    #[inline]
    pub fn is_barrier(&self) -> bool {
        !self.state.is_passable()
    }

    /// Neighbours as of the last
    /// [`Grid::refresh_adjacency`](crate::Grid::refresh_adjacency).
    #[inline]
    pub fn neighbors(&self) -> &[Pos] {
        &self.neighbors
    }
}
