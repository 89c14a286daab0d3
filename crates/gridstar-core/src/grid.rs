//! The [`Grid`] type: a fixed `rows × rows` square of [`Cell`]s.
//!
//! Cells are stored row-major. Each cell caches its passable cardinal
//! neighbours; the cache is only rebuilt by [`Grid::refresh_adjacency`], so
//! callers must refresh after editing barriers and before searching.

use crate::cell::{Cell, CellState};
use crate::error::GridError;
use crate::geom::Pos;

/// A square grid of cells with cached 4-directional adjacency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
    rows: usize,
    size: usize,
}

impl Grid {
    /// Create a `rows × rows` grid with no barriers, drawn `size` pixels
    /// wide. The pixel size only matters for [`cell_for_point`](Self::cell_for_point).
    pub fn build(rows: usize, size: usize) -> Self {
        let mut cells = Vec::with_capacity(rows * rows);
        for row in 0..rows {
            for col in 0..rows {
                cells.push(Cell::new(Pos::new(row, col)));
            }
        }
        Self { cells, rows, size }
    }

    /// Number of rows (and columns).
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Pixel size the grid was built for.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Pixel width of one cell (`size / rows`, rounded down).
    #[inline]
    pub fn gap(&self) -> usize {
        if self.rows == 0 { 0 } else { self.size / self.rows }
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, p: Pos) -> bool {
        p.row < self.rows && p.col < self.rows
    }

    /// Flat row-major index of `p`, or `None` if out of bounds.
    #[inline]
    pub fn index(&self, p: Pos) -> Option<usize> {
        self.contains(p).then(|| p.row * self.rows + p.col)
    }

    /// Inverse of [`index`](Self::index). `idx` must be below [`len`](Self::len).
    #[inline]
    pub fn pos_of(&self, idx: usize) -> Pos {
        Pos::new(idx / self.rows, idx % self.rows)
    }

    pub fn cell_at(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cell(Pos::new(row, col))
    }

    pub fn cell(&self, p: Pos) -> Option<&Cell> {
        self.index(p).map(|i| &self.cells[i])
    }

    /// State of the cell at `p`, or `None` if out of bounds.
    pub fn state(&self, p: Pos) -> Option<CellState> {
        self.cell(p).map(Cell::state)
    }

    /// Cached neighbours of `p`. Empty for barriers, out-of-bounds positions
    /// and cells not yet refreshed.
    pub fn neighbors(&self, p: Pos) -> &[Pos] {
        self.cell(p).map(Cell::neighbors).unwrap_or(&[])
    }

    /// Replace the state of `p`, returning the previous one.
    pub fn set_state(&mut self, p: Pos, state: CellState) -> Result<CellState, GridError> {
        let i = self.index(p).ok_or(GridError::OutOfBounds { pos: p, rows: self.rows })?;
        Ok(std::mem::replace(&mut self.cells[i].state, state))
    }

    /// Make `p` impassable. Returns the state it replaced.
    pub fn set_barrier(&mut self, p: Pos) -> Result<CellState, GridError> {
        self.set_state(p, CellState::Barrier)
    }

    /// Reset `p` to an open, unvisited cell. Returns the state it replaced so
    /// the caller can drop a start or end role it was tracking.
    pub fn clear(&mut self, p: Pos) -> Result<CellState, GridError> {
        self.set_state(p, CellState::Unvisited)
    }

    /// Tag `p` with a display mark unless it holds a start, end or barrier.
    /// Returns whether the cell changed.
    pub fn mark(&mut self, p: Pos, state: CellState) -> bool {
        let Some(i) = self.index(p) else {
            return false;
        };
        let cell = &mut self.cells[i];
        if cell.state.is_fixed() || cell.state == state {
            return false;
        }
        cell.state = state;
        true
    }

    /// Turn every frontier, closed and path mark back into `Unvisited`.
    pub fn reset_search_marks(&mut self) {
        for cell in self.cells.iter_mut() {
            if cell.state.is_search_mark() {
                cell.state = CellState::Unvisited;
            }
        }
    }

    /// Recompute every cell's neighbour list from current passability.
    ///
    /// Neighbours are listed down, up, right, left; barriers get none.
    pub fn refresh_adjacency(&mut self) {
        let passable: Vec<bool> = self.cells.iter().map(|c| c.state.is_passable()).collect();
        let rows = self.rows;
        for (i, cell) in self.cells.iter_mut().enumerate() {
            cell.neighbors.clear();
            if !passable[i] {
                continue;
            }
            cell.neighbors.extend(
                cell.pos()
                    .cardinal(rows)
                    .filter(|n| passable[n.row * rows + n.col]),
            );
        }
    }

    /// Map a pixel coordinate to the cell under it. `x` runs along columns,
    /// `y` along rows.
    pub fn cell_for_point(&self, x: usize, y: usize) -> Option<Pos> {
        let gap = self.gap();
        if gap == 0 {
            return None;
        }
        let p = Pos::new(y / gap, x / gap);
        self.contains(p).then_some(p)
    }

    /// First cell (row-major) holding `state`.
    pub fn find(&self, state: CellState) -> Option<Pos> {
        self.cells.iter().find(|c| c.state == state).map(Cell::pos)
    }

    /// Row-major iterator over all cells.
    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
