//! Grid coordinates: [`Pos`].

use std::fmt;

/// A cell coordinate. `row` grows downward, `col` grows rightward.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { row: 0, col: 0 };

    /// Create a new position.
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The in-bounds cardinal neighbours on a `rows × rows` grid, in the
    /// order down, up, right, left.
    pub fn cardinal(self, rows: usize) -> impl Iterator<Item = Pos> {
        let down = (self.row + 1 < rows).then(|| Pos::new(self.row + 1, self.col));
        let up = (self.row > 0).then(|| Pos::new(self.row - 1, self.col));
        let right = (self.col + 1 < rows).then(|| Pos::new(self.row, self.col + 1));
        let left = (self.col > 0).then(|| Pos::new(self.row, self.col - 1));
        [down, up, right, left].into_iter().flatten()
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.row.cmp(&other.row).then(self.col.cmp(&other.col))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Pos {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}
