use gridstar_core::Pos;
use thiserror::Error;

/// Endpoint violations detected before a search starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("start {0} is outside the grid or on a barrier")]
    InvalidStart(Pos),
    #[error("end {0} is outside the grid or on a barrier")]
    InvalidEnd(Pos),
}

/// Rejected attempt to build a [`Path`] without cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a path holds at least its start cell")]
pub struct EmptyPath;

/// An ordered path of cells from start to end, both included. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Pos>", into = "Vec<Pos>"))]
pub struct Path {
    cells: Vec<Pos>,
}

impl Path {
    /// Build a path from cells ordered start to end, or `None` if `cells` is
    /// empty.
    pub fn new(cells: Vec<Pos>) -> Option<Self> {
        if cells.is_empty() {
            return None;
        }
        Some(Self { cells })
    }

    /// Callers guarantee `cells` is non-empty.
    pub(crate) fn from_walk(cells: Vec<Pos>) -> Self {
        debug_assert!(!cells.is_empty());
        Self { cells }
    }

    /// The zero-move path of a search whose start is its end.
    pub fn single(p: Pos) -> Self {
        Self { cells: vec![p] }
    }

    pub fn cells(&self) -> &[Pos] {
        &self.cells
    }

    pub fn start(&self) -> Pos {
        self.cells[0]
    }

    pub fn end(&self) -> Pos {
        self.cells[self.cells.len() - 1]
    }

    /// Number of moves, one less than the number of cells.
    pub fn moves(&self) -> usize {
        self.cells.len() - 1
    }

    /// Cells strictly between start and end.
    pub fn intermediate(&self) -> &[Pos] {
        match self.cells.len() {
            0..=2 => &[],
            n => &self.cells[1..n - 1],
        }
    }

    pub fn contains(&self, p: Pos) -> bool {
        self.cells.contains(&p)
    }

    pub fn into_vec(self) -> Vec<Pos> {
        self.cells
    }
}

impl TryFrom<Vec<Pos>> for Path {
    type Error = EmptyPath;

    fn try_from(cells: Vec<Pos>) -> Result<Self, EmptyPath> {
        Self::new(cells).ok_or(EmptyPath)
    }
}

impl From<Path> for Vec<Pos> {
    fn from(path: Path) -> Self {
        path.cells
    }
}

/// How a search run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Found(Path),
    /// The frontier emptied before reaching the end.
    NotFound,
    /// The sink or the cancel token stopped the run.
    Cancelled,
}

impl Outcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Found(path) => Some(path),
            _ => None,
        }
    }

    pub fn into_path(self) -> Option<Path> {
        match self {
            Self::Found(path) => Some(path),
            _ => None,
        }
    }
}

/// Counters collected during one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Cells popped and expanded (the end cell's terminal pop excluded).
    pub expanded: usize,
    /// Frontier insertions, the start cell included.
    pub pushed: usize,
    /// Key decreases of cells already in the frontier.
    pub rekeyed: usize,
}

/// An [`Outcome`] with the [`SearchStats`] of the run that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub outcome: Outcome,
    pub stats: SearchStats,
}
