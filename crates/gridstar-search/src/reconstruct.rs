//! Walking predecessor links back from the end cell.

use gridstar_core::Pos;

use crate::outcome::Path;

/// Predecessor map of one search run, indexed like the grid it covers.
#[derive(Clone, Debug)]
pub struct CameFrom {
    rows: usize,
    links: Vec<Option<Pos>>,
}

impl CameFrom {
    /// An empty map for a `rows × rows` grid.
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            links: vec![None; rows * rows],
        }
    }

    #[inline]
    fn idx(&self, p: Pos) -> Option<usize> {
        (p.row < self.rows && p.col < self.rows).then(|| p.row * self.rows + p.col)
    }

    /// Record `from` as the predecessor of `p` on the best known path.
    pub fn set(&mut self, p: Pos, from: Pos) {
        if let Some(i) = self.idx(p) {
            self.links[i] = Some(from);
        }
    }

    pub fn get(&self, p: Pos) -> Option<Pos> {
        self.idx(p).and_then(|i| self.links[i])
    }
}

/// Follow predecessors from `end` until a cell without one (the start) and
/// return the path in start-to-end order.
///
/// Links form a tree rooted at the start, so the walk ends; it also stops
/// after visiting every cell once in case the map was built by hand with a
/// cycle.
pub fn reconstruct(came_from: &CameFrom, end: Pos) -> Path {
    let mut cells = vec![end];
    let mut current = end;
    while let Some(prev) = came_from.get(current) {
        if cells.len() > came_from.links.len() {
            log::warn!("predecessor chain from {end} exceeds grid size, truncating");
            break;
        }
        cells.push(prev);
        current = prev;
    }
    cells.reverse();
    Path::from_walk(cells)
}
