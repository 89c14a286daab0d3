use thiserror::Error;

use crate::geom::Pos;

/// Errors raised by grid edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell {pos} is outside a {rows}x{rows} grid")]
    OutOfBounds { pos: Pos, rows: usize },
}
