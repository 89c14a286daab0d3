//! **gridstar-core**: the square grid model searched by *gridstar*.
//!
//! This crate provides the foundational types shared by the search engine
//! and its visualizers: cell coordinates, per-cell display states, and a
//! fixed-size grid that caches 4-directional adjacency.

pub mod cell;
pub mod error;
pub mod geom;
pub mod grid;

pub use cell::{Cell, CellState};
pub use error::GridError;
pub use geom::Pos;
pub use grid::Grid;
