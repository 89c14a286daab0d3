//! A\* shortest-path search over [`gridstar_core::Grid`] with step events.
//!
//! The engine expands cells in `(f, insertion order)` priority, reports every
//! frontier discovery, closed cell and path member through a [`StepSink`],
//! and stops early when the sink or a [`CancelToken`] asks it to.
//!
//! ```
//! use gridstar_core::{Grid, Pos};
//! use gridstar_search::{search, Flow, Outcome, StepEvent};
//!
//! let mut grid = Grid::build(5, 500);
//! grid.refresh_adjacency();
//! let (start, end) = (Pos::new(0, 0), Pos::new(4, 4));
//! let outcome = search(&grid, start, end, |_: StepEvent| Flow::Continue(())).unwrap();
//! assert_eq!(outcome.path().map(|p| p.moves()), Some(8));
//! assert!(matches!(outcome, Outcome::Found(_)));
//! ```
//!
//! | Piece | Module |
//! |---|---|
//! | Manhattan estimate | [`manhattan`] |
//! | Priority frontier | `frontier` |
//! | Expansion loop | [`SearchEngine`], [`search`] |
//! | Predecessor walk | [`reconstruct`] |
//! | Visualization hook | [`StepEvent`], [`StepSink`] |

mod engine;
mod frontier;
mod heuristic;
mod outcome;
mod reconstruct;
mod step;

pub use engine::{search, SearchEngine};
pub use heuristic::manhattan;
pub use outcome::{EmptyPath, Outcome, Path, Report, SearchError, SearchStats};
pub use reconstruct::{reconstruct, CameFrom};
pub use step::{CancelToken, Flow, StepEvent, StepLog, StepSink};
