//! The visualization hook: [`StepEvent`], [`StepSink`], [`CancelToken`].

use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;

use gridstar_core::{CellState, Grid, Pos};

/// What a sink returns after each event. `Break` asks the engine to stop at
/// its next cancellation poll.
pub type Flow = ControlFlow<()>;

/// A single observable transition of a search run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepEvent {
    /// The cell entered the frontier.
    OpenedFrontier(Pos),
    /// The cell was expanded. Never reported for the start cell.
    Closed(Pos),
    /// The cell lies strictly between start and end on the found path.
    PathMember(Pos),
}

impl StepEvent {
    #[inline]
    pub fn pos(self) -> Pos {
        match self {
            Self::OpenedFrontier(p) | Self::Closed(p) | Self::PathMember(p) => p,
        }
    }

    /// The display state this event puts its cell in.
    #[inline]
    pub fn state(self) -> CellState {
        match self {
            Self::OpenedFrontier(_) => CellState::Frontier,
            Self::Closed(_) => CellState::Closed,
            Self::PathMember(_) => CellState::Path,
        }
    }

    /// Fold the event into `grid`'s display state. Start, end and barrier
    /// tags are left alone. Returns whether the cell changed.
    pub fn apply_to(self, grid: &mut Grid) -> bool {
        grid.mark(self.pos(), self.state())
    }
}

/// Receiver of step events, called synchronously by the engine.
pub trait StepSink {
    fn on_step(&mut self, event: StepEvent) -> Flow;
}

impl<F> StepSink for F
where
    F: FnMut(StepEvent) -> Flow,
{
    #[inline]
    fn on_step(&mut self, event: StepEvent) -> Flow {
        self(event)
    }
}

/// Publishes events to a channel. A dropped receiver cancels the search.
impl StepSink for Sender<StepEvent> {
    fn on_step(&mut self, event: StepEvent) -> Flow {
        match self.send(event) {
            Ok(()) => Flow::Continue(()),
            Err(_) => Flow::Break(()),
        }
    }
}

/// Records every event in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepLog {
    events: Vec<StepEvent>,
}

impl StepLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[StepEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<StepEvent> {
        self.events
    }

    /// Cells reported by events matching `f`, in emission order.
    pub fn cells(&self, f: impl Fn(&StepEvent) -> bool) -> Vec<Pos> {
        self.events.iter().filter(|e| f(e)).map(|e| e.pos()).collect()
    }

    /// Replay every recorded event onto `grid`.
    pub fn replay(&self, grid: &mut Grid) {
        for e in &self.events {
            e.apply_to(grid);
        }
    }
}

impl StepSink for StepLog {
    fn on_step(&mut self, event: StepEvent) -> Flow {
        self.events.push(event);
        Flow::Continue(())
    }
}

/// A cooperative-cancellation flag that may be tripped from any thread.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    done: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a new, non-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Relaxed);
    }
}
