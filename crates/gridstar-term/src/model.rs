//! The visualizer state machine: [`Visualizer`], [`Phase`], [`Effect`].
//!
//! All editing state lives here and is driven by [`Msg`]s; the run loop in
//! [`crate::app`] owns the terminal and performs the [`Effect`]s this model
//! asks for.

use gridstar_core::{CellState, Grid, Pos};
use gridstar_search::{Outcome, Report, StepEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::VisualizerConfig;
use crate::input::{Key, MouseAction, Msg};

/// How the last search ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Summary {
    Found { moves: usize, expanded: usize },
    NotFound { expanded: usize },
    Cancelled,
}

impl Summary {
    fn from_report(report: &Report) -> Self {
        let expanded = report.stats.expanded;
        match &report.outcome {
            Outcome::Found(path) => Self::Found {
                moves: path.moves(),
                expanded,
            },
            Outcome::NotFound => Self::NotFound { expanded },
            Outcome::Cancelled => Self::Cancelled,
        }
    }
}

/// Where the session is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    PlacingStart,
    PlacingEnd,
    PlacingBarriers,
    Searching,
    Done(Summary),
}

/// Work the run loop must do on the model's behalf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Start a search; call [`Visualizer::begin_search`].
    Search,
    /// Repaint everything.
    Redraw,
    Quit,
}

/// Editing and display state of one session.
pub struct Visualizer {
    config: VisualizerConfig,
    grid: Grid,
    start: Option<Pos>,
    end: Option<Pos>,
    phase: Phase,
    rng: StdRng,
}

impl Visualizer {
    pub fn new(config: VisualizerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            grid: Self::fresh_grid(&config),
            config,
            start: None,
            end: None,
            phase: Phase::PlacingStart,
            rng,
        }
    }

    /// One pixel per cell vertically; columns are scaled in
    /// [`screen_to_cell`](Self::screen_to_cell).
    fn fresh_grid(config: &VisualizerConfig) -> Grid {
        Grid::build(config.rows, config.rows)
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn start(&self) -> Option<Pos> {
        self.start
    }

    pub fn end(&self) -> Option<Pos> {
        self.end
    }

    /// Cell under terminal `(column, row)`.
    pub fn screen_to_cell(&self, column: u16, row: u16) -> Option<Pos> {
        let x = column as usize / self.config.cell_width;
        self.grid.cell_for_point(x, row as usize)
    }

    /// Process a message, optionally returning an effect.
    pub fn update(&mut self, msg: Msg) -> Option<Effect> {
        if self.phase == Phase::Searching {
            // The run loop polls input itself while a search is running.
            return None;
        }
        match msg {
            Msg::Quit | Msg::KeyDown(Key::Escape) | Msg::KeyDown(Key::Char('q')) => {
                Some(Effect::Quit)
            }
            Msg::Resize => Some(Effect::Redraw),
            Msg::KeyDown(Key::Space) | Msg::KeyDown(Key::Enter) => {
                (self.start.is_some() && self.end.is_some()).then_some(Effect::Search)
            }
            Msg::KeyDown(Key::Char('c')) => {
                self.reset();
                None
            }
            Msg::KeyDown(Key::Char('r')) => {
                self.scatter_barriers();
                None
            }
            Msg::KeyDown(_) => None,
            Msg::Mouse { action, column, row } => {
                let pos = self.screen_to_cell(column, row)?;
                match action {
                    MouseAction::Main => self.place(pos),
                    MouseAction::Secondary => self.erase(pos),
                }
                None
            }
        }
    }

    /// Left click: start first, then end, then barriers. Never overwrites
    /// the start or end cell.
    pub fn place(&mut self, pos: Pos) {
        if Some(pos) == self.start || Some(pos) == self.end {
            return;
        }
        if self.start.is_none() {
            self.start = Some(pos);
            self.set(pos, CellState::Start);
        } else if self.end.is_none() {
            self.end = Some(pos);
            self.set(pos, CellState::End);
        } else {
            self.set(pos, CellState::Barrier);
        }
        self.phase = self.editing_phase();
    }

    /// Right click: open the cell again, dropping a start or end role.
    pub fn erase(&mut self, pos: Pos) {
        match self.grid.clear(pos) {
            Ok(CellState::Start) => self.start = None,
            Ok(CellState::End) => self.end = None,
            Ok(_) => {}
            Err(e) => log::warn!("erase: {e}"),
        }
        self.phase = self.editing_phase();
    }

    /// Throw the grid away and start over.
    pub fn reset(&mut self) {
        self.grid = Self::fresh_grid(&self.config);
        self.start = None;
        self.end = None;
        self.phase = Phase::PlacingStart;
    }

    /// Turn a random share of unvisited cells into barriers.
    pub fn scatter_barriers(&mut self) {
        let density = self.config.scatter_probability();
        let open: Vec<Pos> = self
            .grid
            .iter()
            .filter(|c| c.state() == CellState::Unvisited)
            .map(|c| c.pos())
            .collect();
        let mut placed = 0;
        for pos in open {
            if self.rng.random_bool(density) {
                self.set(pos, CellState::Barrier);
                placed += 1;
            }
        }
        log::debug!("scattered {placed} barriers");
        self.phase = self.editing_phase();
    }

    /// Clear old marks, rebuild adjacency and hand back a snapshot to search
    /// with the endpoints. `None` unless both endpoints are placed.
    pub fn begin_search(&mut self) -> Option<(Grid, Pos, Pos)> {
        let (start, end) = (self.start?, self.end?);
        self.grid.reset_search_marks();
        self.grid.refresh_adjacency();
        self.phase = Phase::Searching;
        Some((self.grid.clone(), start, end))
    }

    /// Fold one step of the running search into the displayed grid.
    pub fn apply_step(&mut self, event: StepEvent) -> bool {
        event.apply_to(&mut self.grid)
    }

    /// Record how the search ended.
    pub fn finish(&mut self, report: &Report) {
        self.phase = Phase::Done(Summary::from_report(report));
    }

    /// Leave the searching phase without a result (the search failed to
    /// start).
    pub fn abort_search(&mut self) {
        self.phase = self.editing_phase();
    }

    /// One-line description of the phase for the status bar.
    pub fn status(&self) -> String {
        match self.phase {
            Phase::PlacingStart => "click to place the start".to_string(),
            Phase::PlacingEnd => "click to place the end".to_string(),
            Phase::PlacingBarriers => {
                "click: barrier  right click: clear  space: search  r: scatter  c: reset  q: quit"
                    .to_string()
            }
            Phase::Searching => "searching... q to cancel".to_string(),
            Phase::Done(Summary::Found { moves, expanded }) => {
                format!("path of {moves} moves, {expanded} cells expanded  c: reset  q: quit")
            }
            Phase::Done(Summary::NotFound { expanded }) => {
                format!("no path, {expanded} cells expanded  c: reset  q: quit")
            }
            Phase::Done(Summary::Cancelled) => "search cancelled".to_string(),
        }
    }

    fn set(&mut self, pos: Pos, state: CellState) {
        if let Err(e) = self.grid.set_state(pos, state) {
            log::warn!("set {pos}: {e}");
        }
    }

    fn editing_phase(&self) -> Phase {
        match (self.start, self.end) {
            (None, _) => Phase::PlacingStart,
            (Some(_), None) => Phase::PlacingEnd,
            (Some(_), Some(_)) => Phase::PlacingBarriers,
        }
    }
}
