//! Visualizer settings: [`VisualizerConfig`].

use std::time::Duration;

const DEFAULT_BARRIER_DENSITY: f64 = 0.25;

/// Settings for a visualizer session.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualizerConfig {
    /// Grid rows (and columns).
    pub rows: usize,
    /// Terminal columns used to draw one cell.
    pub cell_width: usize,
    /// Pause after each drawn search step.
    pub step_delay: Duration,
    /// Chance that `r` turns an unvisited cell into a barrier.
    pub barrier_density: f64,
    /// Seed for barrier scatter; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            cell_width: 2,
            step_delay: Duration::from_millis(8),
            barrier_density: DEFAULT_BARRIER_DENSITY,
            seed: None,
        }
    }
}

impl VisualizerConfig {
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows.max(1);
        self
    }

    pub fn with_cell_width(mut self, cell_width: usize) -> Self {
        self.cell_width = cell_width.max(1);
        self
    }

    pub fn with_step_delay(mut self, step_delay: Duration) -> Self {
        self.step_delay = step_delay;
        self
    }

    pub fn with_barrier_density(mut self, density: f64) -> Self {
        self.barrier_density = probability(density);
        self
    }

    /// [`barrier_density`](Self::barrier_density) as a valid probability,
    /// even if the field was set directly.
    pub fn scatter_probability(&self) -> f64 {
        probability(self.barrier_density)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Defaults overridden by `GRIDSTAR_ROWS`, `GRIDSTAR_STEP_MS` and
    /// `GRIDSTAR_SEED`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the
    /// `GRIDSTAR_*` keys. Unparsable values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(rows) = parse(&lookup, "GRIDSTAR_ROWS") {
            config = config.with_rows(rows);
        }
        if let Some(ms) = parse(&lookup, "GRIDSTAR_STEP_MS") {
            config = config.with_step_delay(Duration::from_millis(ms));
        }
        if let Some(seed) = parse(&lookup, "GRIDSTAR_SEED") {
            config = config.with_seed(seed);
        }
        config
    }
}

/// NaN falls back to the default density.
fn probability(density: f64) -> f64 {
    if density.is_nan() {
        DEFAULT_BARRIER_DENSITY
    } else {
        density.clamp(0.0, 1.0)
    }
}

fn parse<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("ignoring {key}={raw:?}: not a valid number");
            None
        }
    }
}
