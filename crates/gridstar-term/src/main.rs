//! Interactive A* visualizer.
//!
//! Run: cargo run --bin gridstar
//! Environment: GRIDSTAR_ROWS, GRIDSTAR_STEP_MS, GRIDSTAR_SEED.

use gridstar_term::VisualizerConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = VisualizerConfig::from_env();
    gridstar_term::run(config)?;
    Ok(())
}
