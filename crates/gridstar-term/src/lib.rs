//! Terminal front end for *gridstar*: place a start, an end and barriers
//! with the mouse, press space, and watch the A* frontier grow.
//!
//! The crate is split the way a small Elm-style app is: [`input`] turns
//! crossterm events into [`Msg`]s, [`Visualizer`] is the model that reacts
//! to them, [`Screen`] redraws only what changed, and [`run`] ties them to
//! the terminal.

pub mod app;
pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod screen;

pub use app::run;
pub use config::VisualizerConfig;
pub use error::TermError;
pub use input::{Key, MouseAction, Msg};
pub use model::{Effect, Phase, Summary, Visualizer};
pub use screen::Screen;
