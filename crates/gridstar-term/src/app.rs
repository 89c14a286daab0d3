//! The terminal run loop: poll → update → draw, with searches drawn step by
//! step.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use gridstar_core::Grid;
use gridstar_search::{Flow, SearchEngine, StepEvent};

use crate::config::VisualizerConfig;
use crate::error::TermError;
use crate::input::{self, Key, Msg};
use crate::model::{Effect, Visualizer};
use crate::screen::Screen;

const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Raw mode, alternate screen and mouse capture for as long as it lives.
struct TerminalGuard;

impl TerminalGuard {
    fn enter(out: &mut Stdout) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All),
            EnableMouseCapture
        )?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        let _ = execute!(out, DisableMouseCapture, cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Whether `msg` should stop the session (or the running search).
fn is_quit(msg: Msg) -> bool {
    matches!(
        msg,
        Msg::Quit | Msg::KeyDown(Key::Escape) | Msg::KeyDown(Key::Char('q'))
    )
}

/// Terminal size a grid of `config.rows` needs, status line included.
fn required_size(config: &VisualizerConfig) -> (u16, u16) {
    let cols = (config.rows * config.cell_width).min(u16::MAX as usize) as u16;
    let rows = (config.rows + 1).min(u16::MAX as usize) as u16;
    (cols, rows)
}

/// Run an interactive session until the user quits.
pub fn run(config: VisualizerConfig) -> Result<(), TermError> {
    let (need_cols, need_rows) = required_size(&config);
    let (cols, term_rows) = terminal::size()?;
    if cols < need_cols || term_rows < need_rows {
        return Err(TermError::TooSmall {
            rows: config.rows,
            need_cols,
            need_rows,
            cols,
            term_rows,
        });
    }

    let mut out = io::stdout();
    let _guard = TerminalGuard::enter(&mut out)?;
    log::debug!("session started with {config:?}");

    let mut model = Visualizer::new(config);
    let mut screen = Screen::new(model.config().cell_width);
    screen.draw(&mut out, model.grid(), &model.status())?;

    'session: loop {
        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        while event::poll(Duration::ZERO)? {
            let Some(msg) = input::to_msg(event::read()?) else {
                continue;
            };
            match model.update(msg) {
                Some(Effect::Quit) => break 'session,
                Some(Effect::Redraw) => screen.invalidate(),
                Some(Effect::Search) => {
                    if run_search(&mut model, &mut screen, &mut out)? {
                        break 'session;
                    }
                }
                None => {}
            }
        }
        screen.draw(&mut out, model.grid(), &model.status())?;
    }

    log::debug!("session ended");
    Ok(())
}

/// Run one search, drawing every step. Returns `true` if the user asked to
/// quit while it ran.
fn run_search(
    model: &mut Visualizer,
    screen: &mut Screen,
    out: &mut impl Write,
) -> Result<bool, TermError> {
    let Some((snapshot, start, end)) = model.begin_search() else {
        return Ok(false);
    };
    let delay = model.config().step_delay;
    let status = model.status();
    let mut quit = false;
    let mut failure = None;

    let mut sink = |event: StepEvent| {
        model.apply_step(event);
        match pace(screen, out, model.grid(), &status, delay) {
            Ok(false) => Flow::Continue(()),
            Ok(true) => {
                quit = true;
                Flow::Break(())
            }
            Err(e) => {
                failure = Some(e);
                Flow::Break(())
            }
        }
    };
    let result = SearchEngine::new().run(&snapshot, start, end, &mut sink);

    match result {
        Ok(report) => model.finish(&report),
        Err(e) => {
            log::warn!("search not started: {e}");
            model.abort_search();
        }
    }
    if let Some(e) = failure {
        return Err(e);
    }
    screen.draw(out, model.grid(), &model.status())?;
    Ok(quit)
}

/// Draw the current state, then wait out the step delay while watching for
/// a quit key.
fn pace(
    screen: &mut Screen,
    out: &mut impl Write,
    grid: &Grid,
    status: &str,
    delay: Duration,
) -> Result<bool, TermError> {
    screen.draw(out, grid, status)?;
    if !event::poll(delay)? {
        return Ok(false);
    }
    while event::poll(Duration::ZERO)? {
        if input::to_msg(event::read()?).is_some_and(is_quit) {
            return Ok(true);
        }
    }
    Ok(false)
}
