//! Diff-based drawing of a [`Grid`] plus a status line.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use gridstar_core::{CellState, Grid};

/// Background colour of each state.
pub fn color(state: CellState) -> Color {
    match state {
        CellState::Unvisited => Color::Rgb { r: 255, g: 255, b: 255 },
        CellState::Frontier => Color::Rgb { r: 0, g: 255, b: 0 },
        CellState::Closed => Color::Rgb { r: 255, g: 0, b: 0 },
        CellState::Start => Color::Rgb { r: 255, g: 165, b: 0 },
        CellState::End => Color::Rgb { r: 64, g: 224, b: 208 },
        CellState::Path => Color::Rgb { r: 128, g: 0, b: 128 },
        CellState::Barrier => Color::Rgb { r: 0, g: 0, b: 0 },
    }
}

/// Remembers what is on the terminal so only changed cells are rewritten.
pub struct Screen {
    cell_width: usize,
    shown: Vec<Option<CellState>>,
    status: Option<String>,
}

impl Screen {
    pub fn new(cell_width: usize) -> Self {
        Self {
            cell_width: cell_width.max(1),
            shown: Vec::new(),
            status: None,
        }
    }

    /// Forget the terminal contents; the next draw repaints everything.
    pub fn invalidate(&mut self) {
        self.shown.clear();
        self.status = None;
    }

    /// Queue every changed cell and the status line (below the grid) on
    /// `out`, then flush. Returns the number of cells written.
    pub fn draw(&mut self, out: &mut impl Write, grid: &Grid, status: &str) -> io::Result<usize> {
        if self.shown.len() != grid.len() {
            self.shown = vec![None; grid.len()];
            self.status = None;
            queue!(out, ResetColor, terminal::Clear(ClearType::All))?;
        }

        let blank = " ".repeat(self.cell_width);
        let mut written = 0;
        for (i, cell) in grid.iter().enumerate() {
            let state = cell.state();
            if self.shown[i] == Some(state) {
                continue;
            }
            let p = cell.pos();
            queue!(
                out,
                cursor::MoveTo((p.col * self.cell_width) as u16, p.row as u16),
                SetBackgroundColor(color(state)),
                Print(&blank)
            )?;
            self.shown[i] = Some(state);
            written += 1;
        }

        if self.status.as_deref() != Some(status) {
            queue!(
                out,
                ResetColor,
                cursor::MoveTo(0, grid.rows() as u16),
                terminal::Clear(ClearType::CurrentLine),
                SetForegroundColor(Color::Grey),
                Print(status),
                ResetColor
            )?;
            self.status = Some(status.to_string());
        } else if written > 0 {
            queue!(out, ResetColor)?;
        }

        out.flush()?;
        Ok(written)
    }
}
