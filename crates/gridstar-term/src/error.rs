use thiserror::Error;

/// Failures of the terminal front end.
#[derive(Debug, Error)]
pub enum TermError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("grid of {rows} rows needs a {need_cols}x{need_rows} terminal, found {cols}x{term_rows}")]
    TooSmall {
        rows: usize,
        need_cols: u16,
        need_rows: u16,
        cols: u16,
        term_rows: u16,
    },
}
