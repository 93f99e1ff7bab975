//! Error types for chart rendering.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A panel references a signal the simulation did not produce.
    #[error(transparent)]
    Signal(#[from] stairlight_ngspice::Error),

    #[error("nothing to plot: {0}")]
    Empty(String),

    #[error("drawing error: {0}")]
    Drawing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
