//! Errors raised while driving ngspice and reading its output.

use thiserror::Error;

use crate::types::AnalysisType;

#[derive(Debug, Error)]
pub enum Error {
    /// The configured executable could not be started or queried.
    #[error("cannot run ngspice `{executable}`: {reason}")]
    EngineUnavailable { executable: String, reason: String },

    /// ngspice ran but produced no usable result. Carries its diagnostics.
    #[error("simulation failed: {0}")]
    SimulationFailed(String),

    #[error("ngspice did not finish within {0} s")]
    Timeout(u64),

    #[error("malformed rawfile: {0}")]
    Rawfile(String),

    #[error("expected a {expected} plot, found {found}")]
    WrongAnalysis {
        expected: AnalysisType,
        found: AnalysisType,
    },

    #[error("signal {name} has {len} samples, time axis has {expected}")]
    LengthMismatch {
        name: String,
        len: usize,
        expected: usize,
    },

    #[error("signal not found: {name} (available: {available})")]
    SignalNotFound { name: String, available: String },

    #[error("cannot render netlist: {0}")]
    Netlist(#[from] stairlight_core::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
