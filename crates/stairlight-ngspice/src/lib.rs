//! ngspice integration.
//!
//! The circuit is simulated by an external ngspice process in batch mode.
//! This crate writes the netlist to a temporary file, runs ngspice with a
//! timeout, parses the rawfile it produces and exposes the transient
//! waveforms keyed by signal name.

pub mod error;
pub mod rawfile;
pub mod result;
pub mod runner;
pub mod simulator;
pub mod types;

pub use error::{Error, Result};
pub use rawfile::parse_rawfile;
pub use result::TransientResult;
pub use runner::{NgspiceConfig, is_ngspice_available, ngspice_version, run_ngspice};
pub use simulator::{NgspiceBatch, Simulator};
pub use types::{AnalysisType, Encoding, RawVariable, RawfileData, RawfileHeader, VariableKind};
