//! Simulation backends.

use stairlight_core::{Circuit, Netlist, TransientParams};

use crate::error::{Error, Result};
use crate::result::TransientResult;
use crate::runner::{NgspiceConfig, ngspice_version, run_ngspice};

/// Abstract backend for running transient simulations.
pub trait Simulator {
    /// Simulate `circuit` over the interval described by `params`.
    fn transient(&self, circuit: &Circuit, params: &TransientParams) -> Result<TransientResult>;
}

/// Runs ngspice in batch mode and reads its rawfile.
#[derive(Debug, Clone)]
pub struct NgspiceBatch {
    config: NgspiceConfig,
    version: String,
}

impl NgspiceBatch {
    /// Probe the configured executable and fail early if it is missing.
    pub fn new(config: NgspiceConfig) -> Result<Self> {
        let version = ngspice_version(&config)?;
        log::info!("using {} ({})", config.executable, version);
        Ok(Self { config, version })
    }

    pub fn config(&self) -> &NgspiceConfig {
        &self.config
    }

    /// First line of `ngspice --version`.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Simulate an already rendered netlist.
    pub fn run_netlist(&self, netlist: &Netlist) -> Result<TransientResult> {
        let raw = run_ngspice(netlist.as_str(), &self.config)?;
        let result = TransientResult::from_rawfile(&raw)?;
        if result.is_empty() {
            return Err(Error::SimulationFailed(
                "transient analysis produced no points".to_string(),
            ));
        }
        Ok(result)
    }
}

impl Simulator for NgspiceBatch {
    fn transient(&self, circuit: &Circuit, params: &TransientParams) -> Result<TransientResult> {
        let netlist = Netlist::render(circuit, params)?;
        self.run_netlist(&netlist)
    }
}
