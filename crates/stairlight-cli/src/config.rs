//! Simulation configuration loading and validation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use stairlight_core::{StaircaseParams, TransientParams};
use stairlight_ngspice::NgspiceConfig;
use stairlight_plot::ChartOptions;

/// Top-level configuration. Every section may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Circuit values.
    pub circuit: StaircaseParams,

    /// Transient analysis settings.
    pub transient: TransientParams,

    /// External engine.
    pub ngspice: NgspiceConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Where and what to write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,

    /// Also write the plotted waveforms as CSV.
    pub csv: bool,

    /// Figure size in pixels.
    pub width: u32,
    pub height: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        let chart = ChartOptions::default();
        Self {
            dir: PathBuf::from("output"),
            csv: false,
            width: chart.width,
            height: chart.height,
        }
    }
}

impl OutputConfig {
    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            width: self.width,
            height: self.height,
            ..Default::default()
        }
    }
}

/// Load configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<SimulationConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: SimulationConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    validate_config(&config)?;
    Ok(config)
}

/// Check values the circuit builder and renderer would otherwise reject
/// later, so a bad file is reported against the file.
pub fn validate_config(config: &SimulationConfig) -> Result<()> {
    if config.circuit.floors == 0 {
        anyhow::bail!("circuit.floors must be at least 1");
    }
    config
        .transient
        .validate()
        .context("invalid transient settings")?;
    if config.ngspice.timeout_secs == 0 {
        anyhow::bail!("ngspice.timeout_secs must be at least 1");
    }
    if config.output.width == 0 || config.output.height == 0 {
        anyhow::bail!(
            "output figure size must be non-zero, got {}x{}",
            config.output.width,
            config.output.height
        );
    }
    Ok(())
}
