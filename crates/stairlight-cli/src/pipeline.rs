//! Build, simulate and plot.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use stairlight_core::units::format_value;
use stairlight_core::{Netlist, build_staircase};
use stairlight_ngspice::{NgspiceBatch, TransientResult};
use stairlight_plot::{render_svg, staircase_panels, write_panels_csv};

use crate::config::SimulationConfig;

pub const NETLIST_FILE: &str = "staircase.cir";
pub const FIGURE_FILE: &str = "staircase.svg";
pub const CSV_FILE: &str = "waveforms.csv";

/// Files written by a run.
#[derive(Debug, Default)]
pub struct Artifacts {
    pub netlist: PathBuf,
    pub figure: Option<PathBuf>,
    pub csv: Option<PathBuf>,
}

/// Build the staircase circuit and render its deck.
pub fn prepare(config: &SimulationConfig) -> Result<Netlist> {
    let circuit = build_staircase(&config.circuit).context("Failed to build staircase circuit")?;
    Netlist::render(&circuit, &config.transient).context("Failed to render netlist")
}

/// Save the deck into the output directory, creating it if needed.
pub fn save_netlist(config: &SimulationConfig, netlist: &Netlist) -> Result<PathBuf> {
    let dir = &config.output.dir;
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    let path = dir.join(NETLIST_FILE);
    fs::write(&path, netlist.as_str())
        .with_context(|| format!("Failed to write netlist: {}", path.display()))?;
    log::info!("netlist saved to {}", path.display());
    Ok(path)
}

/// Run the deck through ngspice.
pub fn simulate(config: &SimulationConfig, netlist: &Netlist) -> Result<TransientResult> {
    let batch = NgspiceBatch::new(config.ngspice.clone())
        .context("ngspice is required to run the simulation")?;
    let result = batch
        .run_netlist(netlist)
        .context("Transient simulation failed")?;

    if let Some((start, stop)) = result.time_range() {
        log::info!(
            "{} points over {}..{}, {} signals",
            result.len(),
            format_value(start, "s"),
            format_value(stop, "s"),
            result.num_signals()
        );
    }
    Ok(result)
}

/// Draw the four panels and, if asked, export their signals.
pub fn write_outputs(
    config: &SimulationConfig,
    result: &TransientResult,
    artifacts: &mut Artifacts,
) -> Result<()> {
    let panels = staircase_panels(config.circuit.floors);
    let dir = &config.output.dir;

    let figure = dir.join(FIGURE_FILE);
    render_svg(result, &panels, &config.output.chart_options(), &figure)
        .with_context(|| format!("Failed to render {}", figure.display()))?;
    artifacts.figure = Some(figure);

    if config.output.csv {
        let path = dir.join(CSV_FILE);
        let file =
            File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        write_panels_csv(result, &panels, &mut writer)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("waveforms saved to {}", path.display());
        artifacts.csv = Some(path);
    }
    Ok(())
}
