//! Staircase lighting simulator command-line interface.

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser};

mod config;
mod pipeline;

use config::{SimulationConfig, load_config, validate_config};
use stairlight_core::units::parse_value;
use pipeline::Artifacts;

#[derive(Parser)]
#[command(name = "stairlight")]
#[command(about = "Simulate a staircase lighting circuit with ngspice and plot the waveforms", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory [default: output]
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Transient end time, SPICE suffixes allowed (100m, 0.1) [default: 0.1]
    #[arg(long, value_name = "SECONDS", value_parser = parse_seconds)]
    duration: Option<f64>,

    /// Transient step, SPICE suffixes allowed (1m, 500us) [default: 0.001]
    #[arg(long, value_name = "SECONDS", value_parser = parse_seconds)]
    step: Option<f64>,

    /// Circuit and nominal temperature in °C [default: 25]
    #[arg(long, value_name = "CELSIUS", allow_negative_numbers = true)]
    temperature: Option<f64>,

    /// Number of floors [default: 3]
    #[arg(long, value_name = "N")]
    floors: Option<usize>,

    /// ngspice executable [default: ngspice]
    #[arg(long, value_name = "PATH")]
    ngspice: Option<String>,

    /// Engine timeout in seconds [default: 60]
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Print the netlist and exit without simulating
    #[arg(long)]
    netlist_only: bool,

    /// Also write the plotted waveforms as CSV
    #[arg(long)]
    csv: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Layer the command-line flags over `config`.
    fn apply(&self, config: &mut SimulationConfig) {
        if let Some(ref dir) = self.output {
            config.output.dir = dir.clone();
        }
        if let Some(duration) = self.duration {
            config.transient.stop = duration;
        }
        if let Some(step) = self.step {
            config.transient.step = step;
        }
        if let Some(temperature) = self.temperature {
            config.transient.temperature = temperature;
            config.transient.nominal_temperature = temperature;
        }
        if let Some(floors) = self.floors {
            config.circuit.floors = floors;
        }
        if let Some(ref executable) = self.ngspice {
            config.ngspice.executable = executable.clone();
        }
        if let Some(timeout) = self.timeout {
            config.ngspice.timeout_secs = timeout;
        }
        if self.csv {
            config.output.csv = true;
        }
    }
}

/// A time given as `0.1`, `100m` or `100ms`.
fn parse_seconds(text: &str) -> std::result::Result<f64, String> {
    parse_value(text).ok_or_else(|| format!("`{}` is not a time value", text))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .format_timestamp(None)
        .filter_level(level)
        .parse_env(env_logger::Env::default())
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match cli.config {
        Some(ref path) => load_config(path)?,
        None => SimulationConfig::default(),
    };
    cli.apply(&mut config);
    validate_config(&config)?;

    let netlist = pipeline::prepare(&config)?;
    print!("{}", netlist);

    let mut artifacts = Artifacts {
        netlist: pipeline::save_netlist(&config, &netlist)?,
        ..Default::default()
    };
    if cli.netlist_only {
        return Ok(());
    }

    let result = pipeline::simulate(&config, &netlist)?;
    pipeline::write_outputs(&config, &result, &mut artifacts)?;

    println!();
    println!("Netlist:  {}", artifacts.netlist.display());
    if let Some(ref figure) = artifacts.figure {
        println!("Figure:   {}", figure.display());
    }
    if let Some(ref csv) = artifacts.csv {
        println!("Waveforms: {}", csv.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "stairlight",
            "--duration",
            "0.2",
            "--step",
            "0.0005",
            "--temperature",
            "-10",
            "--floors",
            "4",
            "--ngspice",
            "/opt/ngspice/bin/ngspice",
            "--timeout",
            "5",
            "--csv",
            "-o",
            "results",
            "-vv",
        ]);
        let mut config = SimulationConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.transient.stop, 0.2);
        assert_eq!(config.transient.step, 0.0005);
        assert_eq!(config.transient.temperature, -10.0);
        assert_eq!(config.transient.nominal_temperature, -10.0);
        assert_eq!(config.circuit.floors, 4);
        assert_eq!(config.ngspice.executable, "/opt/ngspice/bin/ngspice");
        assert_eq!(config.ngspice.timeout_secs, 5);
        assert!(config.output.csv);
        assert_eq!(config.output.dir, PathBuf::from("results"));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_times_accept_spice_suffixes() {
        let cli = Cli::parse_from(["stairlight", "--duration", "250ms", "--step", "500u"]);
        assert!(cli.duration.is_some_and(|d| (d - 0.25).abs() < 1e-12));
        assert!(cli.step.is_some_and(|s| (s - 5e-4).abs() < 1e-15));
        assert!(Cli::try_parse_from(["stairlight", "--step", "soon"]).is_err());
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli::parse_from(["stairlight", "--netlist-only"]);
        let mut config = SimulationConfig::default();
        config.circuit.floors = 7;
        config.output.csv = true;
        cli.apply(&mut config);

        assert_eq!(config.circuit.floors, 7);
        assert!(config.output.csv);
        assert!(cli.netlist_only);
    }
}
