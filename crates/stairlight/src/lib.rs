//! # Stairlight
//!
//! Transient simulation of an AC-to-DC staircase lighting control circuit.
//!
//! The circuit (mains source, two-diode rectifier, filter capacitor and one
//! sensor-driven LED stage per floor) is described in Rust, rendered as a
//! SPICE deck and simulated by an external ngspice process. The resulting
//! waveforms are drawn as four panels.
//!
//! ## Quick Start
//!
//! ```rust
//! use stairlight::prelude::*;
//!
//! let circuit = build_staircase(&StaircaseParams::default()).unwrap();
//! let netlist = Netlist::render(&circuit, &TransientParams::default()).unwrap();
//! assert!(netlist.as_str().contains(".tran 1m 100m"));
//! ```
//!
//! ## Running Simulations
//!
//! ```rust,ignore
//! use stairlight::prelude::*;
//!
//! let params = StaircaseParams::default();
//! let circuit = build_staircase(&params)?;
//! let batch = NgspiceBatch::new(NgspiceConfig::default())?;
//! let result = batch.transient(&circuit, &TransientParams::default())?;
//! render_svg(&result, &staircase_panels(params.floors), &ChartOptions::default(), path)?;
//! ```

pub use stairlight_core as core;
pub use stairlight_ngspice as ngspice;
pub use stairlight_plot as plot;

pub use stairlight_core::{
    Circuit, DeviceModel, Element, Error as CircuitError, ModelKind, Netlist, NodeId, SineSpec,
    StaircaseParams, TransientParams, build_staircase,
};
pub use stairlight_ngspice::{
    Error as EngineError, NgspiceBatch, NgspiceConfig, Simulator, TransientResult,
    is_ngspice_available,
};
pub use stairlight_plot::{
    ChartOptions, Error as PlotError, Panel, render_svg, staircase_panels, write_csv,
};

/// Everything needed to build, simulate and plot the staircase circuit.
pub mod prelude {
    pub use crate::{
        ChartOptions, Circuit, NgspiceBatch, NgspiceConfig, Netlist, NodeId, Panel, Simulator,
        SineSpec, StaircaseParams, TransientParams, TransientResult, build_staircase, render_svg,
        staircase_panels,
    };
}
