//! Rendering of simulated waveforms.
//!
//! The staircase simulation is shown as four fixed panels (mains input,
//! rectified rail, LED nodes, sensor nodes) laid out in a 2×2 grid and
//! written as SVG. The same signals can be exported as CSV.

pub mod chart;
pub mod error;
pub mod export;
pub mod panel;

pub use chart::{ChartOptions, render_svg, render_svg_string};
pub use error::{Error, Result};
pub use export::{write_csv, write_panels_csv};
pub use panel::{FIGURE_TITLE, Panel, Series, staircase_panels};
