//! Circuit description for the staircase lighting simulator.
//!
//! This crate holds everything that happens before the external engine is
//! invoked: named nodes, circuit elements, device model cards, SPICE value
//! formatting, netlist rendering and the fixed staircase lighting circuit.

pub mod circuit;
pub mod element;
pub mod error;
pub mod model;
pub mod netlist;
pub mod node;
pub mod staircase;
pub mod units;

pub use circuit::Circuit;
pub use element::{Element, SineSpec};
pub use error::{Error, Result};
pub use model::{DeviceModel, ModelKind};
pub use netlist::{Netlist, TransientParams};
pub use node::{Node, NodeId};
pub use staircase::{StaircaseParams, build_staircase};
