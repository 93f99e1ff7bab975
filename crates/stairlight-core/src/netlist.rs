//! Netlist: a circuit plus its analysis, rendered as SPICE text.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::error::{Error, Result};
use crate::units::spice_literal;

/// Transient analysis settings (`.tran` plus simulation temperatures).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransientParams {
    /// Print/step interval (s).
    pub step: f64,
    /// End time (s).
    pub stop: f64,
    /// Time before which no output is kept (s).
    pub start: f64,
    /// Upper bound on the engine's internal timestep (s).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_step: Option<f64>,
    /// Circuit temperature (°C).
    pub temperature: f64,
    /// Temperature at which model parameters were measured (°C).
    pub nominal_temperature: f64,
}

impl Default for TransientParams {
    fn default() -> Self {
        Self {
            step: 1e-3,
            stop: 0.1,
            start: 0.0,
            max_step: None,
            temperature: 25.0,
            nominal_temperature: 25.0,
        }
    }
}

impl TransientParams {
    /// Settings with the given step and end time and default temperatures.
    pub fn new(step: f64, stop: f64) -> Self {
        Self {
            step,
            stop,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        let bad = |name: &str, reason: String| Error::InvalidValue {
            name: format!("transient {}", name),
            reason,
        };
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(bad("step", format!("must be positive, got {}", self.step)));
        }
        if !(self.start.is_finite() && self.start >= 0.0) {
            return Err(bad("start", format!("must be non-negative, got {}", self.start)));
        }
        if !(self.stop.is_finite() && self.stop > self.start) {
            return Err(bad(
                "stop",
                format!("must be after start ({}), got {}", self.start, self.stop),
            ));
        }
        if self.step > self.stop - self.start {
            return Err(bad(
                "step",
                format!("{} is longer than the simulated interval", self.step),
            ));
        }
        if let Some(max_step) = self.max_step {
            if !(max_step.is_finite() && max_step > 0.0) {
                return Err(bad("max_step", format!("must be positive, got {}", max_step)));
            }
        }
        if !self.temperature.is_finite() || !self.nominal_temperature.is_finite() {
            return Err(bad("temperature", "must be finite".to_string()));
        }
        Ok(())
    }

    /// The `.tran` card.
    pub fn tran_card(&self) -> String {
        let mut card = format!(".tran {} {}", spice_literal(self.step), spice_literal(self.stop));
        if self.start > 0.0 || self.max_step.is_some() {
            card.push(' ');
            card.push_str(&spice_literal(self.start));
        }
        if let Some(max_step) = self.max_step {
            card.push(' ');
            card.push_str(&spice_literal(max_step));
        }
        card
    }

    /// The `.options` card carrying the temperatures.
    pub fn options_card(&self) -> String {
        format!(
            ".options TEMP={} TNOM={}",
            spice_literal(self.temperature),
            spice_literal(self.nominal_temperature)
        )
    }
}

/// A complete SPICE deck ready for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Netlist {
    text: String,
}

impl Netlist {
    /// Validate the circuit and analysis, then render the deck.
    ///
    /// Layout: title, element cards, model cards, options, `.tran`, `.end`.
    pub fn render(circuit: &Circuit, params: &TransientParams) -> Result<Self> {
        circuit.validate()?;
        params.validate()?;

        let mut lines = Vec::with_capacity(circuit.num_elements() + 8);
        lines.push(circuit.title().unwrap_or("untitled circuit").to_string());
        for element in circuit.elements() {
            lines.push(element.card(|id| circuit.node_name(id)));
        }
        for model in circuit.models() {
            lines.push(model.card());
        }
        lines.push(params.options_card());
        lines.push(params.tran_card());
        lines.push(".end".to_string());

        let mut text = lines.join("\n");
        text.push('\n');
        log::debug!("rendered netlist with {} lines", lines.len());
        Ok(Self { text })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> std::str::Lines<'_> {
        self.text.lines()
    }
}

impl fmt::Display for Netlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
