//! Device model cards (`.model name kind (PARAM=value ...)`).

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::units::spice_literal;

/// Device family a `.model` card describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ModelKind {
    /// Junction diode (`D`).
    #[serde(rename = "D")]
    Diode,
    /// NPN bipolar transistor.
    Npn,
    /// PNP bipolar transistor.
    Pnp,
}

impl ModelKind {
    /// SPICE keyword for this kind.
    pub fn keyword(self) -> &'static str {
        match self {
            ModelKind::Diode => "D",
            ModelKind::Npn => "NPN",
            ModelKind::Pnp => "PNP",
        }
    }

    /// True for either bipolar polarity.
    pub fn is_bjt(self) -> bool {
        matches!(self, ModelKind::Npn | ModelKind::Pnp)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A named device model with ordered parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceModel {
    pub name: String,
    pub kind: ModelKind,
    /// Parameters in declaration order, keyed by upper-case SPICE name.
    pub params: IndexMap<String, f64>,
}

impl DeviceModel {
    pub fn new(name: impl Into<String>, kind: ModelKind) -> Self {
        Self {
            name: name.into(),
            kind,
            params: IndexMap::new(),
        }
    }

    /// Builder-style parameter setter.
    pub fn param(mut self, name: &str, value: f64) -> Self {
        self.params.insert(name.to_ascii_uppercase(), value);
        self
    }

    /// Look up a parameter by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<f64> {
        self.params.get(&name.to_ascii_uppercase()).copied()
    }

    /// Render the `.model` card.
    pub fn card(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", k, spice_literal(*v)))
            .collect::<Vec<_>>()
            .join(" ");
        if params.is_empty() {
            format!(".model {} {}", self.name, self.kind)
        } else {
            format!(".model {} {} ({})", self.name, self.kind, params)
        }
    }
}

/// Diode model parameters. Optional fields are left to the engine's defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiodeParams {
    /// Saturation current (A).
    pub is: f64,
    /// Emission coefficient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<f64>,
    /// Series resistance (ohms).
    pub rs: f64,
    /// Reverse breakdown voltage (V).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bv: Option<f64>,
}

impl DiodeParams {
    pub fn into_model(self, name: impl Into<String>) -> DeviceModel {
        let mut model = DeviceModel::new(name, ModelKind::Diode).param("IS", self.is);
        if let Some(n) = self.n {
            model = model.param("N", n);
        }
        model = model.param("RS", self.rs);
        if let Some(bv) = self.bv {
            model = model.param("BV", bv);
        }
        model
    }
}

/// Bipolar transistor model parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BjtParams {
    /// Saturation current (A).
    pub is: f64,
    /// Forward current gain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bf: Option<f64>,
    /// Forward Early voltage (V).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vaf: Option<f64>,
}

impl BjtParams {
    pub fn into_model(self, name: impl Into<String>, kind: ModelKind) -> DeviceModel {
        let mut model = DeviceModel::new(name, kind).param("IS", self.is);
        if let Some(bf) = self.bf {
            model = model.param("BF", bf);
        }
        if let Some(vaf) = self.vaf {
            model = model.param("VAF", vaf);
        }
        model
    }
}
