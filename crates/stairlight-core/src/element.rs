//! Circuit elements and their SPICE cards.

use serde::{Deserialize, Serialize};

use crate::node::NodeId;
use crate::units::spice_literal;

/// Parameters of a `SIN(...)` transient source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SineSpec {
    /// DC offset (V).
    pub offset: f64,
    /// Peak amplitude (V).
    pub amplitude: f64,
    /// Frequency (Hz).
    pub frequency: f64,
    /// Delay before the sinusoid starts (s).
    pub delay: f64,
    /// Damping factor (1/s).
    pub damping: f64,
    /// Phase (degrees).
    pub phase: f64,
}

impl SineSpec {
    /// Undamped, zero-offset sine.
    pub fn new(amplitude: f64, frequency: f64) -> Self {
        Self {
            amplitude,
            frequency,
            ..Default::default()
        }
    }

    /// Instantaneous value at time `t`, as the engine evaluates it.
    pub fn value_at(&self, t: f64) -> f64 {
        if t < self.delay {
            return self.offset + self.amplitude * self.phase.to_radians().sin();
        }
        let dt = t - self.delay;
        let arg = 2.0 * std::f64::consts::PI * self.frequency * dt + self.phase.to_radians();
        self.offset + self.amplitude * (-dt * self.damping).exp() * arg.sin()
    }
}

impl Default for SineSpec {
    fn default() -> Self {
        Self {
            offset: 0.0,
            amplitude: 1.0,
            frequency: 50.0,
            delay: 0.0,
            damping: 0.0,
            phase: 0.0,
        }
    }
}

/// A circuit element.
///
/// `name` is the user-facing name without the SPICE kind letter; the card
/// name prepends it (`D` + `LED1` renders as `DLED1`).
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Element {
    /// Independent sinusoidal voltage source.
    SinVoltageSource {
        name: String,
        pos: NodeId,
        neg: NodeId,
        sine: SineSpec,
    },
    Resistor {
        name: String,
        a: NodeId,
        b: NodeId,
        ohms: f64,
    },
    Capacitor {
        name: String,
        a: NodeId,
        b: NodeId,
        farads: f64,
    },
    Diode {
        name: String,
        anode: NodeId,
        cathode: NodeId,
        model: String,
    },
    /// Bipolar junction transistor.
    Bjt {
        name: String,
        collector: NodeId,
        base: NodeId,
        emitter: NodeId,
        model: String,
    },
}

impl Element {
    /// User-facing element name.
    pub fn name(&self) -> &str {
        match self {
            Element::SinVoltageSource { name, .. }
            | Element::Resistor { name, .. }
            | Element::Capacitor { name, .. }
            | Element::Diode { name, .. }
            | Element::Bjt { name, .. } => name,
        }
    }

    /// SPICE kind letter.
    pub fn prefix(&self) -> char {
        match self {
            Element::SinVoltageSource { .. } => 'V',
            Element::Resistor { .. } => 'R',
            Element::Capacitor { .. } => 'C',
            Element::Diode { .. } => 'D',
            Element::Bjt { .. } => 'Q',
        }
    }

    /// Name as it appears on the card.
    pub fn card_name(&self) -> String {
        format!("{}{}", self.prefix(), self.name())
    }

    /// Terminals in card order, each with its role.
    pub fn terminals(&self) -> Vec<(&'static str, NodeId)> {
        match *self {
            Element::SinVoltageSource { pos, neg, .. } => vec![("+", pos), ("-", neg)],
            Element::Resistor { a, b, .. } | Element::Capacitor { a, b, .. } => {
                vec![("a", a), ("b", b)]
            }
            Element::Diode { anode, cathode, .. } => vec![("anode", anode), ("cathode", cathode)],
            Element::Bjt {
                collector,
                base,
                emitter,
                ..
            } => vec![("collector", collector), ("base", base), ("emitter", emitter)],
        }
    }

    /// Model name, for elements that reference a `.model` card.
    pub fn model(&self) -> Option<&str> {
        match self {
            Element::Diode { model, .. } | Element::Bjt { model, .. } => Some(model),
            _ => None,
        }
    }

    /// Render the element card, resolving node ids through `node_name`.
    pub fn card<'a>(&self, node_name: impl Fn(NodeId) -> &'a str) -> String {
        let nodes = self
            .terminals()
            .into_iter()
            .map(|(_, id)| node_name(id))
            .collect::<Vec<_>>()
            .join(" ");
        let value = match self {
            Element::SinVoltageSource { sine, .. } => format!(
                "DC 0 AC 1 SIN({} {} {} {} {} {})",
                spice_literal(sine.offset),
                spice_literal(sine.amplitude),
                spice_literal(sine.frequency),
                spice_literal(sine.delay),
                spice_literal(sine.damping),
                spice_literal(sine.phase),
            ),
            Element::Resistor { ohms, .. } => spice_literal(*ohms),
            Element::Capacitor { farads, .. } => spice_literal(*farads),
            Element::Diode { model, .. } | Element::Bjt { model, .. } => model.clone(),
        };
        format!("{} {} {}", self.card_name(), nodes, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(id: NodeId) -> &'static str {
        match id.raw() {
            0 => "0",
            1 => "input",
            2 => "out",
            _ => "base",
        }
    }

    #[test]
    fn test_resistor_card() {
        let r = Element::Resistor {
            name: "R_LED1".into(),
            a: NodeId::new(1),
            b: NodeId::new(2),
            ohms: 100.0,
        };
        assert_eq!(r.card(names), "RR_LED1 input out 100");
        assert_eq!(r.model(), None);
    }

    #[test]
    fn test_source_card() {
        let v = Element::SinVoltageSource {
            name: "input".into(),
            pos: NodeId::new(1),
            neg: NodeId::GROUND,
            sine: SineSpec::new(311.0, 50.0),
        };
        assert_eq!(v.card(names), "Vinput input 0 DC 0 AC 1 SIN(0 311 50 0 0 0)");
    }

    #[test]
    fn test_bjt_terminal_order() {
        let q = Element::Bjt {
            name: "Q_LED1".into(),
            collector: NodeId::new(2),
            base: NodeId::new(3),
            emitter: NodeId::GROUND,
            model: "Q1".into(),
        };
        assert_eq!(q.card(names), "QQ_LED1 out base 0 Q1");
        let roles: Vec<_> = q.terminals().into_iter().map(|(role, _)| role).collect();
        assert_eq!(roles, ["collector", "base", "emitter"]);
        assert_eq!(q.model(), Some("Q1"));
    }

    #[test]
    fn test_sine_value() {
        let sine = SineSpec::new(311.0, 50.0);
        assert!(sine.value_at(0.0).abs() < 1e-9);
        assert!((sine.value_at(0.005) - 311.0).abs() < 1e-6);
        assert!((sine.value_at(0.015) + 311.0).abs() < 1e-6);
    }
}
