//! The staircase lighting control circuit.
//!
//! Mains is rectified by two series diodes and smoothed by a filter
//! capacitor. Each floor has a motion-sensor trigger resistor driving the
//! base of an NPN transistor, which sinks an LED and its current-limiting
//! resistor.
//!
//! ```text
//!  input ─D1─ rect_out1 ─D2─ rect_out2 ──┬── Cfilter ── 0
//!                                        ├─ R_PIRi ─ pir_nodei ─ base Q_LEDi
//!                                        └─ R_LEDi ─ led_nodei ─┬─ collector Q_LEDi
//!                                                               └─ LEDi ── 0
//! ```

use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::element::SineSpec;
use crate::error::{Error, Result};
use crate::model::{BjtParams, DiodeParams, ModelKind};

/// Node driven by the AC source.
pub const INPUT_NODE: &str = "input";
/// Node between the two rectifier diodes.
pub const RECTIFIER_MID_NODE: &str = "rect_out1";
/// Filtered DC rail.
pub const RECTIFIED_NODE: &str = "rect_out2";
/// Model name of the rectifier diodes.
pub const RECTIFIER_MODEL: &str = "1N4007";
/// Model name shared by every LED.
pub const LED_MODEL: &str = "LED";

/// LED/collector node of floor `floor` (1-based).
pub fn led_node(floor: usize) -> String {
    format!("led_node{}", floor)
}

/// Sensor/base node of floor `floor` (1-based).
pub fn pir_node(floor: usize) -> String {
    format!("pir_node{}", floor)
}

/// Transistor model of floor `floor` (1-based). Each floor gets its own card.
pub fn transistor_model(floor: usize) -> String {
    format!("Q{}", floor)
}

/// Electrical parameters of the staircase circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaircaseParams {
    pub title: String,
    /// Number of lit floors.
    pub floors: usize,
    /// Mains source.
    pub source: SineSpec,
    /// Rectifier diode model.
    pub rectifier: DiodeParams,
    /// Filter capacitance (F).
    pub filter_capacitance: f64,
    /// Sensor trigger resistance per floor (ohms).
    pub pir_resistance: f64,
    /// LED current-limiting resistance per floor (ohms).
    pub led_resistance: f64,
    /// NPN driver model, instantiated once per floor.
    pub transistor: BjtParams,
    /// LED model.
    pub led: DiodeParams,
}

impl Default for StaircaseParams {
    fn default() -> Self {
        Self {
            title: "Staircase Lighting System".to_string(),
            floors: 3,
            source: SineSpec::new(311.0, 50.0),
            rectifier: DiodeParams {
                is: 1e-14,
                n: None,
                rs: 0.01,
                bv: None,
            },
            filter_capacitance: 2200e-6,
            pir_resistance: 10e3,
            led_resistance: 100.0,
            transistor: BjtParams {
                is: 1.8e-14,
                bf: None,
                vaf: Some(100.0),
            },
            led: DiodeParams {
                is: 1e-14,
                n: Some(1.7),
                rs: 0.1,
                bv: Some(5.0),
            },
        }
    }
}

impl StaircaseParams {
    /// Every node voltage the circuit produces, in netlist order.
    pub fn signal_names(&self) -> Vec<String> {
        let mut names = vec![
            INPUT_NODE.to_string(),
            RECTIFIER_MID_NODE.to_string(),
            RECTIFIED_NODE.to_string(),
        ];
        for floor in 1..=self.floors {
            names.push(pir_node(floor));
            names.push(led_node(floor));
        }
        names
    }
}

/// Build and validate the staircase circuit.
pub fn build_staircase(params: &StaircaseParams) -> Result<Circuit> {
    if params.floors == 0 {
        return Err(Error::InvalidValue {
            name: "floors".to_string(),
            reason: "at least one floor is required".to_string(),
        });
    }

    let mut circuit = Circuit::with_title(params.title.clone());

    circuit.sinusoidal_voltage_source(INPUT_NODE, INPUT_NODE, "0", params.source.clone())?;

    circuit.diode("D1", INPUT_NODE, RECTIFIER_MID_NODE, RECTIFIER_MODEL)?;
    circuit.diode("D2", RECTIFIER_MID_NODE, RECTIFIED_NODE, RECTIFIER_MODEL)?;

    circuit.capacitor("filter", RECTIFIED_NODE, "0", params.filter_capacitance)?;

    for floor in 1..=params.floors {
        let pir = pir_node(floor);
        let led = led_node(floor);
        let q_model = transistor_model(floor);

        circuit.resistor(&format!("R_PIR{}", floor), RECTIFIED_NODE, &pir, params.pir_resistance)?;

        circuit.model(params.transistor.clone().into_model(&q_model, ModelKind::Npn))?;
        circuit.bjt(&format!("Q_LED{}", floor), &led, &pir, "0", &q_model)?;

        circuit.resistor(&format!("R_LED{}", floor), RECTIFIED_NODE, &led, params.led_resistance)?;
        circuit.diode(&format!("LED{}", floor), &led, "0", LED_MODEL)?;
    }

    circuit.model(params.rectifier.clone().into_model(RECTIFIER_MODEL))?;
    circuit.model(params.led.clone().into_model(LED_MODEL))?;

    circuit.validate()?;
    log::info!(
        "built staircase circuit: {} floors, {} nodes, {} elements",
        params.floors,
        circuit.num_nodes(),
        circuit.num_elements()
    );
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    #[test]
    fn test_default_counts() {
        let circuit = build_staircase(&StaircaseParams::default()).unwrap();
        // source, 2 rectifier diodes, filter, 4 per floor
        assert_eq!(circuit.num_elements(), 4 + 4 * 3);
        // input, rect_out1, rect_out2, 2 per floor
        assert_eq!(circuit.num_nodes(), 3 + 2 * 3);
        assert_eq!(circuit.models().count(), 3 + 2);
    }

    #[test]
    fn test_zero_floors_rejected() {
        let params = StaircaseParams {
            floors: 0,
            ..Default::default()
        };
        assert!(matches!(
            build_staircase(&params),
            Err(Error::InvalidValue { ref name, .. }) if name == "floors"
        ));
    }

    #[test]
    fn test_transistor_wiring() {
        let circuit = build_staircase(&StaircaseParams::default()).unwrap();
        let Some(Element::Bjt {
            collector,
            base,
            emitter,
            model,
            ..
        }) = circuit.element("QQ_LED2")
        else {
            panic!("Q_LED2 missing");
        };
        assert_eq!(circuit.node_name(*collector), "led_node2");
        assert_eq!(circuit.node_name(*base), "pir_node2");
        assert!(emitter.is_ground());
        assert_eq!(model, "Q2");
    }

    #[test]
    fn test_signal_names() {
        let params = StaircaseParams {
            floors: 2,
            ..Default::default()
        };
        assert_eq!(
            params.signal_names(),
            ["input", "rect_out1", "rect_out2", "pir_node1", "led_node1", "pir_node2", "led_node2"]
        );
        let circuit = build_staircase(&params).unwrap();
        for name in params.signal_names() {
            circuit.find_node(&name).unwrap();
        }
    }

    #[test]
    fn test_params_json_overrides() {
        let params: StaircaseParams =
            serde_json::from_str(r#"{"floors": 5, "source": {"amplitude": 325.0}}"#).unwrap();
        assert_eq!(params.floors, 5);
        assert_eq!(params.source.amplitude, 325.0);
        assert_eq!(params.source.frequency, 50.0);
        assert_eq!(params.led_resistance, 100.0);
    }
}
