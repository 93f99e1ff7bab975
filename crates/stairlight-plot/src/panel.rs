//! Chart panel descriptions.

use stairlight_core::staircase::{INPUT_NODE, RECTIFIED_NODE, led_node, pir_node};

/// Title of the staircase figure.
pub const FIGURE_TITLE: &str = "Mô Phỏng Hệ Thống Đèn Cầu Thang";

const TIME_LABEL: &str = "Thời Gian";
const VOLTAGE_LABEL: &str = "Điện Áp (V)";

/// One line on a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    /// Signal name in the simulation result.
    pub signal: String,
    /// Legend text.
    pub label: String,
}

impl Series {
    pub fn new(signal: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            signal: signal.into(),
            label: label.into(),
        }
    }
}

/// One chart of the figure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

impl Panel {
    /// A voltage-versus-time panel.
    pub fn voltage(title: impl Into<String>, series: Vec<Series>) -> Self {
        Self {
            title: title.into(),
            x_label: TIME_LABEL.to_string(),
            y_label: VOLTAGE_LABEL.to_string(),
            series,
        }
    }

    /// Signal names drawn on this panel.
    pub fn signals(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.signal.as_str())
    }
}

/// The four staircase panels, in grid order (row-major):
/// input, rectified rail, LED nodes per floor, sensor nodes per floor.
pub fn staircase_panels(floors: usize) -> Vec<Panel> {
    let per_floor = |node: fn(usize) -> String| -> Vec<Series> {
        (1..=floors)
            .map(|floor| Series::new(node(floor), format!("Tầng {}", floor)))
            .collect()
    };

    vec![
        Panel::voltage("Nguồn Điện Vào", vec![Series::new(INPUT_NODE, "Nguồn AC")]),
        Panel::voltage(
            "Tín Hiệu Sau Chỉnh Lưu",
            vec![Series::new(RECTIFIED_NODE, "Tín Hiệu Sau Chỉnh Lưu")],
        ),
        Panel::voltage("Trạng Thái LED Các Tầng", per_floor(led_node)),
        Panel::voltage("Trạng Thái Cảm Biến", per_floor(pir_node)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use stairlight_core::{StaircaseParams, build_staircase};

    #[test]
    fn test_four_panels() {
        let panels = staircase_panels(3);
        assert_eq!(panels.len(), 4);
        assert_eq!(panels[0].signals().collect::<Vec<_>>(), ["input"]);
        assert_eq!(panels[1].signals().collect::<Vec<_>>(), ["rect_out2"]);
        assert_eq!(
            panels[2].signals().collect::<Vec<_>>(),
            ["led_node1", "led_node2", "led_node3"]
        );
        assert_eq!(panels[3].series[2].label, "Tầng 3");
        for panel in &panels {
            assert_eq!(panel.x_label, "Thời Gian");
            assert_eq!(panel.y_label, "Điện Áp (V)");
        }
    }

    #[test]
    fn test_panels_only_reference_circuit_nodes() {
        let params = StaircaseParams {
            floors: 5,
            ..Default::default()
        };
        let circuit = build_staircase(&params).unwrap();
        for panel in staircase_panels(params.floors) {
            for signal in panel.signals() {
                circuit.find_node(signal).unwrap();
            }
        }
    }
}
