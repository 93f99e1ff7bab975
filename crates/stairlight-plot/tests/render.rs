//! Rendering the staircase panels from a synthetic transient result.

use indexmap::IndexMap;
use stairlight_core::StaircaseParams;
use stairlight_ngspice::TransientResult;
use stairlight_plot::{ChartOptions, Error, render_svg, render_svg_string, staircase_panels, write_panels_csv};

fn synthetic_result(floors: usize) -> TransientResult {
    let times: Vec<f64> = (0..=100).map(|i| i as f64 * 1e-3).collect();
    let wave = |amp: f64| -> Vec<f64> {
        times
            .iter()
            .map(|&t| amp * (2.0 * std::f64::consts::PI * 50.0 * t).sin())
            .collect()
    };

    let mut signals = IndexMap::new();
    signals.insert("input".to_string(), wave(311.0));
    signals.insert("rect_out1".to_string(), wave(155.0));
    signals.insert("rect_out2".to_string(), vec![300.0; times.len()]);
    for floor in 1..=floors {
        signals.insert(format!("pir_node{}", floor), vec![0.7; times.len()]);
        signals.insert(format!("led_node{}", floor), vec![1.8 + floor as f64 * 0.1; times.len()]);
    }
    TransientResult::new(times, signals).unwrap()
}

#[test]
fn test_svg_string_has_titles() {
    let result = synthetic_result(3);
    let svg = render_svg_string(&result, &staircase_panels(3), &ChartOptions::default()).unwrap();

    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Mô Phỏng Hệ Thống Đèn Cầu Thang"));
    assert!(svg.contains("Nguồn Điện Vào"));
    assert!(svg.contains("Trạng Thái Cảm Biến"));
    assert!(svg.contains("Tầng 3"));
}

#[test]
fn test_svg_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("staircase.svg");
    let result = synthetic_result(2);
    let options = ChartOptions {
        width: 800,
        height: 600,
        ..Default::default()
    };

    render_svg(&result, &staircase_panels(2), &options, &path).unwrap();

    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.contains("width=\"800\""));
    assert!(svg.contains("Tầng 2"));
}

#[test]
fn test_missing_signal_is_an_error() {
    // result has two floors, panels ask for five
    let result = synthetic_result(2);
    let err = render_svg_string(&result, &staircase_panels(5), &ChartOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Signal(_)));
    assert!(err.to_string().contains("led_node3"));
}

#[test]
fn test_empty_result_is_an_error() {
    let result = TransientResult::new(Vec::new(), IndexMap::new()).unwrap();
    let err = render_svg_string(&result, &staircase_panels(1), &ChartOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Empty(_)));
}

#[test]
fn test_panels_csv_covers_staircase_signals() {
    let params = StaircaseParams::default();
    let result = synthetic_result(params.floors);
    let mut out = Vec::new();
    write_panels_csv(&result, &staircase_panels(params.floors), &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let header = text.lines().next().unwrap();
    assert_eq!(
        header,
        "time,V(input),V(rect_out2),V(led_node1),V(led_node2),V(led_node3),\
         V(pir_node1),V(pir_node2),V(pir_node3)"
    );
    assert_eq!(text.lines().count(), result.len() + 1);
}
