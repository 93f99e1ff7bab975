//! Waveform output formatting (CSV).

use std::io::Write;

use stairlight_ngspice::TransientResult;
use stairlight_ngspice::result::signal_key;

use crate::error::{Error, Result};
use crate::panel::Panel;

/// Column header for a signal key: node voltages as `V(node)`, anything
/// else (`i(vinput)`, `vinput#branch`) as written.
fn column_label(key: &str) -> String {
    if key.contains(['(', '#']) {
        key.to_string()
    } else {
        format!("V({})", key)
    }
}

/// Write the selected signals as CSV, one row per time point.
///
/// Format:
/// ```csv
/// time,V(input),V(rect_out2)
/// 0,0,0
/// 0.001,96.1,90
/// ```
///
/// An empty `signals` slice writes every signal in the result.
pub fn write_csv<W: Write>(result: &TransientResult, signals: &[&str], writer: &mut W) -> Result<()> {
    let names: Vec<String> = if signals.is_empty() {
        result.names().map(str::to_string).collect()
    } else {
        signals.iter().map(|s| signal_key(s)).collect()
    };
    let columns = names
        .iter()
        .map(|name| result.signal(name))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let times = result.times();
    if let Some((name, column)) = names.iter().zip(&columns).find(|(_, c)| c.len() != times.len()) {
        return Err(Error::Signal(stairlight_ngspice::Error::LengthMismatch {
            name: name.clone(),
            len: column.len(),
            expected: times.len(),
        }));
    }

    write!(writer, "time")?;
    for name in &names {
        write!(writer, ",{}", column_label(name))?;
    }
    writeln!(writer)?;

    for (i, t) in times.iter().enumerate() {
        write!(writer, "{}", t)?;
        for column in &columns {
            write!(writer, ",{}", column[i])?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Write every signal drawn on `panels`, each once, in panel order.
pub fn write_panels_csv<W: Write>(
    result: &TransientResult,
    panels: &[Panel],
    writer: &mut W,
) -> Result<()> {
    let mut signals: Vec<&str> = Vec::new();
    for signal in panels.iter().flat_map(Panel::signals) {
        if !signals.iter().any(|s| signal_key(s) == signal_key(signal)) {
            signals.push(signal);
        }
    }
    write_csv(result, &signals, writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::Series;
    use indexmap::IndexMap;

    fn result() -> TransientResult {
        let mut signals = IndexMap::new();
        signals.insert("input".to_string(), vec![0.0, 96.1]);
        signals.insert("rect_out2".to_string(), vec![0.0, 90.0]);
        TransientResult::new(vec![0.0, 0.001], signals).unwrap()
    }

    #[test]
    fn test_write_selected() {
        let mut out = Vec::new();
        write_csv(&result(), &["V(rect_out2)"], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "time,V(rect_out2)\n0,0\n0.001,90\n");
    }

    #[test]
    fn test_write_all() {
        let mut out = Vec::new();
        write_csv(&result(), &[], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().next(), Some("time,V(input),V(rect_out2)"));
        assert_eq!(text.lines().nth(2), Some("0.001,96.1,90"));
    }

    #[test]
    fn test_branch_currents_keep_their_name() {
        let mut signals = IndexMap::new();
        signals.insert("v(input)".to_string(), vec![1.0]);
        signals.insert("i(vinput)".to_string(), vec![-0.5]);
        signals.insert("vinput#branch".to_string(), vec![-0.5]);
        let result = TransientResult::new(vec![0.0], signals).unwrap();
        let mut out = Vec::new();
        write_csv(&result, &[], &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "time,V(input),i(vinput),vinput#branch\n0,1,-0.5,-0.5\n"
        );
    }

    #[test]
    fn test_short_signal_cannot_be_built() {
        let mut signals = IndexMap::new();
        signals.insert("input".to_string(), vec![0.0]);
        assert!(TransientResult::new(vec![0.0, 1e-3], signals).is_err());
    }

    #[test]
    fn test_missing_signal() {
        let mut out = Vec::new();
        let err = write_csv(&result(), &["led_node1"], &mut out).unwrap_err();
        assert!(err.to_string().contains("led_node1"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_panels_deduplicate() {
        let panels = vec![
            Panel::voltage("a", vec![Series::new("input", "x"), Series::new("rect_out2", "y")]),
            Panel::voltage("b", vec![Series::new("V(input)", "z")]),
        ];
        let mut out = Vec::new();
        write_panels_csv(&result(), &panels, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().next(), Some("time,V(input),V(rect_out2)"));
    }
}
