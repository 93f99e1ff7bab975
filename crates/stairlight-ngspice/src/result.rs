//! Transient waveforms keyed by signal name.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::types::{AnalysisType, RawfileData};

/// Normalise a signal name for lookup.
///
/// Node voltages are keyed by bare node name, so `V(Input)`, `v(input)` and
/// `input` all become `input`. Other names (`i(vinput)`,
/// `vinput#branch`) are only lower-cased.
pub fn signal_key(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    match lower.strip_prefix("v(").and_then(|s| s.strip_suffix(')')) {
        Some(inner) if !inner.contains(',') => inner.trim().to_string(),
        _ => lower,
    }
}

/// Result of a transient analysis.
///
/// Every signal holds exactly one sample per time point.
#[derive(Debug, Clone, PartialEq)]
pub struct TransientResult {
    /// Time axis (s).
    times: Vec<f64>,
    /// Sampled values per signal, in rawfile column order.
    signals: IndexMap<String, Vec<f64>>,
}

impl TransientResult {
    /// Pair a time axis with signals, keying each by [`signal_key`].
    ///
    /// Fails if a signal's length differs from the time axis.
    pub fn new(times: Vec<f64>, signals: IndexMap<String, Vec<f64>>) -> Result<Self> {
        let mut keyed = IndexMap::with_capacity(signals.len());
        for (name, values) in signals {
            if values.len() != times.len() {
                return Err(Error::LengthMismatch {
                    name,
                    len: values.len(),
                    expected: times.len(),
                });
            }
            keyed.insert(signal_key(&name), values);
        }
        Ok(Self {
            times,
            signals: keyed,
        })
    }

    /// Build from a transient rawfile.
    ///
    /// The `time` column becomes the axis; every other column is keyed by
    /// [`signal_key`].
    pub fn from_rawfile(data: &RawfileData) -> Result<Self> {
        if *data.analysis() != AnalysisType::Transient {
            return Err(Error::WrongAnalysis {
                expected: AnalysisType::Transient,
                found: data.analysis().clone(),
            });
        }
        let axis = data
            .time_variable()
            .ok_or_else(|| Error::Rawfile("transient plot has no time variable".to_string()))?;

        let times: Vec<f64> = data.values(axis).collect();
        let signals: IndexMap<String, Vec<f64>> = data
            .header
            .variables
            .iter()
            .filter(|var| var.index != axis.index)
            .map(|var| (var.name.clone(), data.values(var).collect()))
            .collect();

        let result = Self::new(times, signals)?;
        log::debug!(
            "transient result: {} points, {} signals",
            result.len(),
            result.num_signals()
        );
        Ok(result)
    }

    /// Time axis (s).
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn num_signals(&self) -> usize {
        self.signals.len()
    }

    /// Number of time points.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Signal names in column order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.signals.keys().map(String::as_str)
    }

    /// Look up a signal, if present.
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.signals.get(&signal_key(name)).map(Vec::as_slice)
    }

    /// Look up a signal, failing with the list of available names.
    pub fn signal(&self, name: &str) -> Result<&[f64]> {
        self.get(name).ok_or_else(|| Error::SignalNotFound {
            name: name.to_string(),
            available: self.names().collect::<Vec<_>>().join(", "),
        })
    }

    /// Simulated interval, or `None` for an empty result.
    pub fn time_range(&self) -> Option<(f64, f64)> {
        Some((*self.times.first()?, *self.times.last()?))
    }

    /// Signal value at `time` using linear interpolation, clamped at the ends.
    pub fn interpolate_at(&self, name: &str, time: f64) -> Option<f64> {
        let vals = self.get(name)?;
        let (first, last) = self.time_range()?;

        if time <= first {
            return vals.first().copied();
        }
        if time >= last {
            return vals.last().copied();
        }

        // First sample strictly after `time`; times are non-decreasing.
        let hi = self.times.partition_point(|&t| t <= time);
        let lo = hi - 1;
        let (t0, t1) = (self.times[lo], self.times[hi]);
        let (v0, v1) = (*vals.get(lo)?, *vals.get(hi)?);
        if t1 == t0 {
            return Some(v0);
        }
        let alpha = (time - t0) / (t1 - t0);
        Some(v0 * (1.0 - alpha) + v1 * alpha)
    }

    /// Minimum and maximum of a signal.
    pub fn extent(&self, name: &str) -> Option<(f64, f64)> {
        let vals = self.get(name)?;
        let mut iter = vals.iter().copied().filter(|v| v.is_finite());
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Encoding, RawVariable, RawfileHeader, VariableKind};

    fn var(index: usize, name: &str, kind: VariableKind) -> RawVariable {
        RawVariable {
            index,
            name: name.to_string(),
            kind,
        }
    }

    fn rawfile(plotname: &str) -> RawfileData {
        RawfileData {
            header: RawfileHeader {
                title: "test".to_string(),
                date: None,
                analysis: AnalysisType::from_plotname(plotname),
                complex: false,
                encoding: Encoding::Binary,
                declared_points: 3,
                variables: vec![
                    var(0, "time", VariableKind::Time),
                    var(1, "v(input)", VariableKind::Voltage),
                    var(2, "rect_out2", VariableKind::Voltage),
                ],
            },
            points: vec![
                vec![0.0, 0.0, 0.0],
                vec![1e-3, 96.0, 90.0],
                vec![2e-3, 182.0, 170.0],
            ],
            imaginary: None,
        }
    }

    #[test]
    fn test_signal_key() {
        assert_eq!(signal_key("V(Input)"), "input");
        assert_eq!(signal_key("input"), "input");
        assert_eq!(signal_key("i(vinput)"), "i(vinput)");
        assert_eq!(signal_key("v(a,b)"), "v(a,b)");
    }

    #[test]
    fn test_from_rawfile() {
        let result = TransientResult::from_rawfile(&rawfile("Transient Analysis")).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result.names().collect::<Vec<_>>(), ["input", "rect_out2"]);
        assert_eq!(result.signal("V(INPUT)").unwrap(), &[0.0, 96.0, 182.0]);
        assert_eq!(result.signal("rect_out2").unwrap()[2], 170.0);
        assert_eq!(result.time_range(), Some((0.0, 2e-3)));
        assert_eq!(result.extent("input"), Some((0.0, 182.0)));
    }

    #[test]
    fn test_wrong_analysis() {
        let err = TransientResult::from_rawfile(&rawfile("AC Analysis")).unwrap_err();
        assert!(matches!(
            err,
            Error::WrongAnalysis { found: AnalysisType::Ac, .. }
        ));
    }

    #[test]
    fn test_missing_signal_lists_available() {
        let result = TransientResult::from_rawfile(&rawfile("Transient Analysis")).unwrap();
        match result.signal("led_node1") {
            Err(Error::SignalNotFound { name, available }) => {
                assert_eq!(name, "led_node1");
                assert_eq!(available, "input, rect_out2");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_new_rejects_short_signal() {
        let mut signals = IndexMap::new();
        signals.insert("V(Input)".to_string(), vec![0.0, 96.0]);
        signals.insert("rect_out2".to_string(), vec![0.0]);
        match TransientResult::new(vec![0.0, 1e-3], signals) {
            Err(Error::LengthMismatch { name, len, expected }) => {
                assert_eq!(name, "rect_out2");
                assert_eq!((len, expected), (1, 2));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_new_normalises_names() {
        let mut signals = IndexMap::new();
        signals.insert("V(Input)".to_string(), vec![1.0]);
        let result = TransientResult::new(vec![0.0], signals).unwrap();
        assert_eq!(result.names().collect::<Vec<_>>(), ["input"]);
        assert_eq!(result.times(), &[0.0]);
    }

    #[test]
    fn test_interpolate() {
        let result = TransientResult::from_rawfile(&rawfile("Transient Analysis")).unwrap();
        assert_eq!(result.interpolate_at("input", -1.0), Some(0.0));
        assert_eq!(result.interpolate_at("input", 1.0), Some(182.0));
        assert_eq!(result.interpolate_at("input", 1e-3), Some(96.0));
        let mid = result.interpolate_at("input", 1.5e-3).unwrap();
        assert!((mid - 139.0).abs() < 1e-9);
        assert_eq!(result.interpolate_at("nope", 0.0), None);
    }
}
