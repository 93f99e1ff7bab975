//! In-memory form of an ngspice rawfile.

use std::fmt;

/// Kind of plot, from the `Plotname:` header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisType {
    OperatingPoint,
    DcSweep,
    Ac,
    Transient,
    /// Any other plot, with its name as written.
    Other(String),
}

impl AnalysisType {
    pub fn from_plotname(plotname: &str) -> Self {
        let name = plotname.trim();
        let lower = name.to_lowercase();
        if lower.starts_with("transient") {
            Self::Transient
        } else if lower.starts_with("ac ") {
            Self::Ac
        } else if lower.starts_with("dc transfer") {
            Self::DcSweep
        } else if lower.contains("operating point") {
            Self::OperatingPoint
        } else {
            Self::Other(name.to_string())
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OperatingPoint => f.write_str("operating point"),
            Self::DcSweep => f.write_str("dc sweep"),
            Self::Ac => f.write_str("ac"),
            Self::Transient => f.write_str("transient"),
            Self::Other(name) => write!(f, "`{}`", name),
        }
    }
}

/// Physical quantity of a rawfile column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableKind {
    Time,
    Frequency,
    Voltage,
    Current,
    Other(String),
}

impl VariableKind {
    pub fn from_type(var_type: &str) -> Self {
        match var_type.to_ascii_lowercase().as_str() {
            "time" => Self::Time,
            "frequency" => Self::Frequency,
            "voltage" => Self::Voltage,
            "current" => Self::Current,
            _ => Self::Other(var_type.to_string()),
        }
    }
}

/// One column of the data section.
#[derive(Debug, Clone, PartialEq)]
pub struct RawVariable {
    /// Column position, 0-based.
    pub index: usize,
    /// Name as ngspice writes it (`time`, `v(input)`, `i(vinput)`).
    pub name: String,
    pub kind: VariableKind,
}

/// How the data section is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// `Values:` followed by whitespace-separated text.
    Ascii,
    /// `Binary:` followed by little-endian `f64`s.
    Binary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawfileHeader {
    pub title: String,
    pub date: Option<String>,
    pub analysis: AnalysisType,
    /// Each value is a (real, imaginary) pair.
    pub complex: bool,
    pub encoding: Encoding,
    /// Point count from `No. Points:`; the data may hold fewer.
    pub declared_points: usize,
    pub variables: Vec<RawVariable>,
}

/// A parsed plot: header plus one row of values per point.
#[derive(Debug, Clone)]
pub struct RawfileData {
    pub header: RawfileHeader,
    /// Real parts, `points[point][variable]`.
    pub points: Vec<Vec<f64>>,
    /// Imaginary parts, present only for complex plots.
    pub imaginary: Option<Vec<Vec<f64>>>,
}

impl RawfileData {
    pub fn analysis(&self) -> &AnalysisType {
        &self.header.analysis
    }

    /// Points actually read.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Find a variable by name, ignoring case.
    pub fn variable(&self, name: &str) -> Option<&RawVariable> {
        self.header
            .variables
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(name))
    }

    /// The time axis of a transient plot.
    pub fn time_variable(&self) -> Option<&RawVariable> {
        self.header
            .variables
            .iter()
            .find(|v| v.kind == VariableKind::Time)
    }

    /// Real values of `var` at every point.
    pub fn values<'a>(&'a self, var: &RawVariable) -> impl Iterator<Item = f64> + 'a {
        let index = var.index;
        self.points.iter().map(move |row| row[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_from_plotname() {
        assert_eq!(AnalysisType::from_plotname("Transient Analysis"), AnalysisType::Transient);
        assert_eq!(AnalysisType::from_plotname("AC Analysis"), AnalysisType::Ac);
        assert_eq!(
            AnalysisType::from_plotname("DC transfer characteristic"),
            AnalysisType::DcSweep
        );
        assert_eq!(AnalysisType::from_plotname("Operating Point"), AnalysisType::OperatingPoint);
        assert_eq!(
            AnalysisType::from_plotname(" Noise Spectral Density Curves "),
            AnalysisType::Other("Noise Spectral Density Curves".to_string())
        );
        assert_eq!(AnalysisType::Other("noise".into()).to_string(), "`noise`");
    }

    #[test]
    fn test_variable_kind() {
        assert_eq!(VariableKind::from_type("time"), VariableKind::Time);
        assert_eq!(VariableKind::from_type("Voltage"), VariableKind::Voltage);
        assert_eq!(
            VariableKind::from_type("notype"),
            VariableKind::Other("notype".to_string())
        );
    }

    #[test]
    fn test_lookup_and_values() {
        let data = RawfileData {
            header: RawfileHeader {
                title: "t".into(),
                date: None,
                analysis: AnalysisType::Transient,
                complex: false,
                encoding: Encoding::Ascii,
                declared_points: 2,
                variables: vec![
                    RawVariable {
                        index: 0,
                        name: "time".into(),
                        kind: VariableKind::Time,
                    },
                    RawVariable {
                        index: 1,
                        name: "v(input)".into(),
                        kind: VariableKind::Voltage,
                    },
                ],
            },
            points: vec![vec![0.0, 1.0], vec![1e-3, 2.0]],
            imaginary: None,
        };

        let input = data.variable("V(INPUT)").unwrap();
        assert_eq!(data.values(input).collect::<Vec<_>>(), [1.0, 2.0]);
        assert_eq!(data.time_variable().map(|v| v.index), Some(0));
        assert_eq!(data.len(), 2);
        assert!(data.variable("v(out)").is_none());
    }
}
