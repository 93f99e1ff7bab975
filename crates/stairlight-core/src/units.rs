//! Engineering units and SPICE scale suffixes.

/// Scale suffixes in descending order, as (SPICE suffix, display prefix, factor).
///
/// SPICE reads `M` as milli, so mega must be written `Meg`.
const SCALES: &[(&str, &str, f64)] = &[
    ("T", "T", 1e12),
    ("G", "G", 1e9),
    ("Meg", "M", 1e6),
    ("k", "k", 1e3),
    ("", "", 1.0),
    ("m", "m", 1e-3),
    ("u", "µ", 1e-6),
    ("n", "n", 1e-9),
    ("p", "p", 1e-12),
    ("f", "f", 1e-15),
];

/// Parse a SPICE-style value with optional scale suffix and unit text.
///
/// Supported suffixes (case-insensitive): T, G, MEG, K, M (milli), MIL,
/// U, N, P, F. Any letters after the suffix are a unit name and are
/// ignored, so `311V`, `50Hz` and `2200uF` all parse.
pub fn parse_value(s: &str) -> Option<f64> {
    let s = s.trim();
    if let Ok(v) = s.parse::<f64>() {
        return Some(v);
    }

    let num_end = numeric_prefix_len(s);
    if num_end == 0 {
        return None;
    }
    let (num_str, rest) = s.split_at(num_end);
    let value: f64 = num_str.parse().ok()?;

    let rest = rest.to_ascii_uppercase();
    if !rest.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let multiplier = if rest.starts_with("MEG") {
        1e6
    } else if rest.starts_with("MIL") {
        25.4e-6
    } else {
        match rest.chars().next() {
            Some('T') => 1e12,
            Some('G') => 1e9,
            Some('K') => 1e3,
            Some('M') => 1e-3,
            Some('U') => 1e-6,
            Some('N') => 1e-9,
            Some('P') => 1e-12,
            Some('F') => 1e-15,
            _ => 1.0,
        }
    };

    Some(value * multiplier)
}

/// Length of the leading `[+-]digits[.digits][e[+-]digits]` part of `s`.
fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let mantissa_start = i;
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
        i += 1;
    }
    if i == mantissa_start {
        return 0;
    }
    // Exponent only counts when digits follow, so "5E" stays a plain 5.
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        if bytes.get(j).is_some_and(|b| b.is_ascii_digit()) {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}

/// Pick the largest scale whose factor does not exceed `abs_value`.
fn scale_for(abs_value: f64) -> Option<&'static (&'static str, &'static str, f64)> {
    SCALES.iter().find(|(_, _, factor)| abs_value >= *factor * (1.0 - 1e-12))
}

/// Trim a fixed-point rendering down to its significant digits.
fn trim_fixed(value: f64, decimals: usize) -> String {
    let s = format!("{:.*}", decimals, value);
    if s.contains('.') {
        let s = s.trim_end_matches('0').trim_end_matches('.');
        if s == "-0" { "0".to_string() } else { s.to_string() }
    } else {
        s
    }
}

/// Format a value as a SPICE literal with a scale suffix.
///
/// ```
/// use stairlight_core::units::spice_literal;
///
/// assert_eq!(spice_literal(2200e-6), "2.2m");
/// assert_eq!(spice_literal(10e3), "10k");
/// assert_eq!(spice_literal(2.5e6), "2.5Meg");
/// ```
pub fn spice_literal(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return format!("{}", value);
    }
    match scale_for(value.abs()) {
        Some((suffix, _, factor)) => format!("{}{}", trim_fixed(value / factor, 6), suffix),
        None => format!("{:e}", value),
    }
}

/// Format a value with an SI prefix and unit for human-readable output.
pub fn format_value(value: f64, unit: &str) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{} {}", value, unit);
    }
    match scale_for(value.abs()) {
        Some((_, prefix, factor)) => format!("{:.3} {}{}", value / factor, prefix, unit),
        None => format!("{:e} {}", value, unit),
    }
}
