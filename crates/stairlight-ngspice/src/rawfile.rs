//! Reader for the rawfile ngspice writes with `-r`.
//!
//! The file starts with `Key: value` header lines (`Title`, `Date`,
//! `Plotname`, `Flags`, `No. Variables`, `No. Points`), then a `Variables:`
//! block with one `index name type` line per column. A line holding only
//! `Values:` or `Binary:` ends the header and selects the data encoding.
//!
//! Only the first plot in the file is read.

use crate::error::{Error, Result};
use crate::types::{AnalysisType, Encoding, RawVariable, RawfileData, RawfileHeader, VariableKind};

/// Parse a rawfile from bytes.
pub fn parse_rawfile(bytes: &[u8]) -> Result<RawfileData> {
    let (header_bytes, encoding, body) = split_sections(bytes)?;
    let header = parse_header(&String::from_utf8_lossy(header_bytes), encoding)?;

    let width = header.variables.len();
    let (points, imaginary) = match encoding {
        Encoding::Ascii => decode_ascii(&String::from_utf8_lossy(body), width, &header)?,
        Encoding::Binary => decode_binary(body, width, &header),
    };

    if points.len() < header.declared_points {
        log::warn!(
            "rawfile declares {} points but holds {}",
            header.declared_points,
            points.len()
        );
    }
    log::debug!(
        "read {} plot: {} variables, {} points ({:?})",
        header.analysis,
        width,
        points.len(),
        encoding
    );

    Ok(RawfileData {
        imaginary: header.complex.then_some(imaginary),
        header,
        points,
    })
}

/// Split at the first `Values:` or `Binary:` line into header and body.
fn split_sections(bytes: &[u8]) -> Result<(&[u8], Encoding, &[u8])> {
    let mut start = 0;
    while start < bytes.len() {
        let end = bytes[start..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(bytes.len(), |p| start + p);
        let line = bytes[start..end].strip_suffix(b"\r").unwrap_or(&bytes[start..end]);
        let encoding = match line {
            b"Values:" => Some(Encoding::Ascii),
            b"Binary:" => Some(Encoding::Binary),
            _ => None,
        };
        if let Some(encoding) = encoding {
            let body = bytes.get(end + 1..).unwrap_or_default();
            return Ok((&bytes[..start], encoding, body));
        }
        start = end + 1;
    }
    Err(Error::Rawfile("no Values: or Binary: section".to_string()))
}

fn parse_header(text: &str, encoding: Encoding) -> Result<RawfileHeader> {
    let mut title = String::new();
    let mut date = None;
    let mut plotname = String::new();
    let mut complex = false;
    let mut declared_vars = None;
    let mut declared_points = 0;
    let mut variables = Vec::new();
    let mut in_variables = false;

    for line in text.lines() {
        if in_variables {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if let [index, name, var_type, ..] = fields[..] {
                if let Ok(index) = index.parse::<usize>() {
                    variables.push(RawVariable {
                        index,
                        name: name.to_string(),
                        kind: VariableKind::from_type(var_type),
                    });
                    continue;
                }
            }
            in_variables = false;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "Title" => title = value.to_string(),
            "Date" => date = Some(value.to_string()),
            "Plotname" => plotname = value.to_string(),
            "Flags" => complex = value.to_ascii_lowercase().contains("complex"),
            "No. Variables" => declared_vars = Some(count(key, value)?),
            "No. Points" => declared_points = count(key, value)?,
            "Variables" => in_variables = true,
            // Command:, Option: and other informational lines
            _ => {}
        }
    }

    let declared_vars =
        declared_vars.ok_or_else(|| Error::Rawfile("missing No. Variables".to_string()))?;
    if declared_vars == 0 || variables.len() != declared_vars {
        return Err(Error::Rawfile(format!(
            "header declares {} variables but lists {}",
            declared_vars,
            variables.len()
        )));
    }
    if let Some(var) = variables.iter().find(|v| v.index >= declared_vars) {
        return Err(Error::Rawfile(format!(
            "variable {} has index {} outside 0..{}",
            var.name, var.index, declared_vars
        )));
    }

    Ok(RawfileHeader {
        title,
        date,
        analysis: AnalysisType::from_plotname(&plotname),
        complex,
        encoding,
        declared_points,
        variables,
    })
}

fn count(key: &str, value: &str) -> Result<usize> {
    value
        .parse()
        .map_err(|_| Error::Rawfile(format!("{}: expected a count, got {:?}", key.trim(), value)))
}

type Columns = (Vec<Vec<f64>>, Vec<Vec<f64>>);

/// Decode `Values:` text.
///
/// Each point is its index followed by one token per variable, in any
/// whitespace layout. Complex values are written `re,im`.
fn decode_ascii(body: &str, width: usize, header: &RawfileHeader) -> Result<Columns> {
    let mut points = Vec::with_capacity(header.declared_points);
    let mut imaginary = Vec::new();
    let mut tokens = body.split_whitespace();

    while points.len() < header.declared_points {
        // anything but a point index starts the next plot
        match tokens.next().map(str::parse::<usize>) {
            Some(Ok(_)) => {}
            _ => break,
        }

        let mut re = Vec::with_capacity(width);
        let mut im = Vec::with_capacity(if header.complex { width } else { 0 });
        for _ in 0..width {
            let token = tokens
                .next()
                .ok_or_else(|| Error::Rawfile(format!("point {} is truncated", points.len())))?;
            let (r, i) = ascii_value(token)
                .ok_or_else(|| Error::Rawfile(format!("bad value {:?}", token)))?;
            re.push(r);
            if header.complex {
                im.push(i);
            }
        }
        points.push(re);
        if header.complex {
            imaginary.push(im);
        }
    }
    Ok((points, imaginary))
}

/// A real value, or a `re,im` pair.
fn ascii_value(token: &str) -> Option<(f64, f64)> {
    match token.split_once(',') {
        Some((re, im)) => Some((re.parse().ok()?, im.parse().ok()?)),
        None => Some((token.parse().ok()?, 0.0)),
    }
}

/// Decode `Binary:` data; an incomplete trailing point is dropped.
fn decode_binary(body: &[u8], width: usize, header: &RawfileHeader) -> Columns {
    let per_value = if header.complex { 2 } else { 1 };
    let stride = width * per_value * std::mem::size_of::<f64>();

    let mut points = Vec::with_capacity(header.declared_points);
    let mut imaginary = Vec::new();
    for chunk in body.chunks_exact(stride).take(header.declared_points) {
        let values = chunk
            .chunks_exact(8)
            .map(|b| f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]));
        if header.complex {
            let (re, im): (Vec<f64>, Vec<f64>) = values
                .collect::<Vec<_>>()
                .chunks_exact(2)
                .map(|pair| (pair[0], pair[1]))
                .unzip();
            points.push(re);
            imaginary.push(im);
        } else {
            points.push(values.collect());
        }
    }
    (points, imaginary)
}
