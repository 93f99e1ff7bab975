//! SVG rendering of panel grids.

use std::path::Path;

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use stairlight_ngspice::TransientResult;

use crate::error::{Error, Result};
use crate::panel::{FIGURE_TITLE, Panel};

const PALETTE: [RGBColor; 6] = [BLUE, RED, GREEN, MAGENTA, CYAN, BLACK];
const FONT: &str = "sans-serif";

/// Figure-level settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub title: String,
    /// Figure size in pixels.
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: FIGURE_TITLE.to_string(),
            width: 1500,
            height: 1000,
        }
    }
}

/// A panel with its samples resolved against the result.
struct PanelData<'a> {
    panel: &'a Panel,
    lines: Vec<(&'a str, Vec<(f64, f64)>)>,
}

/// Pair every series with its samples, time in milliseconds.
fn resolve<'a>(result: &'a TransientResult, panels: &'a [Panel]) -> Result<Vec<PanelData<'a>>> {
    if result.is_empty() {
        return Err(Error::Empty("simulation result has no time points".to_string()));
    }
    if panels.is_empty() {
        return Err(Error::Empty("no panels".to_string()));
    }

    panels
        .iter()
        .map(|panel| {
            let lines = panel
                .series
                .iter()
                .map(|series| {
                    let values = result.signal(&series.signal)?;
                    let points: Vec<(f64, f64)> = result
                        .times()
                        .iter()
                        .zip(values)
                        .map(|(&t, &v)| (t * 1e3, v))
                        .collect();
                    Ok((series.label.as_str(), points))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(PanelData { panel, lines })
        })
        .collect()
}

/// Axis bounds covering every line, padded by 5% vertically.
fn bounds(lines: &[(&str, Vec<(f64, f64)>)]) -> ((f64, f64), (f64, f64)) {
    let finite = lines
        .iter()
        .flat_map(|(_, pts)| pts.iter())
        .filter(|(x, y)| x.is_finite() && y.is_finite());

    let (mut x0, mut x1, mut y0, mut y1) = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
    for &(x, y) in finite {
        x0 = x0.min(x);
        x1 = x1.max(x);
        y0 = y0.min(y);
        y1 = y1.max(y);
    }
    if x0 > x1 {
        return ((0.0, 1.0), (-1.0, 1.0));
    }
    if x1 - x0 <= 0.0 {
        x1 = x0 + 1.0;
    }
    let pad = (y1 - y0) * 0.05;
    if pad <= 0.0 {
        (y0, y1) = (y0 - 1.0, y1 + 1.0);
    } else {
        (y0, y1) = (y0 - pad, y1 + pad);
    }
    ((x0, x1), (y0, y1))
}

fn drawing_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> Error {
    Error::Drawing(e.to_string())
}

/// Grid shape for `n` panels: two columns once there is more than one.
fn grid(n: usize) -> (usize, usize) {
    let cols = if n > 1 { 2 } else { 1 };
    (n.div_ceil(cols), cols)
}

fn draw<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    data: &[PanelData<'_>],
    options: &ChartOptions,
) -> Result<()> {
    root.fill(&WHITE).map_err(drawing_err)?;
    let body = root
        .titled(&options.title, (FONT, 28))
        .map_err(drawing_err)?;

    let areas = body.split_evenly(grid(data.len()));
    for (area, panel) in areas.iter().zip(data) {
        let ((x0, x1), (y0, y1)) = bounds(&panel.lines);

        let mut chart = ChartBuilder::on(area)
            .caption(&panel.panel.title, (FONT, 20))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(drawing_err)?;

        chart
            .configure_mesh()
            .x_desc(format!("{} (ms)", panel.panel.x_label))
            .y_desc(panel.panel.y_label.as_str())
            .draw()
            .map_err(drawing_err)?;

        for (i, (label, points)) in panel.lines.iter().enumerate() {
            let color = PALETTE[i % PALETTE.len()];
            chart
                .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
                .map_err(drawing_err)?
                .label(*label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(drawing_err)?;
    }

    root.present().map_err(drawing_err)?;
    Ok(())
}

/// Render the panels to an SVG file.
pub fn render_svg(
    result: &TransientResult,
    panels: &[Panel],
    options: &ChartOptions,
    path: &Path,
) -> Result<()> {
    let data = resolve(result, panels)?;
    let root = SVGBackend::new(path, (options.width, options.height)).into_drawing_area();
    draw(root, &data, options)?;
    log::info!("wrote {} panels to {}", data.len(), path.display());
    Ok(())
}

/// Render the panels to an SVG document in memory.
pub fn render_svg_string(
    result: &TransientResult,
    panels: &[Panel],
    options: &ChartOptions,
) -> Result<String> {
    let data = resolve(result, panels)?;
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        draw(root, &data, options)?;
    }
    Ok(svg)
}
