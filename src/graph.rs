// Local renderer: draws a Figure to PNG or SVG with plotters

use crate::ir::Figure;
use crate::trace::TraceMode;
use crate::{OutputFormat, RenderOptions};
use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use serde_json::Value;
use std::ops::Range;

const SERIES_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Render a figure in the requested output format
pub fn render_figure(figure: &Figure, options: &RenderOptions) -> Result<Vec<u8>> {
    match options.format {
        OutputFormat::Json => Ok(figure
            .to_json_string()
            .context("Failed to serialize figure")?
            .into_bytes()),
        OutputFormat::Png => render_png(figure, options),
        OutputFormat::Svg => render_svg(figure, options.width, options.height),
    }
}

fn render_png(figure: &Figure, options: &RenderOptions) -> Result<Vec<u8>> {
    let (width, height) = (options.width, options.height);
    let mut buffer = vec![0u8; options.raster_len()?];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_figure(&root, figure)?;
        root.present().context("Failed to present drawing")?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(&buffer, width, height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }

    Ok(png_bytes)
}

fn render_svg(figure: &Figure, width: u32, height: u32) -> Result<Vec<u8>> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        draw_figure(&root, figure)?;
        root.present().context("Failed to present drawing")?;
    }
    Ok(svg.into_bytes())
}

// =============================================================================
// Axes
// =============================================================================

/// Where each row lands along one axis
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    /// One entry per row; None for values that cannot be placed (null)
    pub positions: Vec<Option<f64>>,
    /// Category labels in first-appearance order; empty for continuous axes
    pub categories: Vec<String>,
}

impl Axis {
    /// Numbers only -> continuous. Any other non-null value -> categorical.
    pub fn from_values(values: &[Value]) -> Self {
        let continuous = values.iter().all(|v| v.is_number() || v.is_null());
        if continuous {
            return Self {
                positions: values.iter().map(Value::as_f64).collect(),
                categories: Vec::new(),
            };
        }

        let mut categories: Vec<String> = Vec::new();
        let positions = values
            .iter()
            .map(|v| {
                if v.is_null() {
                    return None;
                }
                let label = category_label(v);
                let idx = match categories.iter().position(|c| *c == label) {
                    Some(idx) => idx,
                    None => {
                        categories.push(label);
                        categories.len() - 1
                    }
                };
                Some(idx as f64)
            })
            .collect();

        Self { positions, categories }
    }

    pub fn is_categorical(&self) -> bool {
        !self.categories.is_empty()
    }

    /// Plotting range, padded by 5% (or half a slot for categories)
    fn range(&self, include_zero: bool) -> Range<f64> {
        if self.is_categorical() {
            return -0.5..(self.categories.len() as f64 - 0.5);
        }

        let mut min = self.positions.iter().flatten().cloned().fold(f64::INFINITY, f64::min);
        let mut max = self.positions.iter().flatten().cloned().fold(f64::NEG_INFINITY, f64::max);
        if include_zero {
            min = min.min(0.0);
            max = max.max(0.0);
        }

        if min == max {
            (min - 1.0)..(max + 1.0)
        } else {
            let padding = (max - min) * 0.05;
            (min - padding)..(max + padding)
        }
    }

    fn label(&self, value: f64) -> String {
        if !self.is_categorical() {
            return format_number(value);
        }
        let rounded = value.round();
        if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        self.categories.get(rounded as usize).cloned().unwrap_or_default()
    }
}

fn category_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

/// Row pairs where both coordinates are placeable
fn paired_points(x: &Axis, y: &Axis) -> Vec<(f64, f64)> {
    x.positions
        .iter()
        .zip(&y.positions)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect()
}

/// Bar width in axis units: 80% of the tightest spacing between positions
pub fn bar_width(points: &[(f64, f64)], categorical: bool) -> f64 {
    if categorical {
        return 0.8;
    }
    let mut xs: Vec<f64> = points.iter().map(|(x, _)| *x).collect();
    xs.sort_by(|a, b| a.total_cmp(b));
    xs.dedup();
    xs.windows(2)
        .map(|w| w[1] - w[0])
        .fold(None, |acc: Option<f64>, gap| Some(acc.map_or(gap, |a| a.min(gap))))
        .map(|gap| gap * 0.8)
        .unwrap_or(0.8)
}

// =============================================================================
// Box statistics
// =============================================================================

/// Five-number summary for one x position
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub x: f64,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Group y values by x and summarize each group, ordered by x
pub fn compute_box_stats(points: &[(f64, f64)]) -> Vec<BoxStats> {
    let mut groups: Vec<(f64, Vec<f64>)> = Vec::new();
    for &(x, y) in points {
        match groups.iter_mut().find(|(gx, _)| *gx == x) {
            Some((_, ys)) => ys.push(y),
            None => groups.push((x, vec![y])),
        }
    }
    groups.sort_by(|a, b| a.0.total_cmp(&b.0));

    groups
        .into_iter()
        .map(|(x, mut ys)| {
            ys.sort_by(|a, b| a.total_cmp(b));

            let q1 = percentile(&ys, 0.25);
            let median = percentile(&ys, 0.50);
            let q3 = percentile(&ys, 0.75);
            let iqr = q3 - q1;
            let lower_fence = q1 - 1.5 * iqr;
            let upper_fence = q3 + 1.5 * iqr;

            // ys is sorted, so the first/last inside the fences are the whiskers
            let lower_whisker = ys.iter().cloned().find(|&v| v >= lower_fence).unwrap_or(q1);
            let upper_whisker = ys.iter().rev().cloned().find(|&v| v <= upper_fence).unwrap_or(q3);
            let outliers = ys
                .iter()
                .cloned()
                .filter(|&v| v < lower_fence || v > upper_fence)
                .collect();

            BoxStats {
                x,
                lower_whisker,
                q1,
                median,
                q3,
                upper_whisker,
                outliers,
            }
        })
        .collect()
}

fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    let n = sorted_data.len();
    if n == 0 { return 0.0; }
    if n == 1 { return sorted_data[0]; }

    let rank = p * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = rank.ceil() as usize;

    if lower_idx == upper_idx {
        sorted_data[lower_idx]
    } else {
        let weight = rank - lower_idx as f64;
        sorted_data[lower_idx] * (1.0 - weight) + sorted_data[upper_idx] * weight
    }
}

// =============================================================================
// Drawing
// =============================================================================

fn draw_figure<DB>(root: &DrawingArea<DB, Shift>, figure: &Figure) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let trace = figure.trace();
    let x_axis = Axis::from_values(&trace.x);
    let y_axis = Axis::from_values(&trace.y);
    let points = paired_points(&x_axis, &y_axis);
    if points.is_empty() {
        anyhow::bail!("Cannot render a chart with no data points");
    }

    root.fill(&WHITE).context("Failed to fill background")?;

    let include_zero = trace.mode == TraceMode::Bar && !y_axis.is_categorical();
    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .caption(&figure.layout.title, ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_axis.range(false), y_axis.range(include_zero))
        .context("Failed to build chart")?;

    let x_formatter = |v: &f64| x_axis.label(*v);
    let y_formatter = |v: &f64| y_axis.label(*v);
    {
        let mut mesh = chart.configure_mesh();
        mesh.x_desc(figure.layout.x_axis_title.as_str())
            .y_desc(figure.layout.y_axis_title.as_str())
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter);
        if x_axis.is_categorical() {
            mesh.x_labels(x_axis.categories.len());
        }
        if y_axis.is_categorical() {
            mesh.y_labels(y_axis.categories.len());
        }
        mesh.draw().context("Failed to draw mesh")?;
    }

    match trace.mode {
        TraceMode::Markers => draw_markers(&mut chart, &points)?,
        TraceMode::Bar => draw_bars(&mut chart, &points, x_axis.is_categorical())?,
        TraceMode::Box => draw_boxes(&mut chart, &points, x_axis.is_categorical())?,
    }

    tracing::debug!(points = points.len(), kind = %trace.kind, "rendered {}", trace.name);
    Ok(())
}

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn draw_markers<DB>(chart: &mut Chart<'_, DB>, points: &[(f64, f64)]) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    chart
        .draw_series(points.iter().map(|&(x, y)| Circle::new((x, y), 4, SERIES_COLOR.filled())))
        .context("Failed to draw point series")?;
    Ok(())
}

fn draw_bars<DB>(chart: &mut Chart<'_, DB>, points: &[(f64, f64)], categorical: bool) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let half = bar_width(points, categorical) / 2.0;
    let style = SERIES_COLOR.mix(0.8).filled();

    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Rectangle::new([(x - half, 0.0), (x + half, y)], style)),
        )
        .context("Failed to draw bar")?;
    Ok(())
}

fn draw_boxes<DB>(chart: &mut Chart<'_, DB>, points: &[(f64, f64)], categorical: bool) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let half = bar_width(points, categorical) / 2.0 * 0.6;
    let cap = half * 0.4;
    let line = SERIES_COLOR.stroke_width(2);

    for stats in compute_box_stats(points) {
        let x = stats.x;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x - half, stats.q3), (x + half, stats.q1)],
                SERIES_COLOR.mix(0.3).filled(),
            )))
            .context("Failed to draw box")?;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x - half, stats.q3), (x + half, stats.q1)],
                line,
            )))
            .context("Failed to draw box outline")?;

        let segments = vec![
            vec![(x, stats.lower_whisker), (x, stats.q1)],
            vec![(x, stats.q3), (x, stats.upper_whisker)],
            vec![(x - cap, stats.lower_whisker), (x + cap, stats.lower_whisker)],
            vec![(x - cap, stats.upper_whisker), (x + cap, stats.upper_whisker)],
            vec![(x - half, stats.median), (x + half, stats.median)],
        ];
        chart
            .draw_series(segments.into_iter().map(|seg| PathElement::new(seg, line)))
            .context("Failed to draw whiskers")?;

        chart
            .draw_series(
                stats
                    .outliers
                    .iter()
                    .map(|&v| Circle::new((x, v), 3, SERIES_COLOR.filled())),
            )
            .context("Failed to draw outliers")?;
    }
    Ok(())
}
