//! Visualization functions using Plotters for exploratory analysis

use crate::data::NumericColumn;
use anyhow::Context;
use crate::stats::{self, CorrelationMatrix};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

/// File names written into the output directory
pub const CLASS_DISTRIBUTION_FILE: &str = "activity_distribution.png";
pub const CORRELATION_HEATMAP_FILE: &str = "correlation_heatmap.png";
pub const FEATURE_DISTRIBUTIONS_FILE: &str = "feature_distributions.png";

/// Category colors, one per class label
const PALETTE: [RGBColor; 10] = [
    RGBColor(76, 114, 176),
    RGBColor(221, 132, 82),
    RGBColor(85, 168, 104),
    RGBColor(196, 78, 82),
    RGBColor(129, 114, 179),
    RGBColor(147, 120, 96),
    RGBColor(218, 139, 195),
    RGBColor(140, 140, 140),
    RGBColor(204, 185, 116),
    RGBColor(100, 181, 205),
];

const HISTOGRAM_COLOR: RGBColor = RGBColor(76, 114, 176);

/// Anchors of the diverging blue-white-red scale, from -1 to 1
const COOLWARM: [(f64, RGBColor); 5] = [
    (-1.0, RGBColor(59, 76, 192)),
    (-0.5, RGBColor(141, 176, 254)),
    (0.0, RGBColor(221, 221, 221)),
    (0.5, RGBColor(244, 154, 123)),
    (1.0, RGBColor(180, 4, 38)),
];

const COLORBAR_STEPS: usize = 100;

/// Heatmap axes stop labelling every column past this many
const MAX_AXIS_LABELS: usize = 40;

/// Map a correlation coefficient onto the coolwarm scale
///
/// NaN maps to white; values outside [-1, 1] are clamped.
pub fn coolwarm(value: f64) -> RGBColor {
    if value.is_nan() {
        return WHITE;
    }
    let v = value.clamp(-1.0, 1.0);

    for pair in COOLWARM.windows(2) {
        let (lo, lo_color) = pair[0];
        let (hi, hi_color) = pair[1];
        if v <= hi {
            let t = (v - lo) / (hi - lo);
            let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
            return RGBColor(
                lerp(lo_color.0, hi_color.0),
                lerp(lo_color.1, hi_color.1),
                lerp(lo_color.2, hi_color.2),
            );
        }
    }

    COOLWARM[COOLWARM.len() - 1].1
}

/// Bar chart of class counts
///
/// # Arguments
/// * `counts` - Label and count per class, in the order bars are drawn
/// * `output_path` - Path to save the PNG plot
pub fn create_class_distribution_chart(
    counts: &[(String, usize)],
    output_path: &Path,
) -> crate::Result<()> {
    if counts.is_empty() {
        anyhow::bail!("No class labels to plot");
    }

    let n = counts.len();
    let max_count = counts.iter().map(|(_, c)| *c).max().unwrap_or(1) as f64;

    let root = BitMapBackend::new(output_path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Distribution of Activities", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..n as f64, 0f64..(max_count * 1.1))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|_| String::new())
        .y_label_formatter(&|y| format!("{:.0}", y))
        .x_desc("Activity Type")
        .y_desc("Count")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, (_, count))| {
        let color = PALETTE[i % PALETTE.len()];
        Rectangle::new(
            [(i as f64 + 0.1, 0.0), (i as f64 + 0.9, *count as f64)],
            color.filled(),
        )
    }))?;

    // Category names under the bar centres
    let label_style =
        TextStyle::from(("sans-serif", 13).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
    for (i, (label, _)) in counts.iter().enumerate() {
        let (x, y) = chart.backend_coord(&(i as f64 + 0.5, 0.0));
        root.draw_text(label, &label_style, (x, y + 6))?;
    }

    root.present()?;
    log::info!("Class distribution chart saved to: {}", output_path.display());

    Ok(())
}

/// Heatmap of a correlation matrix with a colour bar
///
/// Row `i` is drawn `i` cells from the top so the first column sits at the
/// top-left corner. NaN coefficients are left white.
pub fn create_correlation_heatmap(
    matrix: &CorrelationMatrix,
    output_path: &Path,
) -> crate::Result<()> {
    let n = matrix.len();
    if n == 0 {
        anyhow::bail!("Correlation matrix is empty");
    }

    let root = BitMapBackend::new(output_path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    let canvas = root.titled("Feature Correlation Heatmap", ("sans-serif", 30))?;
    let (grid_area, bar_area) = canvas.split_horizontally(1060);

    let mut chart = ChartBuilder::on(&grid_area)
        .margin_top(10)
        .margin_right(10)
        .margin_left(170)
        .margin_bottom(140)
        .build_cartesian_2d(0f64..n as f64, 0f64..n as f64)?;

    let side = n as f64;
    chart.draw_series((0..n).flat_map(|i| (0..n).map(move |j| (i, j))).map(|(i, j)| {
        let top = side - i as f64;
        Rectangle::new(
            [(j as f64, top - 1.0), (j as f64 + 1.0, top)],
            coolwarm(matrix.values[[i, j]]).filled(),
        )
    }))?;

    let step = n.div_ceil(MAX_AXIS_LABELS);
    let column_style =
        TextStyle::from(("sans-serif", 12).into_font().transform(FontTransform::Rotate90))
            .pos(Pos::new(HPos::Left, VPos::Top));
    let row_style =
        TextStyle::from(("sans-serif", 12).into_font()).pos(Pos::new(HPos::Right, VPos::Center));

    for (i, name) in matrix.names.iter().enumerate().step_by(step) {
        let (x, y) = chart.backend_coord(&(i as f64 + 0.5, 0.0));
        root.draw_text(name, &column_style, (x, y + 6))?;

        let (x, y) = chart.backend_coord(&(0.0, side - i as f64 - 0.5));
        root.draw_text(name, &row_style, (x - 6, y))?;
    }

    draw_colorbar(&bar_area)?;

    root.present()?;
    log::info!("Correlation heatmap saved to: {}", output_path.display());

    Ok(())
}

fn draw_colorbar(area: &DrawingArea<BitMapBackend<'_>, Shift>) -> crate::Result<()> {
    let mut bar = ChartBuilder::on(area)
        .margin_top(10)
        .margin_bottom(140)
        .margin_left(20)
        .margin_right(10)
        .right_y_label_area_size(50)
        .build_cartesian_2d(0f64..1f64, -1f64..1f64)?;

    bar.configure_mesh()
        .disable_mesh()
        .y_labels(5)
        .y_label_formatter(&|v| format!("{:.1}", v))
        .draw()?;

    let height = 2.0 / COLORBAR_STEPS as f64;
    bar.draw_series((0..COLORBAR_STEPS).map(|k| {
        let lo = -1.0 + k as f64 * height;
        Rectangle::new(
            [(0.0, lo), (1.0, lo + height)],
            coolwarm(lo + height / 2.0).filled(),
        )
    }))?;

    Ok(())
}

/// Histograms with a KDE overlay, one subplot per column stacked vertically
pub fn create_feature_distributions(
    columns: &[NumericColumn],
    output_path: &Path,
) -> crate::Result<()> {
    if columns.is_empty() {
        anyhow::bail!("No numeric columns to plot");
    }

    let height = 300 * columns.len() as u32;
    let root = BitMapBackend::new(output_path, (1500, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let panels = root.split_evenly((columns.len(), 1));
    for (panel, column) in panels.iter().zip(columns) {
        draw_feature_histogram(panel, column)?;
    }

    root.present()?;
    log::info!("Feature distributions saved to: {}", output_path.display());

    Ok(())
}

fn draw_feature_histogram(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    column: &NumericColumn,
) -> crate::Result<()> {
    let values = column.observed();
    let hist = stats::histogram(&values)
        .with_context(|| format!("cannot plot the distribution of {}", column.name))?;
    let curve = stats::kde(&values, values.len() as f64 * hist.bin_width());

    let x_min = hist.edges[0];
    let x_max = hist.edges[hist.edges.len() - 1];
    let y_max = curve
        .iter()
        .flatten()
        .map(|(_, y)| *y)
        .fold(hist.max_count() as f64, f64::max)
        .max(1.0);

    let mut chart = ChartBuilder::on(area)
        .caption(format!("Distribution of {}", column.name), ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0f64..(y_max * 1.1))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(column.name.as_str())
        .y_desc("Count")
        .axis_desc_style(("sans-serif", 14))
        .draw()?;

    let bars = || {
        hist.counts
            .iter()
            .enumerate()
            .map(|(i, &count)| [(hist.edges[i], 0.0), (hist.edges[i + 1], count as f64)])
    };
    chart.draw_series(bars().map(|r| Rectangle::new(r, HISTOGRAM_COLOR.mix(0.5).filled())))?;
    chart.draw_series(bars().map(|r| Rectangle::new(r, HISTOGRAM_COLOR.stroke_width(1))))?;

    if let Some(points) = curve {
        chart.draw_series(LineSeries::new(points, HISTOGRAM_COLOR.stroke_width(2)))?;
    }

    Ok(())
}
