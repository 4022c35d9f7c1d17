//! Salary distribution plot.
//!
//! Sorts every stored salary ascending and plots it against its rank, which
//! gives a cumulative-distribution style picture of the league's pay.

use crate::analysis::normalizer::{parse_lines, MalformedPolicy, NumberStyle};
use crate::error::{Result, SalaryError};
use crate::models::{ChartSpec, PlotPoint, PlotSeries, SalaryRecord};
use crate::store::SalaryStore;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info};

/// Minimum number of records worth plotting.
pub const MIN_PLOT_POINTS: usize = 2;

/// DejaVu Sans, bundled so text renders without system fonts.
static CHART_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Register the bundled font under the family plotters asks for.
fn ensure_chart_font() -> Result<()> {
    static REGISTERED: OnceLock<std::result::Result<(), String>> = OnceLock::new();

    REGISTERED
        .get_or_init(|| {
            register_font("sans-serif", FontStyle::Normal, CHART_FONT).map_err(|_| "invalid bundled chart font".to_string())
        })
        .clone()
        .map_err(SalaryError::Render)
}

/// Something that can turn a series into an image file.
pub trait ChartRenderer {
    fn render(&self, series: &PlotSeries, spec: &ChartSpec, path: &Path) -> Result<()>;
}

/// PNG renderer backed by plotters' bitmap backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlottersRenderer;

impl ChartRenderer for PlottersRenderer {
    fn render(&self, series: &PlotSeries, spec: &ChartSpec, path: &Path) -> Result<()> {
        let (y_min, y_max) = series
            .value_range()
            .ok_or_else(|| SalaryError::EmptyDataset("nothing to plot".to_string()))?;
        // Flat data still needs a non-empty axis range.
        let pad = if y_max > y_min {
            (y_max - y_min) * 0.05
        } else {
            y_max.abs().max(1.0) * 0.1
        };
        let x_max = (series.len().saturating_sub(1)).max(1) as f64;

        ensure_chart_font()?;

        let root = BitMapBackend::new(path, (spec.width, spec.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(0f64..x_max, (y_min - pad)..(y_max + pad))
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .x_desc(spec.x_label.as_str())
            .y_desc(spec.y_label.as_str())
            .draw()
            .map_err(render_error)?;

        chart
            .draw_series(LineSeries::new(
                series.points.iter().map(PlotPoint::coords),
                &BLUE,
            ))
            .map_err(render_error)?;

        chart
            .draw_series(
                series
                    .points
                    .iter()
                    .map(|p| Circle::new(p.coords(), 2, BLUE.filled())),
            )
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
        Ok(())
    }
}

fn render_error<E: std::fmt::Display>(e: E) -> SalaryError {
    SalaryError::Render(e.to_string())
}

/// Sort ascending and index each salary by its rank.
pub fn build_series(records: &[SalaryRecord]) -> PlotSeries {
    let mut sorted = records.to_vec();
    sorted.sort();

    PlotSeries {
        points: sorted
            .into_iter()
            .enumerate()
            .map(|(index, value)| PlotPoint { index, value })
            .collect(),
    }
}

/// Read the store and render the distribution plot to `path`.
///
/// Lines are parsed strictly; with [`MalformedPolicy::Abort`] one bad line
/// fails the step. Fewer than [`MIN_PLOT_POINTS`] records writes nothing.
pub fn visualize<R: ChartRenderer>(
    store: &SalaryStore,
    policy: MalformedPolicy,
    renderer: &R,
    spec: &ChartSpec,
    path: &Path,
) -> Result<PlotSeries> {
    let lines = store.read_all()?;
    let records = parse_lines(&lines, NumberStyle::Strict, policy)?;

    if records.len() < MIN_PLOT_POINTS {
        return Err(SalaryError::EmptyDataset(format!(
            "insufficient data to plot ({} record(s), need {})",
            records.len(),
            MIN_PLOT_POINTS
        )));
    }

    let series = build_series(&records);
    debug!("Built plot series with {} points", series.len());

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    renderer.render(&series, spec, path)?;
    info!("Rendered salary plot to {}", path.display());

    Ok(series)
}
