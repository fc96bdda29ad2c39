//! Static Chart Renderer
//! Renders the aggregated bar chart to a PNG with plotters, for use outside
//! the interactive viewer.

use crate::charts::{ChartData, CHART_TITLE, PALETTE};
use anyhow::Context;
use plotters::prelude::*;
use std::path::Path;

/// Fraction of each state slot occupied by its bar group, kept in step with
/// the interactive plotter.
const GROUP_WIDTH: f64 = 0.8;

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the grouped bar chart to `path` as a PNG.
    ///
    /// An empty chart still produces a valid image with axes and title.
    pub fn render_to_file(
        chart: &ChartData,
        path: &Path,
        width: u32,
        height: u32,
    ) -> anyhow::Result<()> {
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;

        let n_states = chart.states.len().max(1);
        let y_max = chart.max_total().max(1.0) * 1.1;

        let mut ctx = ChartBuilder::on(&root)
            .caption(CHART_TITLE, ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5f64..(n_states as f64 - 0.5), 0f64..y_max)?;

        let states = &chart.states;
        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(n_states)
            .x_label_formatter(&|x| {
                let idx = x.round();
                if (x - idx).abs() < 1e-6 && idx >= 0.0 && (idx as usize) < states.len() {
                    states[idx as usize].clone()
                } else {
                    String::new()
                }
            })
            .x_desc("State")
            .y_desc("Base MSRP")
            .draw()?;

        let bar_width = GROUP_WIDTH / chart.series.len().max(1) as f64;

        for (series_idx, series) in chart.series.iter().enumerate() {
            let color = Self::series_rgb(series_idx);

            ctx.draw_series(series.totals.iter().enumerate().filter_map(
                |(state_idx, total)| {
                    let total = (*total)?;
                    let left =
                        state_idx as f64 - GROUP_WIDTH / 2.0 + series_idx as f64 * bar_width;
                    Some(Rectangle::new(
                        [(left, 0.0), (left + bar_width, total)],
                        color.filled(),
                    ))
                },
            ))?
            .label(series.make.clone())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
            });
        }

        if !chart.series.is_empty() {
            ctx.configure_series_labels()
                .border_style(&BLACK)
                .background_style(&WHITE.mix(0.8))
                .draw()?;
        }

        root.present().context("failed to write chart image")?;
        Ok(())
    }

    fn series_rgb(series_index: usize) -> RGBColor {
        let c = PALETTE[series_index % PALETTE.len()];
        RGBColor(c.r(), c.g(), c.b())
    }
}
