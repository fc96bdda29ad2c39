//! Chart Plotter Module
//! Draws the interactive grouped bar chart using egui_plot.

use crate::stats::AggregateRow;
use egui::Color32;
use egui_plot::{Bar, BarChart, Legend, Plot};

/// Fixed chart title, kept from the original analysis.
pub const CHART_TITLE: &str = "Aggregated Data: Base MSRP by State and Make";

/// Rows charted from the end of the aggregate.
pub const CHART_TAIL_ROWS: usize = 20;

/// Color palette for makes
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

/// Fraction of each state slot occupied by its bar group.
const GROUP_WIDTH: f64 = 0.8;

/// Chart-ready view of the aggregate tail: states on the x-axis, one bar
/// series per make.
#[derive(Debug, Clone, Default)]
pub struct ChartData {
    /// States in first-seen order of the charted slice.
    pub states: Vec<String>,
    /// One series per make, in first-seen order of the charted slice.
    pub series: Vec<MakeSeries>,
}

/// Summed MSRP of one make across the charted states.
#[derive(Debug, Clone)]
pub struct MakeSeries {
    pub make: String,
    /// Indexed like [`ChartData::states`]; `None` when the (state, make)
    /// pair is absent from the slice.
    pub totals: Vec<Option<f64>>,
}

impl ChartData {
    pub fn from_rows(rows: &[AggregateRow]) -> Self {
        let mut states: Vec<String> = Vec::new();
        let mut makes: Vec<String> = Vec::new();
        for row in rows {
            if !states.contains(&row.state) {
                states.push(row.state.clone());
            }
            if !makes.contains(&row.make) {
                makes.push(row.make.clone());
            }
        }

        let series = makes
            .into_iter()
            .map(|make| {
                let totals = states
                    .iter()
                    .map(|state| {
                        rows.iter()
                            .find(|r| r.state == *state && r.make == make)
                            .map(|r| r.total_base_msrp)
                    })
                    .collect();
                MakeSeries { make, totals }
            })
            .collect();

        Self { states, series }
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Largest charted total, 0.0 when the chart is empty.
    pub fn max_total(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.totals.iter().flatten())
            .fold(0.0, |acc, &v| acc.max(v))
    }
}

/// Draws the aggregated bar chart using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Get color for a make series.
    pub fn series_color(series_index: usize) -> Color32 {
        PALETTE[series_index % PALETTE.len()]
    }

    /// Draw the grouped bar chart.
    /// X-axis: states, Y-axis: summed Base MSRP, one color per make.
    pub fn draw_msrp_chart(ui: &mut egui::Ui, chart: &ChartData) {
        let x_labels: Vec<String> = chart.states.clone();
        let bar_width = GROUP_WIDTH / chart.series.len().max(1) as f64;

        Plot::new("msrp_by_state")
            .legend(Legend::default())
            .x_axis_label("State")
            .y_axis_label("Base MSRP")
            .allow_scroll(false)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if (mark.value - idx as f64).abs() < 1e-6 && idx < x_labels.len() {
                    x_labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for (series_idx, series) in chart.series.iter().enumerate() {
                    let color = Self::series_color(series_idx);
                    let offset = (series_idx as f64 + 0.5) * bar_width - GROUP_WIDTH / 2.0;

                    let bars: Vec<Bar> = series
                        .totals
                        .iter()
                        .enumerate()
                        .filter_map(|(state_idx, total)| {
                            total.map(|t| {
                                Bar::new(state_idx as f64 + offset, t).width(bar_width * 0.9)
                            })
                        })
                        .collect();

                    plot_ui.bar_chart(BarChart::new(bars).color(color).name(&series.make));
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(state: &str, make: &str, msrp: f64) -> AggregateRow {
        AggregateRow {
            state: state.to_string(),
            make: make.to_string(),
            mean_electric_range: Some(100.0),
            total_base_msrp: msrp,
        }
    }

    #[test]
    fn states_and_makes_keep_first_seen_order() {
        let rows = vec![
            row("WA", "TESLA", 1.0),
            row("CA", "TESLA", 2.0),
            row("WA", "NISSAN", 3.0),
        ];

        let chart = ChartData::from_rows(&rows);
        assert_eq!(chart.states, vec!["WA", "CA"]);
        let makes: Vec<&str> = chart.series.iter().map(|s| s.make.as_str()).collect();
        assert_eq!(makes, vec!["TESLA", "NISSAN"]);
    }

    #[test]
    fn absent_pairs_have_no_bar() {
        let rows = vec![row("WA", "TESLA", 1.0), row("CA", "NISSAN", 3.0)];

        let chart = ChartData::from_rows(&rows);
        assert_eq!(chart.series[0].totals, vec![Some(1.0), None]);
        assert_eq!(chart.series[1].totals, vec![None, Some(3.0)]);
    }

    #[test]
    fn empty_input_builds_an_empty_chart() {
        let chart = ChartData::from_rows(&[]);
        assert!(chart.is_empty());
        assert!(chart.series.is_empty());
        assert_eq!(chart.max_total(), 0.0);
    }

    #[test]
    fn max_total_spans_all_series() {
        let rows = vec![
            row("WA", "TESLA", 5.0),
            row("WA", "NISSAN", 9.0),
            row("CA", "TESLA", 7.0),
        ];

        assert_eq!(ChartData::from_rows(&rows).max_total(), 9.0);
    }
}
