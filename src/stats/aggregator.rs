//! Aggregation Module
//! Groups the EV population frame by state and make and computes the
//! per-group summary statistics.

use crate::charts::{ChartData, StaticChartRenderer, CHART_TAIL_ROWS};
use crate::data::{DataLoader, DataSource, LoaderError};
use crate::gui::ChartApp;
use polars::prelude::*;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Grouping key columns.
pub const STATE: &str = "State";
pub const MAKE: &str = "Make";

/// Measure columns.
pub const ELECTRIC_RANGE: &str = "Electric Range";
pub const BASE_MSRP: &str = "Base MSRP";

const REQUIRED_COLUMNS: [&str; 4] = [STATE, MAKE, ELECTRIC_RANGE, BASE_MSRP];

/// Rendered chart dimensions, matching the original 12x6 inch figure.
const CHART_IMAGE_SIZE: (u32, u32) = (1200, 600);

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// One summary row per (state, make) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub state: String,
    pub make: String,
    /// Arithmetic mean of `Electric Range` over the group; `None` when the
    /// group has no valid numeric values.
    pub mean_electric_range: Option<f64>,
    /// Sum of `Base MSRP` over the group; missing values contribute zero.
    pub total_base_msrp: f64,
}

/// Aggregates the Electric Vehicle Population data by state and make.
///
/// The frame is loaded once at construction and never mutated afterwards;
/// every aggregation call recomputes from it.
pub struct Aggregator {
    df: DataFrame,
}

impl Aggregator {
    /// Load the fixed remote EV population dataset.
    ///
    /// Issues one blocking HTTP request; fails with a [`LoaderError`] when
    /// the resource cannot be fetched or parsed.
    pub fn new() -> Result<Self, LoaderError> {
        Self::from_source(DataSource::default())
    }

    /// Load from an injected source.
    pub fn from_source(source: DataSource) -> Result<Self, LoaderError> {
        Ok(Self {
            df: DataLoader::load(source)?,
        })
    }

    /// Wrap an already-materialized frame. No I/O.
    pub fn from_frame(df: DataFrame) -> Self {
        Self { df }
    }

    /// The loaded frame.
    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    /// Group by (`State`, `Make`) and compute `mean(Electric Range)` and
    /// `sum(Base MSRP)` per group. Output columns keep the source names.
    ///
    /// Groups appear in first-seen order of their key in the input frame,
    /// identical across repeated calls on the same frame. Missing numeric
    /// values are excluded from the mean and sum to zero.
    pub fn aggregate(&self) -> Result<DataFrame, AggregateError> {
        for column in REQUIRED_COLUMNS {
            if !self
                .df
                .get_column_names()
                .iter()
                .any(|c| c.as_str() == column)
            {
                return Err(AggregateError::MissingColumn(column.to_string()));
            }
        }

        let aggregated = self
            .df
            .clone()
            .lazy()
            .group_by_stable([col(STATE), col(MAKE)])
            .agg([col(ELECTRIC_RANGE).mean(), col(BASE_MSRP).sum()])
            .collect()?;

        info!(groups = aggregated.height(), "aggregated population data");
        Ok(aggregated)
    }

    /// Aggregate and extract typed summary rows.
    pub fn aggregate_rows(&self) -> Result<Vec<AggregateRow>, AggregateError> {
        let aggregated = self.aggregate()?;
        rows_from_frame(&aggregated)
    }

    /// Chart-ready view of the aggregate tail.
    ///
    /// Keeps the last [`CHART_TAIL_ROWS`] rows of the aggregate in group
    /// order. This is a positional slice inherited from the original
    /// analysis, not a ranked top-N selection; shorter aggregates pass
    /// through whole.
    pub fn chart_data(&self) -> Result<ChartData, AggregateError> {
        let rows = self.aggregate_rows()?;
        Ok(ChartData::from_rows(tail_slice(&rows, CHART_TAIL_ROWS)))
    }

    /// Aggregate and display the grouped bar chart in a native window.
    ///
    /// Blocks until the window is closed. Fails only when the aggregation
    /// itself fails or the window cannot be opened; an empty aggregate shows
    /// an empty chart.
    pub fn visualize(&self) -> anyhow::Result<()> {
        let chart = self.chart_data()?;
        ChartApp::with_chart(chart).run()
    }

    /// Render the same chart to a PNG file.
    pub fn render_chart(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let chart = self.chart_data()?;
        let (width, height) = CHART_IMAGE_SIZE;
        StaticChartRenderer::render_to_file(&chart, path.as_ref(), width, height)
    }
}

/// Positional tail of the aggregate; inputs shorter than `n` pass through
/// whole.
fn tail_slice<T>(rows: &[T], n: usize) -> &[T] {
    &rows[rows.len().saturating_sub(n)..]
}

fn rows_from_frame(df: &DataFrame) -> Result<Vec<AggregateRow>, AggregateError> {
    let states = df.column(STATE)?;
    let makes = df.column(MAKE)?;
    let means = df.column(ELECTRIC_RANGE)?.cast(&DataType::Float64)?;
    let sums = df.column(BASE_MSRP)?.cast(&DataType::Float64)?;
    let means = means.f64()?;
    let sums = sums.f64()?;

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let state = states.get(i)?;
        let make = makes.get(i)?;
        rows.push(AggregateRow {
            state: state.to_string().trim_matches('"').to_string(),
            make: make.to_string().trim_matches('"').to_string(),
            mean_electric_range: means.get(i),
            total_base_msrp: sums.get(i).unwrap_or(0.0),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn sample_frame() -> DataFrame {
        df!(
            STATE => ["CA", "CA", "CA"],
            MAKE => ["TESLA", "TESLA", "NISSAN"],
            ELECTRIC_RANGE => [300.0, 250.0, 150.0],
            BASE_MSRP => [0.0, 0.0, 30_000.0],
        )
        .unwrap()
    }

    #[test]
    fn one_row_per_state_make_pair() -> anyhow::Result<()> {
        let rows = Aggregator::from_frame(sample_frame()).aggregate_rows()?;

        let pairs: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.state.as_str(), r.make.as_str()))
            .collect();
        assert_eq!(pairs, vec![("CA", "TESLA"), ("CA", "NISSAN")]);
        Ok(())
    }

    #[test]
    fn computes_mean_range_and_total_msrp() -> anyhow::Result<()> {
        let rows = Aggregator::from_frame(sample_frame()).aggregate_rows()?;

        assert_eq!(rows[0].mean_electric_range, Some(275.0));
        assert_eq!(rows[0].total_base_msrp, 0.0);
        assert_eq!(rows[1].mean_electric_range, Some(150.0));
        assert_eq!(rows[1].total_base_msrp, 30_000.0);
        Ok(())
    }

    #[test]
    fn repeated_calls_are_identical() -> anyhow::Result<()> {
        let agg = Aggregator::from_frame(sample_frame());
        let first = agg.aggregate()?;
        let second = agg.aggregate()?;
        assert!(first.equals_missing(&second));
        Ok(())
    }

    #[test]
    fn empty_frame_yields_no_rows() -> anyhow::Result<()> {
        let df = df!(
            STATE => Vec::<String>::new(),
            MAKE => Vec::<String>::new(),
            ELECTRIC_RANGE => Vec::<f64>::new(),
            BASE_MSRP => Vec::<f64>::new(),
        )?;

        let agg = Aggregator::from_frame(df);
        assert!(agg.aggregate_rows()?.is_empty());
        assert!(agg.chart_data()?.is_empty());
        Ok(())
    }

    #[test]
    fn missing_msrp_column_is_reported() {
        let df = df!(
            STATE => ["CA"],
            MAKE => ["TESLA"],
            ELECTRIC_RANGE => [300.0],
        )
        .unwrap();

        let err = Aggregator::from_frame(df).aggregate().unwrap_err();
        assert!(matches!(err, AggregateError::MissingColumn(name) if name == BASE_MSRP));
    }

    #[test]
    fn null_ranges_are_excluded_from_the_mean() -> anyhow::Result<()> {
        let df = df!(
            STATE => ["WA", "WA"],
            MAKE => ["KIA", "KIA"],
            ELECTRIC_RANGE => [Some(100.0), None],
            BASE_MSRP => [Some(20_000.0), None],
        )?;

        let rows = Aggregator::from_frame(df).aggregate_rows()?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].mean_electric_range, Some(100.0));
        assert_eq!(rows[0].total_base_msrp, 20_000.0);
        Ok(())
    }

    #[test]
    fn all_null_group_has_no_mean_and_zero_sum() -> anyhow::Result<()> {
        let df = df!(
            STATE => ["OR"],
            MAKE => ["FORD"],
            ELECTRIC_RANGE => [Option::<f64>::None],
            BASE_MSRP => [Option::<f64>::None],
        )?;

        let rows = Aggregator::from_frame(df).aggregate_rows()?;
        assert_eq!(rows[0].mean_electric_range, None);
        assert_eq!(rows[0].total_base_msrp, 0.0);
        Ok(())
    }

    #[test]
    fn chart_tail_is_positional() {
        let rows: Vec<i32> = (0..30).collect();
        assert_eq!(tail_slice(&rows, 20), &rows[10..]);

        let short: Vec<i32> = (0..5).collect();
        assert_eq!(tail_slice(&short, 20), &short[..]);
    }

    #[test]
    fn charted_slice_keeps_the_last_twenty_groups() -> anyhow::Result<()> {
        let states: Vec<String> = (0..25).map(|i| format!("S{i:02}")).collect();
        let msrp: Vec<f64> = (0..25).map(|i| i as f64 * 1_000.0).collect();
        let df = df!(
            STATE => states,
            MAKE => vec!["TESLA"; 25],
            ELECTRIC_RANGE => vec![100.0; 25],
            BASE_MSRP => msrp,
        )?;

        let chart = Aggregator::from_frame(df).chart_data()?;
        assert_eq!(chart.states.len(), 20);
        assert_eq!(chart.states.first().map(String::as_str), Some("S05"));
        assert_eq!(chart.states.last().map(String::as_str), Some("S24"));
        Ok(())
    }
}
