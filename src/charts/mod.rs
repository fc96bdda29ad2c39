//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{ChartData, ChartPlotter, MakeSeries, CHART_TAIL_ROWS, CHART_TITLE, PALETTE};
pub use renderer::StaticChartRenderer;
