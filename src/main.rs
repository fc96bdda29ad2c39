//! Native entry point: load the remote dataset in the background and show
//! the aggregated chart.

use evpop::data::DataSource;
use evpop::gui::ChartApp;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    ChartApp::load_in_background(DataSource::default()).run()
}
