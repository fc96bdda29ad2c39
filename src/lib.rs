//! evpop - Electric Vehicle Population Data Aggregation & Chart Viewer
//!
//! Loads the Electric Vehicle Population dataset, groups it by `State` and
//! `Make`, computes the mean `Electric Range` and summed `Base MSRP` per
//! group, and displays the tail of the result as a grouped bar chart.
//!
//! ```no_run
//! use evpop::stats::Aggregator;
//!
//! let aggregator = Aggregator::new()?;
//! for row in aggregator.aggregate_rows()? {
//!     println!("{} / {}: {}", row.state, row.make, row.total_base_msrp);
//! }
//! aggregator.visualize()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod charts;
pub mod data;
pub mod gui;
pub mod stats;
