//! Dataset Loader Module
//! Materializes the Electric Vehicle Population dataset using Polars, from a
//! remote URL, a local CSV file, or a frame the caller already holds.

use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Fixed remote location of the Electric Vehicle Population dataset.
pub const EV_POPULATION_URL: &str =
    "https://raw.githubusercontent.com/saidadi/codingscripts/main/sai/Electric_Vehicle_Population_Data%20(3).csv";

/// Rows sampled for CSV schema inference.
const INFER_SCHEMA_ROWS: usize = 10_000;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to fetch dataset: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("No data loaded")]
    NoData,
}

/// Where the dataset comes from.
///
/// The source is injected rather than baked into the aggregation layer, so
/// callers can aggregate a local file or an in-memory frame without any
/// network access. [`DataSource::default`] is the remote EV population
/// resource.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Remote CSV fetched over HTTP.
    Remote(String),
    /// CSV file on the local filesystem.
    File(PathBuf),
    /// Frame already materialized by the caller.
    Frame(DataFrame),
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::Remote(EV_POPULATION_URL.to_string())
    }
}

impl DataSource {
    pub fn remote(url: impl Into<String>) -> Self {
        DataSource::Remote(url.into())
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        DataSource::File(path.into())
    }
}

/// Handles dataset loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Materialize a source as a DataFrame.
    ///
    /// Remote sources issue exactly one HTTP request per call, block until
    /// the response is complete, and do not retry. Column types follow the
    /// CSV reader's inference over the first [`INFER_SCHEMA_ROWS`] rows.
    pub fn load(source: DataSource) -> Result<DataFrame, LoaderError> {
        let df = match source {
            DataSource::Remote(url) => Self::load_remote(&url)?,
            DataSource::File(path) => Self::load_csv(&path)?,
            DataSource::Frame(df) => df,
        };

        if df.width() == 0 {
            return Err(LoaderError::NoData);
        }
        Ok(df)
    }

    fn load_remote(url: &str) -> Result<DataFrame, LoaderError> {
        info!(url, "fetching dataset");
        let response = reqwest::blocking::get(url)?.error_for_status()?;
        let bytes = response.bytes()?;

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
            .finish()?;

        info!(rows = df.height(), columns = df.width(), "dataset fetched");
        Ok(df)
    }

    fn load_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        info!(path = %path.display(), "loading CSV file");

        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        info!(rows = df.height(), columns = df.width(), "CSV loaded");
        Ok(df)
    }
}
