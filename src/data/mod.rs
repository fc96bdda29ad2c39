//! Data module - dataset sources and CSV loading

mod loader;

pub use loader::{DataLoader, DataSource, LoaderError, EV_POPULATION_URL};
