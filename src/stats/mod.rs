//! Stats module - grouped summary statistics

mod aggregator;

pub use aggregator::{
    AggregateError, AggregateRow, Aggregator, BASE_MSRP, ELECTRIC_RANGE, MAKE, STATE,
};
