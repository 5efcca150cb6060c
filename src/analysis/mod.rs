//! Aggregation of dataset records into reports.

pub mod aggregator;

pub use aggregator::*;
