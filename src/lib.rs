//! Metric normalization and league-comparison engine for soccer play-style data.
//!
//! A [`catalog::MetricCatalog`] describes each metric (category, range,
//! directionality, formatting). A [`data::store::MetricValueStore`] holds raw
//! per-team values by result bucket. [`analysis::AggregationEngine`] turns both
//! into ranked league snapshots, 0–100 radar scores and pairwise comparisons.

pub mod analysis;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod data;
pub mod display;
pub mod error;

pub use analysis::AggregationEngine;
pub use catalog::{Category, Direction, MetricCatalog, MetricDefinition};
pub use data::store::{MetricValueStore, ResultBucket, TeamMetricValue, TeamValue};
pub use error::AppError;
