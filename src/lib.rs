//! activity-eda: exploratory data analysis for activity-recognition datasets
//!
//! Loads a CSV with Polars, reports shape, missing values, duplicates, schema
//! and summary statistics, and renders a class distribution chart, a
//! correlation heatmap and feature histograms with Plotters.

pub mod cli;
pub mod data;
pub mod explore;
pub mod stats;
pub mod viz;

// Re-export public items for easier access
pub use cli::Args;
pub use data::{load_dataset, numeric_columns, NumericColumn};
pub use explore::{explore_activity_data, write_exploration, ExplorationReport, ExploreOptions};
pub use stats::{correlation_matrix, CorrelationMatrix};

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
