//! Read-only HTTP API over CDA (tax-debt certificate) records.
//!
//! The dataset is loaded once, validated, indexed by category and status,
//! and then served through search, KPI and summary endpoints.

pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod search;
pub mod state;
pub mod summary;

pub use error::{AppError, Result};
