//! Aggregate indicators computed over the CDA dataset

mod kpi;

pub use kpi::{count_in_collection, status_from_row, STATUS_FIELD};
