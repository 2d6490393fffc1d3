pub mod cache;
pub mod dataset;
pub mod error;
pub mod records;
pub mod source;

pub use cache::*;
pub use dataset::{Dataset, DatasetCache};
pub use error::DatasetError;
pub use records::RecordStore;
pub use source::{FileRowSource, InMemoryRowSource, RawRows, RowSource};
