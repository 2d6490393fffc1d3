//! In-memory search over the CDA record store
//!
//! This module provides the filtering engine behind `/cda/search`:
//!
//! - **Categorical Index**: roaring-bitmap inverted indices by category
//!   ("natureza") and by status code, built once per dataset
//! - **Situation Normalizer**: maps codes and labels to status codes
//! - **Query Engine**: indexed candidate selection, residual range and
//!   substring predicates, stable sort and pagination
//!
//! # Example
//!
//! ```no_run
//! use cda_api::search::{search, CategoricalIndex, SearchQuery, SortField, SortOrder};
//! use cda_api::state::RecordStore;
//!
//! # fn run(store: &RecordStore) {
//! let index = CategoricalIndex::build(store.records());
//! let query = SearchQuery::new()
//!     .with_situations(vec!["Em cobrança"])
//!     .with_balance(Some(1_000.0), None)
//!     .with_sort(SortField::Score, SortOrder::Descending)
//!     .with_page(1, 20);
//!
//! let page = search(store, &index, &query);
//! println!("{} matching CDAs", page.total);
//! # }
//! ```

mod engine;
mod index;
mod query;
mod situation;

pub use engine::{search, SearchPage};
pub use index::{CategoricalIndex, IndexStats, Position};
pub use query::{NumericRange, SearchQuery, SortField, SortOrder, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use situation::normalize_situations;
