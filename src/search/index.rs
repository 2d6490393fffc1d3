//! Inverted indices over the two categorical fields of a record store

use crate::models::CdaRecord;
use roaring::RoaringBitmap;
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::HashMap;

/// Position of a record inside the record store
pub type Position = u32;

/// Category and status-code inverted indices.
///
/// Every position of the source store lands in exactly one category bucket
/// and exactly one status bucket.
#[derive(Debug, Clone, Default)]
pub struct CategoricalIndex {
    by_category: HashMap<String, RoaringBitmap>,
    by_status: HashMap<i64, RoaringBitmap>,
    len: u32,
}

/// Bucket counts of a built index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub positions: u32,
    pub categories: usize,
    pub statuses: usize,
}

impl CategoricalIndex {
    /// Build both indices in one pass over `records`.
    ///
    /// Callers guarantee `records.len()` fits in a [`Position`]; the record
    /// store enforces this at load time.
    pub fn build(records: &[CdaRecord]) -> Self {
        let mut by_category: HashMap<String, RoaringBitmap> = HashMap::new();
        let mut by_status: HashMap<i64, RoaringBitmap> = HashMap::new();

        for (position, record) in (0..).zip(records) {
            match by_category.get_mut(record.category.as_str()) {
                Some(bucket) => {
                    bucket.insert(position);
                }
                None => {
                    let mut bucket = RoaringBitmap::new();
                    bucket.insert(position);
                    by_category.insert(record.category.clone(), bucket);
                }
            }
            by_status
                .entry(record.status_code)
                .or_default()
                .insert(position);
        }

        let index = Self {
            by_category,
            by_status,
            len: records.len() as u32,
        };

        tracing::debug!(
            positions = index.len,
            categories = index.by_category.len(),
            statuses = index.by_status.len(),
            "Categorical index built"
        );

        index
    }

    /// Union of the buckets of the requested categories.
    ///
    /// An empty input yields an empty set; "no filter" is the caller's concern.
    pub fn positions_for_categories<I, S>(&self, categories: I) -> RoaringBitmap
    where
        I: IntoIterator<Item = S>,
        S: Borrow<str>,
    {
        let mut acc = RoaringBitmap::new();
        for category in categories {
            if let Some(bucket) = self.by_category.get(category.borrow()) {
                acc |= bucket;
            }
        }
        acc
    }

    /// Union of the buckets of the requested status codes
    pub fn positions_for_statuses<I>(&self, codes: I) -> RoaringBitmap
    where
        I: IntoIterator<Item = i64>,
    {
        let mut acc = RoaringBitmap::new();
        for code in codes {
            if let Some(bucket) = self.by_status.get(&code) {
                acc |= bucket;
            }
        }
        acc
    }

    /// Every indexed position
    pub fn all_positions(&self) -> RoaringBitmap {
        let mut all = RoaringBitmap::new();
        all.insert_range(0..self.len);
        all
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Distinct category values, sorted
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.by_category.keys().map(String::as_str).collect();
        categories.sort_unstable();
        categories
    }

    /// Distinct status codes, sorted
    pub fn statuses(&self) -> Vec<i64> {
        let mut statuses: Vec<i64> = self.by_status.keys().copied().collect();
        statuses.sort_unstable();
        statuses
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            positions: self.len,
            categories: self.by_category.len(),
            statuses: self.by_status.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(num: &str, status: i64, category: &str) -> CdaRecord {
        CdaRecord {
            num_cda: num.to_string(),
            score: 0.5,
            balance: 10.0,
            age_years: 1,
            status_code: status,
            category: category.to_string(),
        }
    }

    fn sample() -> Vec<CdaRecord> {
        vec![
            record("A", 0, "IPTU"),
            record("B", 1, "ISS"),
            record("C", 0, "ISS"),
            record("D", -1, "Taxas"),
            record("E", 5, "IPTU"),
        ]
    }

    #[test]
    fn test_buckets_cover_every_position_once() {
        let records = sample();
        let index = CategoricalIndex::build(&records);
        let all = index.all_positions();

        let categories = index.categories();
        let by_category = index.positions_for_categories(categories.iter().copied());
        let by_status = index.positions_for_statuses(index.statuses());

        assert_eq!(by_category, all);
        assert_eq!(by_status, all);

        let bucket_total: u64 = categories
            .iter()
            .map(|c| index.positions_for_categories([*c]).len())
            .sum();
        assert_eq!(bucket_total, records.len() as u64);
    }

    #[test]
    fn test_union_of_categories() {
        let index = CategoricalIndex::build(&sample());
        let positions: Vec<u32> = index.positions_for_categories(["IPTU", "Taxas"]).iter().collect();
        assert_eq!(positions, vec![0, 3, 4]);
    }

    #[test]
    fn test_unknown_keys_and_empty_input_match_nothing() {
        let index = CategoricalIndex::build(&sample());
        assert!(index.positions_for_categories(["ITBI"]).is_empty());
        assert!(index.positions_for_categories(Vec::<String>::new()).is_empty());
        assert!(index.positions_for_statuses([42]).is_empty());
        assert!(index.positions_for_statuses([]).is_empty());
    }

    #[test]
    fn test_statuses_include_unknown_codes() {
        let index = CategoricalIndex::build(&sample());
        assert_eq!(index.statuses(), vec![-1, 0, 1, 5]);
        let in_collection: Vec<u32> = index.positions_for_statuses([0]).iter().collect();
        assert_eq!(in_collection, vec![0, 2]);
    }

    #[test]
    fn test_empty_store() {
        let index = CategoricalIndex::build(&[]);
        assert!(index.is_empty());
        assert!(index.all_positions().is_empty());
        assert_eq!(
            index.stats(),
            IndexStats {
                positions: 0,
                categories: 0,
                statuses: 0
            }
        );
    }
}
