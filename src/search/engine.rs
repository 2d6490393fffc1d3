//! Filtering, sorting and pagination over the record store

use crate::models::CdaRecord;
use crate::search::index::CategoricalIndex;
use crate::search::query::{SearchQuery, SortField, SortOrder};
use crate::search::situation::normalize_situations;
use crate::state::RecordStore;
use roaring::RoaringBitmap;
use std::cmp::Ordering;
use std::time::Instant;

/// One page of search results
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage<'a> {
    /// Matches before pagination
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
    pub items: Vec<&'a CdaRecord>,
    /// The situation filter normalized to nothing, so the search never ran
    pub unsatisfiable: bool,
}

impl<'a> SearchPage<'a> {
    fn empty(query: &SearchQuery, unsatisfiable: bool) -> Self {
        Self {
            total: 0,
            page: query.page,
            page_size: query.page_size,
            items: Vec::new(),
            unsatisfiable,
        }
    }

    /// Outcome label used for metrics
    pub fn outcome(&self) -> &'static str {
        if self.unsatisfiable {
            "unsatisfiable"
        } else if self.total == 0 {
            "empty"
        } else {
            "matched"
        }
    }
}

/// Candidate positions left after the indexed filters
enum Candidates {
    All,
    Subset(RoaringBitmap),
}

impl Candidates {
    fn constrain(self, positions: RoaringBitmap) -> Self {
        match self {
            Candidates::All => Candidates::Subset(positions),
            Candidates::Subset(current) => Candidates::Subset(current & positions),
        }
    }
}

/// Run a search against an immutable store and its index.
///
/// Candidates are visited in ascending position order and sorted with a
/// stable sort, so records with equal sort keys keep their load order.
pub fn search<'a>(
    store: &'a RecordStore,
    index: &CategoricalIndex,
    query: &SearchQuery,
) -> SearchPage<'a> {
    let start_time = Instant::now();

    let status_codes = match &query.situations {
        Some(tokens) => {
            let codes = normalize_situations(tokens);
            if codes.is_empty() && !tokens.is_empty() {
                tracing::debug!(tokens = ?tokens, "Situation filter matches no known status");
                return SearchPage::empty(query, true);
            }
            Some(codes)
        }
        None => None,
    };

    let mut candidates = Candidates::All;
    if let Some(categories) = &query.categories {
        candidates = candidates.constrain(index.positions_for_categories(categories.iter().map(String::as_str)));
    }
    if let Some(codes) = status_codes {
        candidates = candidates.constrain(index.positions_for_statuses(codes));
    }

    let mut matches: Vec<&CdaRecord> = match candidates {
        Candidates::All => store.iter().filter(|r| matches_residual(r, query)).collect(),
        Candidates::Subset(positions) => positions
            .iter()
            .filter_map(|p| store.get(p))
            .filter(|r| matches_residual(r, query))
            .collect(),
    };

    let total = matches.len();
    sort_records(&mut matches, query.sort, query.order);

    let items: Vec<&CdaRecord> = matches
        .into_iter()
        .skip(query.offset())
        .take(query.page_size as usize)
        .collect();

    tracing::debug!(
        total,
        returned = items.len(),
        page = query.page,
        page_size = query.page_size,
        sort = %query.sort,
        order = %query.order,
        elapsed_us = start_time.elapsed().as_micros() as u64,
        "Search executed"
    );

    SearchPage {
        total,
        page: query.page,
        page_size: query.page_size,
        items,
        unsatisfiable: false,
    }
}

/// Substring, age, balance and score predicates; all must hold
fn matches_residual(record: &CdaRecord, query: &SearchQuery) -> bool {
    if let Some(text) = &query.text {
        if !record.num_cda.contains(text.as_str()) {
            return false;
        }
    }
    query.age.contains(record.age_years)
        && query.balance.contains(record.balance)
        && query.score.contains(record.score)
}

/// Stable sort; descending reverses the comparison, not the list
fn sort_records(records: &mut [&CdaRecord], field: SortField, order: SortOrder) {
    let compare = |a: &&CdaRecord, b: &&CdaRecord| -> Ordering {
        match field {
            SortField::Balance => a.balance.total_cmp(&b.balance),
            SortField::Age => a.age_years.cmp(&b.age_years),
            SortField::Score => a.score.total_cmp(&b.score),
        }
    };

    match order {
        SortOrder::Ascending => records.sort_by(compare),
        SortOrder::Descending => records.sort_by(|a, b| compare(b, a)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(num: &str, score: f64, balance: f64, age: u32, status: i64, category: &str) -> CdaRecord {
        CdaRecord {
            num_cda: num.to_string(),
            score,
            balance,
            age_years: age,
            status_code: status,
            category: category.to_string(),
        }
    }

    fn fixture() -> (RecordStore, CategoricalIndex) {
        let store = RecordStore::from_records(vec![
            record("A1", 0.5, 100.0, 2, 0, "X"),
            record("B2", 0.9, 50.0, 5, 1, "Y"),
        ])
        .unwrap();
        let index = CategoricalIndex::build(store.records());
        (store, index)
    }

    fn nums(page: &SearchPage<'_>) -> Vec<String> {
        page.items.iter().map(|r| r.num_cda.clone()).collect()
    }

    #[test]
    fn test_sort_by_balance_desc() {
        let (store, index) = fixture();
        let query = SearchQuery::new()
            .with_sort(SortField::Balance, SortOrder::Descending)
            .with_page(1, 10);
        let page = search(&store, &index, &query);

        assert_eq!(page.total, 2);
        assert_eq!(nums(&page), vec!["A1", "B2"]);
        assert_eq!(page.outcome(), "matched");
    }

    #[test]
    fn test_situation_label_filter() {
        let (store, index) = fixture();
        let page = search(&store, &index, &SearchQuery::new().with_situations(vec!["Quitada"]));
        assert_eq!(page.total, 1);
        assert_eq!(nums(&page), vec!["B2"]);
    }

    #[test]
    fn test_substring_without_match() {
        let (store, index) = fixture();
        let page = search(&store, &index, &SearchQuery::new().with_text("Z9"));
        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
        assert_eq!(page.outcome(), "empty");
    }

    #[test]
    fn test_unsatisfiable_situation_short_circuits() {
        let (store, index) = fixture();
        let query = SearchQuery::new()
            .with_situations(vec!["not-a-real-label"])
            .with_page(4, 25);
        let page = search(&store, &index, &query);

        assert_eq!(page.total, 0);
        assert!(page.unsatisfiable);
        assert_eq!((page.page, page.page_size), (4, 25));
        assert_eq!(page.outcome(), "unsatisfiable");
    }

    #[test]
    fn test_explicit_empty_category_set_matches_nothing() {
        let (store, index) = fixture();
        let page = search(&store, &index, &SearchQuery::new().with_categories(Vec::<String>::new()));
        assert_eq!(page.total, 0);
        assert!(!page.unsatisfiable);
    }

    #[test]
    fn test_category_and_situation_intersect() {
        let (store, index) = fixture();
        let query = SearchQuery::new()
            .with_categories(vec!["X", "Y"])
            .with_situations(vec!["1"]);
        let page = search(&store, &index, &query);
        assert_eq!(nums(&page), vec!["B2"]);

        let disjoint = SearchQuery::new()
            .with_categories(vec!["X"])
            .with_situations(vec!["1"]);
        assert_eq!(search(&store, &index, &disjoint).total, 0);
    }

    #[test]
    fn test_substring_is_case_sensitive() {
        let (store, index) = fixture();
        assert_eq!(search(&store, &index, &SearchQuery::new().with_text("a1")).total, 0);
        assert_eq!(search(&store, &index, &SearchQuery::new().with_text("A")).total, 1);
    }

    #[test]
    fn test_ties_keep_load_order() {
        let store = RecordStore::from_records(vec![
            record("first", 0.5, 10.0, 1, 0, "X"),
            record("second", 0.5, 10.0, 1, 0, "Y"),
            record("third", 0.5, 10.0, 1, 0, "X"),
        ])
        .unwrap();
        let index = CategoricalIndex::build(store.records());

        for order in [SortOrder::Ascending, SortOrder::Descending] {
            let query = SearchQuery::new()
                .with_categories(vec!["Y", "X"])
                .with_sort(SortField::Score, order);
            let page = search(&store, &index, &query);
            assert_eq!(nums(&page), vec!["first", "second", "third"]);
        }
    }

    #[test]
    fn test_page_past_end_keeps_total() {
        let (store, index) = fixture();
        let page = search(&store, &index, &SearchQuery::new().with_page(2, 10));
        assert_eq!(page.total, 2);
        assert!(page.items.is_empty());

        let partial = search(&store, &index, &SearchQuery::new().with_page(2, 1));
        assert_eq!(nums(&partial), vec!["B2"]);
    }
}
