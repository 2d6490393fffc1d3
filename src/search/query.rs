//! Typed search parameters

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Default number of records per page
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Largest accepted page size
pub const MAX_PAGE_SIZE: u32 = 500;

/// Sort direction
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, Display,
)]
pub enum SortOrder {
    #[strum(serialize = "asc")]
    #[serde(rename = "asc")]
    Ascending,
    #[default]
    #[strum(serialize = "desc")]
    #[serde(rename = "desc")]
    Descending,
}

/// Field to sort by; wire names follow the public API
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, Display,
)]
pub enum SortField {
    #[default]
    #[strum(serialize = "saldo")]
    #[serde(rename = "saldo")]
    Balance,
    #[strum(serialize = "ano")]
    #[serde(rename = "ano")]
    Age,
    #[strum(serialize = "score")]
    #[serde(rename = "score")]
    Score,
}

/// Inclusive range with independently optional bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> Default for NumericRange<T> {
    fn default() -> Self {
        Self { min: None, max: None }
    }
}

impl<T: PartialOrd + Copy> NumericRange<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// An unset bound imposes no constraint on its side
    pub fn contains(&self, value: T) -> bool {
        if let Some(min) = self.min {
            if value < min {
                return false;
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return false;
            }
        }
        true
    }
}

/// Main search query structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Case-sensitive substring of the CDA number
    pub text: Option<String>,

    /// Accepted categories; `Some(vec![])` matches nothing
    pub categories: Option<Vec<String>>,

    /// Raw situation tokens (codes or labels), normalized at search time
    pub situations: Option<Vec<String>>,

    pub age: NumericRange<u32>,
    pub balance: NumericRange<f64>,
    pub score: NumericRange<f64>,

    pub sort: SortField,
    pub order: SortOrder,

    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            text: None,
            categories: None,
            situations: None,
            age: NumericRange::default(),
            balance: NumericRange::default(),
            score: NumericRange::default(),
            sort: SortField::default(),
            order: SortOrder::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchQuery {
    /// Create an unfiltered query (everything, sorted by balance descending)
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by CDA number substring
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Filter by category
    pub fn with_categories(mut self, categories: Vec<impl Into<String>>) -> Self {
        self.categories = Some(categories.into_iter().map(|c| c.into()).collect());
        self
    }

    /// Filter by situation codes or labels
    pub fn with_situations(mut self, situations: Vec<impl Into<String>>) -> Self {
        self.situations = Some(situations.into_iter().map(|s| s.into()).collect());
        self
    }

    pub fn with_age(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.age = NumericRange::new(min, max);
        self
    }

    pub fn with_balance(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.balance = NumericRange::new(min, max);
        self
    }

    pub fn with_score(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.score = NumericRange::new(min, max);
        self
    }

    /// Set sorting
    pub fn with_sort(mut self, sort: SortField, order: SortOrder) -> Self {
        self.sort = sort;
        self.order = order;
        self
    }

    /// Set page and page size
    pub fn with_page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    /// Index of the first record of the requested page
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.page_size as usize)
    }
}
