//! Query-string parsing for `/cda/search`

use crate::error::{AppError, Result};
use crate::search::{NumericRange, SearchQuery, SortField, SortOrder, DEFAULT_PAGE_SIZE};
use std::str::FromStr;
use validator::Validate;

/// Search parameters as accepted on the wire.
///
/// Built from raw key/value pairs so repeated keys (`natureza=a&natureza=b`)
/// and bracket-suffixed arrays (`natureza[]=a`) both work.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct SearchParams {
    pub q: Option<String>,
    pub natureza: Option<Vec<String>>,
    pub situacao: Option<Vec<String>>,
    pub min_ano: Option<u32>,
    pub max_ano: Option<u32>,
    #[validate(range(min = 0.0))]
    pub min_saldo: Option<f64>,
    #[validate(range(min = 0.0))]
    pub max_saldo: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_score: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub max_score: Option<f64>,
    pub sort_by: SortField,
    pub sort_dir: SortOrder,
    #[validate(range(min = 1))]
    pub page: u32,
    #[validate(range(min = 1, max = 500))]
    pub page_size: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            q: None,
            natureza: None,
            situacao: None,
            min_ano: None,
            max_ano: None,
            min_saldo: None,
            max_saldo: None,
            min_score: None,
            max_score: None,
            sort_by: SortField::default(),
            sort_dir: SortOrder::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchParams {
    /// Parse raw query pairs; unknown keys are ignored and for repeated
    /// scalar keys the last value wins. Range rules are checked separately
    /// by [`Validate::validate`].
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        let mut natureza_brackets: Option<Vec<String>> = None;
        let mut situacao_brackets: Option<Vec<String>> = None;

        for (key, value) in pairs {
            match key.as_str() {
                "q" => params.q = Some(value),
                "natureza" => params.natureza.get_or_insert_with(Vec::new).push(value),
                "natureza[]" => natureza_brackets.get_or_insert_with(Vec::new).push(value),
                "situacao" => params.situacao.get_or_insert_with(Vec::new).push(value),
                "situacao[]" => situacao_brackets.get_or_insert_with(Vec::new).push(value),
                "min_ano" => params.min_ano = Some(parse_integer(&key, &value)?),
                "max_ano" => params.max_ano = Some(parse_integer(&key, &value)?),
                "min_saldo" => params.min_saldo = Some(parse_float(&key, &value)?),
                "max_saldo" => params.max_saldo = Some(parse_float(&key, &value)?),
                "min_score" => params.min_score = Some(parse_float(&key, &value)?),
                "max_score" => params.max_score = Some(parse_float(&key, &value)?),
                "sort_by" => {
                    params.sort_by = SortField::from_str(&value)
                        .map_err(|_| invalid(&key, &value, "expected one of saldo, ano, score"))?
                }
                "sort_dir" => {
                    params.sort_dir = SortOrder::from_str(&value)
                        .map_err(|_| invalid(&key, &value, "expected asc or desc"))?
                }
                "page" => params.page = parse_integer(&key, &value)?,
                "page_size" => params.page_size = parse_integer(&key, &value)?,
                _ => {}
            }
        }

        // The plain key wins when a client sends both encodings
        if params.natureza.is_none() {
            params.natureza = natureza_brackets;
        }
        if params.situacao.is_none() {
            params.situacao = situacao_brackets;
        }

        Ok(params)
    }

    /// Parse and validate in one step
    pub fn parse<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let params = Self::from_pairs(pairs)?;
        params.validate()?;
        Ok(params)
    }

    pub fn into_query(self) -> SearchQuery {
        SearchQuery {
            text: self.q,
            categories: self.natureza,
            situations: self.situacao,
            age: NumericRange::new(self.min_ano, self.max_ano),
            balance: NumericRange::new(self.min_saldo, self.max_saldo),
            score: NumericRange::new(self.min_score, self.max_score),
            sort: self.sort_by,
            order: self.sort_dir,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> AppError {
    AppError::InvalidParameter(format!("{}={:?}: {}", key, value, reason))
}

fn parse_integer(key: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| invalid(key, value, "expected a non-negative integer"))
}

fn parse_float(key: &str, value: &str) -> Result<f64> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(invalid(key, value, "expected a finite number")),
    }
}
