//! Situation token normalization

use crate::models::Situation;

/// Map user-supplied situation tokens to status codes.
///
/// Each token is trimmed, then accepted verbatim if it parses as an integer
/// (unknown codes simply match nothing) or matched case-insensitively against
/// the situation labels. Tokens matching neither are dropped, so a non-empty
/// input can normalize to an empty list; callers treat that as an
/// unsatisfiable filter.
pub fn normalize_situations<I, S>(tokens: I) -> Vec<i64>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .filter_map(|token| normalize_token(token.as_ref()))
        .collect()
}

fn normalize_token(token: &str) -> Option<i64> {
    let token = token.trim();
    if let Ok(code) = token.parse::<i64>() {
        return Some(code);
    }
    Situation::from_label(token).map(|s| s.code())
}
