use crate::models::Situation;
use serde_json::Value;

/// Wire name of the status column
pub const STATUS_FIELD: &str = "agrupamento_situacao";

/// Count statuses equal to "in collection"; `None` entries are skipped
pub fn count_in_collection<I>(statuses: I) -> u64
where
    I: IntoIterator<Item = Option<i64>>,
{
    let in_collection = Situation::InCollection.code();
    statuses
        .into_iter()
        .filter(|status| *status == Some(in_collection))
        .count() as u64
}

/// Lenient status extraction from a raw row.
///
/// Integers are taken as-is, finite floats are truncated toward zero and
/// strings are trimmed and parsed as integers. Missing keys, booleans, nulls,
/// unparsable strings and rows that are not objects yield `None`.
pub fn status_from_row(row: &Value) -> Option<i64> {
    match row.as_object()?.get(STATUS_FIELD)? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.trunc().abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
