//! Shared fixtures for integration tests

#![allow(dead_code)]

use cda_api::models::CdaRecord;
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;

/// Build one raw dataset row using the file's field names
pub fn row(num: &str, score: f64, balance: f64, age: u32, status: i64, category: &str) -> Value {
    json!({
        "numCDA": num,
        "score": score,
        "valor_saldo_atualizado": balance,
        "qtde_anos_idade_cda": age,
        "agrupamento_situacao": status,
        "natureza": category,
    })
}

pub fn record(num: &str, score: f64, balance: f64, age: u32, status: i64, category: &str) -> CdaRecord {
    CdaRecord {
        num_cda: num.to_string(),
        score,
        balance,
        age_years: age,
        status_code: status,
        category: category.to_string(),
    }
}

/// The two-record dataset used throughout the examples
pub fn example_rows() -> Vec<Value> {
    vec![
        row("A1", 0.5, 100.0, 2, 0, "X"),
        row("B2", 0.9, 50.0, 5, 1, "Y"),
    ]
}

/// A deterministic mixed dataset with ties, unknown statuses and several
/// categories
pub fn sample_rows() -> Vec<Value> {
    let categories = ["IPTU", "ISS", "Taxas", "Multas"];
    let statuses = [-1, 0, 1, 0, 5];

    (0..60u32)
        .map(|i| {
            row(
                &format!("{}/{:06}", 2015 + i % 8, i * 7),
                f64::from((i * 37) % 101) / 100.0,
                f64::from((i * 613) % 5000) + if i % 3 == 0 { 0.5 } else { 0.0 },
                i % 12,
                statuses[(i as usize) % statuses.len()],
                categories[(i as usize) % categories.len()],
            )
        })
        .collect()
}

pub fn sample_records() -> Vec<CdaRecord> {
    sample_rows()
        .iter()
        .map(|r| serde_json::from_value(r.clone()).unwrap())
        .collect()
}

/// Write `value` as pretty JSON to `dir/name`
pub fn write_json(dir: &Path, name: &str, value: &Value) {
    std::fs::write(dir.join(name), serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

/// Temporary data directory holding `cdas.json` and the given summaries
pub fn data_dir(rows: Vec<Value>, summaries: &[(&str, Value)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    write_json(dir.path(), "cdas.json", &Value::Array(rows));
    for (name, body) in summaries {
        write_json(dir.path(), &format!("{}.json", name), body);
    }
    dir
}
