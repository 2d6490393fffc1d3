use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

/// Label rendered for status codes outside the known set
pub const UNKNOWN_SITUATION_LABEL: &str = "Unknown";

/// A tax-debt certificate (CDA) as stored in the dataset.
///
/// Field names on the wire follow the dataset file; every field is required
/// and strictly typed, so a row that deserializes is a valid record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdaRecord {
    /// Certificate number, searched by substring
    #[serde(rename = "numCDA")]
    pub num_cda: String,

    /// Recovery score, expected in [0, 1]
    pub score: f64,

    /// Current updated balance owed
    #[serde(rename = "valor_saldo_atualizado")]
    pub balance: f64,

    /// Age of the debt in years
    #[serde(rename = "qtde_anos_idade_cda")]
    pub age_years: u32,

    /// Collection status code (-1, 0, 1 are known; anything else is legal)
    #[serde(rename = "agrupamento_situacao")]
    pub status_code: i64,

    /// Nature of the debt ("natureza")
    #[serde(rename = "natureza")]
    pub category: String,
}

impl CdaRecord {
    /// Strictly type one raw dataset row without cloning it
    pub fn deserialize_row(row: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(row)
    }

    /// Known situation for this record's status code, if any
    pub fn situation(&self) -> Option<Situation> {
        Situation::from_code(self.status_code)
    }

    /// Human-readable status label
    pub fn situation_label(&self) -> &'static str {
        situation_label(self.status_code)
    }
}

/// Collection state of a CDA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Situation {
    Canceled,
    InCollection,
    Settled,
}

impl Situation {
    /// Map a raw status code to a known situation
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            -1 => Some(Situation::Canceled),
            0 => Some(Situation::InCollection),
            1 => Some(Situation::Settled),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Situation::Canceled => -1,
            Situation::InCollection => 0,
            Situation::Settled => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Situation::Canceled => "Cancelada",
            Situation::InCollection => "Em cobrança",
            Situation::Settled => "Quitada",
        }
    }

    /// Case-insensitive lookup by label ("quitada", "EM COBRANÇA", ...)
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.to_lowercase();
        Situation::iter().find(|s| s.label().to_lowercase() == wanted)
    }
}

/// Label for any status code; unmapped codes render as "Unknown"
pub fn situation_label(code: i64) -> &'static str {
    Situation::from_code(code)
        .map(|s| s.label())
        .unwrap_or(UNKNOWN_SITUATION_LABEL)
}

/// Record as returned by the search endpoint, with the derived status label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdaItemResponse {
    #[serde(rename = "numCDA")]
    pub num_cda: String,
    pub score: f64,
    pub valor_saldo_atualizado: f64,
    pub qtde_anos_idade_cda: u32,
    pub agrupamento_situacao: i64,
    pub natureza: String,
    pub situacao_label: String,
}

impl From<&CdaRecord> for CdaItemResponse {
    fn from(record: &CdaRecord) -> Self {
        Self {
            num_cda: record.num_cda.clone(),
            score: record.score,
            valor_saldo_atualizado: record.balance,
            qtde_anos_idade_cda: record.age_years,
            agrupamento_situacao: record.status_code,
            natureza: record.category.clone(),
            situacao_label: record.situation_label().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_deserializes_from_wire_names() {
        let record: CdaRecord = serde_json::from_value(json!({
            "numCDA": "2020/000123",
            "score": 0.42,
            "valor_saldo_atualizado": 1500,
            "qtde_anos_idade_cda": 7,
            "agrupamento_situacao": 0,
            "natureza": "IPTU"
        }))
        .unwrap();

        assert_eq!(record.num_cda, "2020/000123");
        assert_eq!(record.balance, 1500.0);
        assert_eq!(record.age_years, 7);
        assert_eq!(record.situation(), Some(Situation::InCollection));
        assert_eq!(record.situation_label(), "Em cobrança");
    }

    #[test]
    fn test_record_rejects_wrong_types() {
        let numeric_as_string = json!({
            "numCDA": "A1",
            "score": "high",
            "valor_saldo_atualizado": 10.0,
            "qtde_anos_idade_cda": 1,
            "agrupamento_situacao": 0,
            "natureza": "X"
        });
        assert!(serde_json::from_value::<CdaRecord>(numeric_as_string).is_err());

        let negative_age = json!({
            "numCDA": "A1",
            "score": 0.1,
            "valor_saldo_atualizado": 10.0,
            "qtde_anos_idade_cda": -2,
            "agrupamento_situacao": 0,
            "natureza": "X"
        });
        assert!(serde_json::from_value::<CdaRecord>(negative_age).is_err());

        let missing_category = json!({
            "numCDA": "A1",
            "score": 0.1,
            "valor_saldo_atualizado": 10.0,
            "qtde_anos_idade_cda": 1,
            "agrupamento_situacao": 0
        });
        assert!(serde_json::from_value::<CdaRecord>(missing_category).is_err());
    }

    #[test]
    fn test_situation_labels() {
        assert_eq!(situation_label(-1), "Cancelada");
        assert_eq!(situation_label(1), "Quitada");
        assert_eq!(situation_label(7), UNKNOWN_SITUATION_LABEL);

        for situation in Situation::iter() {
            assert_eq!(Situation::from_code(situation.code()), Some(situation));
        }
    }

    #[test]
    fn test_situation_from_label_ignores_case() {
        assert_eq!(Situation::from_label("em cobrança"), Some(Situation::InCollection));
        assert_eq!(Situation::from_label("EM COBRANÇA"), Some(Situation::InCollection));
        assert_eq!(Situation::from_label("quitada"), Some(Situation::Settled));
        assert_eq!(Situation::from_label("paga"), None);
    }

    #[test]
    fn test_item_response_carries_label() {
        let record = CdaRecord {
            num_cda: "B2".to_string(),
            score: 0.9,
            balance: 50.0,
            age_years: 5,
            status_code: 3,
            category: "Y".to_string(),
        };
        let item = CdaItemResponse::from(&record);
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["numCDA"], "B2");
        assert_eq!(value["natureza"], "Y");
        assert_eq!(value["situacao_label"], "Unknown");
    }
}
