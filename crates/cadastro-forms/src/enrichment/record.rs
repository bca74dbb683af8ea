// File: src/enrichment/record.rs
// Purpose: Address record returned by the postal-code service

use serde::{Deserialize, Deserializer, Serialize};

/// Response body of `GET /ws/{cep}/json/`.
///
/// Every field defaults to empty, so partial bodies still decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentRecord {
    pub cep: String,
    pub logradouro: String,
    pub complemento: String,
    pub unidade: String,
    pub bairro: String,
    pub localidade: String,
    pub uf: String,
    pub estado: String,
    pub regiao: String,
    pub ibge: String,
    pub gia: String,
    pub ddd: String,
    pub siafi: String,
    #[serde(deserialize_with = "deserialize_flag")]
    pub erro: bool,
}

impl EnrichmentRecord {
    /// The service answered, but knows no address for the code
    pub fn is_not_found(&self) -> bool {
        self.erro
    }

    pub fn street(&self) -> &str {
        &self.logradouro
    }

    pub fn neighborhood(&self) -> &str {
        &self.bairro
    }

    /// "locality, region", e.g. "São Paulo, SP"
    pub fn locality(&self) -> String {
        format!("{}, {}", self.localidade, self.uf)
    }
}

/// `erro` arrives either as `true` or as `"true"` depending on the API version
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Text(s)) => s.eq_ignore_ascii_case("true"),
        None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_full_record() {
        let body = r#"{
            "cep": "01001-000",
            "logradouro": "Praça da Sé",
            "complemento": "lado ímpar",
            "unidade": "",
            "bairro": "Sé",
            "localidade": "São Paulo",
            "uf": "SP",
            "estado": "São Paulo",
            "regiao": "Sudeste",
            "ibge": "3550308",
            "gia": "1004",
            "ddd": "11",
            "siafi": "7107"
        }"#;
        let record: EnrichmentRecord = serde_json::from_str(body).unwrap();

        assert!(!record.is_not_found());
        assert_eq!(record.street(), "Praça da Sé");
        assert_eq!(record.neighborhood(), "Sé");
        assert_eq!(record.locality(), "São Paulo, SP");
    }

    #[test]
    fn test_not_found_flag_forms() {
        let as_bool: EnrichmentRecord = serde_json::from_str(r#"{"erro": true}"#).unwrap();
        let as_text: EnrichmentRecord = serde_json::from_str(r#"{"erro": "true"}"#).unwrap();
        let as_null: EnrichmentRecord = serde_json::from_str(r#"{"erro": null}"#).unwrap();

        assert!(as_bool.is_not_found());
        assert!(as_text.is_not_found());
        assert!(!as_null.is_not_found());
        assert_eq!(as_bool.logradouro, "");
    }
}
