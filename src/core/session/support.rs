use serde::{Deserialize, Serialize};

/// Response of `GET /supported-documents`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedDocumentsResponse {
    #[serde(default)]
    pub supported_countries: Vec<SupportedCountry>,
}

impl SupportedDocumentsResponse {
    /// Look up a country by its ISO 3166-1 alpha-3 code.
    pub fn country(&self, code: &str) -> Option<&SupportedCountry> {
        self.supported_countries
            .iter()
            .find(|country| country.code.eq_ignore_ascii_case(code))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedCountry {
    pub code: String,
    #[serde(default)]
    pub supported_documents: Vec<SupportedDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedDocument {
    #[serde(rename = "type")]
    pub document_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_strictly_latin: Option<bool>,
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn supported_documents() {
        let response: SupportedDocumentsResponse = serde_json::from_value(json!({
            "supported_countries": [
                {
                    "code": "GBR",
                    "supported_documents": [
                        {"type": "PASSPORT", "is_strictly_latin": true},
                        {"type": "DRIVING_LICENCE"}
                    ]
                },
                {"code": "JPN"}
            ]
        }))
        .unwrap();

        let gbr = response.country("gbr").unwrap();
        assert_eq!(gbr.supported_documents.len(), 2);
        assert_eq!(gbr.supported_documents[0].is_strictly_latin, Some(true));
        assert_eq!(gbr.supported_documents[1].is_strictly_latin, None);
        assert!(response.country("JPN").unwrap().supported_documents.is_empty());
        assert!(response.country("FRA").is_none());
    }
}
