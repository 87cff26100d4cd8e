use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{
    watchlist::{WatchlistAdvancedCaSearchConfig, WatchlistReport, WatchlistScreeningSearchConfig},
    GeneratedMedia,
};
use crate::core::object::{serialize_tagged, DispatchTable, UnknownObject};

pub const ID_DOCUMENT_AUTHENTICITY: &str = "ID_DOCUMENT_AUTHENTICITY";
pub const ID_DOCUMENT_COMPARISON: &str = "ID_DOCUMENT_COMPARISON";
pub const ID_DOCUMENT_TEXT_DATA_CHECK: &str = "ID_DOCUMENT_TEXT_DATA_CHECK";
pub const SUPPLEMENTARY_DOCUMENT_TEXT_DATA_CHECK: &str = "SUPPLEMENTARY_DOCUMENT_TEXT_DATA_CHECK";
pub const ID_DOCUMENT_FACE_MATCH: &str = "ID_DOCUMENT_FACE_MATCH";
pub const LIVENESS: &str = "LIVENESS";
pub const FACE_COMPARISON: &str = "FACE_COMPARISON";
pub const THIRD_PARTY_IDENTITY: &str = "THIRD_PARTY_IDENTITY";
pub const WATCHLIST_SCREENING: &str = "WATCHLIST_SCREENING";
pub const WATCHLIST_ADVANCED_CA: &str = "WATCHLIST_ADVANCED_CA";
pub const IBV_VISUAL_REVIEW_CHECK: &str = "IBV_VISUAL_REVIEW_CHECK";
pub const DOCUMENT_SCHEME_VALIDITY_CHECK: &str = "DOCUMENT_SCHEME_VALIDITY_CHECK";
pub const PROFILE_DOCUMENT_MATCH: &str = "PROFILE_DOCUMENT_MATCH";

/// Fields shared by every check, parameterised by the shape of its report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check<R = Report> {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default)]
    pub resources_used: Vec<String>,
    #[serde(default)]
    pub generated_media: Vec<GeneratedMedia>,
    // A plain `default` would make serde require `R: Default`.
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub report: Option<R>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<Recommendation>,
    #[serde(default)]
    pub breakdown: Vec<Breakdown>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_suggestion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub sub_check: String,
    pub result: String,
    #[serde(default)]
    pub details: Vec<Detail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detail {
    pub name: String,
    pub value: String,
}

pub type WatchlistScreeningCheck = Check<WatchlistReport<WatchlistScreeningSearchConfig>>;
pub type WatchlistAdvancedCaCheck = Check<WatchlistReport<WatchlistAdvancedCaSearchConfig>>;

/// A check performed on a session, selected by its `type`.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckResponse {
    IdDocumentAuthenticity(Check),
    IdDocumentComparison(Check),
    IdDocumentTextData(Check),
    SupplementaryDocumentTextData(Check),
    IdDocumentFaceMatch(Check),
    Liveness(Check),
    FaceComparison(Check),
    ThirdPartyIdentity(Check),
    WatchlistScreening(WatchlistScreeningCheck),
    WatchlistAdvancedCa(WatchlistAdvancedCaCheck),
    IbvVisualReview(Check),
    DocumentSchemeValidity(Check),
    ProfileDocumentMatch(Check),
    Unknown(UnknownObject),
}

impl CheckResponse {
    pub const TAG: &'static str = "type";

    pub const DISPATCH: DispatchTable<Self> = DispatchTable {
        tag_field: Self::TAG,
        entries: &[
            (ID_DOCUMENT_AUTHENTICITY, |json| {
                serde_json::from_value(json).map(Self::IdDocumentAuthenticity)
            }),
            (ID_DOCUMENT_COMPARISON, |json| {
                serde_json::from_value(json).map(Self::IdDocumentComparison)
            }),
            (ID_DOCUMENT_TEXT_DATA_CHECK, |json| {
                serde_json::from_value(json).map(Self::IdDocumentTextData)
            }),
            (SUPPLEMENTARY_DOCUMENT_TEXT_DATA_CHECK, |json| {
                serde_json::from_value(json).map(Self::SupplementaryDocumentTextData)
            }),
            (ID_DOCUMENT_FACE_MATCH, |json| {
                serde_json::from_value(json).map(Self::IdDocumentFaceMatch)
            }),
            (LIVENESS, |json| {
                serde_json::from_value(json).map(Self::Liveness)
            }),
            (FACE_COMPARISON, |json| {
                serde_json::from_value(json).map(Self::FaceComparison)
            }),
            (THIRD_PARTY_IDENTITY, |json| {
                serde_json::from_value(json).map(Self::ThirdPartyIdentity)
            }),
            (WATCHLIST_SCREENING, |json| {
                serde_json::from_value(json).map(Self::WatchlistScreening)
            }),
            (WATCHLIST_ADVANCED_CA, |json| {
                serde_json::from_value(json).map(Self::WatchlistAdvancedCa)
            }),
            (IBV_VISUAL_REVIEW_CHECK, |json| {
                serde_json::from_value(json).map(Self::IbvVisualReview)
            }),
            (DOCUMENT_SCHEME_VALIDITY_CHECK, |json| {
                serde_json::from_value(json).map(Self::DocumentSchemeValidity)
            }),
            (PROFILE_DOCUMENT_MATCH, |json| {
                serde_json::from_value(json).map(Self::ProfileDocumentMatch)
            }),
        ],
    };

    /// The check `type` as sent by the service.
    pub fn check_type(&self) -> &str {
        match self {
            Self::IdDocumentAuthenticity(_) => ID_DOCUMENT_AUTHENTICITY,
            Self::IdDocumentComparison(_) => ID_DOCUMENT_COMPARISON,
            Self::IdDocumentTextData(_) => ID_DOCUMENT_TEXT_DATA_CHECK,
            Self::SupplementaryDocumentTextData(_) => SUPPLEMENTARY_DOCUMENT_TEXT_DATA_CHECK,
            Self::IdDocumentFaceMatch(_) => ID_DOCUMENT_FACE_MATCH,
            Self::Liveness(_) => LIVENESS,
            Self::FaceComparison(_) => FACE_COMPARISON,
            Self::ThirdPartyIdentity(_) => THIRD_PARTY_IDENTITY,
            Self::WatchlistScreening(_) => WATCHLIST_SCREENING,
            Self::WatchlistAdvancedCa(_) => WATCHLIST_ADVANCED_CA,
            Self::IbvVisualReview(_) => IBV_VISUAL_REVIEW_CHECK,
            Self::DocumentSchemeValidity(_) => DOCUMENT_SCHEME_VALIDITY_CHECK,
            Self::ProfileDocumentMatch(_) => PROFILE_DOCUMENT_MATCH,
            Self::Unknown(unknown) => unknown.tag(),
        }
    }

    /// The check id, if the check is of a known type or carries one anyway.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::WatchlistScreening(c) => Some(&c.id),
            Self::WatchlistAdvancedCa(c) => Some(&c.id),
            Self::Unknown(unknown) => unknown.get("id").and_then(|id| id.as_str()),
            other => other.basic().map(|c| c.id.as_str()),
        }
    }

    pub fn state(&self) -> Option<&str> {
        match self {
            Self::WatchlistScreening(c) => c.state.as_deref(),
            Self::WatchlistAdvancedCa(c) => c.state.as_deref(),
            Self::Unknown(unknown) => unknown.get("state").and_then(|s| s.as_str()),
            other => other.basic().and_then(|c| c.state.as_deref()),
        }
    }

    /// The check, for every known type whose report has the common shape.
    pub fn basic(&self) -> Option<&Check> {
        match self {
            Self::IdDocumentAuthenticity(c)
            | Self::IdDocumentComparison(c)
            | Self::IdDocumentTextData(c)
            | Self::SupplementaryDocumentTextData(c)
            | Self::IdDocumentFaceMatch(c)
            | Self::Liveness(c)
            | Self::FaceComparison(c)
            | Self::ThirdPartyIdentity(c)
            | Self::IbvVisualReview(c)
            | Self::DocumentSchemeValidity(c)
            | Self::ProfileDocumentMatch(c) => Some(c),
            Self::WatchlistScreening(_) | Self::WatchlistAdvancedCa(_) | Self::Unknown(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for CheckResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Self::DISPATCH.deserialize(deserializer, Self::Unknown)
    }
}

impl Serialize for CheckResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tag = self.check_type();
        match self {
            Self::IdDocumentAuthenticity(c)
            | Self::IdDocumentComparison(c)
            | Self::IdDocumentTextData(c)
            | Self::SupplementaryDocumentTextData(c)
            | Self::IdDocumentFaceMatch(c)
            | Self::Liveness(c)
            | Self::FaceComparison(c)
            | Self::ThirdPartyIdentity(c)
            | Self::IbvVisualReview(c)
            | Self::DocumentSchemeValidity(c)
            | Self::ProfileDocumentMatch(c) => serialize_tagged(serializer, Self::TAG, tag, c),
            Self::WatchlistScreening(c) => serialize_tagged(serializer, Self::TAG, tag, c),
            Self::WatchlistAdvancedCa(c) => serialize_tagged(serializer, Self::TAG, tag, c),
            Self::Unknown(unknown) => unknown.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn authenticity_check() {
        let value = json!({
            "type": "ID_DOCUMENT_AUTHENTICITY",
            "id": "3c8b3b2b-4a0e-4c5b-9c1b-8e3c7b1a2f10",
            "state": "DONE",
            "resources_used": ["a1b2"],
            "generated_media": [{"id": "m1", "type": "JSON"}],
            "report": {
                "recommendation": {"value": "APPROVE"},
                "breakdown": [{
                    "sub_check": "document_in_date",
                    "result": "PASS",
                    "details": [{"name": "expiry_date", "value": "2030-01-01"}]
                }]
            },
            "created": "2021-06-11T11:39:24Z",
            "last_updated": "2021-06-11T11:39:24Z"
        });

        let check: CheckResponse = serde_json::from_value(value.clone()).unwrap();
        let CheckResponse::IdDocumentAuthenticity(inner) = &check else {
            panic!("unexpected variant {check:?}")
        };
        assert_eq!(
            inner.report.as_ref().unwrap().recommendation.as_ref().unwrap().value,
            "APPROVE"
        );
        assert_eq!(check.id(), Some("3c8b3b2b-4a0e-4c5b-9c1b-8e3c7b1a2f10"));
        assert_eq!(check.state(), Some("DONE"));

        // Encoding the decoded check reproduces every schema field.
        assert_eq!(serde_json::to_value(&check).unwrap(), value);
    }

    #[test]
    fn unknown_check_type() {
        let value = json!({"type": "SYNECTICS_IDENTITY_FRAUD", "id": "x", "extra": [1, 2]});
        let check: CheckResponse = serde_json::from_value(value.clone()).unwrap();

        assert_eq!(check.check_type(), "SYNECTICS_IDENTITY_FRAUD");
        assert_eq!(check.id(), Some("x"));
        assert!(matches!(check, CheckResponse::Unknown(_)));
        assert_eq!(serde_json::to_value(&check).unwrap(), value);
    }

    #[test]
    fn known_check_without_id_fails() {
        let err = serde_json::from_value::<CheckResponse>(json!({"type": "LIVENESS"}))
            .unwrap_err();
        assert!(err.to_string().contains("missing field `id`"), "{err}");
    }

    #[test]
    fn optional_fields_default() {
        let check: CheckResponse =
            serde_json::from_value(json!({"type": "LIVENESS", "id": "l"})).unwrap();
        let inner = check.basic().unwrap();
        assert!(inner.resources_used.is_empty());
        assert!(inner.report.is_none());
        assert_eq!(check.state(), None);
    }
}
