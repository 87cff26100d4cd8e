use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use self::{check::CheckResponse, resource::ResourceContainer};

pub mod check;
pub mod resource;
pub mod task;
pub mod watchlist;

/// State of a Doc Scan session, as returned by `GET /sessions/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetSessionResult {
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_session_token_ttl: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_session_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_tracking_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biometric_consent: Option<String>,
    #[serde(default)]
    pub checks: Vec<CheckResponse>,
    #[serde(default)]
    pub resources: ResourceContainer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_profile: Option<IdentityProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_identity_profile: Option<IdentityProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_profile_preview: Option<MediaHolder>,
}

impl GetSessionResult {
    /// Checks whose `type` equals `check_type`, unknown types included.
    pub fn checks_of_type<'a>(
        &'a self,
        check_type: &'a str,
    ) -> impl Iterator<Item = &'a CheckResponse> + 'a {
        self.checks
            .iter()
            .filter(move |check| check.check_type() == check_type)
    }

    pub fn authenticity_checks(&self) -> impl Iterator<Item = &CheckResponse> {
        self.checks_of_type(check::ID_DOCUMENT_AUTHENTICITY)
    }

    pub fn liveness_checks(&self) -> impl Iterator<Item = &CheckResponse> {
        self.checks_of_type(check::LIVENESS)
    }

    pub fn face_match_checks(&self) -> impl Iterator<Item = &CheckResponse> {
        self.checks_of_type(check::ID_DOCUMENT_FACE_MATCH)
    }

    pub fn watchlist_checks(&self) -> impl Iterator<Item = &CheckResponse> {
        self.checks.iter().filter(|check| {
            matches!(
                check,
                CheckResponse::WatchlistScreening(_) | CheckResponse::WatchlistAdvancedCa(_)
            )
        })
    }

    pub fn check_by_id(&self, id: &str) -> Option<&CheckResponse> {
        self.checks.iter().find(|check| check.id() == Some(id))
    }
}

/// Reference to a piece of media stored against a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaResponse {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedMedia {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaHolder {
    pub media: MediaResponse,
}

/// Outcome of an identity profile requirement. The report is service-defined and kept raw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<Json>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_profile_report: Option<Json>,
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::{check::CheckResponse, resource::LivenessResource, *};

    fn session() -> Json {
        json!({
            "client_session_token_ttl": 599,
            "session_id": "a1b2c3",
            "user_tracking_id": "user-1",
            "state": "COMPLETED",
            "client_session_token": "token",
            "biometric_consent": "2021-06-11T11:39:24Z",
            "checks": [
                {"type": "ID_DOCUMENT_AUTHENTICITY", "id": "c1", "state": "DONE"},
                {"type": "LIVENESS", "id": "c2", "state": "DONE"},
                {
                    "type": "WATCHLIST_SCREENING",
                    "id": "c3",
                    "report": {
                        "watchlist_summary": {
                            "total_hits": 2,
                            "search_config": {"categories": ["SANCTIONS"]},
                            "raw_results": {"media": {"id": "raw", "type": "JSON"}},
                            "associated_country_codes": ["GBR"]
                        }
                    }
                },
                {"type": "NEW_FANCY_CHECK", "id": "c4", "whatever": {"nested": true}}
            ],
            "resources": {
                "id_documents": [{
                    "id": "d1",
                    "document_type": "PASSPORT",
                    "issuing_country": "GBR",
                    "tasks": [{"type": "ID_DOCUMENT_TEXT_DATA_EXTRACTION", "id": "t1"}],
                    "pages": [{"capture_method": "CAMERA", "media": {"id": "p1"}, "frames": [{"media": {"id": "f1"}}]}],
                    "document_fields": {"media": {"id": "fields"}}
                }],
                "liveness_capture": [
                    {"liveness_type": "ZOOM", "id": "l1", "facemap": {"media": {"id": "fm"}}, "frames": []},
                    {"liveness_type": "STATIC", "id": "l2", "image": {"media": {"id": "img"}}},
                    {"liveness_type": "HOLOGRAM", "id": "l3"}
                ],
                "face_capture": [{"id": "fc1", "image": {"media": {"id": "fci"}}}]
            }
        })
    }

    #[test]
    fn decode_full_session() {
        let result: GetSessionResult = serde_json::from_value(session()).unwrap();

        assert_eq!(result.session_id, "a1b2c3");
        assert_eq!(result.checks.len(), 4);
        assert_eq!(result.authenticity_checks().count(), 1);
        assert_eq!(result.liveness_checks().count(), 1);
        assert_eq!(result.watchlist_checks().count(), 1);
        assert!(matches!(
            result.check_by_id("c4"),
            Some(CheckResponse::Unknown(u)) if u.tag() == "NEW_FANCY_CHECK"
        ));

        let CheckResponse::WatchlistScreening(screening) = &result.checks[2] else {
            panic!("expected a watchlist screening check")
        };
        let summary = screening
            .report
            .as_ref()
            .and_then(|r| r.watchlist_summary.as_ref())
            .unwrap();
        assert_eq!(summary.total_hits, 2);
        assert_eq!(
            summary.search_config.as_ref().unwrap().categories,
            vec!["SANCTIONS".to_string()]
        );

        let document = &result.resources.id_documents[0];
        assert_eq!(document.pages[0].frames.len(), 1);
        assert_eq!(document.tasks[0].task_type(), "ID_DOCUMENT_TEXT_DATA_EXTRACTION");

        assert_eq!(result.resources.zoom_liveness_resources().count(), 1);
        assert_eq!(result.resources.static_liveness_resources().count(), 1);
        assert!(matches!(
            &result.resources.liveness_capture[2],
            LivenessResource::Unknown(u) if u.tag() == "HOLOGRAM"
        ));
    }

    #[test]
    fn minimal_session() {
        let result: GetSessionResult =
            serde_json::from_value(json!({"session_id": "only-id"})).unwrap();
        assert!(result.checks.is_empty());
        assert_eq!(result.resources, ResourceContainer::default());
    }

    #[test]
    fn round_trip_keeps_schema_fields() {
        let result: GetSessionResult = serde_json::from_value(session()).unwrap();
        let encoded = serde_json::to_value(&result).unwrap();
        let decoded: GetSessionResult = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, result);
    }
}
