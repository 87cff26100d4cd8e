use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// Payload of `POST /sessions`.
///
/// Check, task and document requirement payloads are service-defined and passed through as
/// JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSpecification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_session_token_ttl: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources_ttl: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_tracking_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<Json>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requested_checks: Vec<RequestedCheck>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requested_tasks: Vec<RequestedTask>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdk_config: Option<Json>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_documents: Vec<Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_biometric_consent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_profile_requirements: Option<Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced_identity_profile_requirements: Option<Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_identity_profile_preview: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestedCheck {
    #[serde(rename = "type")]
    pub check_type: String,
    #[serde(default)]
    pub config: Json,
}

impl RequestedCheck {
    pub fn new(check_type: impl Into<String>) -> Self {
        Self {
            check_type: check_type.into(),
            config: Json::Object(Default::default()),
        }
    }

    pub fn with_config(mut self, config: Json) -> Self {
        self.config = config;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestedTask {
    #[serde(rename = "type")]
    pub task_type: String,
    #[serde(default)]
    pub config: Json,
}

impl RequestedTask {
    pub fn new(task_type: impl Into<String>) -> Self {
        Self {
            task_type: task_type.into(),
            config: Json::Object(Default::default()),
        }
    }

    pub fn with_config(mut self, config: Json) -> Self {
        self.config = config;
        self
    }
}

/// Response of `POST /sessions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSessionResult {
    pub session_id: String,
    pub client_session_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_session_token_ttl: Option<u64>,
}
