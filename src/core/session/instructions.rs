use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// In-branch verification instructions sent to the end user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instructions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_profile: Option<ContactProfile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<DocumentProposal>,
    /// Branch details are service-defined and passed through as JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<Json>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

pub type ContactProfileResponse = ContactProfile;

/// A document the end user proposes to bring to the branch, for a given requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentProposal {
    pub requirement_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<Json>,
}

/// Response of `GET /sessions/{id}/instructions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_profile: Option<ContactProfileResponse>,
    #[serde(default)]
    pub documents: Vec<DocumentProposal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<Json>,
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn instructions_payload() {
        let instructions = Instructions {
            contact_profile: Some(ContactProfile {
                email: Some("jane@example.com".into()),
                ..Default::default()
            }),
            documents: vec![DocumentProposal {
                requirement_id: "r1".into(),
                document: Some(json!({"type": "ID_DOCUMENT", "country_code": "GBR"})),
            }],
            branch: None,
        };

        assert_eq!(
            serde_json::to_value(&instructions).unwrap(),
            json!({
                "contact_profile": {"email": "jane@example.com"},
                "documents": [{
                    "requirement_id": "r1",
                    "document": {"type": "ID_DOCUMENT", "country_code": "GBR"}
                }]
            })
        );
    }

    #[test]
    fn instructions_response() {
        let response: InstructionsResponse = serde_json::from_value(json!({
            "contact_profile": {"first_name": "Jane", "last_name": "Doe", "email": "jane@example.com"},
            "branch": {"type": "UK_POST_OFFICE", "fad_code": "1234567"}
        }))
        .unwrap();

        let profile = response.contact_profile.unwrap();
        assert_eq!(profile.first_name.as_deref(), Some("Jane"));
        assert!(response.documents.is_empty());
        assert_eq!(response.branch.unwrap()["type"], "UK_POST_OFFICE");
    }
}
