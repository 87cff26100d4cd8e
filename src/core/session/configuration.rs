use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::support::SupportedCountry;
use crate::core::object::{serialize_tagged, DispatchTable, UnknownObject};

pub const ID_DOCUMENT: &str = "ID_DOCUMENT";
pub const SUPPLEMENTARY_DOCUMENT: &str = "SUPPLEMENTARY_DOCUMENT";
pub const LIVENESS: &str = "LIVENESS";
pub const FACE_CAPTURE: &str = "FACE_CAPTURE";

/// Response of `GET /sessions/{id}/configuration`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfigurationResponse {
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_session_token_ttl: Option<u64>,
    #[serde(default)]
    pub requested_checks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture: Option<CaptureResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biometric_consent: Option<String>,
    #[serde(default)]
    pub required_resources: Vec<RequiredResource>,
}

impl CaptureResponse {
    pub fn required_id_documents(&self) -> impl Iterator<Item = &RequiredDocumentResource> {
        self.required_resources.iter().filter_map(|r| match r {
            RequiredResource::IdDocument(d) => Some(d),
            _ => None,
        })
    }

    pub fn required_supplementary_documents(
        &self,
    ) -> impl Iterator<Item = &RequiredSupplementaryDocumentResource> {
        self.required_resources.iter().filter_map(|r| match r {
            RequiredResource::SupplementaryDocument(d) => Some(d),
            _ => None,
        })
    }

    pub fn required_liveness_resources(
        &self,
    ) -> impl Iterator<Item = &RequiredLivenessResource> {
        self.required_resources.iter().filter_map(|r| match r {
            RequiredResource::Liveness(l) => Some(l),
            _ => None,
        })
    }

    pub fn required_face_capture_resources(
        &self,
    ) -> impl Iterator<Item = &RequiredFaceCaptureResource> {
        self.required_resources.iter().filter_map(|r| match r {
            RequiredResource::FaceCapture(f) => Some(f),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedSource {
    #[serde(rename = "type")]
    pub source_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedTaskResponse {
    #[serde(rename = "type")]
    pub task_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredDocumentResource {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default)]
    pub allowed_sources: Vec<AllowedSource>,
    #[serde(default)]
    pub requested_tasks: Vec<RequestedTaskResponse>,
    #[serde(default)]
    pub supported_countries: Vec<SupportedCountry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_capture_methods: Option<String>,
    #[serde(default)]
    pub attempts_remaining: BTreeMap<String, i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredSupplementaryDocumentResource {
    #[serde(flatten)]
    pub document: RequiredDocumentResource,
    #[serde(default)]
    pub document_types: Vec<String>,
    #[serde(default)]
    pub country_codes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<Objective>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    #[serde(rename = "type")]
    pub objective_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredLivenessResource {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default)]
    pub allowed_sources: Vec<AllowedSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liveness_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredFaceCaptureResource {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default)]
    pub allowed_sources: Vec<AllowedSource>,
}

/// A resource the end user still has to provide, selected by its `type`.
#[derive(Debug, Clone, PartialEq)]
pub enum RequiredResource {
    IdDocument(RequiredDocumentResource),
    SupplementaryDocument(RequiredSupplementaryDocumentResource),
    Liveness(RequiredLivenessResource),
    FaceCapture(RequiredFaceCaptureResource),
    Unknown(UnknownObject),
}

impl RequiredResource {
    pub const TAG: &'static str = "type";

    pub const DISPATCH: DispatchTable<Self> = DispatchTable {
        tag_field: Self::TAG,
        entries: &[
            (ID_DOCUMENT, |json| {
                serde_json::from_value(json).map(Self::IdDocument)
            }),
            (SUPPLEMENTARY_DOCUMENT, |json| {
                serde_json::from_value(json).map(Self::SupplementaryDocument)
            }),
            (LIVENESS, |json| {
                serde_json::from_value(json).map(Self::Liveness)
            }),
            (FACE_CAPTURE, |json| {
                serde_json::from_value(json).map(Self::FaceCapture)
            }),
        ],
    };

    pub fn resource_type(&self) -> &str {
        match self {
            Self::IdDocument(_) => ID_DOCUMENT,
            Self::SupplementaryDocument(_) => SUPPLEMENTARY_DOCUMENT,
            Self::Liveness(_) => LIVENESS,
            Self::FaceCapture(_) => FACE_CAPTURE,
            Self::Unknown(unknown) => unknown.tag(),
        }
    }

    /// Whether the resource is a document requirement that needs a text extraction task.
    pub fn is_relying_on_text_extraction(&self) -> bool {
        let tasks = match self {
            Self::IdDocument(d) => &d.requested_tasks,
            Self::SupplementaryDocument(s) => &s.document.requested_tasks,
            _ => return false,
        };
        tasks
            .iter()
            .any(|task| task.task_type.ends_with("_TEXT_DATA_EXTRACTION"))
    }
}

impl<'de> Deserialize<'de> for RequiredResource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Self::DISPATCH.deserialize(deserializer, Self::Unknown)
    }
}

impl Serialize for RequiredResource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tag = self.resource_type();
        match self {
            Self::IdDocument(r) => serialize_tagged(serializer, Self::TAG, tag, r),
            Self::SupplementaryDocument(r) => serialize_tagged(serializer, Self::TAG, tag, r),
            Self::Liveness(r) => serialize_tagged(serializer, Self::TAG, tag, r),
            Self::FaceCapture(r) => serialize_tagged(serializer, Self::TAG, tag, r),
            Self::Unknown(unknown) => unknown.serialize(serializer),
        }
    }
}
