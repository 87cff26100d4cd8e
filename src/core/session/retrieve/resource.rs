use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{task::TaskResponse, MediaHolder, MediaResponse};
use crate::core::object::{serialize_tagged, DispatchTable, UnknownObject};

pub const ZOOM_LIVENESS: &str = "ZOOM";
pub const STATIC_LIVENESS: &str = "STATIC";

/// Every resource captured during a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceContainer {
    #[serde(default)]
    pub id_documents: Vec<IdDocumentResource>,
    #[serde(default)]
    pub supplementary_documents: Vec<SupplementaryDocumentResource>,
    #[serde(default)]
    pub liveness_capture: Vec<LivenessResource>,
    #[serde(default)]
    pub face_capture: Vec<FaceCaptureResource>,
}

impl ResourceContainer {
    pub fn zoom_liveness_resources(&self) -> impl Iterator<Item = &ZoomLivenessResource> {
        self.liveness_capture.iter().filter_map(|r| match r {
            LivenessResource::Zoom(zoom) => Some(zoom),
            _ => None,
        })
    }

    pub fn static_liveness_resources(&self) -> impl Iterator<Item = &StaticLivenessResource> {
        self.liveness_capture.iter().filter_map(|r| match r {
            LivenessResource::Static(s) => Some(s),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSource {
    #[serde(rename = "type")]
    pub source_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaResponse>,
    #[serde(default)]
    pub frames: Vec<Frame>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdDocumentResource {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<DocumentSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuing_country: Option<String>,
    #[serde(default)]
    pub tasks: Vec<TaskResponse>,
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_fields: Option<MediaHolder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded_document_fields: Option<MediaHolder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id_photo: Option<MediaHolder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplementaryDocumentResource {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<DocumentSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuing_country: Option<String>,
    #[serde(default)]
    pub tasks: Vec<TaskResponse>,
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_fields: Option<MediaHolder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<MediaHolder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceCaptureResource {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<DocumentSource>,
    #[serde(default)]
    pub tasks: Vec<TaskResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<MediaHolder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomLivenessResource {
    pub id: String,
    #[serde(default)]
    pub tasks: Vec<TaskResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facemap: Option<MediaHolder>,
    #[serde(default)]
    pub frames: Vec<Frame>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticLivenessResource {
    pub id: String,
    #[serde(default)]
    pub tasks: Vec<TaskResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<MediaHolder>,
}

/// A liveness capture, selected by its `liveness_type`.
#[derive(Debug, Clone, PartialEq)]
pub enum LivenessResource {
    Zoom(ZoomLivenessResource),
    Static(StaticLivenessResource),
    Unknown(UnknownObject),
}

impl LivenessResource {
    pub const TAG: &'static str = "liveness_type";

    pub const DISPATCH: DispatchTable<Self> = DispatchTable {
        tag_field: Self::TAG,
        entries: &[
            (ZOOM_LIVENESS, |json| {
                serde_json::from_value(json).map(Self::Zoom)
            }),
            (STATIC_LIVENESS, |json| {
                serde_json::from_value(json).map(Self::Static)
            }),
        ],
    };

    pub fn liveness_type(&self) -> &str {
        match self {
            Self::Zoom(_) => ZOOM_LIVENESS,
            Self::Static(_) => STATIC_LIVENESS,
            Self::Unknown(unknown) => unknown.tag(),
        }
    }
}

impl<'de> Deserialize<'de> for LivenessResource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Self::DISPATCH.deserialize(deserializer, Self::Unknown)
    }
}

impl Serialize for LivenessResource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Zoom(z) => serialize_tagged(serializer, Self::TAG, ZOOM_LIVENESS, z),
            Self::Static(s) => serialize_tagged(serializer, Self::TAG, STATIC_LIVENESS, s),
            Self::Unknown(unknown) => unknown.serialize(serializer),
        }
    }
}
