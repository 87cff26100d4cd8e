use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::GeneratedMedia;
use crate::core::object::{serialize_tagged, DispatchTable, UnknownObject};

pub const ID_DOCUMENT_TEXT_DATA_EXTRACTION: &str = "ID_DOCUMENT_TEXT_DATA_EXTRACTION";
pub const SUPPLEMENTARY_DOCUMENT_TEXT_DATA_EXTRACTION: &str =
    "SUPPLEMENTARY_DOCUMENT_TEXT_DATA_EXTRACTION";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub generated_checks: Vec<GeneratedCheck>,
    #[serde(default)]
    pub generated_media: Vec<GeneratedMedia>,
}

/// A text extraction task, with the extraction outcome when one is available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextExtractionTask {
    #[serde(flatten)]
    pub task: Task,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<TextExtractionRecommendation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextExtractionRecommendation {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<TextExtractionReason>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextExtractionReason {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCheck {
    pub id: String,
    #[serde(rename = "type")]
    pub check_type: String,
}

/// A task run against a session resource, selected by its `type`.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskResponse {
    IdDocumentTextDataExtraction(TextExtractionTask),
    SupplementaryDocumentTextDataExtraction(TextExtractionTask),
    Unknown(UnknownObject),
}

impl TaskResponse {
    pub const TAG: &'static str = "type";

    pub const DISPATCH: DispatchTable<Self> = DispatchTable {
        tag_field: Self::TAG,
        entries: &[
            (ID_DOCUMENT_TEXT_DATA_EXTRACTION, |json| {
                serde_json::from_value(json).map(Self::IdDocumentTextDataExtraction)
            }),
            (SUPPLEMENTARY_DOCUMENT_TEXT_DATA_EXTRACTION, |json| {
                serde_json::from_value(json).map(Self::SupplementaryDocumentTextDataExtraction)
            }),
        ],
    };

    pub fn task_type(&self) -> &str {
        match self {
            Self::IdDocumentTextDataExtraction(_) => ID_DOCUMENT_TEXT_DATA_EXTRACTION,
            Self::SupplementaryDocumentTextDataExtraction(_) => {
                SUPPLEMENTARY_DOCUMENT_TEXT_DATA_EXTRACTION
            }
            Self::Unknown(unknown) => unknown.tag(),
        }
    }

    pub fn task(&self) -> Option<&Task> {
        match self {
            Self::IdDocumentTextDataExtraction(t)
            | Self::SupplementaryDocumentTextDataExtraction(t) => Some(&t.task),
            Self::Unknown(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for TaskResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Self::DISPATCH.deserialize(deserializer, Self::Unknown)
    }
}

impl Serialize for TaskResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::IdDocumentTextDataExtraction(t)
            | Self::SupplementaryDocumentTextDataExtraction(t) => {
                serialize_tagged(serializer, Self::TAG, self.task_type(), t)
            }
            Self::Unknown(unknown) => unknown.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn text_extraction_task() {
        let value = json!({
            "type": "ID_DOCUMENT_TEXT_DATA_EXTRACTION",
            "id": "t1",
            "state": "DONE",
            "generated_checks": [{"id": "c1", "type": "ID_DOCUMENT_TEXT_DATA_CHECK"}],
            "generated_media": [{"id": "m1", "type": "JSON"}],
            "recommendation": {
                "value": "PROGRESS",
                "reason": {"value": "QUALITY", "detail": "GLARE"}
            }
        });

        let task: TaskResponse = serde_json::from_value(value.clone()).unwrap();
        let TaskResponse::IdDocumentTextDataExtraction(extraction) = &task else {
            panic!("unexpected task {task:?}")
        };
        assert_eq!(extraction.task.generated_checks[0].check_type, "ID_DOCUMENT_TEXT_DATA_CHECK");
        assert_eq!(
            extraction.recommendation.as_ref().unwrap().reason.as_ref().unwrap().detail.as_deref(),
            Some("GLARE")
        );
        assert_eq!(serde_json::to_value(&task).unwrap(), value);
    }

    #[test]
    fn unknown_task() {
        let task: TaskResponse =
            serde_json::from_value(json!({"type": "ID_DOCUMENT_CLASSIFICATION", "id": "t"}))
                .unwrap();
        assert_eq!(task.task_type(), "ID_DOCUMENT_CLASSIFICATION");
        assert!(task.task().is_none());
    }
}
