use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::error::Error;

const IMAGE_FIELD: &str = "binary-content";
const IMAGE_FILENAME: &str = "face-capture-image";

/// Payload of `POST /sessions/{id}/resources/face-capture`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFaceCaptureResourcePayload {
    pub requirement_id: String,
}

impl CreateFaceCaptureResourcePayload {
    pub fn new(requirement_id: impl Into<String>) -> Self {
        Self {
            requirement_id: requirement_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFaceCaptureResourceResponse {
    pub id: String,
    #[serde(default)]
    pub frames: u32,
}

/// An image to attach to a face capture resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFaceCaptureImagePayload {
    pub image_content_type: String,
    pub image_contents: Vec<u8>,
}

impl UploadFaceCaptureImagePayload {
    pub fn new(image_content_type: impl Into<String>, image_contents: Vec<u8>) -> Self {
        Self {
            image_content_type: image_content_type.into(),
            image_contents,
        }
    }

    /// Encode as a `multipart/form-data` body with a fresh boundary.
    ///
    /// Returns the body and the matching `Content-Type` header value.
    pub fn to_multipart(&self) -> Result<(Vec<u8>, String), Error> {
        self.to_multipart_with_boundary(&Uuid::new_v4().simple().to_string())
    }

    pub(crate) fn to_multipart_with_boundary(
        &self,
        boundary: &str,
    ) -> Result<(Vec<u8>, String), Error> {
        if self.image_content_type.trim().is_empty() {
            return Err(Error::empty("image content type"));
        }
        if self.image_contents.is_empty() {
            return Err(Error::empty("image contents"));
        }

        let mut body = Vec::with_capacity(self.image_contents.len() + 256);
        body.extend_from_slice(
            format!(
                "--{boundary}\r\n\
                 Content-Disposition: form-data; name=\"{IMAGE_FIELD}\"; filename=\"{IMAGE_FILENAME}\"\r\n\
                 Content-Type: {}\r\n\r\n",
                self.image_content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(&self.image_contents);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Ok((body, format!("multipart/form-data; boundary={boundary}")))
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn multipart_layout() {
        let payload = UploadFaceCaptureImagePayload::new("image/png", vec![0x89, b'P', b'N', b'G']);
        let (body, content_type) = payload.to_multipart_with_boundary("b0undary").unwrap();

        assert_eq!(content_type, "multipart/form-data; boundary=b0undary");
        let mut expected = b"--b0undary\r\n\
            Content-Disposition: form-data; name=\"binary-content\"; filename=\"face-capture-image\"\r\n\
            Content-Type: image/png\r\n\r\n"
            .to_vec();
        expected.extend_from_slice(&[0x89, b'P', b'N', b'G']);
        expected.extend_from_slice(b"\r\n--b0undary--\r\n");
        assert_eq!(body, expected);
    }

    #[test]
    fn empty_image_is_rejected() {
        let payload = UploadFaceCaptureImagePayload::new("image/png", vec![]);
        assert!(matches!(
            payload.to_multipart(),
            Err(Error::Validation { field: "image contents", .. })
        ));
        let payload = UploadFaceCaptureImagePayload::new(" ", vec![1]);
        assert!(matches!(
            payload.to_multipart(),
            Err(Error::Validation { field: "image content type", .. })
        ));
    }

    #[test]
    fn create_response_defaults_frames() {
        let response: CreateFaceCaptureResourceResponse =
            serde_json::from_value(json!({"id": "fc1"})).unwrap();
        assert_eq!(response.frames, 0);
        assert_eq!(
            serde_json::to_value(CreateFaceCaptureResourcePayload::new("req")).unwrap(),
            json!({"requirement_id": "req"})
        );
    }
}
