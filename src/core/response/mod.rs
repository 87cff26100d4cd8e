use base64::prelude::*;
use http::{header::CONTENT_TYPE, HeaderMap, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value as Json;
use tracing::debug;

use super::error::DecodeError;

const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// Binary content returned by a media endpoint, with its declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaContent {
    mime_type: String,
    content: Vec<u8>,
}

impl MediaContent {
    pub fn new(mime_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            content,
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn into_content(self) -> Vec<u8> {
        self.content
    }

    /// The content as a `data:` URL.
    pub fn base64_content(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            BASE64_STANDARD.encode(&self.content)
        )
    }
}

/// Decode a successful JSON response body into `T`.
///
/// The body is first parsed into a JSON tree so syntax errors are reported apart from shape
/// errors; shape errors carry the path of the offending value.
pub fn decode_json<T: DeserializeOwned>(
    headers: &HeaderMap,
    body: &[u8],
) -> Result<T, DecodeError> {
    if let Some(content_type) = content_type(headers) {
        if !is_json(content_type) {
            debug!("decoding response with content type '{content_type}' as JSON");
        }
    }

    let tree: Json =
        serde_json::from_slice(body).map_err(|e| DecodeError::Syntax(e.to_string()))?;
    serde_path_to_error::deserialize(tree).map_err(DecodeError::from_path_error)
}

/// Pass a media response through untouched.
///
/// `204 No Content` means there is no media, and yields `None`.
pub fn decode_media(response: Response<Vec<u8>>) -> Option<MediaContent> {
    if response.status() == StatusCode::NO_CONTENT {
        return None;
    }
    let mime_type = content_type(response.headers())
        .unwrap_or(DEFAULT_MEDIA_TYPE)
        .to_owned();
    Some(MediaContent::new(mime_type, response.into_body()))
}

fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn is_json(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}
