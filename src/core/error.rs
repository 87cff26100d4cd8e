use std::fmt;

use http::StatusCode;
use serde::Deserialize;
use tracing::warn;

/// Every failure a Doc Scan operation can produce.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required identifier was empty or malformed; no request was sent.
    #[error("{field} {reason}")]
    Validation { field: &'static str, reason: String },
    /// The client configuration is unusable, e.g. an API URL that does not parse.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// The HTTP request could not be assembled from otherwise valid inputs.
    #[error("unable to build request: {0}")]
    Request(String),
    /// The private key could not be loaded.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),
    /// The signature over the canonical request could not be computed.
    #[error("failed to sign request: {0}")]
    Signing(String),
    /// The transport failed before any HTTP status was obtained.
    #[error("transport failure: {0:#}")]
    Transport(anyhow::Error),
    /// The service rejected the request (4xx).
    #[error("client error: {0}")]
    Client(ServiceError),
    /// The service failed internally (5xx).
    #[error("server error: {0}")]
    Server(ServiceError),
    /// A successful response did not match the expected shape.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl Error {
    pub(crate) fn empty(field: &'static str) -> Self {
        Self::Validation {
            field,
            reason: "cannot be empty".into(),
        }
    }

    /// The service error carried by [Error::Client] or [Error::Server].
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            Self::Client(e) | Self::Server(e) => Some(e),
            _ => None,
        }
    }
}

/// Failure to decode a successful response body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("response body is not valid JSON: {0}")]
    Syntax(String),
    #[error("missing required field `{field}` at `{path}`")]
    MissingField { path: String, field: String },
    #[error("unexpected value at `{path}`: {message}")]
    InvalidValue { path: String, message: String },
}

impl DecodeError {
    pub(crate) fn from_path_error(error: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = error.path().to_string();
        let message = error.into_inner().to_string();
        match missing_field(&message) {
            Some(field) => Self::MissingField {
                path,
                field: field.to_owned(),
            },
            None => Self::InvalidValue { path, message },
        }
    }
}

// serde reports absent fields as "missing field `name`".
fn missing_field(message: &str) -> Option<&str> {
    message
        .strip_prefix("missing field `")?
        .split('`')
        .next()
        .filter(|field| !field.is_empty())
}

/// Whether a [ServiceError] came from a 4xx or a 5xx response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    Client,
    Server,
}

/// A non-2xx response from the Doc Scan service.
///
/// Only produced by [map_error].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    status: StatusCode,
    code: Option<String>,
    message: String,
    errors: Vec<PropertyError>,
}

/// A property-level validation failure reported alongside an error code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PropertyError {
    #[serde(default)]
    pub property: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ServiceError {
    pub fn kind(&self) -> ServiceErrorKind {
        if self.status.is_server_error() {
            ServiceErrorKind::Server
        } else {
            ServiceErrorKind::Client
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code, when the body carried one.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn errors(&self) -> &[PropertyError] {
        &self.errors
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status)?;
        if let Some(code) = &self.code {
            write!(f, " {code}")?;
        }
        write!(f, " - {}", self.message)?;
        for e in &self.errors {
            write!(
                f,
                "; {}: {}",
                e.property.as_deref().unwrap_or("<unknown>"),
                e.message.as_deref().unwrap_or("")
            )?;
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<PropertyError>,
}

/// Convert a non-2xx response into [Error::Client] or [Error::Server].
///
/// A body of the form `{"code": ..., "message": ..., "errors": [...]}` is preferred; anything
/// else is kept as raw text. This never fails on a malformed body.
pub fn map_error(status: StatusCode, body: &[u8]) -> Error {
    let error = match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            code,
            message,
            errors,
        }) => ServiceError {
            status,
            code,
            message: message.unwrap_or_else(|| reason(status)),
            errors,
        },
        Err(e) => {
            if !body.is_empty() {
                warn!("error response body could not be parsed ({status}): {e}");
            }
            let text = String::from_utf8_lossy(body).into_owned();
            ServiceError {
                status,
                code: None,
                message: if text.is_empty() { reason(status) } else { text },
                errors: Vec::new(),
            }
        }
    };

    match error.kind() {
        ServiceErrorKind::Server => Error::Server(error),
        ServiceErrorKind::Client => Error::Client(error),
    }
}

fn reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("unknown status")
        .to_owned()
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn not_found_with_code() {
        let body = json!({"code": "SESSION_NOT_FOUND", "message": "Session not found"});
        let err = map_error(StatusCode::NOT_FOUND, body.to_string().as_bytes());

        let Error::Client(service) = err else {
            panic!("expected a client error, got {err:?}")
        };
        assert_eq!(service.kind(), ServiceErrorKind::Client);
        assert_eq!(service.status(), StatusCode::NOT_FOUND);
        assert_eq!(service.code(), Some("SESSION_NOT_FOUND"));
        assert_eq!(service.message(), "Session not found");
    }

    #[test]
    fn server_error_with_html_body() {
        let err = map_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            b"<html>upstream exploded</html>",
        );

        let Error::Server(service) = err else {
            panic!("expected a server error, got {err:?}")
        };
        assert_eq!(service.code(), None);
        assert_eq!(service.message(), "<html>upstream exploded</html>");
    }

    #[test]
    fn property_errors_are_kept() {
        let body = json!({
            "code": "PAYLOAD_VALIDATION",
            "errors": [{"property": "requested_checks[0].type", "message": "must not be null"}]
        });
        let err = map_error(StatusCode::BAD_REQUEST, body.to_string().as_bytes());

        let service = err.service_error().unwrap();
        assert_eq!(service.message(), "Bad Request");
        assert_eq!(service.errors().len(), 1);
        assert_eq!(
            service.to_string(),
            "400 Bad Request PAYLOAD_VALIDATION - Bad Request; requested_checks[0].type: must not be null"
        );
    }

    #[test]
    fn empty_body_uses_reason_phrase() {
        let err = map_error(StatusCode::SERVICE_UNAVAILABLE, b"");
        assert_eq!(err.service_error().unwrap().message(), "Service Unavailable");
        assert!(matches!(err, Error::Server(_)));
    }

    #[test]
    fn missing_field_message() {
        assert_eq!(missing_field("missing field `session_id`"), Some("session_id"));
        assert_eq!(missing_field("invalid type: string, expected u64"), None);
    }
}
