use std::time::{SystemTime, UNIX_EPOCH};

use base64::prelude::*;
use http::{
    header::{ACCEPT, CONTENT_TYPE},
    Method, Request,
};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use super::{
    credential::{Credential, RequestSigner},
    error::Error,
    util::base_request,
};
use crate::config::BaseUrl;

const CANONICAL_DELIMITER: u8 = b'&';

pub const SDK_ID_PARAM: &str = "sdkId";
pub const NONCE_PARAM: &str = "nonce";
pub const TIMESTAMP_PARAM: &str = "timestamp";
pub const SIGNATURE_PARAM: &str = "sig";

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// The exact bytes that are signed for a request.
///
/// Layout is `METHOD&endpoint` followed by `&base64(body)` when the body is non-empty. The
/// endpoint is used verbatim, query string included, so query ordering is decided by whoever
/// built it.
pub fn canonical_bytes(method: &Method, endpoint: &str, body: &[u8]) -> Vec<u8> {
    let mut canonical = method.as_str().to_ascii_uppercase().into_bytes();
    canonical.push(CANONICAL_DELIMITER);
    canonical.extend_from_slice(endpoint.as_bytes());
    if !body.is_empty() {
        canonical.push(CANONICAL_DELIMITER);
        canonical.extend_from_slice(BASE64_STANDARD.encode(body).as_bytes());
    }
    canonical
}

/// Sign canonical request bytes, returning the URL-safe, unpadded signature token.
pub fn sign<S: RequestSigner + ?Sized>(canonical: &[u8], signer: &S) -> Result<String, Error> {
    signer
        .sign(canonical)
        .map(|signature| BASE64_URL_SAFE_NO_PAD.encode(signature))
}

/// A request whose signature has been computed and attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    method: Method,
    endpoint: String,
    body: Vec<u8>,
    content_type: Option<String>,
    accept: Option<&'static str>,
    signature: String,
    sdk_id: String,
}

impl SignedRequest {
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path and query string that were signed (without the signature itself).
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn sdk_id(&self) -> &str {
        &self.sdk_id
    }

    /// Path and query string as sent on the wire, signature last.
    pub fn signed_endpoint(&self) -> String {
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{}{separator}{SIGNATURE_PARAM}={}",
            self.endpoint, self.signature
        )
    }

    /// Recompute the canonical bytes this request was signed over.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        canonical_bytes(&self.method, &self.endpoint, &self.body)
    }

    /// Resolve against `base` and turn into an HTTP request for the transport.
    pub fn into_http(self, base: &BaseUrl) -> Result<Request<Vec<u8>>, Error> {
        let url = base
            .join(self.signed_endpoint().trim_start_matches('/'))
            .map_err(|e| Error::Request(format!("endpoint cannot be joined to the API URL: {e}")))?;

        let mut builder = base_request().method(self.method).uri(url.as_str());
        if let Some(content_type) = &self.content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        if let Some(accept) = self.accept {
            builder = builder.header(ACCEPT, accept);
        }
        builder
            .body(self.body)
            .map_err(|e| Error::Request(e.to_string()))
    }
}

/// Builds and signs a request to a Doc Scan endpoint.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Vec<u8>,
    content_type: Option<String>,
    accept: Option<&'static str>,
}

impl RequestBuilder {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: Vec::new(),
            content_type: None,
            accept: Some(CONTENT_TYPE_JSON),
        }
    }

    /// Append a query parameter. Parameters are emitted in insertion order.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_json_body<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self, Error> {
        self.body = serde_json::to_vec(payload)
            .map_err(|e| Error::Request(format!("payload could not be serialized: {e}")))?;
        self.content_type = Some(CONTENT_TYPE_JSON.into());
        Ok(self)
    }

    pub fn with_body(mut self, body: Vec<u8>, content_type: impl Into<String>) -> Self {
        self.body = body;
        self.content_type = Some(content_type.into());
        self
    }

    /// Accept any content type, for binary media endpoints.
    pub fn accept_any(mut self) -> Self {
        self.accept = None;
        self
    }

    /// Add the authentication parameters and sign.
    ///
    /// `sdkId`, `nonce` and `timestamp` follow any parameters added so far.
    pub fn sign(self, credential: &Credential) -> Result<SignedRequest, Error> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| Error::Signing(format!("system clock is before the epoch: {e}")))?
            .as_micros();
        self.sign_with(credential, Uuid::new_v4(), timestamp)
    }

    pub(crate) fn sign_with(
        self,
        credential: &Credential,
        nonce: Uuid,
        timestamp: u128,
    ) -> Result<SignedRequest, Error> {
        let Self {
            method,
            path,
            mut query,
            body,
            content_type,
            accept,
        } = self;

        query.push((SDK_ID_PARAM.into(), credential.sdk_id().into()));
        query.push((NONCE_PARAM.into(), nonce.to_string()));
        query.push((TIMESTAMP_PARAM.into(), timestamp.to_string()));

        let query = serde_urlencoded::to_string(&query)
            .map_err(|e| Error::Request(format!("query could not be encoded: {e}")))?;
        let endpoint = format!("{path}?{query}");

        debug!("signing {method} {path}");
        let signature = sign(&canonical_bytes(&method, &endpoint, &body), credential)?;

        Ok(SignedRequest {
            method,
            endpoint,
            body,
            content_type,
            accept,
            signature,
            sdk_id: credential.sdk_id().to_owned(),
        })
    }
}

#[cfg(test)]
mod test {
    use rsa::{pkcs1v15::Signature, signature::Verifier};

    use super::*;

    const PEM: &str = include_str!("../../tests/fixtures/sdk-key.pem");

    fn credential() -> Credential {
        Credential::from_pem("sdk-id", PEM).unwrap()
    }

    #[test]
    fn canonical_layout() {
        assert_eq!(
            canonical_bytes(&Method::GET, "/sessions/abc?sdkId=x", b""),
            b"GET&/sessions/abc?sdkId=x"
        );
        assert_eq!(
            canonical_bytes(&Method::POST, "/sessions?sdkId=x", b"{}"),
            b"POST&/sessions?sdkId=x&e30="
        );
    }

    #[test]
    fn canonical_method_is_upper_cased() {
        let lower = Method::from_bytes(b"patch").unwrap();
        assert_eq!(
            canonical_bytes(&lower, "/a", b"x"),
            canonical_bytes(&Method::PATCH, "/a", b"x")
        );
    }

    #[test]
    fn canonical_is_deterministic_and_does_not_reorder_query() {
        let a = canonical_bytes(&Method::PUT, "/x?b=2&a=1", b"body");
        let b = canonical_bytes(&Method::PUT, "/x?b=2&a=1", b"body");
        let reordered = canonical_bytes(&Method::PUT, "/x?a=1&b=2", b"body");
        assert_eq!(a, b);
        assert_ne!(a, reordered);
    }

    #[test]
    fn signed_request_layout() {
        let nonce = Uuid::nil();
        let request = RequestBuilder::new(Method::GET, "/supported-documents")
            .with_query_param("includeNonLatin", "true")
            .sign_with(&credential(), nonce, 1_600_000_000_000_000)
            .unwrap();

        assert_eq!(
            request.endpoint(),
            "/supported-documents?includeNonLatin=true&sdkId=sdk-id\
             &nonce=00000000-0000-0000-0000-000000000000&timestamp=1600000000000000"
        );
        assert!(!request
            .signature()
            .contains(|c| matches!(c, '=' | '+' | '/')));
        assert!(request
            .signed_endpoint()
            .ends_with(&format!("&sig={}", request.signature())));

        let raw = BASE64_URL_SAFE_NO_PAD.decode(request.signature()).unwrap();
        credential()
            .key()
            .verifying_key()
            .verify(
                &request.canonical_bytes(),
                &Signature::try_from(raw.as_slice()).unwrap(),
            )
            .unwrap();
    }

    #[test]
    fn json_body_is_signed() {
        let credential = credential();
        let with_body = RequestBuilder::new(Method::POST, "/sessions")
            .with_json_body(&serde_json::json!({"a": 1}))
            .unwrap()
            .sign_with(&credential, Uuid::nil(), 1)
            .unwrap();
        let without_body = RequestBuilder::new(Method::POST, "/sessions")
            .sign_with(&credential, Uuid::nil(), 1)
            .unwrap();

        assert_eq!(with_body.content_type(), Some(CONTENT_TYPE_JSON));
        assert_eq!(with_body.body(), br#"{"a":1}"#);
        assert_ne!(with_body.signature(), without_body.signature());
    }

    #[test]
    fn into_http_resolves_against_base_url() {
        let base = BaseUrl::try_from("https://api.example.com/idverify/v1".to_owned()).unwrap();
        let request = RequestBuilder::new(Method::DELETE, "/sessions/abc")
            .sign_with(&credential(), Uuid::nil(), 1)
            .unwrap();
        let signature = request.signature().to_owned();

        let http = request.into_http(&base).unwrap();
        assert_eq!(http.method(), Method::DELETE);
        assert_eq!(http.uri().path(), "/idverify/v1/sessions/abc");
        assert!(http
            .uri()
            .query()
            .unwrap()
            .ends_with(&format!("&sig={signature}")));
        assert_eq!(http.headers()[ACCEPT], CONTENT_TYPE_JSON);
        assert!(http.headers().get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn build_failures_are_request_errors() {
        let payload: std::collections::BTreeMap<Vec<u8>, u8> = [(vec![1], 1)].into();
        assert!(matches!(
            RequestBuilder::new(Method::POST, "/sessions").with_json_body(&payload),
            Err(Error::Request(_))
        ));

        let base = BaseUrl::try_from("https://api.example.com/idverify/v1".to_owned()).unwrap();
        let request = RequestBuilder::new(Method::PUT, "/sessions/abc")
            .with_body(vec![1], "image/png\r\nX-Injected: 1")
            .sign_with(&credential(), Uuid::nil(), 1)
            .unwrap();
        assert!(matches!(request.into_http(&base), Err(Error::Request(_))));
    }
}
