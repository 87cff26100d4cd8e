//! This library provides a Rust client for the [Yoti Doc Scan] identity verification API.
//!
//! [Yoti Doc Scan]: <https://developers.yoti.com/identity-verification>
//!
//! # Usage
//!
//! Requests are signed with the RSA private key issued alongside your SDK ID. Create a
//! [`DocScanClient`] once and share it:
//!
//! ```ignore
//! use yoti_doc_scan::client::DocScanClient;
//! use yoti_doc_scan::core::session::create::{RequestedCheck, SessionSpecification};
//!
//! let client = DocScanClient::from_pem(sdk_id, &std::fs::read_to_string("key.pem")?)?;
//!
//! // Create a session and hand the session id and token to the front end.
//! let session = client
//!     .create_session(&SessionSpecification {
//!         client_session_token_ttl: Some(600),
//!         requested_checks: vec![
//!             RequestedCheck::new("ID_DOCUMENT_AUTHENTICITY"),
//!             RequestedCheck::new("LIVENESS"),
//!         ],
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! // Once the user is done, retrieve the outcome.
//! let result = client.get_session(&session.session_id).await?;
//! for check in result.authenticity_checks() {
//!     println!("{} {:?}", check.check_type(), check.state());
//! }
//!
//! // Media referenced by the session is fetched separately.
//! if let Some(media) = client.get_media_content(&session.session_id, media_id).await? {
//!     println!("{} bytes of {}", media.content().len(), media.mime_type());
//! }
//! ```
//!
//! The API URL defaults to [`DEFAULT_API_URL`] and can be overridden with the
//! `YOTI_DOC_SCAN_API_URL` environment variable, or explicitly with a [`Config`].
//!
//! The transport can be replaced by implementing [`AsyncHttpClient`] and building the client with
//! [`DocScanClient::new`].
//!
//! [`DocScanClient`]: crate::client::DocScanClient
//! [`DocScanClient::new`]: crate::client::DocScanClient::new
//! [`DEFAULT_API_URL`]: crate::config::DEFAULT_API_URL
//! [`Config`]: crate::config::Config
//! [`AsyncHttpClient`]: crate::core::util::AsyncHttpClient
//!
//! # Protocol Overview
//!
//! 1. *Signing*: every request carries `sdkId`, `nonce` and `timestamp` query parameters. The
//!    method, endpoint and body are signed with the private key and the signature is appended
//!    as `sig`. See [`core::request`].
//! 2. *Decoding*: successful JSON responses are decoded into typed results. Checks, tasks and
//!    other polymorphic objects are selected by their discriminator; unrecognised kinds are
//!    kept as raw JSON rather than failing. See [`core::object`].
//! 3. *Errors*: non-2xx responses become [`Error::Client`] or [`Error::Server`], carrying
//!    the status, error code and message returned by the service.
//!
//! [`core::request`]: crate::core::request
//! [`core::object`]: crate::core::object
//! [`Error::Client`]: crate::core::error::Error::Client
//! [`Error::Server`]: crate::core::error::Error::Server

pub mod client;
pub mod config;
pub mod core;
