use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use async_trait::async_trait;
use http::{Request, Response};

pub const SDK_HEADER: &str = "X-Yoti-SDK";
pub const SDK_VERSION_HEADER: &str = "X-Yoti-SDK-Version";

const SDK_NAME: &str = "Rust";

/// Generic HTTP client.
///
/// Everything the library sends goes through this trait: retries, timeouts and TLS are the
/// implementation's concern.
#[async_trait]
pub trait AsyncHttpClient {
    async fn execute(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>>;
}

pub(crate) fn base_request() -> http::request::Builder {
    Request::builder()
        .header(SDK_HEADER, SDK_NAME)
        .header(
            SDK_VERSION_HEADER,
            concat!("Rust-", env!("CARGO_PKG_VERSION")),
        )
}

#[derive(Debug, Clone)]
pub struct ReqwestClient(reqwest::Client);

impl AsRef<reqwest::Client> for ReqwestClient {
    fn as_ref(&self) -> &reqwest::Client {
        &self.0
    }
}

impl ReqwestClient {
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .build()
            .context("unable to build http_client")
            .map(Self)
    }
}

impl From<reqwest::Client> for ReqwestClient {
    fn from(client: reqwest::Client) -> Self {
        Self(client)
    }
}

#[async_trait]
impl AsyncHttpClient for ReqwestClient {
    async fn execute(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        let response = self
            .0
            .execute(request.try_into().context("unable to convert request")?)
            .await
            .context("http request failed")?;

        let mut builder = Response::builder()
            .status(response.status())
            .version(response.version());

        builder
            .headers_mut()
            .context("unable to set headers")?
            .extend(response.headers().clone());

        builder
            .body(
                response
                    .bytes()
                    .await
                    .context("failed to extract response body")?
                    .to_vec(),
            )
            .context("unable to construct response")
    }
}
