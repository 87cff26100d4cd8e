use http::{Method, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    config::Config,
    core::{
        credential::Credential,
        error::{map_error, Error},
        request::RequestBuilder,
        response::{decode_json, decode_media, MediaContent},
        session::{
            configuration::SessionConfigurationResponse,
            create::{CreateSessionResult, SessionSpecification},
            face_capture::{
                CreateFaceCaptureResourcePayload, CreateFaceCaptureResourceResponse,
                UploadFaceCaptureImagePayload,
            },
            instructions::{ContactProfileResponse, Instructions, InstructionsResponse},
            retrieve::GetSessionResult,
            support::SupportedDocumentsResponse,
        },
        util::{AsyncHttpClient, ReqwestClient},
    },
};

/// A client for the Doc Scan API.
///
/// Every call builds a fresh signed request, so a single client can be shared between tasks.
#[derive(Debug, Clone)]
pub struct DocScanClient<H = ReqwestClient> {
    credential: Credential,
    config: Config,
    http_client: H,
}

impl DocScanClient<ReqwestClient> {
    /// Build a client backed by [ReqwestClient], with the API URL taken from the environment.
    ///
    /// See [Config::from_env].
    pub fn from_pem(sdk_id: impl Into<String>, pem: &str) -> Result<Self, Error> {
        let credential = Credential::from_pem(sdk_id, pem)?;
        let config = Config::from_env().map_err(invalid_api_url)?;
        let http_client = ReqwestClient::new().map_err(Error::Transport)?;
        Ok(Self::new(credential, config, http_client))
    }
}

impl<H: AsyncHttpClient + Send + Sync> DocScanClient<H> {
    pub fn new(credential: Credential, config: Config, http_client: H) -> Self {
        Self {
            credential,
            config,
            http_client,
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Create a session from `specification`.
    pub async fn create_session(
        &self,
        specification: &SessionSpecification,
    ) -> Result<CreateSessionResult, Error> {
        let request =
            RequestBuilder::new(Method::POST, "/sessions").with_json_body(specification)?;
        self.execute_json(request).await
    }

    pub async fn get_session(&self, session_id: &str) -> Result<GetSessionResult, Error> {
        let path = session_path(session_id)?;
        self.execute_json(RequestBuilder::new(Method::GET, path))
            .await
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<(), Error> {
        let path = session_path(session_id)?;
        self.execute(RequestBuilder::new(Method::DELETE, path))
            .await
            .map(drop)
    }

    /// Fetch a piece of media. `Ok(None)` means the service has no content for it.
    pub async fn get_media_content(
        &self,
        session_id: &str,
        media_id: &str,
    ) -> Result<Option<MediaContent>, Error> {
        let path = media_path(session_id, media_id)?;
        self.execute_media(RequestBuilder::new(Method::GET, path))
            .await
    }

    pub async fn delete_media_content(&self, session_id: &str, media_id: &str) -> Result<(), Error> {
        let path = media_path(session_id, media_id)?;
        self.execute(RequestBuilder::new(Method::DELETE, path))
            .await
            .map(drop)
    }

    /// List supported countries and documents.
    ///
    /// Documents in non-latin scripts are only listed when `include_non_latin` is set.
    pub async fn get_supported_documents(
        &self,
        include_non_latin: bool,
    ) -> Result<SupportedDocumentsResponse, Error> {
        let request = RequestBuilder::new(Method::GET, "/supported-documents")
            .with_query_param("includeNonLatin", include_non_latin.to_string());
        self.execute_json(request).await
    }

    pub async fn create_face_capture_resource(
        &self,
        session_id: &str,
        payload: &CreateFaceCaptureResourcePayload,
    ) -> Result<CreateFaceCaptureResourceResponse, Error> {
        let path = format!("{}/resources/face-capture", session_path(session_id)?);
        if payload.requirement_id.trim().is_empty() {
            return Err(Error::empty("requirement ID"));
        }
        let request = RequestBuilder::new(Method::POST, path).with_json_body(payload)?;
        self.execute_json(request).await
    }

    /// Upload the image of a face capture resource as `multipart/form-data`.
    pub async fn upload_face_capture_image(
        &self,
        session_id: &str,
        resource_id: &str,
        payload: &UploadFaceCaptureImagePayload,
    ) -> Result<(), Error> {
        let path = format!(
            "{}/resources/face-capture/{}/image",
            session_path(session_id)?,
            validate_id("resource ID", resource_id)?
        );
        let (body, content_type) = payload.to_multipart()?;
        let request = RequestBuilder::new(Method::PUT, path).with_body(body, content_type);
        self.execute(request).await.map(drop)
    }

    pub async fn get_session_configuration(
        &self,
        session_id: &str,
    ) -> Result<SessionConfigurationResponse, Error> {
        let path = format!("{}/configuration", session_path(session_id)?);
        self.execute_json(RequestBuilder::new(Method::GET, path))
            .await
    }

    pub async fn put_ibv_instructions(
        &self,
        session_id: &str,
        instructions: &Instructions,
    ) -> Result<(), Error> {
        let path = instructions_path(session_id)?;
        let request = RequestBuilder::new(Method::PUT, path).with_json_body(instructions)?;
        self.execute(request).await.map(drop)
    }

    pub async fn get_ibv_instructions(
        &self,
        session_id: &str,
    ) -> Result<InstructionsResponse, Error> {
        let path = instructions_path(session_id)?;
        self.execute_json(RequestBuilder::new(Method::GET, path))
            .await
    }

    /// Fetch the instructions as a PDF document.
    pub async fn get_ibv_instructions_pdf(
        &self,
        session_id: &str,
    ) -> Result<Option<MediaContent>, Error> {
        let path = format!("{}/pdf", instructions_path(session_id)?);
        self.execute_media(RequestBuilder::new(Method::GET, path))
            .await
    }

    pub async fn fetch_instructions_contact_profile(
        &self,
        session_id: &str,
    ) -> Result<ContactProfileResponse, Error> {
        let path = format!("{}/contact-profile", instructions_path(session_id)?);
        self.execute_json(RequestBuilder::new(Method::GET, path))
            .await
    }

    /// Ask the service to email the instructions to the end user.
    pub async fn trigger_ibv_email_notification(&self, session_id: &str) -> Result<(), Error> {
        let path = format!("{}/email", instructions_path(session_id)?);
        self.execute(RequestBuilder::new(Method::POST, path))
            .await
            .map(drop)
    }

    async fn execute_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, Error> {
        let response = self.execute(request).await?;
        Ok(decode_json(response.headers(), response.body())?)
    }

    async fn execute_media(&self, request: RequestBuilder) -> Result<Option<MediaContent>, Error> {
        self.execute(request.accept_any()).await.map(decode_media)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response<Vec<u8>>, Error> {
        let signed = request.sign(&self.credential)?;
        let method = signed.method().clone();
        let endpoint = signed.endpoint().to_owned();
        let request = signed.into_http(&self.config.api_url)?;

        debug!("sending {method} {endpoint}");
        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(Error::Transport)?;

        let status = response.status();
        debug!("{method} {endpoint} returned {status}");
        if !status.is_success() {
            return Err(map_error(status, response.body()));
        }
        Ok(response)
    }
}

fn invalid_api_url(error: url::ParseError) -> Error {
    Error::Configuration(format!("API URL is not a valid URL: {error}"))
}

/// Accept only identifiers made of URL-unreserved characters, so the path that is signed is
/// byte for byte the path that is sent.
fn validate_id<'a>(field: &'static str, id: &'a str) -> Result<&'a str, Error> {
    if id.trim().is_empty() {
        return Err(Error::empty(field));
    }
    let unreserved = id
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~'));
    // `.` and `..` would be resolved away when joined to the API URL.
    if !unreserved || id.bytes().all(|b| b == b'.') {
        return Err(Error::Validation {
            field,
            reason: format!("'{id}' is malformed"),
        });
    }
    Ok(id)
}

fn session_path(session_id: &str) -> Result<String, Error> {
    Ok(format!("/sessions/{}", validate_id("session ID", session_id)?))
}

fn media_path(session_id: &str, media_id: &str) -> Result<String, Error> {
    Ok(format!(
        "{}/media/{}/content",
        session_path(session_id)?,
        validate_id("media ID", media_id)?
    ))
}

fn instructions_path(session_id: &str) -> Result<String, Error> {
    Ok(format!("{}/instructions", session_path(session_id)?))
}
