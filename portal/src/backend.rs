use std::time::Duration;

use models::{
    AuthResponse, BackendConfig, BackendMessage, Credentials, Registration, ResourceKind,
    SessionAuth,
};
use anyhow::Context;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::error::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum BackendError {
    #[error("Backend unreachable: {0}")]
    Unavailable(#[source] reqwest::Error),

    #[error("Backend rejected the request with {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected backend response: {0}")]
    Decode(#[source] reqwest::Error),
}

impl std::fmt::Debug for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl BackendError {
    /// The backend refused the caller's credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Rejected { status: 401 | 403, .. })
    }
}

/// A backend response passed through unchanged.
#[derive(Debug)]
pub struct Relayed {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Thin wrapper over the REST backend. Every call is a single attempt.
pub struct BackendClient {
    http_client: Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, anyhow::Error> {
        let base_url = Url::parse(&config.base_url).context("backend.base_url is not a valid URL")?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("backend.base_url must be an http(s) URL");
        }

        let mut builder = Client::builder();
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        Ok(Self {
            http_client: builder.build()?,
            base_url,
        })
    }

    /// Appends `segments` to the base URL. Each one is percent-encoded as a
    /// single path segment, so `/`, `?` and `#` inside it stay literal.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<AuthResponse, BackendError> {
        let response = self
            .http_client
            .post(self.endpoint(&["auth", "login"]))
            .json(credentials)
            .send()
            .await
            .map_err(BackendError::Unavailable)?;

        accept(response)
            .await?
            .json::<AuthResponse>()
            .await
            .map_err(BackendError::Decode)
    }

    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<(), BackendError> {
        let response = self
            .http_client
            .post(self.endpoint(&["auth", "register"]))
            .json(registration)
            .send()
            .await
            .map_err(BackendError::Unavailable)?;

        accept(response).await.map(|_| ())
    }

    /// Lists a collection. Without a session the request is anonymous.
    pub async fn list<T: DeserializeOwned>(
        &self,
        kind: ResourceKind,
        auth: Option<&SessionAuth>,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, BackendError> {
        let mut request = self
            .http_client
            .get(self.endpoint(&[kind.segment()]))
            .query(query);
        if let Some(auth) = auth {
            request = with_session(request, auth);
        }
        let response = request.send().await.map_err(BackendError::Unavailable)?;

        accept(response)
            .await?
            .json::<Vec<T>>()
            .await
            .map_err(BackendError::Decode)
    }

    /// Forwards a request on behalf of `auth`, relaying whatever status the
    /// backend answers with. Only transport failures are errors.
    #[instrument(skip(self, auth, body), fields(user_id = %auth.user_id()))]
    pub async fn forward(
        &self,
        method: Method,
        segments: &[&str],
        query: &str,
        auth: &SessionAuth,
        body: Option<serde_json::Value>,
    ) -> Result<Relayed, BackendError> {
        let mut url = self.endpoint(segments);
        if !query.is_empty() {
            url.set_query(Some(query));
        }

        let mut request = with_session(self.http_client.request(method, url), auth);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await.map_err(BackendError::Unavailable)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(BackendError::Unavailable)?
            .to_vec();

        Ok(Relayed {
            status,
            content_type,
            body,
        })
    }
}

fn with_session(request: RequestBuilder, auth: &SessionAuth) -> RequestBuilder {
    let request = request
        .header("X-User-Id", auth.user_id())
        .header("X-User-Role", auth.role().as_str());
    match auth.token() {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

/// Turns non-success statuses into [`BackendError::Rejected`], keeping the
/// backend's own message when it sent one.
async fn accept(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let fallback = status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string();
    let message = response
        .json::<BackendMessage>()
        .await
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or(fallback);

    Err(BackendError::Rejected {
        status: status.as_u16(),
        message,
    })
}
