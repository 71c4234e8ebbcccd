//! Fetch gateway for the digest backend.
//!
//! Provides an async HTTP client with:
//! - Bearer auth read from the credential store on every call
//! - Typed failures (`Unauthenticated`, `Http`, `Network`, `Decode`)
//! - No retries; callers decide what the user sees

mod endpoints;

use std::sync::Arc;

use reqwest::{Client, Method, Response};
use serde_json::Value;
use url::Url;

use crate::collab::LoginPrompt;
use crate::config::Config;
use crate::error::{GatewayError, GatewayResult};
use crate::store::CredentialStore;

/// Digest backend client.
#[derive(Clone)]
pub struct FetchGateway {
    /// HTTP client.
    client: Client,

    /// Backend origin, always ending in `/`.
    base_url: Url,

    /// Source of the bearer token.
    credentials: CredentialStore,

    /// Shown when an authenticated call has no credential.
    login_prompt: Arc<dyn LoginPrompt>,
}

impl FetchGateway {
    /// Create a new gateway with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or the HTTP client fails to build.
    pub fn new(
        config: &Config,
        credentials: CredentialStore,
        login_prompt: Arc<dyn LoginPrompt>,
    ) -> anyhow::Result<Self> {
        let mut base = config.api_base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("API base URL cannot be a base: {base}");
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, base_url, credentials, login_prompt })
    }

    /// Issue a request to `path` (relative to the backend origin).
    ///
    /// With `auth_required` and no credential, prompts for login and returns
    /// `Unauthenticated` without touching the network.
    ///
    /// # Errors
    ///
    /// Returns error on missing credential, non-2xx status, transport failure
    /// or a body that is not JSON.
    pub async fn request(
        &self,
        path: &str,
        method: Method,
        auth_required: bool,
        body: Option<&Value>,
    ) -> GatewayResult<Value> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        self.send(method, url, auth_required, body).await
    }

    /// Credential store this gateway reads from.
    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Show the login prompt without making a request.
    pub fn prompt_login(&self) {
        self.login_prompt.prompt_login();
    }

    /// Build a URL from raw path segments; each segment is percent-encoded.
    fn url_for(&self, segments: &[&str]) -> GatewayResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        auth_required: bool,
        body: Option<&Value>,
    ) -> GatewayResult<Value> {
        let mut request = self.client.request(method.clone(), url.clone());

        if auth_required {
            // Read at call time: a logout may have cleared it since the handler started.
            let Some(token) = self.credentials.token().await else {
                tracing::debug!(%method, %url, "no credential, prompting login");
                self.login_prompt.prompt_login();
                return Err(GatewayError::Unauthenticated);
            };
            request = request.bearer_auth(token);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, %url, "sending request");
        let response = request.send().await.inspect_err(|e| {
            tracing::debug!(%method, %url, error = %e, "request did not complete");
        })?;

        let response = Self::handle_response(response).await?;
        let bytes = response.bytes().await?;
        tracing::debug!(%method, %url, bytes = bytes.len(), "response received");

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Map non-2xx statuses to `GatewayError::Http`.
    async fn handle_response(response: Response) -> GatewayResult<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = error_detail(&text).unwrap_or_else(|| {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                trimmed.to_string()
            }
        });

        tracing::debug!(status = status.as_u16(), %message, "non-success response");
        Err(GatewayError::http(status.as_u16(), message))
    }
}

/// FastAPI puts the error in `{"detail": ...}`.
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

impl std::fmt::Debug for FetchGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchGateway").field("base_url", &self.base_url.as_str()).finish()
    }
}
