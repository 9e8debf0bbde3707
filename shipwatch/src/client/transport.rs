//! HTTP transport for the Barentswatch client.
//!
//! [`AisTransport`] is the only place the client touches the network, so
//! tests can swap in an in-memory implementation.

use async_trait::async_trait;
use std::time::Duration;

use super::token::TokenResponse;
use crate::error::TrackerError;

/// Default timeout for each HTTP request
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("shipwatch/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait AisTransport: Send + Sync {
    /// POST an url-encoded credentials form to the token endpoint.
    ///
    /// Failures of any sort are [`TrackerError::Auth`].
    async fn exchange_token(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<TokenResponse, TrackerError>;

    /// POST a JSON body with a bearer token and decode the JSON reply.
    ///
    /// Network failures, timeouts and non-2xx replies are
    /// [`TrackerError::Transport`]; an undecodable body is
    /// [`TrackerError::Parse`].
    async fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, TrackerError>;
}

/// [`AisTransport`] over a pooled `reqwest::Client`
#[derive(Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TrackerError> {
        Self::with_timeout(DEFAULT_HTTP_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, TrackerError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TrackerError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http })
    }
}

#[async_trait]
impl AisTransport for ReqwestTransport {
    async fn exchange_token(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<TokenResponse, TrackerError> {
        let response = self
            .http
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| TrackerError::Auth(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(TrackerError::Auth(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| TrackerError::Auth(format!("Invalid token response: {}", e)))
    }

    async fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, TrackerError> {
        let response = self
            .http
            .post(url)
            .bearer_auth(bearer)
            .json(body)
            .send()
            .await
            .map_err(|e| TrackerError::Transport(format!("POST request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(TrackerError::Transport(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TrackerError::Transport(format!("Failed to read response: {}", e)))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| TrackerError::Parse(format!("{} from {}", e, url)))
    }
}
