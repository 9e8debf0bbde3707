//! Barentswatch AIS API client
//!
//! Authenticates with OAuth2 client credentials and offers the two calls the
//! tracker needs:
//!
//! - [`BarentswatchClient::find_vessels_in_polygon`]: MMSIs of vessels that
//!   were anywhere inside a polygon during a time window. The provider does
//!   not look at current positions, so callers must re-check the geofence.
//! - [`BarentswatchClient::fetch_vessel_details`]: latest position, speed,
//!   heading and ship type for a list of MMSIs.
//!
//! The bearer token is cached inside the client and refreshed 60 seconds
//! before it expires. The check-and-refresh sequence runs under a mutex, so a
//! client shared between zones never refreshes twice.
//!
//! The client never retries. Failures come back as [`TrackerError`] and the
//! caller decides what to do with the cycle.
//!
//! # Example
//!
//! ```rust,ignore
//! let transport = ReqwestTransport::new()?;
//! let client = BarentswatchClient::new(transport, Credentials::new(id, secret));
//!
//! let mmsis = client.find_vessels_in_polygon(&ring, 3).await?;
//! let rows = client.fetch_vessel_details(&mmsis).await?;
//! ```

use chrono::Duration;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;

use shipwatch_core::VesselDetails;

use crate::clock::{Clock, SystemClock};
use crate::error::TrackerError;

pub mod token;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use token::{AccessToken, TokenResponse, TokenState};
pub use transport::{AisTransport, ReqwestTransport, DEFAULT_HTTP_TIMEOUT};

pub const TOKEN_URL: &str = "https://id.barentswatch.no/connect/token";
pub const HISTORIC_API_URL: &str = "https://historic.ais.barentswatch.no/v1/historic/mmsiinarea";
pub const LIVE_API_URL: &str = "https://live.ais.barentswatch.no/v1/latest/combined";

const TOKEN_SCOPE: &str = "ais";

/// Wire format of the search window timestamps
const MSG_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// OAuth2 client credentials
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Credentials {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Provider endpoint URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub token: String,
    pub area_search: String,
    pub latest: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            token: TOKEN_URL.to_string(),
            area_search: HISTORIC_API_URL.to_string(),
            latest: LIVE_API_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// All three endpoints below one base URL, for test servers and proxies
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Endpoints {
            token: format!("{}/connect/token", base),
            area_search: format!("{}/v1/historic/mmsiinarea", base),
            latest: format!("{}/v1/latest/combined", base),
        }
    }
}

pub struct BarentswatchClient<T: AisTransport = ReqwestTransport> {
    transport: T,
    credentials: Credentials,
    endpoints: Endpoints,
    clock: Arc<dyn Clock>,
    token: Mutex<Option<AccessToken>>,
}

impl<T: AisTransport> BarentswatchClient<T> {
    pub fn new(transport: T, credentials: Credentials) -> Self {
        Self::with_clock(transport, credentials, Arc::new(SystemClock))
    }

    pub fn with_clock(transport: T, credentials: Credentials, clock: Arc<dyn Clock>) -> Self {
        BarentswatchClient {
            transport,
            credentials,
            endpoints: Endpoints::default(),
            clock,
            token: Mutex::new(None),
        }
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    pub async fn token_state(&self) -> TokenState {
        let token = self.token.lock().await;
        token::token_state(token.as_ref(), self.clock.now())
    }

    /// Forget the cached token; the next call exchanges credentials again
    pub async fn invalidate_token(&self) {
        *self.token.lock().await = None;
    }

    /// Current bearer token, exchanging credentials if there is no valid one
    async fn bearer(&self) -> Result<String, TrackerError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.is_valid(self.clock.now()) {
                return Ok(token.value().to_string());
            }
        }

        if self.credentials.client_id.is_empty() {
            return Err(TrackerError::Auth("client id not configured".to_string()));
        }

        log::debug!("Requesting new access token");
        let response = self
            .transport
            .exchange_token(
                &self.endpoints.token,
                &[
                    ("client_id", self.credentials.client_id.as_str()),
                    ("client_secret", self.credentials.client_secret.as_str()),
                    ("grant_type", "client_credentials"),
                    ("scope", TOKEN_SCOPE),
                ],
            )
            .await?;

        let token = AccessToken::from_response(response, self.clock.now());
        log::debug!("Got new token, expires at {}", token.expires_at());
        let value = token.value().to_string();
        *cached = Some(token);
        Ok(value)
    }

    /// MMSIs of vessels seen inside `ring` during the last `lookback_hours`.
    ///
    /// `ring` is a closed `[longitude, latitude]` ring.
    pub async fn find_vessels_in_polygon(
        &self,
        ring: &[[f64; 2]],
        lookback_hours: u32,
    ) -> Result<Vec<u32>, TrackerError> {
        let now = self.clock.now();
        let from = Duration::try_hours(i64::from(lookback_hours))
            .and_then(|lookback| now.checked_sub_signed(lookback))
            .ok_or_else(|| {
                TrackerError::Config(format!("lookback of {} hours is out of range", lookback_hours))
            })?;

        let body = json!({
            "msgtimefrom": from.format(MSG_TIME_FORMAT).to_string(),
            "msgtimeto": now.format(MSG_TIME_FORMAT).to_string(),
            "polygon": {
                "type": "Polygon",
                "coordinates": [ring],
            },
        });

        log::debug!("Querying vessels in polygon from {} to {}", from, now);

        let bearer = self.bearer().await?;
        let reply = self
            .transport
            .post_json(&self.endpoints.area_search, &bearer, &body)
            .await?;

        let mmsis: Vec<u32> = serde_json::from_value(reply)
            .map_err(|e| TrackerError::Parse(format!("area search: {}", e)))?;

        log::debug!("Found {} vessels in polygon", mmsis.len());
        Ok(mmsis)
    }

    /// Latest details for `mmsis`, each row enriched with its ship type
    /// string and category.
    ///
    /// An empty list returns immediately without touching the network.
    /// Rows that fail to decode are dropped.
    pub async fn fetch_vessel_details(
        &self,
        mmsis: &[u32],
    ) -> Result<Vec<VesselDetails>, TrackerError> {
        if mmsis.is_empty() {
            return Ok(Vec::new());
        }

        log::debug!("Getting details for {} vessels", mmsis.len());

        let bearer = self.bearer().await?;
        let reply = self
            .transport
            .post_json(&self.endpoints.latest, &bearer, &json!({ "mmsi": mmsis }))
            .await?;

        let rows = match reply {
            serde_json::Value::Array(rows) => rows,
            other => {
                return Err(TrackerError::Parse(format!(
                    "vessel details: expected a list, got {}",
                    json_type(&other)
                )))
            }
        };

        let mut vessels = Vec::with_capacity(rows.len());
        for row in rows {
            match serde_json::from_value::<VesselDetails>(row) {
                Ok(mut details) => {
                    details.enrich();
                    vessels.push(details);
                }
                Err(e) => log::warn!("Dropping malformed vessel row: {}", e),
            }
        }

        log::debug!("Got details for {} vessels", vessels.len());
        Ok(vessels)
    }

    /// Area search followed by the detail lookup
    pub async fn find_vessels_in_area(
        &self,
        ring: &[[f64; 2]],
        lookback_hours: u32,
    ) -> Result<Vec<VesselDetails>, TrackerError> {
        let mmsis = self.find_vessels_in_polygon(ring, lookback_hours).await?;
        self.fetch_vessel_details(&mmsis).await
    }
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "an object",
    }
}
