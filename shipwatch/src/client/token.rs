//! OAuth2 client-credentials token cache

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// Lifetime assumed when the provider does not declare one
pub const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;

/// A token is refreshed this long before it actually expires
pub const EXPIRY_MARGIN_SECS: i64 = 60;

// Caps absurd provider lifetimes
const MAX_TOKEN_LIFETIME_SECS: u64 = 7 * 24 * 3600;

/// Token endpoint reply
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,

    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    /// No token has been obtained yet (or it was invalidated)
    Absent,
    Valid,
    /// Inside the expiry margin or past expiry; refreshed on next use
    Expired,
}

/// Bearer token with its absolute expiry
#[derive(Clone)]
pub struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Self {
        let lifetime = response
            .expires_in
            .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS)
            .min(MAX_TOKEN_LIFETIME_SECS) as i64;
        AccessToken {
            value: response.access_token,
            expires_at: now + Duration::seconds(lifetime),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Usable while `now < expires_at - margin`
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at - Duration::seconds(EXPIRY_MARGIN_SECS)
    }
}

// Keep the secret out of logs
impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

pub fn token_state(token: Option<&AccessToken>, now: DateTime<Utc>) -> TokenState {
    match token {
        None => TokenState::Absent,
        Some(t) if t.is_valid(now) => TokenState::Valid,
        Some(_) => TokenState::Expired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_validity_margin() {
        let token = AccessToken::from_response(
            TokenResponse {
                access_token: "abc".into(),
                expires_in: Some(600),
            },
            start(),
        );

        assert!(token.is_valid(start()));
        assert!(token.is_valid(start() + Duration::seconds(539)));
        assert!(!token.is_valid(start() + Duration::seconds(540)));
        assert!(!token.is_valid(start() + Duration::seconds(700)));
    }

    #[test]
    fn test_default_lifetime() {
        let token = AccessToken::from_response(
            TokenResponse {
                access_token: "abc".into(),
                expires_in: None,
            },
            start(),
        );
        assert_eq!(token.expires_at(), start() + Duration::seconds(3600));
    }

    #[test]
    fn test_token_state() {
        let token = AccessToken::from_response(
            TokenResponse {
                access_token: "abc".into(),
                expires_in: Some(120),
            },
            start(),
        );
        assert_eq!(token_state(None, start()), TokenState::Absent);
        assert_eq!(token_state(Some(&token), start()), TokenState::Valid);
        assert_eq!(
            token_state(Some(&token), start() + Duration::seconds(60)),
            TokenState::Expired
        );
    }

    #[test]
    fn test_debug_redacts_value() {
        let token = AccessToken::from_response(
            TokenResponse {
                access_token: "supersecret".into(),
                expires_in: None,
            },
            start(),
        );
        assert!(!format!("{:?}", token).contains("supersecret"));
    }

    #[test]
    fn test_token_response_deserialize() {
        let r: TokenResponse =
            serde_json::from_str(r#"{"access_token": "t", "expires_in": 3599, "token_type": "Bearer"}"#)
                .unwrap();
        assert_eq!(r.access_token, "t");
        assert_eq!(r.expires_in, Some(3599));
    }
}
