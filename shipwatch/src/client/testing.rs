//! In-memory transport for client, tracker and service tests

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::token::TokenResponse;
use super::transport::AisTransport;
use super::{HISTORIC_API_URL, LIVE_API_URL};
use crate::error::TrackerError;

pub(crate) fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()
}

pub(crate) fn square() -> Vec<[f64; 2]> {
    vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]]
}

/// Detail row for a vessel of the given ship type
pub(crate) fn row(mmsi: u32, name: &str, lat: f64, lon: f64, speed: f64, ship_type: i32) -> Value {
    json!({
        "mmsi": mmsi,
        "name": name,
        "latitude": lat,
        "longitude": lon,
        "speedOverGround": speed,
        "trueHeading": 45.0,
        "shipType": ship_type,
    })
}

pub(crate) struct MockTransport {
    expires_in: Option<u64>,
    area: Mutex<Vec<u32>>,
    details: Mutex<Value>,
    fail_token: AtomicBool,
    fail_search: AtomicBool,
    fail_details: AtomicBool,
    hang_details: AtomicBool,
    token_calls: AtomicUsize,
    search_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    last_search_body: Mutex<Option<Value>>,
    last_detail_body: Mutex<Option<Value>>,
}

impl MockTransport {
    pub fn new() -> Self {
        MockTransport {
            expires_in: Some(3600),
            area: Mutex::new(Vec::new()),
            details: Mutex::new(json!([])),
            fail_token: AtomicBool::new(false),
            fail_search: AtomicBool::new(false),
            fail_details: AtomicBool::new(false),
            hang_details: AtomicBool::new(false),
            token_calls: AtomicUsize::new(0),
            search_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
            last_search_body: Mutex::new(None),
            last_detail_body: Mutex::new(None),
        }
    }

    pub fn with_expires_in(mut self, expires_in: Option<u64>) -> Self {
        self.expires_in = expires_in;
        self
    }

    pub fn with_area(self, mmsis: Vec<u32>) -> Self {
        self.set_area(mmsis);
        self
    }

    pub fn with_details(self, details: Value) -> Self {
        self.set_details(details);
        self
    }

    /// Replace both replies: the area search returns every row's MMSI
    pub fn set_rows(&self, rows: Vec<Value>) {
        let mmsis = rows
            .iter()
            .filter_map(|r| r["mmsi"].as_u64())
            .map(|m| m as u32)
            .collect();
        self.set_area(mmsis);
        self.set_details(Value::Array(rows));
    }

    pub fn set_area(&self, mmsis: Vec<u32>) {
        *self.area.lock().unwrap() = mmsis;
    }

    pub fn set_details(&self, details: Value) {
        *self.details.lock().unwrap() = details;
    }

    pub fn fail_token(&self, fail: bool) {
        self.fail_token.store(fail, Ordering::SeqCst);
    }

    pub fn fail_search(&self, fail: bool) {
        self.fail_search.store(fail, Ordering::SeqCst);
    }

    pub fn fail_details(&self, fail: bool) {
        self.fail_details.store(fail, Ordering::SeqCst);
    }

    /// Detail replies never arrive while set
    pub fn hang_details(&self, hang: bool) {
        self.hang_details.store(hang, Ordering::SeqCst);
    }

    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    pub fn last_search_body(&self) -> Option<Value> {
        self.last_search_body.lock().unwrap().clone()
    }

    pub fn last_detail_body(&self) -> Option<Value> {
        self.last_detail_body.lock().unwrap().clone()
    }
}

#[async_trait]
impl AisTransport for MockTransport {
    async fn exchange_token(
        &self,
        _url: &str,
        form: &[(&str, &str)],
    ) -> Result<TokenResponse, TrackerError> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);
        assert!(form.contains(&("grant_type", "client_credentials")));
        assert!(form.contains(&("scope", "ais")));

        if self.fail_token.load(Ordering::SeqCst) {
            return Err(TrackerError::Auth("HTTP 401 Unauthorized".to_string()));
        }
        Ok(TokenResponse {
            access_token: format!("token-{}", self.token_calls()),
            expires_in: self.expires_in,
        })
    }

    async fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: &Value,
    ) -> Result<Value, TrackerError> {
        assert!(bearer.starts_with("token-"));

        match url {
            HISTORIC_API_URL => {
                self.search_calls.fetch_add(1, Ordering::SeqCst);
                *self.last_search_body.lock().unwrap() = Some(body.clone());
                if self.fail_search.load(Ordering::SeqCst) {
                    return Err(TrackerError::Transport("HTTP 503 from search".to_string()));
                }
                Ok(json!(*self.area.lock().unwrap()))
            }
            LIVE_API_URL => {
                self.detail_calls.fetch_add(1, Ordering::SeqCst);
                *self.last_detail_body.lock().unwrap() = Some(body.clone());
                if self.hang_details.load(Ordering::SeqCst) {
                    std::future::pending::<()>().await;
                }
                if self.fail_details.load(Ordering::SeqCst) {
                    return Err(TrackerError::Transport("timed out".to_string()));
                }
                Ok(self.details.lock().unwrap().clone())
            }
            other => Err(TrackerError::Transport(format!("unexpected url {}", other))),
        }
    }
}
