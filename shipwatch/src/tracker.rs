//! Zone Tracker
//!
//! Runs one polling cycle for a zone: ask the provider which vessels were
//! recently in the area, keep the ones whose current position is inside the
//! polygon, remember them, and return everything that should still be shown.
//!
//! Each zone gets its own tracker. [`ZoneTracker::update`] takes `&mut self`,
//! so a tracker's state has exactly one writer; the client may be shared.
//!
//! # Failure handling
//!
//! A cycle never fails as a whole. Provider errors mean "no new observations
//! this cycle": vessels already tracked keep ageing and are still returned
//! until their persistence window runs out. The error is handed back in
//! [`CycleOutcome::error`] for logging.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut tracker = ZoneTracker::new(client, Some(zone), TrackerSettings::default());
//!
//! loop {
//!     let outcome = tracker.update().await;
//!     write_overlay(outcome.overlay_lines());
//!     tokio::time::sleep(interval).await;
//! }
//! ```

use std::sync::Arc;

use shipwatch_core::geometry::point_in_polygon;
use shipwatch_core::tracking::{format_for_overlay, DisplayVessel, TrackingState};
use shipwatch_core::{TrackerSettings, VesselRecord, Zone};

use crate::client::{AisTransport, BarentswatchClient, ReqwestTransport};
use crate::clock::Clock;
use crate::error::TrackerError;

/// Result of one tracking cycle
#[derive(Debug, Clone, Default)]
pub struct CycleOutcome {
    /// Vessels to display, sorted by name
    pub vessels: Vec<DisplayVessel>,

    /// Vessels geofenced inside the zone this cycle
    pub observed: usize,

    /// Why this cycle brought no new observations, if it failed
    pub error: Option<TrackerError>,
}

impl CycleOutcome {
    /// One overlay line per vessel, same order as `vessels`
    pub fn overlay_lines(&self) -> Vec<String> {
        format_for_overlay(&self.vessels)
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

pub struct ZoneTracker<T: AisTransport = ReqwestTransport> {
    client: Arc<BarentswatchClient<T>>,
    clock: Arc<dyn Clock>,
    zone: Option<Zone>,
    settings: TrackerSettings,
    state: TrackingState,
}

impl<T: AisTransport> ZoneTracker<T> {
    /// Tracker reading time from the client's clock
    pub fn new(
        client: Arc<BarentswatchClient<T>>,
        zone: Option<Zone>,
        settings: TrackerSettings,
    ) -> Self {
        let clock = client.clock();
        ZoneTracker {
            client,
            clock,
            zone,
            settings,
            state: TrackingState::new(),
        }
    }

    pub fn zone(&self) -> Option<&Zone> {
        self.zone.as_ref()
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    pub fn state(&self) -> &TrackingState {
        &self.state
    }

    pub fn client(&self) -> &Arc<BarentswatchClient<T>> {
        &self.client
    }

    /// Forget all tracked vessels
    pub fn reset(&mut self) {
        log::debug!("Clearing {} tracked vessels", self.state.len());
        self.state.clear();
    }

    /// Switch to another zone. Vessels tracked for the old zone are dropped.
    pub fn set_zone(&mut self, zone: Option<Zone>) {
        self.zone = zone;
        self.reset();
    }

    /// Change the tracking options. Tracked vessels are kept.
    pub fn set_settings(&mut self, settings: TrackerSettings) {
        self.settings = settings;
    }

    /// Run one cycle and return the vessels to display
    pub async fn update(&mut self) -> CycleOutcome {
        let now_ms = self.clock.now_ms();

        let ring = match self.resolve_ring() {
            Ok(ring) => ring,
            Err(e) => {
                log::error!("{}", e);
                return CycleOutcome {
                    error: Some(e),
                    ..Default::default()
                };
            }
        };

        let (rows, error) = match self
            .client
            .find_vessels_in_area(&ring, self.settings.lookback_hours)
            .await
        {
            Ok(rows) => (rows, None),
            Err(e) => {
                log::error!("Error fetching vessels: {}", e);
                (Vec::new(), Some(e))
            }
        };

        // The area search is time-windowed, so re-check current positions
        let mut observed = 0;
        for details in rows {
            let Some((lat, lon)) = details.position() else {
                log::debug!("Vessel {} has no position, skipping", details.mmsi);
                continue;
            };
            if point_in_polygon(lat, lon, &ring) {
                self.state.observe(VesselRecord::from_details(&details), now_ms);
                observed += 1;
            }
        }

        let tracked_before = self.state.len();
        let vessels = self.state.sweep(now_ms, &self.settings);
        let expired = tracked_before - self.state.len();

        log::info!(
            "{}: {} vessels in zone, {} tracked, {} expired, {} shown",
            self.zone_label(),
            observed,
            self.state.len(),
            expired,
            vessels.len()
        );

        CycleOutcome {
            vessels,
            observed,
            error,
        }
    }

    /// Run one cycle and return only the overlay lines
    pub async fn update_overlay_lines(&mut self) -> Vec<String> {
        self.update().await.overlay_lines()
    }

    fn resolve_ring(&self) -> Result<Vec<[f64; 2]>, TrackerError> {
        let zone = self
            .zone
            .as_ref()
            .ok_or_else(|| TrackerError::Config("no zone configured".to_string()))?;
        Ok(zone.ring()?)
    }

    fn zone_label(&self) -> &str {
        self.zone.as_ref().map(|z| z.display_name()).unwrap_or("-")
    }
}
