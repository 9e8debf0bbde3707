//! Vessel Persistence Tracking
//!
//! Keeps the last observation of every vessel seen inside a zone and decides,
//! on each sweep, which of them are still shown. A vessel remains listed for
//! the persistence window after it was last geofenced, then is forgotten.
//!
//! Expiry happens inside [`TrackingState::sweep`]; there is no timer.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut state = TrackingState::new();
//! for row in rows_in_zone {
//!     state.observe(VesselRecord::from_details(&row), now_ms);
//! }
//! let shown = state.sweep(now_ms, &settings);
//! let lines = format_for_overlay(&shown);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::settings::TrackerSettings;
use crate::vessel::VesselRecord;

/// A vessel as listed in the display output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayVessel {
    #[serde(flatten)]
    pub record: VesselRecord,

    /// Whole seconds since the vessel was last seen in the zone
    pub seconds_since_seen: u64,

    /// Seen in the latest cycle
    pub still_in_zone: bool,
}

#[derive(Debug, Clone)]
struct TrackedVessel {
    record: VesselRecord,
    last_seen_ms: u64,
}

/// Last-known record and last-seen time per MMSI
#[derive(Debug, Clone, Default)]
pub struct TrackingState {
    // Ordered by MMSI so sweeps are deterministic
    vessels: BTreeMap<u32, TrackedVessel>,
}

impl TrackingState {
    pub fn new() -> Self {
        TrackingState::default()
    }

    /// Record a vessel seen inside the zone at `now_ms`, replacing whatever
    /// was stored for its MMSI
    pub fn observe(&mut self, record: VesselRecord, now_ms: u64) {
        self.vessels.insert(
            record.mmsi,
            TrackedVessel {
                record,
                last_seen_ms: now_ms,
            },
        );
    }

    /// Drop expired vessels and return the ones to display.
    ///
    /// Vessels older than the persistence window are removed for good.
    /// The rest are filtered by category and speed, then sorted by name.
    /// Vessels with equal names are listed in ascending MMSI order.
    pub fn sweep(&mut self, now_ms: u64, settings: &TrackerSettings) -> Vec<DisplayVessel> {
        let window_ms = settings.persist_window_ms();
        let still_ms = settings.still_in_zone_ms();

        self.vessels
            .retain(|_, v| now_ms.saturating_sub(v.last_seen_ms) <= window_ms);

        let mut shown: Vec<DisplayVessel> = self
            .vessels
            .values()
            .filter(|v| !settings.is_excluded(&v.record.category))
            .filter(|v| v.record.speed >= settings.min_speed)
            .map(|v| {
                let age_ms = now_ms.saturating_sub(v.last_seen_ms);
                DisplayVessel {
                    record: v.record.clone(),
                    seconds_since_seen: age_ms / 1000,
                    still_in_zone: age_ms < still_ms,
                }
            })
            .collect();

        // Stable: equal names keep MMSI order
        shown.sort_by(|a, b| a.record.name.cmp(&b.record.name));
        shown
    }

    /// Forget every tracked vessel
    pub fn clear(&mut self) {
        self.vessels.clear();
    }

    pub fn len(&self) -> usize {
        self.vessels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vessels.is_empty()
    }

    pub fn contains(&self, mmsi: u32) -> bool {
        self.vessels.contains_key(&mmsi)
    }

    pub fn last_seen(&self, mmsi: u32) -> Option<u64> {
        self.vessels.get(&mmsi).map(|v| v.last_seen_ms)
    }

    pub fn record(&self, mmsi: u32) -> Option<&VesselRecord> {
        self.vessels.get(&mmsi).map(|v| &v.record)
    }
}

/// Overlay lines for a display list, in the same order
pub fn format_for_overlay(vessels: &[DisplayVessel]) -> Vec<String> {
    vessels.iter().map(|v| v.record.display.clone()).collect()
}
