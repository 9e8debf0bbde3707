//! Tracking options

use serde::{Deserialize, Serialize};

pub const DEFAULT_LOOKBACK_HOURS: u32 = 3;
pub const DEFAULT_PERSIST_MINUTES: u32 = 10;
pub const DEFAULT_MIN_SPEED_KN: f64 = 0.5;
pub const DEFAULT_STILL_IN_ZONE_SECS: u64 = 5;

fn default_lookback_hours() -> u32 {
    DEFAULT_LOOKBACK_HOURS
}

fn default_persist_minutes() -> u32 {
    DEFAULT_PERSIST_MINUTES
}

fn default_exclude_categories() -> Vec<String> {
    vec!["Unknown".to_string()]
}

fn default_min_speed() -> f64 {
    DEFAULT_MIN_SPEED_KN
}

fn default_still_in_zone_secs() -> u64 {
    DEFAULT_STILL_IN_ZONE_SECS
}

/// Options controlling a zone tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerSettings {
    /// How far back the provider's area search reaches
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: u32,

    /// How long a vessel stays listed after it was last seen in the zone
    #[serde(default = "default_persist_minutes")]
    pub persist_minutes: u32,

    /// Categories never listed. "Unknown" holds buoys, net beacons and
    /// other transmitters that are not vessels.
    #[serde(default = "default_exclude_categories")]
    pub exclude_categories: Vec<String>,

    /// Vessels slower than this (knots) are not listed
    #[serde(default = "default_min_speed")]
    pub min_speed: f64,

    /// A vessel seen less than this many seconds ago is flagged as still in
    /// the zone. Should be shorter than the poll interval.
    #[serde(default = "default_still_in_zone_secs")]
    pub still_in_zone_secs: u64,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        TrackerSettings {
            lookback_hours: DEFAULT_LOOKBACK_HOURS,
            persist_minutes: DEFAULT_PERSIST_MINUTES,
            exclude_categories: default_exclude_categories(),
            min_speed: DEFAULT_MIN_SPEED_KN,
            still_in_zone_secs: DEFAULT_STILL_IN_ZONE_SECS,
        }
    }
}

impl TrackerSettings {
    pub fn persist_window_ms(&self) -> u64 {
        u64::from(self.persist_minutes) * 60_000
    }

    pub fn still_in_zone_ms(&self) -> u64 {
        self.still_in_zone_secs.saturating_mul(1000)
    }

    pub fn is_excluded(&self, category: &str) -> bool {
        self.exclude_categories.iter().any(|c| c == category)
    }
}
