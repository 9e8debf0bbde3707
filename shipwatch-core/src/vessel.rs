//! Vessel Records
//!
//! [`VesselDetails`] is a row as returned by the provider's latest-position
//! call. [`VesselRecord`] is the formatted form kept by the tracker and
//! written to the overlay output.

use serde::{Deserialize, Serialize};

use crate::heading::compass_8point;
use crate::ship_types::{ship_category, ship_type_string, UNKNOWN};

/// Speeds at or below this many knots are shown as "stationary"
pub const STATIONARY_SPEED_KN: f64 = 0.5;

/// Name used when the provider has none for a vessel
pub const UNKNOWN_NAME: &str = "Unknown";

/// Latest-position row for one vessel, as sent by the provider.
///
/// Only `mmsi` is required; every other field may be missing or null.
/// `ship_type_string` and `ship_category` are not sent by the provider, they
/// are filled in by [`VesselDetails::enrich`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VesselDetails {
    pub mmsi: u32,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,

    #[serde(default)]
    pub speed_over_ground: Option<f64>,

    #[serde(default)]
    pub true_heading: Option<f64>,

    #[serde(default)]
    pub course_over_ground: Option<f64>,

    #[serde(default)]
    pub ship_type: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_type_string: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_category: Option<String>,
}

impl VesselDetails {
    /// Fill in the type string and category from the ship type code.
    /// A missing code counts as 0.
    pub fn enrich(&mut self) {
        let code = self.ship_type.unwrap_or(0);
        self.ship_type_string = Some(ship_type_string(code).to_string());
        self.ship_category = Some(ship_category(code).to_string());
    }

    /// Current position as `(latitude, longitude)`, if both are known
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }

    /// True heading if reported, else course over ground.
    ///
    /// AIS uses 511 for "no heading" and 360 for "no course", so anything
    /// outside [0, 360) counts as missing.
    pub fn heading(&self) -> Option<f64> {
        let valid = |v: &f64| (0.0..360.0).contains(v);
        self.true_heading
            .filter(valid)
            .or_else(|| self.course_over_ground.filter(valid))
    }
}

/// Formatted vessel as tracked and displayed.
///
/// Always built whole from one observation, never patched field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselRecord {
    pub mmsi: u32,
    pub name: String,

    /// Speed over ground in knots, rounded to 0.1
    pub speed: f64,

    /// Degrees, or `None` when neither heading nor course is known
    pub heading: Option<f64>,

    /// 8-point compass label, "unknown" without heading
    pub direction: String,

    /// Overlay text, e.g. "NORNE (257000000) 12.5 kts, north-east"
    pub display: String,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// Descriptive ship type string
    pub ship_type: String,

    pub category: String,

    /// Raw AIS ship type code
    pub ship_type_code: i32,
}

impl VesselRecord {
    pub fn from_details(details: &VesselDetails) -> Self {
        let name = details
            .name
            .as_deref()
            .map(clean_name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());

        let raw_speed = details
            .speed_over_ground
            .filter(|s| s.is_finite())
            .unwrap_or(0.0)
            .max(0.0);
        let heading = details.heading();
        let direction = compass_8point(heading);
        let display = format_display(&name, details.mmsi, raw_speed, direction);

        let code = details.ship_type.unwrap_or(0);
        let ship_type = details
            .ship_type_string
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string());
        let category = details
            .ship_category
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string());

        VesselRecord {
            mmsi: details.mmsi,
            name,
            speed: (raw_speed * 10.0).round() / 10.0,
            heading,
            direction: direction.to_string(),
            display,
            latitude: details.latitude,
            longitude: details.longitude,
            ship_type,
            category,
            ship_type_code: code,
        }
    }
}

/// Overlay line for a vessel
pub fn format_display(name: &str, mmsi: u32, speed: f64, direction: &str) -> String {
    if speed > STATIONARY_SPEED_KN {
        format!("{} ({}) {:.1} kts, {}", name, mmsi, speed, direction)
    } else {
        format!("{} ({}) stationary", name, mmsi)
    }
}

// AIS names are padded with spaces or '@'
fn clean_name(name: &str) -> String {
    name.trim_matches(|c: char| c.is_whitespace() || c == '@')
        .to_string()
}
