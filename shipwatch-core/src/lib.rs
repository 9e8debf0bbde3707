//! Shipwatch Core
//!
//! Platform-independent building blocks for tracking AIS vessels inside a
//! geofenced zone. This crate performs no I/O: it never talks to the network,
//! never reads the clock and never touches the filesystem. Timestamps are
//! passed in by the caller as milliseconds since the Unix epoch.
//!
//! # Modules
//!
//! - [`geometry`]: zones and the ray-casting point-in-polygon test
//! - [`ship_types`]: AIS ship type code table
//! - [`heading`]: compass labels for headings
//! - [`vessel`]: provider rows and formatted vessel records
//! - [`tracking`]: persistence state, expiry sweep and presentation filter
//! - [`settings`]: typed tracking options with defaults
//!
//! # Example
//!
//! ```rust,ignore
//! use shipwatch_core::settings::TrackerSettings;
//! use shipwatch_core::tracking::TrackingState;
//! use shipwatch_core::vessel::VesselRecord;
//!
//! let settings = TrackerSettings::default();
//! let mut state = TrackingState::new();
//!
//! state.observe(VesselRecord::from_details(&row), now_ms);
//! let visible = state.sweep(now_ms, &settings);
//! ```

pub mod geometry;
pub mod heading;
pub mod settings;
pub mod ship_types;
pub mod tracking;
pub mod vessel;

pub use geometry::{point_in_polygon, Zone, ZoneError};
pub use settings::TrackerSettings;
pub use tracking::{format_for_overlay, DisplayVessel, TrackingState};
pub use vessel::{VesselDetails, VesselRecord};
