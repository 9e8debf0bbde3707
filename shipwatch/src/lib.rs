//! Shipwatch
//!
//! Polls the Barentswatch AIS API for vessels inside a geofenced zone and
//! keeps overlay files up to date for a timelapse or dashboard to render.
//!
//! The platform-independent parts (geometry, ship types, tracking state)
//! live in `shipwatch_core`. This crate adds everything that performs I/O:
//!
//! - [`client`]: OAuth2-authenticated Barentswatch client
//! - [`tracker`]: the per-zone tracking cycle
//! - [`config`]: environment, `.env` and zones file
//! - [`output`]: overlay output files
//! - [`service`]: the poll loop

pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod output;
pub mod service;
pub mod tracker;

pub use error::{ErrorKind, TrackerError};
