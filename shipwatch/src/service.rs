//! Poll loop
//!
//! Ties a [`ZoneTracker`] to the [`OverlayOutput`] files. One cycle updates
//! the tracker and rewrites the `ships` provider files plus the combined
//! overlay. In loop mode cycles run back to back, separated by the poll
//! interval, until shutdown is requested.
//!
//! # Example
//!
//! ```rust,ignore
//! Toplevel::new(move |s| async move {
//!     s.start(SubsystemBuilder::new("poll", move |h| service.run_loop(interval, h)));
//! })
//! .catch_signals()
//! .handle_shutdown_requests(Duration::from_secs(5))
//! .await?;
//! ```

use std::time::Duration;
use tokio::time::sleep;
use tokio_graceful_shutdown::SubsystemHandle;

use crate::client::{AisTransport, ReqwestTransport};
use crate::output::OverlayOutput;
use crate::tracker::{CycleOutcome, ZoneTracker};

/// Provider name used for the output files
pub const SHIPS_PROVIDER: &str = "ships";

pub struct OverlayService<T: AisTransport = ReqwestTransport> {
    tracker: ZoneTracker<T>,
    output: OverlayOutput,
}

impl<T: AisTransport> OverlayService<T> {
    pub fn new(tracker: ZoneTracker<T>, output: OverlayOutput) -> Self {
        OverlayService { tracker, output }
    }

    pub fn tracker(&self) -> &ZoneTracker<T> {
        &self.tracker
    }

    pub fn output(&self) -> &OverlayOutput {
        &self.output
    }

    /// Run one tracking cycle and write all output files.
    ///
    /// A failed provider call is not an error here; the files are still
    /// written from whatever the tracker kept. Only file I/O fails.
    pub async fn run_once(&mut self) -> anyhow::Result<CycleOutcome> {
        let outcome = self.tracker.update().await;
        let lines = outcome.overlay_lines();

        self.output
            .write_provider_data(SHIPS_PROVIDER, &outcome.vessels, &lines)?;
        self.output
            .write_combined_overlay(&[(SHIPS_PROVIDER.to_string(), lines)])?;

        Ok(outcome)
    }

    /// Run cycles every `interval` until shutdown is requested
    pub async fn run_loop(mut self, interval: Duration, subsys: SubsystemHandle) -> anyhow::Result<()> {
        log::info!(
            "Polling {} every {}s",
            self.tracker.zone().map(|z| z.display_name()).unwrap_or("-"),
            interval.as_secs()
        );

        loop {
            tokio::select! {
                _ = subsys.on_shutdown_requested() => {
                    log::debug!("Shutdown during cycle");
                    return Ok(());
                },
                r = self.run_once() => {
                    match r {
                        Ok(outcome) => log::debug!("Cycle done, {} vessels listed", outcome.vessels.len()),
                        Err(e) => log::error!("Cycle failed: {:#}", e),
                    }
                },
            }

            tokio::select! {
                _ = subsys.on_shutdown_requested() => {
                    log::debug!("Shutdown");
                    return Ok(());
                },
                _ = sleep(interval) => {},
            }
        }
    }
}
