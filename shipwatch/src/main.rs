use anyhow::{bail, Context};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_graceful_shutdown::{SubsystemBuilder, Toplevel};

use shipwatch::client::{BarentswatchClient, ReqwestTransport};
use shipwatch::config::Config;
use shipwatch::output::{OverlayOutput, DEFAULT_STALE_MINUTES};
use shipwatch::service::OverlayService;
use shipwatch::tracker::ZoneTracker;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Keep polling instead of running a single cycle
    #[arg(long = "loop")]
    run_loop: bool,

    /// Seconds between cycles in loop mode [default: CACHE_DURATION]
    #[arg(short, long)]
    interval: Option<u64>,

    /// Zone id to watch (default: first configured zone)
    #[arg(short, long)]
    zone: Option<String>,

    /// Print the configured zones and exit
    #[arg(long)]
    list_zones: bool,

    /// Path to a .env file
    #[arg(long)]
    env: Option<PathBuf>,

    /// Path to the zones config.json
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    let config = Config::load(cli.env.as_deref(), cli.config.as_deref())
        .context("Failed to load configuration")?;

    if cli.list_zones {
        println!("Configured zones:");
        for zone in &config.zones {
            println!("  - {}: {}", zone.id, zone.display_name());
        }
        return Ok(());
    }

    let output = OverlayOutput::new(&config.data_dir, DEFAULT_STALE_MINUTES)?;

    if !config.barentswatch.enabled {
        log::warn!("Barentswatch provider disabled, nothing to track");
        output.write_combined_overlay(&[])?;
        return Ok(());
    }
    if !config.barentswatch.has_credentials() {
        bail!("BARENTSWATCH_CLIENT_ID not set. See .env.example");
    }
    if config.zones.is_empty() {
        bail!("No zones configured. Add zones to config/config.json");
    }

    let zone = match config.zone(cli.zone.as_deref()) {
        Some(zone) => zone.clone(),
        None => bail!("Unknown zone '{}'", cli.zone.unwrap_or_default()),
    };
    log::info!("Tracking vessels in {}", zone.display_name());

    let client = Arc::new(BarentswatchClient::new(
        ReqwestTransport::new()?,
        config.barentswatch.credentials(),
    ));
    let tracker = ZoneTracker::new(client, Some(zone), config.tracker_settings());
    let mut service = OverlayService::new(tracker, output);

    if cli.run_loop {
        let interval = Duration::from_secs(cli.interval.unwrap_or(config.cache_duration).max(1));

        Toplevel::new(move |s| async move {
            s.start(SubsystemBuilder::new("poll", move |h| {
                service.run_loop(interval, h)
            }));
        })
        .catch_signals()
        .handle_shutdown_requests(Duration::from_secs(5))
        .await
        .map_err(Into::into)
    } else {
        let outcome = service.run_once().await?;
        if let Some(e) = &outcome.error {
            log::warn!("Cycle completed without new data: {}", e);
        }
        println!("{} vessels listed", outcome.vessels.len());
        println!("Data written to {}/", service.output().data_dir().display());
        Ok(())
    }
}
