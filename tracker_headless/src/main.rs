// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use clap::Parser;
use common::position::{Position, TrackingMode};
use delivery::{
    Collector, DeliveryClient, http_collector::HttpCollector, log_collector::LogCollector,
};
use module_core::{Event, EventBus, EventKind, Module};
use sample_source::replay_source::ReplaySampleSource;
use std::{str::FromStr, sync::Arc, time::Duration};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use tracker::{LocationTracker, TrackerConfig, config::interval_from_secs, module::TrackerModule};

/// How long accepted samples may still take to reach the collector on shutdown.
const DELIVERY_DRAIN_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// CSV file with longitude,latitude rows that are replayed as raw samples.
    #[arg(short = 'f', long)]
    positions_file: String,
    /// Milliseconds between two replayed samples.
    #[arg(long, default_value_t = 1000)]
    sample_interval_ms: u64,
    /// JSON file with the tracker configuration.
    #[arg(short, long)]
    config: Option<String>,
    #[arg(long)]
    max_history: Option<usize>,
    /// Foreground interval in seconds.
    #[arg(long)]
    foreground_interval: Option<f64>,
    /// Background interval in seconds.
    #[arg(long)]
    background_interval: Option<f64>,
    /// Overrides the foreground interval for this run, in seconds.
    #[arg(short, long)]
    interval: Option<f64>,
    /// Start in background mode.
    #[arg(short, long)]
    background: bool,
    /// Endpoint the accepted samples are posted to. Samples are only logged if unset.
    #[arg(short = 'u', long)]
    collector_url: Option<String>,
}

fn read_positions_from_file(file_path: &str) -> Result<Vec<Position>, ()> {
    let mut rdr = csv::Reader::from_path(file_path).map_err(|e| {
        error!("Failed to open positions file {}. Error: {}", file_path, e);
    })?;
    let mut positions = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| error!("Failed to read position record. Error: {}", e))?;
        let (Some(longitude), Some(latitude)) = (record.get(0), record.get(1)) else {
            error!("Position record {:?} has less than two columns", record);
            return Err(());
        };
        let (Ok(longitude), Ok(latitude)) = (f64::from_str(longitude), f64::from_str(latitude))
        else {
            error!("Position record {:?} is not a coordinate", record);
            return Err(());
        };
        positions.push(Position {
            longitude,
            latitude,
        });
    }
    debug!("length of positions: {}", positions.len());
    Ok(positions)
}

fn interval_arg(seconds: f64) -> Result<Duration, ()> {
    interval_from_secs(seconds).map_err(|e| error!("{}", e))
}

fn load_config(cli: &Cli) -> Result<TrackerConfig, ()> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| error!("Failed to read config file {}. Error: {}", path, e))?;
            TrackerConfig::from_json(&json).map_err(|e| error!("{}", e))?
        }
        None => TrackerConfig::default(),
    };
    if let Some(max_history) = cli.max_history {
        config.max_location_history = max_history;
    }
    if let Some(seconds) = cli.foreground_interval {
        config.minimum_callback_interval_foreground = interval_arg(seconds)?;
    }
    if let Some(seconds) = cli.background_interval {
        config.minimum_callback_interval_background = interval_arg(seconds)?;
    }
    config.validate().map_err(|e| error!("{}", e))?;
    Ok(config)
}

fn create_collector(cli: &Cli) -> Result<Arc<dyn Collector>, ()> {
    match &cli.collector_url {
        Some(url) => {
            info!("Delivering samples to {}", url);
            let collector = HttpCollector::new(url)
                .map_err(|e| error!("Failed to create HTTP collector. Error: {}", e))?;
            Ok(Arc::new(collector))
        }
        None => Ok(Arc::new(LogCollector)),
    }
}

#[tokio::main]
async fn main() -> Result<(), ()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = load_config(&cli)?;
    let positions = read_positions_from_file(&cli.positions_file)?;
    let start_interval = cli.interval.map(interval_arg).transpose()?;

    let delivery = DeliveryClient::new(create_collector(&cli)?)
        .map_err(|e| error!("Failed to create delivery client. Error: {}", e))?;
    let stats = delivery.stats();
    let tracker = Arc::new(
        LocationTracker::new(config, Arc::new(delivery))
            .map_err(|e| error!("Failed to create location tracker. Error: {}", e))?,
    );
    tracker.register_sink(|sample| {
        info!(
            "Accepted position lat: {}, long: {} at {}",
            sample.latitude(),
            sample.longitude(),
            sample.timestamp()
        );
        Ok(())
    });

    let eb = EventBus::default();
    let quit_sender = eb.sender();
    ctrlc::set_handler(move || {
        let _ = quit_sender.send(Event {
            kind: EventKind::QuitEvent,
        });
    })
    .map_err(|e| error!("Failed to install Ctrl-C handler. Error: {}", e))?;

    let mut source = ReplaySampleSource::new(
        eb.context(),
        &positions,
        Duration::from_millis(cli.sample_interval_ms),
    )
    .map_err(|e| error!("Failed to create ReplaySampleSource. Error: {}", e))?;
    let mut tracker_module = TrackerModule::new(eb.context(), tracker.clone());

    if cli.background {
        tracker.set_mode(TrackingMode::Background);
    }
    tracker.start(start_interval);

    info!("Starting modules...");
    let result = tokio::join!(source.run(), tracker_module.run());
    if !stats.wait_idle(DELIVERY_DRAIN_TIMEOUT).await {
        warn!(
            "Giving up on {} deliveries still in flight after {:?}",
            stats.in_flight(),
            DELIVERY_DRAIN_TIMEOUT
        );
    }
    info!(
        "Stopped with {} samples in history, {} delivered, {} failed, {} in flight",
        tracker.history_len(),
        stats.delivered(),
        stats.failed(),
        stats.in_flight()
    );
    result.0.and(result.1)
}
