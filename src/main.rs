//! # Tour Watch
//!
//! A small daemon that watches a tour-dates listing page, works out which
//! articles are new since the last report, highlights the ones whose detail
//! page mentions a keyword (a city, a venue), and mails the result.
//!
//! ## Usage
//!
//! ```sh
//! EMAIL_PASSWORD=... tour_watch --sender me@example.com --recipient me@example.com -k Raleigh
//! ```
//!
//! ## Architecture
//!
//! Each cycle is a straight pipeline:
//! 1. **Fetching**: download the listing page
//! 2. **Parsing**: extract `{title, url}` articles
//! 3. **Diffing**: compare with the saved snapshot by url
//! 4. **Filtering**: check new articles' detail pages for keywords, one at a time
//! 5. **Reporting/Notifying**: mail a plain-text report
//! 6. **Persisting**: replace the snapshot with the fetched listing
//!
//! A failed cycle is logged and the next one runs after the normal interval
//! (twelve hours by default). The process stops on Ctrl-C.

use clap::Parser;
use std::error::Error;
use tracing::{error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod diff;
mod error;
mod fetcher;
mod markup;
mod models;
mod monitor;
mod notifier;
mod outputs;
mod scheduler;
mod scrapers;
mod snapshot;
mod utils;

use cli::Cli;
use config::MonitorConfig;
use fetcher::HttpFetcher;
use monitor::Monitor;
use notifier::{LogNotifier, Notify, SmtpNotifier};
use scheduler::Scheduler;
use utils::ensure_writable_parent;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "tour_watch starting up");

    let args = Cli::parse();
    let once = args.once;
    let dry_run = args.dry_run;
    let config = MonitorConfig::load(args).inspect_err(|e| error!(error = %e, "Invalid configuration"))?;
    info!(?config, once, dry_run, "Resolved configuration");

    // Early check: a snapshot we cannot write would re-send every report
    if let Err(e) = ensure_writable_parent(&config.snapshot_path).await {
        error!(
            path = %config.snapshot_path.display(),
            error = %e,
            "Snapshot directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let fetcher = HttpFetcher::new(config.request_timeout)?;

    if dry_run {
        run(&config, fetcher, LogNotifier, once).await;
    } else {
        let notifier = SmtpNotifier::new(&config)?;
        run(&config, fetcher, notifier, once).await;
    }

    info!("tour_watch stopped");
    Ok(())
}

#[instrument(level = "info", skip(config, fetcher, notifier))]
async fn run<N: Notify>(config: &MonitorConfig, fetcher: HttpFetcher, notifier: N, once: bool) {
    let monitor = Monitor::new(config, fetcher, notifier);

    if once {
        monitor.tick().await;
        return;
    }

    info!(
        interval_secs = config.poll_interval.as_secs(),
        listing = %config.listing_url,
        "Watching listing"
    );
    let monitor = &monitor;
    let cycles = Scheduler::new(config.poll_interval)
        .run(
            move || async move {
                monitor.tick().await;
            },
            shutdown_signal(),
        )
        .await;
    info!(cycles, "Monitoring loop finished");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Unable to listen for shutdown signal; running until killed");
        std::future::pending::<()>().await;
    }
}
