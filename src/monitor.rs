//! One monitoring cycle, start to finish.
//!
//! ```text
//! fetch listing -> parse -> diff against snapshot -> keyword filter
//!   -> format report -> notify -> save snapshot
//! ```
//!
//! The snapshot is only written after the notification went out, so any
//! earlier failure leaves it untouched and the next cycle reports the same
//! articles again (at-least-once delivery).

use crate::config::MonitorConfig;
use crate::diff::diff;
use crate::error::{CycleError, Stage};
use crate::fetcher::Fetch;
use crate::models::CycleOutcome;
use crate::notifier::Notify;
use crate::outputs::report::{format_report, format_subject};
use crate::scrapers::{detail, listing};
use crate::snapshot::SnapshotStore;
use chrono::Local;
use std::time::Instant;
use tracing::{debug, error, info, instrument};
use url::Url;

/// Runs the watch pipeline for one listing page.
///
/// Generic over the [`Fetch`] and [`Notify`] seams so the same pipeline runs
/// against the network and SMTP in production and against fakes in tests.
pub struct Monitor<F, N> {
    fetcher: F,
    notifier: N,
    store: SnapshotStore,
    listing_url: Url,
    keywords: Vec<String>,
    subject: String,
}

impl<F: Fetch, N: Notify> Monitor<F, N> {
    /// Create a monitor from resolved configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Listing url, snapshot path, keywords and subject line
    /// * `fetcher` - Used for the listing page and every detail page
    /// * `notifier` - Receives the report when new articles are found
    pub fn new(config: &MonitorConfig, fetcher: F, notifier: N) -> Self {
        Self {
            fetcher,
            notifier,
            store: SnapshotStore::new(&config.snapshot_path),
            listing_url: config.listing_url.clone(),
            keywords: config.keywords.clone(),
            subject: config.subject.clone(),
        }
    }

    /// Run one cycle and return what it did.
    ///
    /// # Errors
    ///
    /// Any listing fetch/parse, delivery or snapshot-save failure. Detail
    /// page failures are absorbed by the keyword filter and never end the cycle.
    #[instrument(level = "info", skip_all, fields(listing = %self.listing_url))]
    pub async fn run_cycle(&self) -> Result<CycleOutcome, CycleError> {
        debug!(stage = %Stage::Fetching, "Entering stage");
        let html = self.fetcher.fetch(self.listing_url.as_str()).await?;

        debug!(stage = %Stage::Parsing, "Entering stage");
        let current = listing::parse_listing(&html)?;

        debug!(stage = %Stage::Diffing, "Entering stage");
        let previous = self.store.load().await;
        let new_articles = diff(&current, &previous);
        if new_articles.is_empty() {
            return Ok(CycleOutcome::Unchanged);
        }
        info!(count = new_articles.len(), "Found new articles");
        for article in &new_articles {
            info!(title = %article.title, url = %article.url, "New article");
        }

        debug!(stage = %Stage::Filtering, "Entering stage");
        let matches =
            detail::filter_by_keyword(&self.fetcher, &self.listing_url, &new_articles, &self.keywords).await;

        debug!(stage = %Stage::Reporting, "Entering stage");
        let body = format_report(&new_articles, &matches);
        let subject = format_subject(
            &self.subject,
            new_articles.len(),
            matches.len(),
            Local::now().date_naive(),
        );

        debug!(stage = %Stage::Notifying, "Entering stage");
        self.notifier.notify(&subject, &body).await?;

        debug!(stage = %Stage::Persisting, "Entering stage");
        self.store.save(&current).await?;

        Ok(CycleOutcome::Notified {
            new_articles: new_articles.len(),
            keyword_matches: matches.len(),
        })
    }

    /// Run one cycle and log its result. Never fails; a failed cycle is
    /// abandoned and the next one starts on schedule.
    ///
    /// # Returns
    ///
    /// The cycle's [`CycleOutcome`], or `None` if it failed. The failure and
    /// its stage have already been logged at `error`.
    pub async fn tick(&self) -> Option<CycleOutcome> {
        let t0 = Instant::now();
        let result = self.run_cycle().await;
        let elapsed_ms = t0.elapsed().as_millis() as u64;

        match result {
            Ok(CycleOutcome::Unchanged) => {
                info!(elapsed_ms, "No changes found");
                Some(CycleOutcome::Unchanged)
            }
            Ok(outcome @ CycleOutcome::Notified { new_articles, keyword_matches }) => {
                info!(elapsed_ms, new_articles, keyword_matches, "Cycle complete; report sent");
                Some(outcome)
            }
            Err(e) => {
                error!(
                    elapsed_ms,
                    stage = %e.stage(),
                    error = %e,
                    "Cycle failed; snapshot left untouched"
                );
                None
            }
        }
    }
}
