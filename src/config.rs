//! Runtime configuration.
//!
//! [`MonitorConfig`] is built once at startup and handed to the monitor; no
//! part of the pipeline reads globals or the environment on its own.
//!
//! Values are resolved per field in this order:
//!
//! 1. command line / environment ([`Cli`])
//! 2. the optional YAML file given with `--config`
//! 3. built-in defaults
//!
//! ```yaml
//! listing_url: https://metalinjection.net/category/tour-dates
//! interval_secs: 43200
//! snapshot_path: /var/lib/tour_watch/previous_articles.json
//! recipient: me@example.com
//! sender: watch@example.com
//! mail_host: smtp.gmail.com
//! mail_port: 587
//! keywords: [Raleigh, Durham]
//! ```
//!
//! The SMTP password is only ever read from `EMAIL_PASSWORD` (or `--password`).

use crate::cli::Cli;
use crate::error::ConfigError;
use itertools::Itertools;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use url::Url;

pub const DEFAULT_LISTING_URL: &str = "https://metalinjection.net/category/tour-dates";
pub const DEFAULT_INTERVAL_SECS: u64 = 12 * 3600;
pub const DEFAULT_SNAPSHOT_PATH: &str = "previous_articles.json";
pub const DEFAULT_MAIL_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_MAIL_PORT: u16 = 587;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SUBJECT: &str = "Metalinjection Tour Page Update Detected";

/// Settings accepted from the YAML config file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub listing_url: Option<String>,
    pub interval_secs: Option<u64>,
    pub snapshot_path: Option<PathBuf>,
    pub recipient: Option<String>,
    pub sender: Option<String>,
    pub mail_host: Option<String>,
    pub mail_port: Option<u16>,
    pub mail_username: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub subject: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&raw).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }
}

/// Everything the monitor needs for its lifetime.
#[derive(Clone)]
pub struct MonitorConfig {
    pub listing_url: Url,
    pub poll_interval: Duration,
    pub snapshot_path: PathBuf,
    pub recipient: String,
    pub sender: String,
    pub mail_host: String,
    pub mail_port: u16,
    pub mail_username: String,
    /// `None` only in dry-run mode.
    pub credential: Option<String>,
    pub keywords: Vec<String>,
    pub subject: String,
    pub request_timeout: Duration,
}

impl fmt::Debug for MonitorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorConfig")
            .field("listing_url", &self.listing_url.as_str())
            .field("poll_interval", &self.poll_interval)
            .field("snapshot_path", &self.snapshot_path)
            .field("recipient", &self.recipient)
            .field("sender", &self.sender)
            .field("mail_host", &self.mail_host)
            .field("mail_port", &self.mail_port)
            .field("mail_username", &self.mail_username)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("keywords", &self.keywords)
            .field("subject", &self.subject)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl MonitorConfig {
    /// Load the file named by `cli.config` (if any) and resolve.
    pub fn load(cli: Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => {
                info!(path = %path.display(), "Loading config file");
                FileConfig::from_path(path)?
            }
            None => FileConfig::default(),
        };
        Self::resolve(cli, file)
    }

    /// Merge CLI/env values over file values over defaults, then validate.
    pub fn resolve(cli: Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let raw_url = cli
            .listing_url
            .or(file.listing_url)
            .unwrap_or_else(|| DEFAULT_LISTING_URL.to_string());
        let listing_url = Url::parse(&raw_url).map_err(|e| ConfigError::Invalid {
            field: "listing_url",
            reason: e.to_string(),
        })?;
        if !matches!(listing_url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                field: "listing_url",
                reason: format!("unsupported scheme `{}`", listing_url.scheme()),
            });
        }

        let interval_secs = cli
            .interval_secs
            .or(file.interval_secs)
            .unwrap_or(DEFAULT_INTERVAL_SECS);
        if interval_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "interval_secs",
                reason: "must be greater than zero".into(),
            });
        }

        let timeout_secs = cli
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "timeout_secs",
                reason: "must be greater than zero".into(),
            });
        }

        let recipient = non_blank(cli.recipient.or(file.recipient)).ok_or(ConfigError::Missing("recipient"))?;
        let sender = non_blank(cli.sender.or(file.sender)).ok_or(ConfigError::Missing("sender"))?;
        let mail_username = non_blank(cli.mail_username.or(file.mail_username)).unwrap_or_else(|| sender.clone());

        let credential = non_blank(cli.credential);
        if credential.is_none() && !cli.dry_run {
            return Err(ConfigError::Missing("EMAIL_PASSWORD"));
        }

        let keywords = if cli.keywords.is_empty() {
            file.keywords
        } else {
            cli.keywords
        };

        Ok(Self {
            listing_url,
            poll_interval: Duration::from_secs(interval_secs),
            snapshot_path: cli
                .snapshot_path
                .or(file.snapshot_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH)),
            recipient,
            sender,
            mail_host: cli
                .mail_host
                .or(file.mail_host)
                .unwrap_or_else(|| DEFAULT_MAIL_HOST.to_string()),
            mail_port: cli.mail_port.or(file.mail_port).unwrap_or(DEFAULT_MAIL_PORT),
            mail_username,
            credential,
            keywords: normalize_keywords(keywords),
            subject: cli
                .subject
                .or(file.subject)
                .unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Trim, drop blanks and duplicates; case is kept since matching is case-sensitive.
fn normalize_keywords(keywords: Vec<String>) -> Vec<String> {
    keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .unique()
        .collect()
}
