//! Error types for each stage of the monitoring pipeline.
//!
//! Every failure family has its own enum so callers can tell a network
//! problem from a page-layout change. [`CycleError`] is what reaches the
//! per-cycle boundary in [`crate::monitor`]; it wraps the stage errors and
//! reports which [`Stage`] failed.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failure retrieving a page over HTTP.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("could not resolve article link {href:?}: {source}")]
    InvalidUrl {
        href: String,
        #[source]
        source: url::ParseError,
    },
}

/// An element the pipeline relies on is missing from fetched markup.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no element with id `{0}` found; page structure may have changed")]
    MissingId(String),

    #[error("no element with class `{0}` found; page structure may have changed")]
    MissingClass(String),

    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },
}

/// Failure reading or writing the snapshot file.
///
/// Read failures never leave [`crate::snapshot::SnapshotStore::load`]; only
/// writes surface this error.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot {path} is not a valid article list: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure handing the report to the mail server.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("could not build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("smtp transport failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Invalid or incomplete runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting `{0}`")]
    Missing(&'static str),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Pipeline stage a cycle was in when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Parsing,
    Diffing,
    Filtering,
    Reporting,
    Notifying,
    Persisting,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetching => "fetching",
            Stage::Parsing => "parsing",
            Stage::Diffing => "diffing",
            Stage::Filtering => "filtering",
            Stage::Reporting => "reporting",
            Stage::Notifying => "notifying",
            Stage::Persisting => "persisting",
        };
        f.write_str(name)
    }
}

/// A monitoring cycle that was abandoned.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("listing fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("listing parse failed: {0}")]
    Parse(#[from] ParseError),

    #[error("notification failed: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("snapshot save failed: {0}")]
    Persist(#[from] SnapshotError),
}

impl CycleError {
    pub fn stage(&self) -> Stage {
        match self {
            CycleError::Fetch(_) => Stage::Fetching,
            CycleError::Parse(_) => Stage::Parsing,
            CycleError::Delivery(_) => Stage::Notifying,
            CycleError::Persist(_) => Stage::Persisting,
        }
    }
}
