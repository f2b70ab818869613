//! Command-line interface definitions for Tour Watch.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option can also come from an environment variable, and most from the
//! optional YAML config file (see [`crate::config`]). Options left unset here
//! fall back to the file, then to built-in defaults.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the Tour Watch daemon.
///
/// # Examples
///
/// ```sh
/// # Watch the default listing and mail new articles, highlighting Raleigh shows
/// EMAIL_PASSWORD=... tour_watch --sender me@example.com --recipient me@example.com -k Raleigh
///
/// # One cycle, print the report instead of mailing it
/// tour_watch --once --dry-run --sender me@example.com --recipient me@example.com
///
/// # Everything from a file
/// tour_watch -c /etc/tour_watch.yaml
/// ```
#[derive(Parser, Debug, Default)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, env = "TOUR_WATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listing page to watch
    #[arg(long, env = "LISTING_URL")]
    pub listing_url: Option<String>,

    /// Seconds to wait between monitoring cycles
    #[arg(long, env = "POLL_INTERVAL_SECS")]
    pub interval_secs: Option<u64>,

    /// Where the last known article list is kept
    #[arg(long, env = "SNAPSHOT_PATH")]
    pub snapshot_path: Option<PathBuf>,

    /// Address the report is sent to
    #[arg(long, env = "MAIL_RECIPIENT")]
    pub recipient: Option<String>,

    /// Address the report is sent from
    #[arg(long, env = "MAIL_SENDER")]
    pub sender: Option<String>,

    /// SMTP server (STARTTLS)
    #[arg(long, env = "MAIL_HOST")]
    pub mail_host: Option<String>,

    /// SMTP port
    #[arg(long, env = "MAIL_PORT")]
    pub mail_port: Option<u16>,

    /// SMTP login, defaults to the sender address
    #[arg(long, env = "MAIL_USERNAME")]
    pub mail_username: Option<String>,

    /// SMTP password
    #[arg(long = "password", env = "EMAIL_PASSWORD", hide_env_values = true, hide = true)]
    pub credential: Option<String>,

    /// Keyword to look for in new articles' detail pages (repeatable)
    #[arg(short, long = "keyword", env = "KEYWORDS", value_delimiter = ',')]
    pub keywords: Vec<String>,

    /// Mail subject
    #[arg(long, env = "MAIL_SUBJECT")]
    pub subject: Option<String>,

    /// Per-request HTTP timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,

    /// Log the report instead of sending mail
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "tour_watch",
            "--listing-url",
            "https://metalinjection.net/category/tour-dates",
            "--interval-secs",
            "600",
            "--sender",
            "watch@example.com",
            "--recipient",
            "me@example.com",
        ]);

        assert_eq!(
            cli.listing_url.as_deref(),
            Some("https://metalinjection.net/category/tour-dates")
        );
        assert_eq!(cli.interval_secs, Some(600));
        assert_eq!(cli.sender.as_deref(), Some("watch@example.com"));
        assert!(!cli.once);
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_cli_keywords_repeat_and_split() {
        let cli = Cli::parse_from(["tour_watch", "-k", "Raleigh", "--keyword", "Durham,Chapel Hill"]);
        assert_eq!(cli.keywords, vec!["Raleigh", "Durham", "Chapel Hill"]);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["tour_watch", "--once", "--dry-run", "-c", "/tmp/watch.yaml"]);
        assert!(cli.once);
        assert!(cli.dry_run);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/watch.yaml")));
    }
}
