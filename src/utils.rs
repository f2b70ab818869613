//! Utility functions for log formatting and file system checks.

use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Scratch file written next to the snapshot to check the directory is writable.
const WRITE_CHECK_FILE: &str = ".tour_watch_write_check";

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) with an
/// ellipsis and the number of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure the directory that will hold `file` exists and is writable.
///
/// Creates the directory if needed, then writes and removes a scratch file.
/// Run once at startup so a bad snapshot path fails fast instead of after
/// the first notification. A scratch file that cannot be removed afterwards
/// is logged and left behind.
#[instrument(level = "info", skip_all, fields(path = %file.display()))]
pub async fn ensure_writable_parent(file: &Path) -> Result<(), Box<dyn Error>> {
    let dir = match file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::env::current_dir()?,
    };
    fs::create_dir_all(&dir).await?;

    let check_path = dir.join(WRITE_CHECK_FILE);
    fs::write(&check_path, b"").await?;
    if let Err(e) = fs::remove_file(&check_path).await {
        warn!(path = %check_path.display(), error = %e, "Could not remove write-check file");
    }
    info!(dir = %dir.display(), "Snapshot directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundaries() {
        let s = "Motörhead Motörhead";
        // byte 4 is inside the two-byte 'ö'
        assert_eq!(truncate_for_log(s, 4), format!("Mot…(+{} bytes)", s.len() - 3));
    }

    #[tokio::test]
    async fn test_ensure_writable_parent_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("state").join("previous_articles.json");

        ensure_writable_parent(&file).await.unwrap();

        assert!(dir.path().join("state").is_dir());
        assert!(!dir.path().join("state").join(WRITE_CHECK_FILE).exists());
    }

    #[tokio::test]
    async fn test_ensure_writable_parent_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("state");
        std::fs::write(&blocker, "not a directory").unwrap();

        let result = ensure_writable_parent(&blocker.join("previous_articles.json")).await;

        assert!(result.is_err());
        assert!(!blocker.join(WRITE_CHECK_FILE).exists());
    }
}
