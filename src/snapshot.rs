//! Persisted baseline of the last listing that produced a notification.
//!
//! The snapshot is a pretty-printed JSON array of `{"title", "url"}` objects:
//!
//! ```text
//! [
//!   {
//!     "title": "Band A Tour",
//!     "url": "https://metalinjection.net/tour-dates/band-a"
//!   }
//! ]
//! ```
//!
//! Reading never fails: a missing, unreadable or malformed file is an empty
//! baseline. Writing goes to a sibling `*.tmp` file first and is renamed over
//! the target, so an interrupted write leaves the previous snapshot intact.

use crate::error::SnapshotError;
use crate::models::Article;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the last saved articles, or an empty list if there are none.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    pub async fn load(&self) -> Vec<Article> {
        match self.try_load().await {
            Ok(articles) => {
                info!(count = articles.len(), "Loaded snapshot");
                articles
            }
            Err(SnapshotError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                info!("No snapshot yet; every listed article counts as new");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable snapshot; every listed article counts as new");
                Vec::new()
            }
        }
    }

    async fn try_load(&self) -> Result<Vec<Article>, SnapshotError> {
        let raw = fs::read_to_string(&self.path)
            .await
            .map_err(|source| SnapshotError::Io {
                path: self.path.clone(),
                source,
            })?;
        serde_json::from_str(&raw).map_err(|source| SnapshotError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the snapshot with `articles`.
    ///
    /// The parent directory is created if needed.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display(), count = articles.len()))]
    pub async fn save(&self, articles: &[Article]) -> Result<(), SnapshotError> {
        let json = serde_json::to_string_pretty(articles).map_err(|source| {
            SnapshotError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|source| SnapshotError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, json).await.map_err(|source| SnapshotError::Io {
            path: tmp.clone(),
            source,
        })?;
        debug!(tmp = %tmp.display(), "Wrote temporary snapshot");

        if let Err(source) = fs::rename(&tmp, &self.path).await {
            if let Err(e) = fs::remove_file(&tmp).await {
                warn!(tmp = %tmp.display(), error = %e, "Could not remove temporary snapshot");
            }
            return Err(SnapshotError::Io {
                path: self.path.clone(),
                source,
            });
        }

        info!("Saved snapshot");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "snapshot".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
