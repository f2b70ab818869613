//! Data models shared across the pipeline.
//!
//! - [`Article`]: a single entry extracted from the listing page
//! - [`CycleOutcome`]: what a monitoring cycle ended up doing
//!
//! An "article set" is simply a `Vec<Article>` kept in listing order; no
//! deduplication happens inside a single fetch.

use serde::{Deserialize, Serialize};

/// A listing entry as extracted from the monitored page.
///
/// The `url` is the identity of the article; `title` is descriptive only.
/// The `url` is stored exactly as it appears in the listing's `href`, which
/// may be relative to the listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Heading text of the listing block, whitespace-collapsed.
    pub title: String,
    /// The `href` of the listing block's anchor.
    pub url: String,
}

impl Article {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Result of a single successful monitoring cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Every listed article was already in the snapshot; nothing was sent or written.
    Unchanged,
    /// New articles were reported and the snapshot replaced.
    Notified {
        /// Number of articles absent from the previous snapshot.
        new_articles: usize,
        /// How many of those matched a keyword on their detail page.
        keyword_matches: usize,
    },
}
