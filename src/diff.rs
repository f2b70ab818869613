//! Change detection between the current listing and the last snapshot.

use crate::models::Article;
use std::collections::HashSet;

/// Articles of `current` whose url does not appear in `previous`, in
/// `current`'s order.
///
/// An empty `previous` (first run) makes every current article new.
pub fn diff(current: &[Article], previous: &[Article]) -> Vec<Article> {
    let known: HashSet<&str> = previous.iter().map(|a| a.url.as_str()).collect();
    current
        .iter()
        .filter(|a| !known.contains(a.url.as_str()))
        .cloned()
        .collect()
}
