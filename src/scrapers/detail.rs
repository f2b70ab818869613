//! Detail page keyword filter.
//!
//! For each new article the detail page is fetched (one at a time, in listing
//! order) and its body paragraphs are searched for the configured keywords.
//!
//! # Failure policy
//!
//! Skip and continue. If a detail page cannot be fetched, its link cannot be
//! resolved, or it has no body container, the article is logged with its url
//! and counted as "no match". The rest of the batch is still checked and the
//! article still appears in the full list of the report.

use crate::error::{FetchError, ParseError};
use crate::fetcher::Fetch;
use crate::markup::{compile, locate_first_by_class, raw_text};
use crate::models::Article;
use futures::stream::{self, StreamExt};
use scraper::Html;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Tag of the element holding the article body.
pub const BODY_TAG: &str = "div";
/// Class of the element holding the article body.
pub const BODY_CLASS: &str = "zox-post-body";
/// Tag of the text blocks searched for keywords.
pub const PARAGRAPH_TAG: &str = "p";

/// Keep the articles whose detail page mentions at least one keyword.
///
/// Relative article urls are resolved against `base` (the listing url).
/// Matching is a case-sensitive substring test of each keyword against each
/// paragraph. The result preserves the input order and is always a subset of
/// `articles`. With no keywords nothing is fetched and the result is empty.
#[instrument(level = "info", skip_all, fields(candidates = articles.len(), keywords = keywords.len()))]
pub async fn filter_by_keyword<F: Fetch>(
    fetcher: &F,
    base: &Url,
    articles: &[Article],
    keywords: &[String],
) -> Vec<Article> {
    if keywords.is_empty() {
        debug!("No keywords configured; skipping detail pages");
        return Vec::new();
    }

    let matched: Vec<Article> = stream::iter(articles)
        .then(|article| async move {
            match article_mentions_any(fetcher, base, article, keywords).await {
                Ok(true) => {
                    info!(url = %article.url, title = %article.title, "Keyword match");
                    Some(article.clone())
                }
                Ok(false) => {
                    debug!(url = %article.url, "No keyword match");
                    None
                }
                Err(e) => {
                    warn!(url = %article.url, error = %e, "Detail page check failed; treating as no match");
                    None
                }
            }
        })
        .filter_map(std::future::ready)
        .collect()
        .await;

    info!(count = matched.len(), "Filtered new articles by keyword");
    matched
}

#[derive(Debug, thiserror::Error)]
enum DetailError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

async fn article_mentions_any<F: Fetch>(
    fetcher: &F,
    base: &Url,
    article: &Article,
    keywords: &[String],
) -> Result<bool, DetailError> {
    let url = base.join(&article.url).map_err(|source| FetchError::InvalidUrl {
        href: article.url.clone(),
        source,
    })?;
    let html = fetcher.fetch(url.as_str()).await?;
    Ok(page_mentions_any(&html, keywords)?)
}

/// Whether any paragraph of the page body contains any of `keywords`.
///
/// Only the first `div.zox-post-body` is searched, and the search stops at the
/// first matching paragraph.
///
/// # Errors
///
/// [`ParseError::MissingClass`] if the page has no body container.
pub fn page_mentions_any(raw_html: &str, keywords: &[String]) -> Result<bool, ParseError> {
    let document = Html::parse_document(raw_html);
    let body = locate_first_by_class(&document, BODY_TAG, BODY_CLASS)?
        .ok_or_else(|| ParseError::MissingClass(BODY_CLASS.to_string()))?;

    let paragraphs = compile(PARAGRAPH_TAG)?;
    let found = body
        .select(&paragraphs)
        .map(raw_text)
        .any(|paragraph| keywords.iter().any(|k| paragraph.contains(k.as_str())));
    Ok(found)
}
