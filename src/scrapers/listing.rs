//! Listing page parser.
//!
//! Extracts one [`Article`] per `div.zox-art-title` block found inside the
//! `div#zox-home-cont-wrap` feed container, in document order.

use crate::error::ParseError;
use crate::markup::{attr, compile, first_match, locate_all_by_class, locate_by_id, text};
use crate::models::Article;
use crate::utils::truncate_for_log;
use scraper::Html;
use tracing::{debug, info, instrument, warn};

/// Tag of the feed container and of each article block.
pub const BLOCK_TAG: &str = "div";
/// `id` of the element wrapping the article feed.
pub const CONTAINER_ID: &str = "zox-home-cont-wrap";
/// Class of each article block inside the container.
pub const BLOCK_CLASS: &str = "zox-art-title";

/// Parse listing markup into articles.
///
/// # Errors
///
/// [`ParseError::MissingId`] if no `div` carries the feed container id, which usually
/// means the site layout changed. A container with no article blocks is not
/// an error and yields an empty list.
///
/// Blocks missing their anchor `href` or heading are skipped with a warning.
#[instrument(level = "info", skip_all, fields(bytes = raw_html.len()))]
pub fn parse_listing(raw_html: &str) -> Result<Vec<Article>, ParseError> {
    let document = Html::parse_document(raw_html);
    let Some(container) = locate_by_id(&document, BLOCK_TAG, CONTAINER_ID)? else {
        debug!(preview = %truncate_for_log(raw_html, 300), "Listing markup without feed container");
        return Err(ParseError::MissingId(CONTAINER_ID.to_string()));
    };

    let anchor_selector = compile("a")?;
    let heading_selector = compile("h2")?;

    let mut articles = Vec::new();
    for (index, block) in locate_all_by_class(container, BLOCK_TAG, BLOCK_CLASS)?
        .into_iter()
        .enumerate()
    {
        let href = first_match(block, &anchor_selector).and_then(|a| attr(a, "href"));
        let heading = first_match(block, &heading_selector).map(text);

        match (href, heading) {
            (Some(href), Some(title)) => articles.push(Article::new(title, href.trim())),
            (href, heading) => {
                warn!(
                    index,
                    has_href = href.is_some(),
                    has_heading = heading.is_some(),
                    "Skipping incomplete listing block"
                );
            }
        }
    }

    if articles.is_empty() {
        warn!("Listing container held no articles");
    }
    info!(count = articles.len(), "Parsed listing");
    debug!(urls = ?articles.iter().map(|a| a.url.as_str()).collect::<Vec<_>>(), "Listing URLs");

    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_html(entries: &[(&str, &str)]) -> String {
        let blocks: String = entries
            .iter()
            .map(|(title, url)| {
                format!(
                    r#"<div class="zox-art-wrap"><div class="zox-art-title"><a href="{url}" rel="bookmark"><h2 class="zox-s-title2">{title}</h2></a></div></div>"#
                )
            })
            .collect();
        format!(
            r#"<html><body><div id="zox-side-wrap"><div class="zox-art-title"><a href="/sidebar"><h2>Sidebar</h2></a></div></div><div id="zox-home-cont-wrap">{blocks}</div></body></html>"#
        )
    }

    #[test]
    fn test_parse_listing_extracts_articles_in_order() {
        let html = listing_html(&[("Band A Tour", "/a"), ("Band B Tour", "/b")]);
        let articles = parse_listing(&html).unwrap();
        assert_eq!(
            articles,
            vec![Article::new("Band A Tour", "/a"), Article::new("Band B Tour", "/b")]
        );
    }

    #[test]
    fn test_parse_listing_ignores_blocks_outside_container() {
        let html = listing_html(&[("Band A Tour", "/a")]);
        let articles = parse_listing(&html).unwrap();
        assert!(articles.iter().all(|a| a.url != "/sidebar"));
    }

    #[test]
    fn test_parse_listing_trims_heading_text() {
        let html = r#"<div id="zox-home-cont-wrap">
            <div class="zox-art-title">
              <a href="https://metalinjection.net/tour-dates/band-c">
                <h2>
                   Band C Announces
                   Fall Tour
                </h2>
              </a>
            </div>
        </div>"#;
        let articles = parse_listing(html).unwrap();
        assert_eq!(
            articles,
            vec![Article::new(
                "Band C Announces Fall Tour",
                "https://metalinjection.net/tour-dates/band-c"
            )]
        );
    }

    #[test]
    fn test_parse_listing_fails_without_container() {
        let err = parse_listing("<html><body><p>Redesigned!</p></body></html>").unwrap_err();
        assert!(matches!(err, ParseError::MissingId(id) if id == CONTAINER_ID));
    }

    #[test]
    fn test_parse_listing_empty_container_is_empty_list() {
        let articles = parse_listing(r#"<div id="zox-home-cont-wrap"></div>"#).unwrap();
        assert!(articles.is_empty());
    }

    #[test]
    fn test_parse_listing_skips_incomplete_blocks() {
        let html = r#"<div id="zox-home-cont-wrap">
            <div class="zox-art-title"><h2>No link</h2></div>
            <div class="zox-art-title"><a href="/no-heading">text</a></div>
            <div class="zox-art-title"><a href="/ok"><h2>Complete</h2></a></div>
        </div>"#;
        let articles = parse_listing(html).unwrap();
        assert_eq!(articles, vec![Article::new("Complete", "/ok")]);
    }

    #[test]
    fn test_parse_listing_only_matches_div_container_and_blocks() {
        let html = r#"<html><body>
            <section id="zox-home-cont-wrap">
              <div class="zox-art-title"><a href="/wrong-container"><h2>Wrong container</h2></a></div>
            </section>
            <div id="zox-home-cont-wrap">
              <span class="zox-art-title"><a href="/span-block"><h2>Span block</h2></a></span>
              <div class="zox-art-title"><a href="/a"><h2>Band A Tour</h2></a></div>
            </div>
        </body></html>"#;
        let articles = parse_listing(html).unwrap();
        assert_eq!(articles, vec![Article::new("Band A Tour", "/a")]);
    }

    #[test]
    fn test_parse_listing_rejects_non_div_container() {
        let html = r#"<section id="zox-home-cont-wrap">
            <div class="zox-art-title"><a href="/a"><h2>Band A Tour</h2></a></div>
        </section>"#;
        let err = parse_listing(html).unwrap_err();
        assert!(matches!(err, ParseError::MissingId(id) if id == CONTAINER_ID));
    }

    #[test]
    fn test_parse_listing_keeps_duplicates() {
        let html = listing_html(&[("Band A Tour", "/a"), ("Band A Tour (updated)", "/a")]);
        let articles = parse_listing(&html).unwrap();
        assert_eq!(articles.len(), 2);
    }
}
