//! Scrapers for the monitored site.
//!
//! Scraping happens in two phases, the same way for every run:
//!
//! 1. **Listing**: [`listing::parse_listing`] turns the listing page into
//!    [`Article`](crate::models::Article) records
//! 2. **Detail**: [`detail::filter_by_keyword`] fetches each new article's
//!    page and keeps the ones whose body mentions a keyword
//!
//! # Page layout
//!
//! | Page | Marker | Meaning |
//! |------|--------|---------|
//! | Listing | `div#zox-home-cont-wrap` | container of the article feed |
//! | Listing | `div.zox-art-title` | one article block (`a[href]` + `h2`) |
//! | Detail | `div.zox-post-body` | article body (first one only) |
//! | Detail | `p` | body paragraphs searched for keywords |
//!
//! Both phases go through [`crate::markup`] so only the constants above
//! need to change if the theme does.

pub mod detail;
pub mod listing;
