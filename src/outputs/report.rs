//! Plain-text notification report.
//!
//! # Layout
//!
//! ```text
//! Articles mentioning your keywords:
//! - Band C Tour https://metalinjection.net/c
//!
//! Here are the latest articles:
//! - Band C Tour https://metalinjection.net/c
//! - Band D Tour https://metalinjection.net/d
//! ```
//!
//! The keyword section is left out entirely when nothing matched.

use crate::models::Article;
use chrono::NaiveDate;
use std::fmt::Write;

pub const FILTERED_PREAMBLE: &str = "Articles mentioning your keywords:";
pub const ALL_NEW_PREAMBLE: &str = "Here are the latest articles:";

/// Render the mail body for a cycle that found `all_new` articles, of which
/// `filtered` matched a keyword.
pub fn format_report(all_new: &[Article], filtered: &[Article]) -> String {
    let mut body = String::new();

    if !filtered.is_empty() {
        writeln!(body, "{FILTERED_PREAMBLE}").unwrap();
        write_articles(&mut body, filtered);
        body.push('\n');
    }

    writeln!(body, "{ALL_NEW_PREAMBLE}").unwrap();
    write_articles(&mut body, all_new);
    body
}

fn write_articles(body: &mut String, articles: &[Article]) {
    for article in articles {
        writeln!(body, "- {} {}", article.title, article.url).unwrap();
    }
}

/// Mail subject: the configured base plus the count and date of the update.
pub fn format_subject(base: &str, new_articles: usize, keyword_matches: usize, date: NaiveDate) -> String {
    if keyword_matches > 0 {
        format!("{base} ({new_articles} new, {keyword_matches} matching, {date})")
    } else {
        format!("{base} ({new_articles} new, {date})")
    }
}
