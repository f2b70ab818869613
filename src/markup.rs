//! Small tree-search layer over `scraper` selectors.
//!
//! The scrapers only need a few questions answered about a document: find an
//! element by tag and id, find elements by tag and class, read an element's
//! text and read an attribute. Keeping them here means a layout change touches
//! the scrapers' constants, not their traversal code.

use crate::error::ParseError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Compile a CSS selector.
///
/// # Errors
///
/// [`ParseError::Selector`] if `css` is not a valid selector.
pub fn compile(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| ParseError::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// First `tag` element in the document whose `id` is `id` (`tag#id`).
pub fn locate_by_id<'a>(
    document: &'a Html,
    tag: &str,
    id: &str,
) -> Result<Option<ElementRef<'a>>, ParseError> {
    let selector = compile(&format!("{tag}#{id}"))?;
    Ok(document.select(&selector).next())
}

/// First `tag` element in the document carrying `class` (`tag.class`).
///
/// Stops at the first match.
pub fn locate_first_by_class<'a>(
    document: &'a Html,
    tag: &str,
    class: &str,
) -> Result<Option<ElementRef<'a>>, ParseError> {
    let selector = compile(&format!("{tag}.{class}"))?;
    Ok(document.select(&selector).next())
}

/// All `tag` descendants of `container` (excluding itself) carrying `class`,
/// in document order.
pub fn locate_all_by_class<'a>(
    container: ElementRef<'a>,
    tag: &str,
    class: &str,
) -> Result<Vec<ElementRef<'a>>, ParseError> {
    let selector = compile(&format!("{tag}.{class}"))?;
    Ok(container.select(&selector).collect())
}

/// First descendant of `container` matching `selector`.
pub fn first_match<'a>(container: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    container.select(selector).next()
}

/// Text content of `node` with runs of whitespace collapsed and the ends trimmed.
pub fn text(node: ElementRef<'_>) -> String {
    let raw = node.text().collect::<String>();
    WHITESPACE.replace_all(raw.trim(), " ").into_owned()
}

/// Raw text content of `node`, exactly as it appears in the markup.
pub fn raw_text(node: ElementRef<'_>) -> String {
    node.text().collect()
}

pub fn attr<'a>(node: ElementRef<'a>, name: &str) -> Option<&'a str> {
    node.value().attr(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <section id="wrap"><div class="card">decoy</div></section>
          <div id="wrap" class="outer">
            <div class="card lead"><a href="/one">x</a><h2>  First
               <em>Story</em> </h2></div>
            <span class="card"><a href="/span">z</a></span>
            <div class="card"><a href="/two">y</a><h2>Second</h2></div>
            <section class="cards"><p>not a card</p></section>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_locate_by_id_matches_tag_and_id() {
        let doc = Html::parse_document(PAGE);
        let wrap = locate_by_id(&doc, "div", "wrap").unwrap().unwrap();
        assert_eq!(wrap.value().name(), "div");
        assert_eq!(wrap.value().attr("class"), Some("outer"));
        assert!(locate_by_id(&doc, "div", "missing").unwrap().is_none());
        assert!(locate_by_id(&doc, "article", "wrap").unwrap().is_none());
    }

    #[test]
    fn test_locate_all_by_class_matches_whole_class_names_in_order() {
        let doc = Html::parse_document(PAGE);
        let wrap = locate_by_id(&doc, "div", "wrap").unwrap().unwrap();
        let anchor = compile("a").unwrap();
        let cards = locate_all_by_class(wrap, "div", "card").unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(attr(first_match(cards[0], &anchor).unwrap(), "href"), Some("/one"));
        assert_eq!(attr(first_match(cards[1], &anchor).unwrap(), "href"), Some("/two"));
    }

    #[test]
    fn test_locate_all_by_class_skips_other_tags() {
        let doc = Html::parse_document(PAGE);
        let wrap = locate_by_id(&doc, "div", "wrap").unwrap().unwrap();
        let spans = locate_all_by_class(wrap, "span", "card").unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(raw_text(spans[0]), "z");
    }

    #[test]
    fn test_locate_all_by_class_excludes_container_itself() {
        let doc = Html::parse_document(PAGE);
        let wrap = locate_by_id(&doc, "div", "wrap").unwrap().unwrap();
        assert!(locate_all_by_class(wrap, "div", "outer").unwrap().is_empty());
    }

    #[test]
    fn test_locate_first_by_class_returns_document_order_first() {
        let doc = Html::parse_document(PAGE);
        let first = locate_first_by_class(&doc, "div", "card").unwrap().unwrap();
        assert_eq!(raw_text(first), "decoy");
        assert!(locate_first_by_class(&doc, "div", "absent").unwrap().is_none());
    }

    #[test]
    fn test_text_collapses_whitespace() {
        let doc = Html::parse_document(PAGE);
        let wrap = locate_by_id(&doc, "div", "wrap").unwrap().unwrap();
        let heading = first_match(wrap, &compile("h2").unwrap()).unwrap();
        assert_eq!(text(heading), "First Story");
    }

    #[test]
    fn test_compile_rejects_invalid_selector() {
        let err = compile("div[").unwrap_err();
        assert!(matches!(err, ParseError::Selector { selector, .. } if selector == "div["));
    }
}
