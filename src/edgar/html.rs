//! Text-level HTML handling for filing pages.
//!
//! Filing documents are only mined for links and readable text, so a few
//! regular expressions are enough; no DOM is built.

use regex::Regex;
use std::sync::LazyLock;

static HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*?\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#)
        .expect("Invalid regex")
});

static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>|<!--.*?-->")
        .expect("Invalid regex")
});

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("Invalid regex"));

static NUMERIC_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#([xX][0-9a-fA-F]+|[0-9]+);").expect("Invalid regex"));

/// Markers of documents worth reading first: material contracts (exhibit 10)
/// and proxy statements.
const PREFERRED_MARKERS: [&str; 2] = ["ex10", "def14a"];

/// All anchor `href` values, in document order.
pub fn extract_links(html: &str) -> Vec<String> {
    HREF.captures_iter(html)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| decode_entities(m.as_str().trim()))
        .collect()
}

/// Links that point at a filing document rather than an index page.
pub fn document_candidates(links: &[String]) -> Vec<&str> {
    links
        .iter()
        .map(String::as_str)
        .filter(|href| {
            href.ends_with(".htm") && !href.starts_with("/index.htm") && href.contains("Archives")
        })
        .collect()
}

/// Pick the document to read from an index page's links.
///
/// Exhibit-10 and proxy-statement documents win; otherwise the first
/// candidate in document order. `None` if no link qualifies.
pub fn select_document(links: &[String]) -> Option<&str> {
    let candidates = document_candidates(links);

    candidates
        .iter()
        .find(|href| {
            let lower = href.to_lowercase();
            PREFERRED_MARKERS.iter().any(|marker| lower.contains(marker))
        })
        .or_else(|| candidates.first())
        .copied()
}

/// Strip markup and return whitespace-joined plain text.
pub fn html_to_text(html: &str) -> String {
    let without_code = SCRIPT_OR_STYLE.replace_all(html, " ");
    let without_tags = TAG.replace_all(&without_code, " ");
    let decoded = decode_entities(&without_tags);

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode the entities that show up in filings.
fn decode_entities(s: &str) -> String {
    let numeric = NUMERIC_ENTITY.replace_all(s, |caps: &regex::Captures| {
        let body = &caps[1];
        let code = match body.strip_prefix('x').or_else(|| body.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => body.parse::<u32>().ok(),
        };
        code.and_then(char::from_u32)
            .map(|c| c.to_string())
            .unwrap_or_else(|| caps[0].to_string())
    });

    // &amp; goes last so "&amp;lt;" stays "&lt;".
    numeric
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// First `limit` characters of `text`.
///
/// Never splits a character; idempotent, and the result has at most
/// `limit` characters.
pub fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
