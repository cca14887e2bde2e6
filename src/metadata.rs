//! Document metadata: title, description, site name and canonical URL.
//!
//! Title precedence: Open Graph / Twitter card meta tags, then the
//! `<title>` element with the site-name suffix stripped, then the first
//! `<h1>`. The canonical URL feeds base-URL resolution when the caller
//! supplies no override and no `<base>` element is declared.

use dom_query::{Document, Selection};

use crate::dom;
use crate::patterns::TITLE_SEPARATOR;
use crate::text::normalize_whitespace;

/// Extract the document title.
#[must_use]
pub fn extract_title(doc: &Document) -> Option<String> {
    if let Some(title) = meta_content(doc, "og:title").or_else(|| meta_content(doc, "twitter:title"))
    {
        return Some(title);
    }

    let title_el = doc.select("head title");
    let text = normalize_whitespace(&dom::text_content(&title_el));
    if !text.is_empty() {
        return Some(strip_site_suffix(&text));
    }

    let h1 = doc.select("h1");
    let text = normalize_whitespace(&dom::text_content(&h1));
    if !text.is_empty() {
        return Some(text);
    }

    None
}

/// Document description, `og:description` preferred over the plain
/// `description` meta tag.
#[must_use]
pub fn extract_description(doc: &Document) -> Option<String> {
    meta_content(doc, "og:description").or_else(|| meta_content(doc, "description"))
}

/// Site name from `og:site_name`.
#[must_use]
pub fn site_name(doc: &Document) -> Option<String> {
    meta_content(doc, "og:site_name")
}

/// Content of the first meta tag whose `name` or `property` matches
/// `key`, whitespace-normalized. Empty content counts as absent.
fn meta_content(doc: &Document, key: &str) -> Option<String> {
    for node in doc.select("meta").nodes() {
        let meta = Selection::from(*node);

        let name = dom::get_attribute(&meta, "name")
            .or_else(|| dom::get_attribute(&meta, "property"))
            .unwrap_or_default()
            .to_lowercase();

        if name == key {
            if let Some(content) = dom::get_attribute(&meta, "content") {
                let content = normalize_whitespace(&content);
                if !content.is_empty() {
                    return Some(content);
                }
            }
        }
    }
    None
}

/// Drop a trailing site name: "Article Title | Site" becomes "Article
/// Title". Only the first separator counts; titles that merely contain
/// a dash mid-sentence pass through unchanged.
fn strip_site_suffix(title: &str) -> String {
    let mut parts = TITLE_SEPARATOR.split(title);
    match parts.next() {
        Some(first) if !first.trim().is_empty() => first.trim().to_string(),
        _ => title.to_string(),
    }
}

/// Canonical URL from `<link rel="canonical">`, falling back to the
/// `og:url` meta tag.
#[must_use]
pub fn canonical_url(doc: &Document) -> Option<String> {
    for node in doc.select("link[href]").nodes() {
        let link = Selection::from(*node);
        let rel = dom::get_attribute(&link, "rel").unwrap_or_default();
        if rel
            .split_whitespace()
            .any(|token| token.eq_ignore_ascii_case("canonical"))
        {
            let href = dom::get_attribute(&link, "href")?;
            let href = href.trim();
            if !href.is_empty() {
                return Some(href.to_string());
            }
        }
    }

    meta_content(doc, "og:url")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_og_title_wins_over_title_element() {
        let doc = Document::from(
            r#"<html><head>
            <meta property="og:title" content="The Real Title">
            <title>Fallback | Site</title>
            </head><body></body></html>"#,
        );
        assert_eq!(extract_title(&doc).as_deref(), Some("The Real Title"));
    }

    #[test]
    fn test_title_element_strips_site_suffix() {
        for (raw, expected) in [
            ("Deep Dive Into Caches | Example News", "Deep Dive Into Caches"),
            ("Deep Dive Into Caches - Example News", "Deep Dive Into Caches"),
            ("Deep Dive Into Caches \u{2013} Example News", "Deep Dive Into Caches"),
            ("Plain Title", "Plain Title"),
        ] {
            let doc = Document::from(format!(
                "<html><head><title>{raw}</title></head><body></body></html>"
            ));
            assert_eq!(extract_title(&doc).as_deref(), Some(expected), "raw: {raw}");
        }
    }

    #[test]
    fn test_h1_fallback() {
        let doc = Document::from("<html><body><h1>  Heading   Title </h1></body></html>");
        assert_eq!(extract_title(&doc).as_deref(), Some("Heading Title"));
    }

    #[test]
    fn test_no_title_anywhere() {
        let doc = Document::from("<html><body><p>text</p></body></html>");
        assert_eq!(extract_title(&doc), None);
    }

    #[test]
    fn test_description_and_site_name() {
        let doc = Document::from(
            r#"<html><head>
            <meta name="description" content="Plain description.">
            <meta property="og:description" content="Preferred   description.">
            <meta property="og:site_name" content="Example News">
            </head><body></body></html>"#,
        );
        assert_eq!(
            extract_description(&doc).as_deref(),
            Some("Preferred description.")
        );
        assert_eq!(site_name(&doc).as_deref(), Some("Example News"));
    }

    #[test]
    fn test_missing_description_and_site_name() {
        let doc = Document::from("<html><head><title>T</title></head><body></body></html>");
        assert_eq!(extract_description(&doc), None);
        assert_eq!(site_name(&doc), None);
    }

    #[test]
    fn test_canonical_link_wins_over_og_url() {
        let doc = Document::from(
            r#"<html><head>
            <meta property="og:url" content="https://example.com/og">
            <link rel="canonical" href="https://example.com/canonical">
            </head><body></body></html>"#,
        );
        assert_eq!(
            canonical_url(&doc).as_deref(),
            Some("https://example.com/canonical")
        );
    }

    #[test]
    fn test_og_url_fallback() {
        let doc = Document::from(
            r#"<html><head><meta property="og:url" content="https://example.com/og"></head></html>"#,
        );
        assert_eq!(canonical_url(&doc).as_deref(), Some("https://example.com/og"));
    }
}
