//! Compiled regex patterns and CSS selectors for content extraction.
//!
//! All patterns are compiled once at first use via `LazyLock`. Class and
//! id matching is case-insensitive throughout.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Boilerplate Detection Patterns
// =============================================================================

/// Matches class/id names indicating navigation elements.
///
/// "nav" needs a word boundary or token position so layout containers like
/// "in-page-nav-container" do not match on the middle of a compound name.
pub static NAVIGATION_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(^nav$|^nav[-_]|[-_]nav$|navbar|navigation|top[-_]?nav|main[-_]?menu|site[-_]?nav|\bmenu\b|breadcrumb(?:s)?|site[-_]?footer|site[-_]?header|page[-_]?header|page[-_]?footer)",
    )
    .expect("NAVIGATION_CLASS regex")
});

/// Matches class/id names indicating advertisement elements.
pub static ADVERTISEMENT_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(^(ad|ads|advert|advertisement|sponsor|sponsored|promo)$|\bad[-_]?slot\b|\bad[-_]?banner\b)")
        .expect("ADVERTISEMENT_CLASS regex")
});

/// Matches class/id names indicating boilerplate sections.
///
/// "footer" and "sidebar" only match as standalone tokens. Compound
/// content classes like "article-footer-note" stay untouched, while
/// "comment" deliberately matches compounds ("comment-section").
pub static BOILERPLATE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\bcomment(?:s)?|shar(?:e|ing)|\bsocial\b|related|recommend(?:ed)?|(^|[^\w-])footer($|[^\w-])|(^|[^\w-])sidebar($|[^\w-])|copyright|disclaimer|cookie[-_]?(?:consent|notice|banner)|newsletter|\bsubscribe\b|subscription|trending|popular|most[-_]?read|top[-_]?stories|\bbyline\b|tag[-_]?cloud|widget\b)",
    )
    .expect("BOILERPLATE_CLASS regex")
});

// =============================================================================
// Content Identification Patterns
// =============================================================================

/// Matches class/id names likely to wrap main content.
pub static CONTENT_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(article|content|post[-_]?body|entry|story|main[-_]?text|prose)")
        .expect("CONTENT_CLASS regex")
});

// =============================================================================
// Text Cleaning Patterns
// =============================================================================

/// Matches runs of whitespace for single-line normalization.
pub static WHITESPACE_NORMALIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("WHITESPACE_NORMALIZE regex")
});

/// Matches runs of spaces and tabs, newlines excluded.
pub static INLINE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t]+").expect("INLINE_WHITESPACE regex")
});

/// Matches three or more consecutive newlines.
pub static MULTIPLE_NEWLINES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n{3,}").expect("MULTIPLE_NEWLINES regex")
});

/// Matches common separators between an article title and the site name.
pub static TITLE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+[\|–—·]\s+| - ").expect("TITLE_SEPARATOR regex")
});

// =============================================================================
// CSS Selectors
// =============================================================================

/// Elements considered as main-content candidates, in a single combined
/// selector so one tree scan covers them all.
pub const CANDIDATE_SELECTOR: &str = "article, main, section, div, td";

/// Elements that are boilerplate by tag alone.
pub const BOILERPLATE_TAG_SELECTOR: &str = "nav, aside, footer, header, form";

/// Elements whose subtrees never contribute to content output.
pub const NON_CONTENT_SELECTOR: &str = "script, style, noscript, template";

/// Tags treated as paragraph-like when scoring a candidate's children.
pub const PARAGRAPH_TAGS: &[&str] = &["p", "blockquote", "pre"];

/// Tags that delimit blocks when serializing content.
pub const BLOCK_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "blockquote", "pre", "table", "tr",
    "figcaption", "div", "section", "article",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_class_matches_nav_elements() {
        assert!(NAVIGATION_CLASS.is_match("main-nav"));
        assert!(NAVIGATION_CLASS.is_match("navbar"));
        assert!(NAVIGATION_CLASS.is_match("site-footer"));
        assert!(!NAVIGATION_CLASS.is_match("article-content"));
        assert!(!NAVIGATION_CLASS.is_match("in-page-nav-container"));
    }

    #[test]
    fn advertisement_class_matches_exact_tokens() {
        assert!(ADVERTISEMENT_CLASS.is_match("ad"));
        assert!(ADVERTISEMENT_CLASS.is_match("sponsored"));
        assert!(!ADVERTISEMENT_CLASS.is_match("adaptive"));
        assert!(!ADVERTISEMENT_CLASS.is_match("badge"));
    }

    #[test]
    fn boilerplate_class_respects_word_boundaries() {
        assert!(BOILERPLATE_CLASS.is_match("comments"));
        assert!(BOILERPLATE_CLASS.is_match("social-share"));
        assert!(BOILERPLATE_CLASS.is_match("footer"));
        assert!(!BOILERPLATE_CLASS.is_match("article-footer-note"));
    }

    #[test]
    fn content_class_matches_article_elements() {
        assert!(CONTENT_CLASS.is_match("article-body"));
        assert!(CONTENT_CLASS.is_match("post-body"));
        assert!(CONTENT_CLASS.is_match("entry"));
        assert!(!CONTENT_CLASS.is_match("nav-menu"));
    }

    #[test]
    fn whitespace_normalize_collapses_spaces() {
        let result = WHITESPACE_NORMALIZE.replace_all("hello \t\n world", " ");
        assert_eq!(result, "hello world");
    }

    #[test]
    fn title_separator_splits_site_suffix() {
        let parts: Vec<&str> = TITLE_SEPARATOR.split("Deep Dive Into Caches | Example News").collect();
        assert_eq!(parts, vec!["Deep Dive Into Caches", "Example News"]);
    }
}
