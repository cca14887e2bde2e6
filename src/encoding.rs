//! Character encoding detection and transcoding.
//!
//! Byte input is sniffed for a charset declaration and converted to UTF-8
//! before parsing. Conversion is lossy; invalid sequences become the
//! Unicode replacement character instead of failing the extraction.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

/// Bytes examined for a charset declaration. Declarations are required
/// to appear early; scanning further buys nothing.
const SNIFF_WINDOW: usize = 1024;

#[allow(clippy::expect_used)]
static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>;]+)"#).expect("META_CHARSET regex")
});

#[allow(clippy::expect_used)]
static HTTP_EQUIV_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#,
    )
    .expect("HTTP_EQUIV_CHARSET regex")
});

/// Detect the character encoding declared in the document head.
///
/// Checks `<meta charset="...">` first, then
/// `<meta http-equiv="Content-Type" content="...; charset=...">`,
/// defaulting to UTF-8 when neither is present or the label is unknown.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    let head = &html[..html.len().min(SNIFF_WINDOW)];
    let head_str = String::from_utf8_lossy(head);

    for pattern in [&*META_CHARSET, &*HTTP_EQUIV_CHARSET] {
        if let Some(label) = pattern.captures(&head_str).and_then(|c| c.get(1)) {
            if let Some(encoding) = Encoding::for_label(label.as_str().as_bytes()) {
                return encoding;
            }
        }
    }

    UTF_8
}

/// Convert HTML bytes to a UTF-8 string using the declared encoding.
///
/// # Examples
///
/// ```
/// use pagesift::encoding::decode_html;
///
/// let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body>Caf\xE9</body></html>";
/// assert!(decode_html(html).contains("Caf\u{e9}"));
/// ```
#[must_use]
pub fn decode_html(html: &[u8]) -> String {
    let encoding = detect_encoding(html);

    if encoding == UTF_8 {
        return String::from_utf8_lossy(html).into_owned();
    }

    let (decoded, _, _) = encoding.decode(html);
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_utf8_from_meta_charset() {
        let html = br#"<html><head><meta charset="utf-8"></head><body>x</body></html>"#;
        assert_eq!(detect_encoding(html), UTF_8);
    }

    #[test]
    fn detect_latin1_maps_to_windows1252() {
        // encoding_rs maps ISO-8859-1 to windows-1252 per the WHATWG
        // encoding standard.
        let html = br#"<html><head><meta charset="ISO-8859-1"></head><body>x</body></html>"#;
        assert_eq!(detect_encoding(html).name(), "windows-1252");
    }

    #[test]
    fn detect_charset_from_http_equiv() {
        let html = br#"<meta http-equiv="Content-Type" content="text/html; charset=windows-1252">"#;
        assert_eq!(detect_encoding(html).name(), "windows-1252");
    }

    #[test]
    fn default_to_utf8_without_declaration() {
        assert_eq!(detect_encoding(b"<html><body>x</body></html>"), UTF_8);
    }

    #[test]
    fn unknown_label_falls_back_to_utf8() {
        let html = br#"<meta charset="not-a-real-charset">"#;
        assert_eq!(detect_encoding(html), UTF_8);
    }

    #[test]
    fn declaration_outside_sniff_window_is_ignored() {
        let mut html = Vec::new();
        html.extend_from_slice(b"<html><head>");
        html.extend_from_slice(" ".repeat(SNIFF_WINDOW).as_bytes());
        html.extend_from_slice(b"<meta charset=\"ISO-8859-1\"></head></html>");
        assert_eq!(detect_encoding(&html), UTF_8);
    }

    #[test]
    fn decode_latin1_accents() {
        let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body>Caf\xE9</body></html>";
        assert!(decode_html(html).contains("Caf\u{e9}"));
    }

    #[test]
    fn decode_windows1252_smart_quotes() {
        let html =
            b"<html><head><meta charset=\"windows-1252\"></head><body>\x93q\x94</body></html>";
        assert!(decode_html(html).contains("\u{201C}q\u{201D}"));
    }

    #[test]
    fn invalid_bytes_become_replacement_chars() {
        let html = b"<html><body>ok \xFF\xFE still ok</body></html>";
        let decoded = decode_html(html);
        assert!(decoded.contains("ok"));
        assert!(decoded.contains("still ok"));
    }
}
