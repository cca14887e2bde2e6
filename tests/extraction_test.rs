//! End-to-end extraction tests over the one-shot pipeline API.

use pagesift::{
    extract, extract_with_options, Error, ExtractOptions, InlineImageStyle, OutputFormat,
};

const ARTICLE_PAGE: &str = r#"
<html>
<head><title>The Article Title | Example News</title></head>
<body>
    <nav><a href="/">Home</a> <a href="/archive">Archive</a> <a href="/contact">Contact</a></nav>
    <aside class="ad">Buy our product now, limited time offer for subscribers.</aside>
    <article>
        <p>The first paragraph of the story carries enough prose to look like
        genuine article content to any reasonable density heuristic.</p>
        <p>The second paragraph continues the story with more plain sentences
        and keeps the text ratio comfortably above the scoring floor.</p>
    </article>
    <footer>Copyright 2026 Example News. All rights reserved.</footer>
</body>
</html>
"#;

#[test]
fn test_detection_keeps_article_and_drops_boilerplate() {
    let result = match extract(ARTICLE_PAGE) {
        Ok(r) => r,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };

    assert!(result.text.contains("first paragraph of the story"));
    assert!(result.text.contains("second paragraph continues"));

    assert!(!result.text.contains("Home"));
    assert!(!result.text.contains("Archive"));
    assert!(!result.text.contains("Buy our product"));
    assert!(!result.text.contains("All rights reserved"));
}

#[test]
fn test_title_extraction_strips_site_name() {
    let result = match extract(ARTICLE_PAGE) {
        Ok(r) => r,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };
    assert_eq!(result.title.as_deref(), Some("The Article Title"));
}

#[test]
fn test_word_count_zero_iff_text_empty() {
    for page in [
        "<html><body></body></html>",
        "<html><body><div><span></span></div></body></html>",
        ARTICLE_PAGE,
    ] {
        let result = match extract(page) {
            Ok(r) => r,
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        };
        assert_eq!(result.word_count == 0, result.text.is_empty());
    }

    let full = match extract(ARTICLE_PAGE) {
        Ok(r) => r,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };
    assert!(full.word_count > 0);
    assert!(full.reading_time.as_secs() >= 1);
}

#[test]
fn test_extraction_is_idempotent() {
    let options = ExtractOptions::default();
    let a = match extract_with_options(ARTICLE_PAGE, &options) {
        Ok(r) => r,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };
    let b = match extract_with_options(ARTICLE_PAGE, &options) {
        Ok(r) => r,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };

    // Byte-identical modulo the processing-duration field.
    assert_eq!(a.title, b.title);
    assert_eq!(a.text, b.text);
    assert_eq!(a.word_count, b.word_count);
    assert_eq!(a.media, b.media);
    assert_eq!(a.links, b.links);
    assert_eq!(a.fingerprint, b.fingerprint);
}

#[test]
fn test_empty_input_is_invalid() {
    for input in ["", "   \n\t  "] {
        match extract(input) {
            Err(Error::InvalidInput(_)) => {}
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }
}

#[test]
fn test_malformed_html_degrades_gracefully() {
    let mangled = "<html><body><article><p>Unclosed paragraph \
                   <div>stray <b>bold text</article> trailing";
    let result = match extract(mangled) {
        Ok(r) => r,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };
    assert!(result.text.contains("Unclosed paragraph"));
}

#[test]
fn test_detection_disabled_keeps_whole_body() {
    let options = ExtractOptions {
        detect_article: false,
        ..ExtractOptions::default()
    };
    let result = match extract_with_options(ARTICLE_PAGE, &options) {
        Ok(r) => r,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };

    assert!(result.text.contains("first paragraph of the story"));
    assert!(result.text.contains("Home"));
    assert!(result.text.contains("All rights reserved"));
}

#[test]
fn test_markdown_output_format() {
    let page = r#"<html><body><article>
        <h1>Heading</h1>
        <p>A paragraph with <em>emphasis</em> and a <a href="/more">link</a>,
        padded with enough prose to win the candidate scoring round.</p>
        <p>Another paragraph keeps the article firmly above the floor.</p>
        </article></body></html>"#;

    let options = ExtractOptions {
        format: OutputFormat::Markdown,
        base_url: Some("https://example.com/".to_string()),
        ..ExtractOptions::default()
    };
    let result = match extract_with_options(page, &options) {
        Ok(r) => r,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };

    assert!(result.text.contains("# Heading"));
    assert!(result.text.contains("*emphasis*"));
    assert!(result.text.contains("[link](https://example.com/more)"));
}

#[test]
fn test_json_format_carries_structure() {
    let options = ExtractOptions {
        format: OutputFormat::Json,
        ..ExtractOptions::default()
    };
    let result = match extract_with_options(ARTICLE_PAGE, &options) {
        Ok(r) => r,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };

    let json = match result.to_json() {
        Ok(json) => json,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };
    assert!(json.contains("\"title\":\"The Article Title\""));
    assert!(json.contains("\"word_count\""));
    assert!(json.contains("\"links\""));
    assert!(json.contains("\"fingerprint\""));
}

#[test]
fn test_inline_image_placeholder_in_text() {
    let page = r#"<html><body><article>
        <p>Before the figure there is a sentence of reasonable length to
        keep the detector happy with this candidate block.</p>
        <img src="chart.png" alt="sales chart">
        <p>After the figure another sentence closes out the article text.</p>
        </article></body></html>"#;

    let options = ExtractOptions {
        inline_images: InlineImageStyle::Placeholder,
        ..ExtractOptions::default()
    };
    let result = match extract_with_options(page, &options) {
        Ok(r) => r,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };

    assert!(result.text.contains("[image: sales chart]"));
    assert_eq!(result.media.len(), 1);
    assert_eq!(result.media[0].alt.as_deref(), Some("sales chart"));
}

#[test]
fn test_deeply_nested_markup_degrades_gracefully() {
    // Well under the size ceiling but nested far past any sane depth;
    // must truncate, not blow the stack.
    let mut html = String::with_capacity(800 * 1024);
    html.push_str("<html><body>");
    for _ in 0..60_000 {
        html.push_str("<div>");
    }
    html.push_str("unreachable text");
    for _ in 0..60_000 {
        html.push_str("</div>");
    }
    html.push_str("</body></html>");

    let result = match extract_with_options(&html, &ExtractOptions::feed()) {
        Ok(r) => r,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };
    assert_eq!(result.word_count, 0);
    assert!(result.text.is_empty());
}

#[test]
fn test_markup_only_content_serializes_empty() {
    for format in [OutputFormat::Markdown, OutputFormat::Html] {
        let options = ExtractOptions {
            format,
            detect_article: false,
            ..ExtractOptions::default()
        };
        let result = match extract_with_options("<html><body><hr></body></html>", &options) {
            Ok(r) => r,
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        };
        assert!(result.text.is_empty(), "{format:?}");
        assert_eq!(result.word_count, 0, "{format:?}");
    }
}

#[test]
fn test_encoding_detection_end_to_end() {
    let html: &[u8] = b"<html><head><meta charset=\"ISO-8859-1\"></head>\
        <body><article><p>Une journ\xE9e ordinaire dans la vie du r\xE9dacteur, \
        racont\xE9e avec assez de texte pour passer la d\xE9tection.</p></article></body></html>";

    let result = match pagesift::extract_bytes(html) {
        Ok(r) => r,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };
    assert!(result.text.contains("journ\u{e9}e ordinaire"));
}

#[test]
fn test_presets_shape_output() {
    let feed = match extract_with_options(ARTICLE_PAGE, &ExtractOptions::feed()) {
        Ok(r) => r,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };
    // Feed profile: no detection, no inventories.
    assert!(feed.text.contains("Home"));
    assert!(feed.links.is_empty());
    assert!(feed.media.is_empty());

    let text_only = match extract_with_options(ARTICLE_PAGE, &ExtractOptions::text_only()) {
        Ok(r) => r,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };
    assert!(!text_only.text.contains("Home"));
    assert!(text_only.links.is_empty());
}
