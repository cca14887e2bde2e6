//! Content serialization.
//!
//! Converts the selected content subtree into the requested output
//! payload. Plain-text and Markdown rendering walk the tree read-only;
//! HTML rendering rewrites the subtree in place (the pipeline owns the
//! document, so mutation is safe) and returns its inner HTML.
//!
//! Inline-image style and table style are independent axes; every
//! combination is supported in every format. Decorative images are
//! never rendered inline, whatever the style; they remain visible in
//! the media inventory.

use dom_query::{NodeRef, Selection};
use url::Url;

use crate::dom;
use crate::options::{ExtractOptions, InlineImageStyle, OutputFormat, TableStyle};
use crate::patterns::{BLOCK_TAGS, MULTIPLE_NEWLINES, NON_CONTENT_SELECTOR, WHITESPACE_NORMALIZE};
use crate::pipeline::Deadline;
use crate::resolve::resolve_url;
use crate::text::{normalize_whitespace, tidy_block_text};
use crate::Result;

/// Characters with meaning in Markdown, escaped in text runs.
const MARKDOWN_SPECIAL_CHARS: &[char] = &['\\', '*', '_', '[', ']', '<', '>', '`', '|'];

/// Serialize the content subtree in the requested format.
///
/// For `OutputFormat::Json` the payload is the plain-text rendering;
/// the structured fields travel in the `ExtractionResult` itself.
pub(crate) fn serialize(
    content: &Selection,
    base: Option<&Url>,
    options: &ExtractOptions,
    sanitize: bool,
    max_depth: usize,
    deadline: &Deadline,
) -> Result<String> {
    match options.format {
        OutputFormat::Text | OutputFormat::Json => {
            plain_text(content, base, options, max_depth, deadline)
        }
        OutputFormat::Markdown => render_markdown(content, base, options, max_depth, deadline),
        OutputFormat::Html => render_html(content, base, options, sanitize, deadline),
    }
}

/// Plain-text rendering: block elements separated by blank lines,
/// scripts and styles skipped, images per the inline-image style.
/// Subtrees nested deeper than `max_depth` are truncated, not an error.
pub(crate) fn plain_text(
    content: &Selection,
    base: Option<&Url>,
    options: &ExtractOptions,
    max_depth: usize,
    deadline: &Deadline,
) -> Result<String> {
    let Some(root) = content.nodes().first() else {
        return Ok(String::new());
    };

    let mut out = String::new();
    walk_text(root, &mut out, base, options, max_depth, deadline)?;
    Ok(tidy_block_text(&out))
}

fn walk_text(
    node: &NodeRef,
    out: &mut String,
    base: Option<&Url>,
    options: &ExtractOptions,
    depth: usize,
    deadline: &Deadline,
) -> Result<()> {
    if node.is_text() {
        out.push_str(&node.text());
        return Ok(());
    }
    if !node.is_element() {
        return Ok(());
    }
    deadline.check()?;
    // Truncate past the depth bound; recursion stays stack-safe on
    // pathologically nested markup.
    if depth == 0 {
        return Ok(());
    }

    let tag = node.node_name().map(|t| t.to_string()).unwrap_or_default();
    match tag.as_str() {
        "script" | "style" | "noscript" | "template" => {}
        "br" => out.push('\n'),
        "img" => {
            if let Some(rendered) = inline_image(&Selection::from(*node), base, options) {
                out.push(' ');
                out.push_str(&rendered);
                out.push(' ');
            }
        }
        "table" => {
            out.push_str("\n\n");
            out.push_str(&render_table(&Selection::from(*node), options.table_style));
            out.push_str("\n\n");
        }
        _ => {
            let is_block = BLOCK_TAGS.contains(&tag.as_str());
            if is_block {
                out.push_str("\n\n");
            }
            for child in node.children() {
                walk_text(&child, out, base, options, depth - 1, deadline)?;
            }
            if is_block {
                out.push_str("\n\n");
            }
        }
    }
    Ok(())
}

/// Render a table per the table style: a GFM pipe table, or the
/// original markup untouched.
fn render_table(table: &Selection, style: TableStyle) -> String {
    match style {
        TableStyle::Markdown => table_to_markdown(table),
        TableStyle::Html => dom::outer_html(table).to_string(),
    }
}

/// Convert a `<table>` selection to a GFM pipe table. The first row
/// serves as the header row; cell text is whitespace-normalized and
/// pipes are escaped.
#[must_use]
pub fn table_to_markdown(table: &Selection) -> String {
    let mut rows: Vec<Vec<String>> = Vec::new();
    for tr in table.select("tr").iter() {
        let mut row = Vec::new();
        for cell in tr.select("th, td").iter() {
            row.push(normalize_whitespace(&dom::text_content(&cell)).replace('|', "\\|"));
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }
    if rows.is_empty() {
        return String::new();
    }

    let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![3usize; cols];
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for (idx, row) in rows.iter().enumerate() {
        out.push('|');
        for (col, width) in widths.iter().enumerate() {
            let cell = row.get(col).map_or("", String::as_str);
            out.push(' ');
            out.push_str(cell);
            out.push_str(&" ".repeat(width.saturating_sub(cell.chars().count())));
            out.push_str(" |");
        }
        out.push('\n');

        if idx == 0 {
            out.push('|');
            for width in &widths {
                out.push(' ');
                out.push_str(&"-".repeat(*width));
                out.push_str(" |");
            }
            out.push('\n');
        }
    }
    out
}

/// Render an image per the inline-image style. Decorative images render
/// as nothing.
fn inline_image(
    img: &Selection,
    base: Option<&Url>,
    options: &ExtractOptions,
) -> Option<String> {
    let alt = dom::get_attribute(img, "alt").unwrap_or_default();
    let alt = normalize_whitespace(&alt);
    if alt.is_empty() || is_presentational(img) {
        return None;
    }

    let raw = dom::get_attribute(img, "src")
        .filter(|src| !src.trim().is_empty())
        .or_else(|| dom::get_attribute(img, "data-src"))?;
    let url = resolve_url(&raw, base);

    match options.inline_images {
        InlineImageStyle::Omit => None,
        InlineImageStyle::Placeholder => Some(format!("[image: {alt}]")),
        InlineImageStyle::Markdown => Some(format!("![{alt}]({url})")),
        InlineImageStyle::Html => Some(format!(
            "<img src=\"{}\" alt=\"{}\">",
            escape_attr(&url),
            escape_attr(&alt)
        )),
    }
}

fn is_presentational(sel: &Selection) -> bool {
    dom::get_attribute(sel, "role").as_deref() == Some("presentation")
        || dom::get_attribute(sel, "aria-hidden").as_deref() == Some("true")
}

// === Markdown ===

fn render_markdown(
    content: &Selection,
    base: Option<&Url>,
    options: &ExtractOptions,
    max_depth: usize,
    deadline: &Deadline,
) -> Result<String> {
    let Some(root) = content.nodes().first() else {
        return Ok(String::new());
    };

    let mut out = String::new();
    md_children(root, &mut out, base, options, max_depth, deadline)?;
    Ok(MULTIPLE_NEWLINES.replace_all(&out, "\n\n").trim().to_string())
}

/// Walk the children of a container, grouping inline runs (text,
/// anchors, emphasis) into paragraphs and dispatching block elements to
/// their own renderers. `depth` is the remaining level budget; children
/// past it are truncated.
fn md_children(
    node: &NodeRef,
    out: &mut String,
    base: Option<&Url>,
    options: &ExtractOptions,
    depth: usize,
    deadline: &Deadline,
) -> Result<()> {
    deadline.check()?;
    if depth == 0 {
        return Ok(());
    }
    let mut inline = String::new();

    for child in node.children() {
        if is_inline(&child) {
            inline.push_str(&md_inline(&child, base, options, depth - 1));
        } else {
            flush_paragraph(&mut inline, out);
            md_block(&child, out, base, options, depth - 1, deadline)?;
        }
    }
    flush_paragraph(&mut inline, out);
    Ok(())
}

fn flush_paragraph(inline: &mut String, out: &mut String) {
    let text = normalize_whitespace(inline);
    if !text.is_empty() {
        out.push_str(&text);
        out.push_str("\n\n");
    }
    inline.clear();
}

fn is_inline(node: &NodeRef) -> bool {
    if node.is_text() {
        return true;
    }
    if !node.is_element() {
        // Comments and the like render as nothing; treat them as inline
        // so they do not split a paragraph.
        return true;
    }
    node.node_name().is_some_and(|tag| {
        matches!(
            &*tag,
            "a" | "abbr"
                | "b"
                | "br"
                | "cite"
                | "code"
                | "em"
                | "i"
                | "img"
                | "mark"
                | "q"
                | "s"
                | "small"
                | "span"
                | "strong"
                | "sub"
                | "sup"
                | "time"
                | "u"
        )
    })
}

fn md_block(
    node: &NodeRef,
    out: &mut String,
    base: Option<&Url>,
    options: &ExtractOptions,
    depth: usize,
    deadline: &Deadline,
) -> Result<()> {
    deadline.check()?;
    let tag = node.node_name().map(|t| t.to_string()).unwrap_or_default();

    match tag.as_str() {
        "script" | "style" | "noscript" | "template" => {}
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = tag[1..].parse::<usize>().unwrap_or(1);
            let text = normalize_whitespace(&inline_children(node, base, options, depth));
            if !text.is_empty() {
                out.push_str(&"#".repeat(level));
                out.push(' ');
                out.push_str(&text);
                out.push_str("\n\n");
            }
        }
        "p" | "figcaption" => {
            let text = normalize_whitespace(&inline_children(node, base, options, depth));
            if !text.is_empty() {
                out.push_str(&text);
                out.push_str("\n\n");
            }
        }
        "ul" | "ol" => {
            md_list(node, out, base, options, depth, deadline, tag == "ol")?;
            out.push('\n');
        }
        "blockquote" => {
            let mut inner = String::new();
            md_children(node, &mut inner, base, options, depth, deadline)?;
            for line in inner.trim().lines() {
                out.push_str("> ");
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }
        "pre" => {
            out.push_str("```\n");
            out.push_str(dom::text_content(&Selection::from(*node)).trim_end());
            out.push_str("\n```\n\n");
        }
        "table" => {
            out.push_str(&render_table(&Selection::from(*node), options.table_style));
            out.push('\n');
        }
        "hr" => out.push_str("---\n\n"),
        // Containers (div, section, figure, li, ...) and anything
        // unrecognized: render the children and keep going.
        _ => md_children(node, out, base, options, depth, deadline)?,
    }
    Ok(())
}

fn md_list(
    node: &NodeRef,
    out: &mut String,
    base: Option<&Url>,
    options: &ExtractOptions,
    depth: usize,
    deadline: &Deadline,
    ordered: bool,
) -> Result<()> {
    if depth == 0 {
        return Ok(());
    }
    let mut index = 1usize;
    for child in node.children() {
        if !child.is_element() || child.node_name().as_deref() != Some("li") {
            continue;
        }
        deadline.check()?;

        let mut inner = String::new();
        md_children(&child, &mut inner, base, options, depth - 1, deadline)?;
        let item = normalize_whitespace(&inner);
        if item.is_empty() {
            continue;
        }

        if ordered {
            out.push_str(&format!("{index}. {item}\n"));
            index += 1;
        } else {
            out.push_str(&format!("- {item}\n"));
        }
    }
    Ok(())
}

fn inline_children(
    node: &NodeRef,
    base: Option<&Url>,
    options: &ExtractOptions,
    depth: usize,
) -> String {
    if depth == 0 {
        return String::new();
    }
    let mut out = String::new();
    for child in node.children() {
        out.push_str(&md_inline(&child, base, options, depth - 1));
    }
    out
}

fn md_inline(node: &NodeRef, base: Option<&Url>, options: &ExtractOptions, depth: usize) -> String {
    if node.is_text() {
        let text = node.text();
        let collapsed = WHITESPACE_NORMALIZE.replace_all(&text, " ");
        return escape_markdown(&collapsed);
    }
    if !node.is_element() {
        return String::new();
    }

    let tag = node.node_name().map(|t| t.to_string()).unwrap_or_default();
    match tag.as_str() {
        "br" => "\n".to_string(),
        "strong" | "b" => wrap_emphasis(node, base, options, depth, "**"),
        "em" | "i" => wrap_emphasis(node, base, options, depth, "*"),
        "code" => {
            let text = dom::text_content(&Selection::from(*node));
            if text.trim().is_empty() {
                String::new()
            } else {
                format!("`{}`", text.trim())
            }
        }
        "img" => inline_image(&Selection::from(*node), base, options).unwrap_or_default(),
        "a" => {
            let sel = Selection::from(*node);
            let text = inline_children(node, base, options, depth);
            let href = dom::get_attribute(&sel, "href").unwrap_or_default();
            let href = href.trim();
            if options.preserve_links && !href.is_empty() {
                format!("[{}]({})", text.trim(), resolve_url(href, base))
            } else {
                text
            }
        }
        "script" | "style" | "noscript" | "template" => String::new(),
        _ => inline_children(node, base, options, depth),
    }
}

fn wrap_emphasis(
    node: &NodeRef,
    base: Option<&Url>,
    options: &ExtractOptions,
    depth: usize,
    marker: &str,
) -> String {
    let inner = inline_children(node, base, options, depth);
    let inner = inner.trim();
    if inner.is_empty() {
        String::new()
    } else {
        format!("{marker}{inner}{marker}")
    }
}

/// Escape Markdown special characters in a text run so literal
/// asterisks, underscores and brackets survive rendering.
#[must_use]
pub fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 4);
    for ch in text.chars() {
        if MARKDOWN_SPECIAL_CHARS.contains(&ch) {
            result.push('\\');
        }
        result.push(ch);
    }
    result
}

// === HTML ===

/// Rewrite the content subtree in place and return its inner HTML:
/// scripting removed, URLs resolved, images per the inline-image style,
/// tables per the table style.
fn render_html(
    content: &Selection,
    base: Option<&Url>,
    options: &ExtractOptions,
    sanitize: bool,
    deadline: &Deadline,
) -> Result<String> {
    dom::remove(&content.select(NON_CONTENT_SELECTOR));
    if sanitize {
        sanitize_tree(content, deadline)?;
    }

    for node in content.select("img").nodes() {
        deadline.check()?;
        let img = Selection::from(*node);
        match inline_image(&img, base, options) {
            // inline_image already resolved the URL and escaped it.
            Some(rendered) => match options.inline_images {
                InlineImageStyle::Html => dom::replace_with_html(&img, &rendered),
                InlineImageStyle::Placeholder | InlineImageStyle::Markdown => {
                    dom::replace_with_html(&img, &escape_html(&rendered));
                }
                InlineImageStyle::Omit => dom::remove(&img),
            },
            None => dom::remove(&img),
        }
    }

    for node in content.select("a[href]").nodes() {
        deadline.check()?;
        let anchor = Selection::from(*node);
        if let Some(href) = dom::get_attribute(&anchor, "href") {
            dom::set_attribute(&anchor, "href", &resolve_url(&href, base));
        }
    }
    if !options.preserve_links {
        dom::strip_tags(content, &["a"]);
    }

    if options.table_style == TableStyle::Markdown {
        for node in content.select("table").nodes() {
            deadline.check()?;
            let table = Selection::from(*node);
            let pipe = table_to_markdown(&table);
            dom::replace_with_html(&table, &format!("<pre>{}</pre>", escape_html(&pipe)));
        }
    }

    Ok(dom::inner_html(content).trim().to_string())
}

/// Strip scripting vectors: event-handler attributes, `javascript:`
/// URLs, and embedded-content elements.
fn sanitize_tree(content: &Selection, deadline: &Deadline) -> Result<()> {
    dom::remove(&content.select("iframe, object, embed"));

    for node in content.select("*").nodes() {
        deadline.check()?;
        let sel = Selection::from(*node);
        for (name, value) in dom::get_all_attributes(&sel) {
            if name.starts_with("on") {
                dom::remove_attribute(&sel, &name);
            } else if (name == "href" || name == "src")
                && value.trim_start().to_ascii_lowercase().starts_with("javascript:")
            {
                dom::remove_attribute(&sel, &name);
            }
        }
    }
    Ok(())
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(text: &str) -> String {
    escape_html(text).replace('"', "&quot;")
}
