//! DOM helpers over `dom_query`.
//!
//! Free functions wrapping `Selection` so call sites across the pipeline
//! read uniformly. Text getters return `StrTendril`; it is
//! reference-counted and derefs to `str`, so cloning is O(1) and most
//! operations need no conversion.

use dom_query::{Document, Selection};
use tendril::StrTendril;

// === Attribute Operations ===

/// Get an attribute value from the first element in the selection.
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|v| v.to_string())
}

/// Check whether the first element in the selection has an attribute.
#[inline]
#[must_use]
pub fn has_attribute(sel: &Selection, name: &str) -> bool {
    sel.has_attr(name)
}

/// Set an attribute on all elements in the selection.
#[inline]
pub fn set_attribute(sel: &Selection, name: &str, value: &str) {
    sel.set_attr(name, value);
}

/// Remove an attribute from all elements in the selection.
#[inline]
pub fn remove_attribute(sel: &Selection, name: &str) {
    sel.remove_attr(name);
}

/// List all attributes of the first element as (name, value) pairs.
#[must_use]
pub fn get_all_attributes(sel: &Selection) -> Vec<(String, String)> {
    sel.nodes()
        .first()
        .map(|node| {
            node.attrs()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

// === Tag/Node Information ===

/// Get the tag name (lowercase) of the first element in the selection.
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_string())
}

// === Text Content ===

/// Get all text content of the selection and its descendants.
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Get inner HTML of the first element in the selection.
#[inline]
#[must_use]
pub fn inner_html(sel: &Selection) -> StrTendril {
    sel.inner_html()
}

/// Get outer HTML of the first element in the selection.
#[inline]
#[must_use]
pub fn outer_html(sel: &Selection) -> StrTendril {
    sel.html()
}

// === Tree Navigation ===

/// Get direct element children.
#[inline]
#[must_use]
pub fn children<'a>(sel: &Selection<'a>) -> Selection<'a> {
    sel.children()
}

// === Tree Mutation ===

/// Remove all elements in the selection from the tree.
#[inline]
pub fn remove(sel: &Selection) {
    sel.remove();
}

/// Unwrap matching elements, keeping their children in place.
#[inline]
pub fn strip_tags(sel: &Selection, tags: &[&str]) {
    sel.strip_elements(tags);
}

/// Append parsed HTML as the last children of each element in the
/// selection.
#[inline]
pub fn append_html(sel: &Selection, html: &str) {
    sel.append_html(html);
}

/// Replace each element in the selection with parsed HTML.
#[inline]
pub fn replace_with_html(sel: &Selection, html: &str) {
    sel.replace_with_html(html);
}

// === Parsing ===

/// Parse an HTML fragment into a standalone document. The fragment
/// becomes the body content of the new tree.
#[must_use]
pub fn parse_fragment(inner: &str) -> Document {
    Document::from(format!("<html><head></head><body>{inner}</body></html>"))
}
