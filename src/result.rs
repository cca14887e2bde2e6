//! Result types for extraction output.
//!
//! This module defines the structured output from content extraction:
//! the extracted text, media and link inventories, and the point-in-time
//! statistics snapshot exposed by the engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Kind of a media resource found in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// `<img>` or `<picture><source>` element.
    Image,
    /// `<video>` element or a `<source>` inside one.
    Video,
    /// `<audio>` element or a `<source>` inside one.
    Audio,
}

/// A single image, video or audio resource.
///
/// URLs are fully resolved against the document base when a base is
/// known; otherwise they are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaResource {
    /// Resource kind.
    pub kind: MediaKind,

    /// Resolved URL (from `src`, or `data-src` when lazy-loaded).
    pub url: String,

    /// Alt text for images, if present.
    pub alt: Option<String>,

    /// Poster image URL for videos, if present.
    pub poster: Option<String>,

    /// Declared media type (`type` attribute on `<source>`), if present.
    pub media_type: Option<String>,

    /// Declared width. Kept as an opaque string; values such as `"auto"`
    /// or `"100%"` occur in the wild.
    pub width: Option<String>,

    /// Declared height, same caveat as `width`.
    pub height: Option<String>,

    /// True when the alt text is empty or the element is explicitly
    /// presentational (`role="presentation"`, `aria-hidden="true"`).
    pub decorative: bool,
}

/// Classification of a link resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Regular anchor link.
    Content,
    /// `<link rel="stylesheet">`.
    Stylesheet,
    /// `<script src>`.
    Script,
    /// `<link rel="icon">` and variants.
    Icon,
    /// Image resource listed as a link.
    Image,
    /// Video resource listed as a link.
    Video,
    /// Audio resource listed as a link.
    Audio,
}

/// A single entry of the categorized link graph.
///
/// Duplicate URLs are preserved; callers may rely on occurrence counts
/// and document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkResource {
    /// Resolved URL. `mailto:`, `javascript:`, `data:` and `tel:` URLs
    /// are kept as-is.
    pub url: String,

    /// Anchor display text, whitespace-normalized. Empty for non-anchor
    /// resources.
    pub text: String,

    /// `title` attribute, if present.
    pub title: Option<String>,

    /// Resource classification.
    pub kind: LinkKind,

    /// True iff the resolved host differs from the base host. Exact
    /// case-insensitive comparison; `www.` prefixes are not stripped.
    pub external: bool,

    /// True iff the `rel` attribute tokens include `nofollow`.
    pub nofollow: bool,
}

/// Result of content extraction from an HTML document.
///
/// Immutable after creation. The engine shares results read-only between
/// the cache and callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Document title, if one was found.
    pub title: Option<String>,

    /// Meta description (`og:description`, then `meta[name=description]`).
    pub description: Option<String>,

    /// Site name from `og:site_name`, if declared.
    pub site_name: Option<String>,

    /// Extracted content in the requested serialization (plain text,
    /// Markdown or HTML).
    pub text: String,

    /// Number of words in the extracted text content. Always zero exactly
    /// when the text content is empty.
    pub word_count: usize,

    /// Estimated reading time for the extracted text.
    pub reading_time: Duration,

    /// Media inventory in document order per kind.
    pub media: Vec<MediaResource>,

    /// Categorized link graph in document order per kind.
    pub links: Vec<LinkResource>,

    /// Wall-clock duration of the pipeline run that produced this result.
    /// Cache hits return the original run's duration.
    pub duration: Duration,

    /// Content fingerprint used as the cache key. Deterministic over
    /// input bytes and extraction options.
    pub fingerprint: String,
}

impl ExtractionResult {
    /// Serialize the full result to a JSON string.
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string(self).map_err(|e| crate::Error::InternalFailure(e.to_string()))
    }

    /// Serialize the full result to pretty-printed JSON bytes.
    pub fn to_json_bytes(&self) -> crate::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| crate::Error::InternalFailure(e.to_string()))
    }
}

/// Point-in-time view of engine statistics.
///
/// Counters are exact; the snapshot itself is not atomic across fields
/// under concurrent load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Successfully produced results, cache hits included.
    pub total_processed: u64,

    /// Lookups answered from the cache.
    pub cache_hits: u64,

    /// Lookups that went to the pipeline.
    pub cache_misses: u64,

    /// Failed extraction attempts, timeouts included.
    pub errors: u64,

    /// Cumulative pipeline time across actual runs.
    pub total_processing_time: Duration,

    /// Mean pipeline time per actual run. Zero when nothing ran yet.
    pub avg_processing_time: Duration,
}
