//! # pagesift
//!
//! A content-extraction engine that turns raw HTML into structured,
//! noise-free output: clean article text, media inventories, a
//! categorized link graph with resolved absolute URLs, and multiple
//! serialization formats (plain text, Markdown, JSON, HTML).
//!
//! The pipeline detects the main article heuristically (navigation,
//! ads, sidebars and footers are scored away), resolves relative URLs
//! against the document base, and serializes the winning subtree. The
//! [`Engine`] wraps the pipeline with a fingerprint-keyed result cache,
//! a bounded worker pool, per-call timeouts and statistics, so one
//! instance can serve many concurrent callers and whole batches.
//!
//! ## Quick Start
//!
//! One-shot extraction, no engine:
//!
//! ```rust
//! use pagesift::extract;
//!
//! let html = r#"<html><head><title>My Article</title></head>
//! <body><article><p>Main content here.</p></article></body></html>"#;
//!
//! let result = extract(html)?;
//! println!("Title: {:?}", result.title);
//! println!("Content: {}", result.text);
//! # Ok::<(), pagesift::Error>(())
//! ```
//!
//! Shared engine with caching, batching and concurrency bounds:
//!
//! ```rust,no_run
//! use pagesift::{Engine, EngineConfig, ExtractOptions};
//!
//! # async fn run() -> pagesift::Result<()> {
//! let engine = Engine::new(EngineConfig::default());
//! let html = b"<html><body><article><p>Content.</p></article></body></html>".to_vec();
//! let result = engine.extract(html, &ExtractOptions::default()).await?;
//! assert!(result.word_count > 0);
//! # Ok(())
//! # }
//! ```

mod cache;
mod config;
mod engine;
mod error;
mod options;
mod patterns;
mod result;
mod stats;

/// DOM helpers over `dom_query`.
pub mod dom;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Article detection: candidate scoring and boilerplate pruning.
pub mod detect;

/// Content fingerprints used as cache keys.
pub mod fingerprint;

/// Document metadata: title, description, site name and canonical URL.
pub mod metadata;

/// The extraction pipeline and its cooperative deadline.
pub mod pipeline;

/// Link and media resolution.
pub mod resolve;

/// Content serialization (text, Markdown, JSON, HTML).
pub mod serialize;

/// Text utilities: whitespace normalization, word counts, reading time.
pub mod text;

// Public API - re-exports
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{Error, Result};
pub use options::{ExtractOptions, InlineImageStyle, LinkFilter, OutputFormat, TableStyle};
pub use result::{
    ExtractionResult, LinkKind, LinkResource, MediaKind, MediaResource, StatsSnapshot,
};

/// Extract content from an HTML string using default options.
///
/// Runs the pipeline synchronously with no size limit, timeout, or
/// caching; use an [`Engine`] for those.
///
/// # Example
///
/// ```rust
/// use pagesift::extract;
///
/// let html = "<html><body><article><p>Some article content.</p></article></body></html>";
/// let result = extract(html)?;
/// assert!(result.text.contains("article content"));
/// # Ok::<(), pagesift::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn extract(html: &str) -> Result<ExtractionResult> {
    extract_bytes_with_options(html.as_bytes(), &ExtractOptions::default())
}

/// Extract content from an HTML string with custom options.
///
/// # Example
///
/// ```rust
/// use pagesift::{extract_with_options, ExtractOptions, OutputFormat};
///
/// let html = "<html><body><article><h2>Part One</h2><p>Text.</p></article></body></html>";
/// let options = ExtractOptions {
///     format: OutputFormat::Markdown,
///     ..ExtractOptions::default()
/// };
/// let result = extract_with_options(html, &options)?;
/// # Ok::<(), pagesift::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn extract_with_options(html: &str, options: &ExtractOptions) -> Result<ExtractionResult> {
    extract_bytes_with_options(html.as_bytes(), options)
}

/// Extract content from HTML bytes with automatic encoding detection.
///
/// The character encoding is detected from meta tags
/// (`<meta charset="...">` or the `http-equiv` form) and converted to
/// UTF-8 before extraction, defaulting to UTF-8. Invalid sequences
/// become the Unicode replacement character rather than errors.
///
/// # Example
///
/// ```rust
/// use pagesift::extract_bytes;
///
/// let html = b"<html><head><meta charset=\"ISO-8859-1\"></head>\
/// <body><article><p>Caf\xE9 content, long enough to keep.</p></article></body></html>";
/// let result = extract_bytes(html)?;
/// assert!(result.text.contains("Caf\u{e9}"));
/// # Ok::<(), pagesift::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn extract_bytes(html: &[u8]) -> Result<ExtractionResult> {
    extract_bytes_with_options(html, &ExtractOptions::default())
}

/// Extract content from HTML bytes with custom options and automatic
/// encoding detection.
#[allow(clippy::missing_errors_doc)]
pub fn extract_bytes_with_options(
    html: &[u8],
    options: &ExtractOptions,
) -> Result<ExtractionResult> {
    let defaults = EngineConfig::default();
    let job = pipeline::Job {
        html: html.to_vec(),
        fingerprint: fingerprint::compute(html, options),
        options: options.clone(),
        sanitize_html: defaults.sanitize_html,
        max_depth: defaults.max_depth,
    };
    pipeline::run(&job, &pipeline::Deadline::unbounded())
}
