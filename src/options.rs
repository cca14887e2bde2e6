//! Per-call extraction options.
//!
//! `ExtractOptions` controls a single extraction: article detection,
//! which resources to inventory, how links are filtered, and the output
//! serialization. Options are serializable because they feed the content
//! fingerprint; two different option sets over identical HTML never share
//! a cache entry.

use serde::{Deserialize, Serialize};

use crate::detect;

/// Output serialization for the extracted content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Plain text, paragraphs separated by blank lines.
    Text,
    /// GitHub-flavored Markdown.
    Markdown,
    /// Full `ExtractionResult` fields; the text content is the plain-text
    /// rendering and `ExtractionResult::to_json` carries the structure.
    Json,
    /// Cleaned HTML fragment.
    Html,
}

/// How images are rendered inline in the serialized content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InlineImageStyle {
    /// Images do not appear in the content output.
    Omit,
    /// A `[image: alt]` placeholder token.
    Placeholder,
    /// Markdown image syntax `![alt](url)`.
    Markdown,
    /// A raw `<img>` tag with the resolved URL.
    Html,
}

/// How tables are rendered in the serialized content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStyle {
    /// Markdown pipe tables.
    Markdown,
    /// The original `<table>` markup, preserved.
    Html,
}

/// Per-kind inclusion filter for the link graph.
///
/// Controls which resource kinds appear in `ExtractionResult::links`.
/// `content` and `external` split anchors into same-host and cross-host
/// links; the remaining flags admit non-anchor resources as link entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct LinkFilter {
    /// Include `<img>` sources.
    pub images: bool,
    /// Include video sources.
    pub videos: bool,
    /// Include audio sources.
    pub audios: bool,
    /// Include stylesheet links.
    pub stylesheets: bool,
    /// Include script sources.
    pub scripts: bool,
    /// Include icon links.
    pub icons: bool,
    /// Include same-host anchor links.
    pub content: bool,
    /// Include cross-host anchor links.
    pub external: bool,
}

impl LinkFilter {
    /// Every kind included.
    #[must_use]
    pub fn all() -> Self {
        Self {
            images: true,
            videos: true,
            audios: true,
            stylesheets: true,
            scripts: true,
            icons: true,
            content: true,
            external: true,
        }
    }

    /// No kind included; the link list stays empty.
    #[must_use]
    pub fn none() -> Self {
        Self {
            images: false,
            videos: false,
            audios: false,
            stylesheets: false,
            scripts: false,
            icons: false,
            content: false,
            external: false,
        }
    }
}

impl Default for LinkFilter {
    /// Anchors only: same-host and cross-host content links.
    fn default() -> Self {
        Self {
            content: true,
            external: true,
            ..Self::none()
        }
    }
}

/// Options for a single extraction call.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use pagesift::{ExtractOptions, OutputFormat};
///
/// // Use defaults
/// let options = ExtractOptions::default();
///
/// // Customize specific fields
/// let options = ExtractOptions {
///     format: OutputFormat::Markdown,
///     detect_article: false,
///     ..ExtractOptions::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ExtractOptions {
    /// Run article detection and serialize only the winning subtree.
    /// When false, the whole body is serialized as-is.
    ///
    /// Default: `true`
    pub detect_article: bool,

    /// Inventory `<img>` elements into `ExtractionResult::media`.
    ///
    /// Default: `true`
    pub preserve_images: bool,

    /// Keep anchor targets in Markdown output as `[text](url)`. When
    /// false, anchors serialize as their display text only.
    ///
    /// Default: `true`
    pub preserve_links: bool,

    /// Inventory video elements into `ExtractionResult::media`.
    ///
    /// Default: `false`
    pub preserve_videos: bool,

    /// Inventory audio elements into `ExtractionResult::media`.
    ///
    /// Default: `false`
    pub preserve_audios: bool,

    /// Inline rendering policy for images inside the content output.
    ///
    /// Default: `InlineImageStyle::Omit`
    pub inline_images: InlineImageStyle,

    /// Table rendering policy. Independent of `inline_images`; any
    /// combination is valid.
    ///
    /// Default: `TableStyle::Markdown`
    pub table_style: TableStyle,

    /// Output serialization.
    ///
    /// Default: `OutputFormat::Text`
    pub format: OutputFormat,

    /// Base URL override for resolving relative references. Takes
    /// precedence over a declared `<base href>` element, which takes
    /// precedence over the document's canonical URL. Without any of the
    /// three, URLs are kept verbatim.
    ///
    /// Default: `None`
    pub base_url: Option<String>,

    /// Which resource kinds appear in the link graph.
    ///
    /// Default: anchors only (`LinkFilter::default()`)
    pub link_filter: LinkFilter,

    /// Score floor a candidate must reach before it beats the body
    /// fallback. See the scoring constants in the detector for the
    /// rationale behind the default.
    ///
    /// Default: `25`
    pub min_candidate_score: i64,

    /// Link-density ceiling above which anchor text starts counting
    /// against a candidate.
    ///
    /// Default: `0.5`
    pub max_link_density: f64,

    /// Minimum token length counted as a word. The default of 1 keeps
    /// word count zero exactly when the text is empty.
    ///
    /// Default: `1`
    pub min_word_length: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            detect_article: true,
            preserve_images: true,
            preserve_links: true,
            preserve_videos: false,
            preserve_audios: false,
            inline_images: InlineImageStyle::Omit,
            table_style: TableStyle::Markdown,
            format: OutputFormat::Text,
            base_url: None,
            link_filter: LinkFilter::default(),
            min_candidate_score: detect::MIN_CANDIDATE_SCORE,
            max_link_density: detect::MAX_LINK_DENSITY,
            min_word_length: 1,
        }
    }
}

impl ExtractOptions {
    /// Feed-ingestion profile: no article detection, plain text, no media
    /// inventory. The fastest path through the pipeline.
    #[must_use]
    pub fn feed() -> Self {
        Self {
            detect_article: false,
            preserve_images: false,
            preserve_links: false,
            inline_images: InlineImageStyle::Omit,
            format: OutputFormat::Text,
            link_filter: LinkFilter::none(),
            ..Self::default()
        }
    }

    /// Summarization profile: article detection on, plain prose out,
    /// links flattened to their display text.
    #[must_use]
    pub fn text_only() -> Self {
        Self {
            preserve_images: false,
            preserve_links: false,
            inline_images: InlineImageStyle::Omit,
            format: OutputFormat::Text,
            link_filter: LinkFilter::none(),
            ..Self::default()
        }
    }

    /// Search-indexing profile: everything inventoried, full link graph,
    /// JSON-ready result.
    #[must_use]
    pub fn full_metadata() -> Self {
        Self {
            preserve_images: true,
            preserve_links: true,
            preserve_videos: true,
            preserve_audios: true,
            inline_images: InlineImageStyle::Placeholder,
            format: OutputFormat::Json,
            link_filter: LinkFilter::all(),
            ..Self::default()
        }
    }
}
