//! Engine-level configuration.
//!
//! `EngineConfig` bounds the resources one engine instance may consume:
//! input size, pipeline time, cache retention and worker parallelism.
//! Per-call behavior lives in `ExtractOptions` instead.

use std::time::Duration;

/// Configuration for an [`Engine`](crate::Engine) instance.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum accepted input size in bytes. Larger inputs are rejected
    /// before any parsing work.
    ///
    /// Default: `10_485_760` (10 MiB)
    pub max_input_size: usize,

    /// Per-call budget covering both the wait for a worker slot and the
    /// pipeline run itself.
    ///
    /// Default: 30 seconds
    pub timeout: Duration,

    /// Maximum number of cached results. Zero disables the cache; every
    /// call is then a miss and storage is bypassed.
    ///
    /// Default: `128`
    pub max_cache_entries: usize,

    /// Age at which a cached result stops being served. An entry
    /// inserted at time T is a miss for any lookup at T + TTL or later.
    ///
    /// Default: 5 minutes
    pub cache_ttl: Duration,

    /// Number of extraction pipelines allowed to run concurrently.
    /// Values below 1 are treated as 1.
    ///
    /// Default: `4`
    pub worker_count: usize,

    /// Strip scripting vectors (`on*` attributes, `javascript:` hrefs,
    /// embeds) from HTML-format output. Text and Markdown output never
    /// carry script content regardless of this flag.
    ///
    /// Default: `true`
    pub sanitize_html: bool,

    /// Maximum element nesting depth the detector will walk. Deeper
    /// subtrees score zero rather than being traversed.
    ///
    /// Default: `100`
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_input_size: 10 * 1024 * 1024,
            timeout: Duration::from_secs(30),
            max_cache_entries: 128,
            cache_ttl: Duration::from_secs(300),
            worker_count: 4,
            sanitize_html: true,
            max_depth: 100,
        }
    }
}
