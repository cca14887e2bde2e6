//! The extraction pipeline.
//!
//! One pipeline run is synchronous and owns its document: decode bytes,
//! parse, collect resources, detect the article, serialize. The engine
//! dispatches runs onto blocking workers; everything here is plain
//! single-threaded code with cooperative deadline checks inside the
//! traversal loops.

use std::time::{Duration, Instant};

use dom_query::Document;

use crate::options::{ExtractOptions, OutputFormat};
use crate::result::ExtractionResult;
use crate::text::{count_words, reading_time};
use crate::{detect, encoding, metadata, resolve, serialize};
use crate::{Error, Result};

/// Cooperative deadline for a pipeline run.
///
/// Traversal loops call [`Deadline::check`] at bounded intervals (once
/// per candidate or resource element), so a run that overshoots its
/// budget fails with [`Error::ProcessingTimeout`] shortly after the
/// deadline instead of running unbounded.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    expires: Option<Instant>,
}

impl Deadline {
    /// Deadline expiring `budget` after `started`. The engine passes its
    /// call-entry instant so slot-wait time counts against the budget.
    #[must_use]
    pub fn new(started: Instant, budget: Duration) -> Self {
        Self {
            started,
            expires: Some(started + budget),
        }
    }

    /// Deadline expiring `budget` from now.
    #[must_use]
    pub fn after(budget: Duration) -> Self {
        Self::new(Instant::now(), budget)
    }

    /// No deadline; `check` always passes.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            started: Instant::now(),
            expires: None,
        }
    }

    /// Fail with the elapsed time once the deadline has passed.
    pub fn check(&self) -> Result<()> {
        match self.expires {
            Some(expires) if Instant::now() >= expires => Err(Error::ProcessingTimeout {
                elapsed: self.started.elapsed(),
            }),
            _ => Ok(()),
        }
    }
}

/// Everything one pipeline run needs, owned so the run can move onto a
/// blocking worker.
#[derive(Debug, Clone)]
pub(crate) struct Job {
    /// Raw HTML bytes, already size-checked by the engine.
    pub html: Vec<u8>,
    pub options: ExtractOptions,
    /// Precomputed cache key, carried into the result.
    pub fingerprint: String,
    pub sanitize_html: bool,
    pub max_depth: usize,
}

/// Run the pipeline once: decode, parse, collect, detect, serialize.
///
/// Malformed HTML is not an error; the parser recovers and extraction
/// degrades gracefully. Only empty input fails, with
/// [`Error::InvalidInput`].
pub(crate) fn run(job: &Job, deadline: &Deadline) -> Result<ExtractionResult> {
    let started = Instant::now();

    let html = encoding::decode_html(&job.html);
    if html.trim().is_empty() {
        return Err(Error::InvalidInput("empty document".to_string()));
    }

    let doc = Document::from(html);
    deadline.check()?;

    let title = metadata::extract_title(&doc);
    let description = metadata::extract_description(&doc);
    let site_name = metadata::site_name(&doc);
    let canonical = metadata::canonical_url(&doc);
    let base = resolve::effective_base(&doc, &job.options, canonical.as_deref());

    // Resources are inventoried on the full tree, before any pruning, so
    // head stylesheets/scripts/icons are seen even though they never
    // appear in content output.
    let resources = resolve::collect(&doc, base.as_ref(), &job.options, deadline)?;

    let content = detect::select_content(&doc, &job.options, job.max_depth, deadline)?;
    if job.options.detect_article {
        detect::prune_boilerplate(&content, &job.options, deadline)?;
    }

    // Plain text is rendered first (it is a read-only walk) because it
    // doubles as the word-count source; the HTML serializer mutates the
    // tree. Content whose plain rendering is empty serializes empty in
    // every format, so markup-only fragments (a lone <hr>, say) never
    // yield nonempty output with a zero word count.
    let plain =
        serialize::plain_text(&content, base.as_ref(), &job.options, job.max_depth, deadline)?;
    let text = if plain.is_empty() {
        String::new()
    } else {
        match job.options.format {
            OutputFormat::Text | OutputFormat::Json => plain.clone(),
            OutputFormat::Markdown | OutputFormat::Html => serialize::serialize(
                &content,
                base.as_ref(),
                &job.options,
                job.sanitize_html,
                job.max_depth,
                deadline,
            )?,
        }
    };

    let word_count = count_words(&plain, job.options.min_word_length);
    tracing::debug!(word_count, links = resources.links.len(), "pipeline run complete");

    Ok(ExtractionResult {
        title,
        description,
        site_name,
        text,
        word_count,
        reading_time: reading_time(word_count),
        media: resources.media,
        links: resources.links,
        duration: started.elapsed(),
        fingerprint: job.fingerprint.clone(),
    })
}
