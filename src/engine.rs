//! The concurrency/batch manager.
//!
//! An [`Engine`] is a cheap-to-clone handle over shared state: clones
//! see the same cache, statistics and worker pool, so any number of
//! callers may extract through the same engine concurrently without
//! locking on their side. A semaphore bounds the number of pipelines
//! running at once; the cache and statistics are the only shared
//! mutable state and carry their own synchronization.
//!
//! Each attempt follows the same path: size check before any parsing,
//! cache lookup, worker-slot acquisition under the per-call timeout,
//! pipeline run on a blocking worker with a cooperative deadline, then
//! cache store and statistics update. The pipeline holds its permit
//! inside the worker closure, so an overshooting run reports
//! `ProcessingTimeout` itself and releases the slot when it returns;
//! no reaper thread is needed.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::cache::ResultCache;
use crate::config::EngineConfig;
use crate::options::ExtractOptions;
use crate::pipeline::{self, Deadline, Job};
use crate::result::{ExtractionResult, StatsSnapshot};
use crate::stats::Stats;
use crate::{fingerprint, Error, Result};

/// Shared extraction engine. Cloning yields another handle to the same
/// cache, statistics and worker pool.
///
/// # Example
///
/// ```rust,no_run
/// use pagesift::{Engine, EngineConfig, ExtractOptions};
///
/// # async fn run() -> pagesift::Result<()> {
/// let engine = Engine::new(EngineConfig::default());
/// let html = b"<html><body><article><p>Content.</p></article></body></html>".to_vec();
/// let result = engine.extract(html, &ExtractOptions::default()).await?;
/// println!("{} words", result.word_count);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Engine {
    inner: Arc<Inner>,
}

struct Inner {
    config: EngineConfig,
    cache: ResultCache,
    stats: Stats,
    workers: Arc<Semaphore>,
    closed: AtomicBool,
}

impl Engine {
    /// Build an engine from a configuration. Worker counts below 1 are
    /// treated as 1.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let workers = config.worker_count.max(1);
        let cache = ResultCache::new(config.max_cache_entries, config.cache_ttl);
        tracing::debug!(
            workers,
            cache_entries = config.max_cache_entries,
            "engine created"
        );
        Self {
            inner: Arc::new(Inner {
                config,
                cache,
                stats: Stats::default(),
                workers: Arc::new(Semaphore::new(workers)),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Extract one document.
    ///
    /// Awaiting the returned future yields the completed result; the
    /// pipeline itself runs as synchronous code on a blocking worker.
    /// Oversized input is rejected before any parsing work, and the
    /// per-call timeout covers both the wait for a worker slot and the
    /// pipeline run.
    pub async fn extract(
        &self,
        html: impl Into<Vec<u8>>,
        options: &ExtractOptions,
    ) -> Result<Arc<ExtractionResult>> {
        let inner = &self.inner;
        if inner.closed.load(Ordering::SeqCst) {
            return Err(Error::ProcessorClosed);
        }

        let html = html.into();
        let started = Instant::now();

        if html.len() > inner.config.max_input_size {
            inner.stats.record_error();
            return Err(Error::InputTooLarge {
                size: html.len(),
                limit: inner.config.max_input_size,
            });
        }

        let fp = fingerprint::compute(&html, options);
        if let Some(cached) = inner.cache.get(&fp) {
            inner.stats.record_hit();
            tracing::debug!(fingerprint = %fp, "cache hit");
            return Ok(cached);
        }
        inner.stats.record_miss();

        let permit = match tokio::time::timeout(
            inner.config.timeout,
            Arc::clone(&inner.workers).acquire_owned(),
        )
        .await
        {
            Ok(Ok(permit)) => permit,
            // Semaphore closed by close(); waiters fail fast.
            Ok(Err(_)) => return Err(Error::ProcessorClosed),
            Err(_) => {
                inner.stats.record_error();
                return Err(Error::ProcessingTimeout {
                    elapsed: started.elapsed(),
                });
            }
        };

        let job = Job {
            html,
            options: options.clone(),
            fingerprint: fp.clone(),
            sanitize_html: inner.config.sanitize_html,
            max_depth: inner.config.max_depth,
        };
        // Slot-wait time already spent counts against the budget.
        let deadline = Deadline::new(started, inner.config.timeout);

        let outcome = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            pipeline::run(&job, &deadline)
        })
        .await;

        match outcome {
            Ok(Ok(result)) => {
                inner.stats.record_success(result.duration);
                let result = Arc::new(result);
                inner.cache.put(fp, Arc::clone(&result));
                Ok(result)
            }
            Ok(Err(err)) => {
                inner.stats.record_error();
                tracing::debug!(error = %err, "extraction failed");
                Err(err)
            }
            Err(join_err) => {
                inner.stats.record_error();
                Err(Error::InternalFailure(join_err.to_string()))
            }
        }
    }

    /// Extract a file, with the size ceiling checked against the file
    /// metadata before the content is read.
    pub async fn extract_file(
        &self,
        path: impl AsRef<Path>,
        options: &ExtractOptions,
    ) -> Result<Arc<ExtractionResult>> {
        let path = path.as_ref();
        let meta = tokio::fs::metadata(path)
            .await
            .map_err(|e| Error::InvalidInput(format!("{}: {e}", path.display())))?;

        let size = usize::try_from(meta.len()).unwrap_or(usize::MAX);
        if size > self.inner.config.max_input_size {
            self.inner.stats.record_error();
            return Err(Error::InputTooLarge {
                size,
                limit: self.inner.config.max_input_size,
            });
        }

        let html = tokio::fs::read(path)
            .await
            .map_err(|e| Error::InvalidInput(format!("{}: {e}", path.display())))?;
        self.extract(html, options).await
    }

    /// Extract a batch of documents in parallel.
    ///
    /// Results come back in input order regardless of completion order;
    /// a failing item yields an error in its slot while sibling items
    /// still complete. Parallelism stays bounded by the worker pool.
    pub async fn extract_batch(
        &self,
        inputs: Vec<Vec<u8>>,
        options: &ExtractOptions,
    ) -> Vec<Result<Arc<ExtractionResult>>> {
        let count = inputs.len();
        let mut results: Vec<Result<Arc<ExtractionResult>>> = (0..count)
            .map(|_| Err(Error::InternalFailure("batch item never completed".to_string())))
            .collect();

        let mut join_set = JoinSet::new();
        for (index, html) in inputs.into_iter().enumerate() {
            let engine = self.clone();
            let options = options.clone();
            join_set.spawn(async move { (index, engine.extract(html, &options).await) });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = result,
                // A panicked task leaves its slot's placeholder error in
                // place; siblings are unaffected.
                Err(join_err) => tracing::error!(error = %join_err, "batch task panicked"),
            }
        }

        results
    }

    /// Close the engine. Subsequent extraction attempts fail with
    /// [`Error::ProcessorClosed`]; callers already waiting for a worker
    /// slot fail fast the same way. Idempotent, and visible through
    /// every clone.
    pub fn close(&self) {
        if !self.inner.closed.swap(true, Ordering::SeqCst) {
            self.inner.workers.close();
            tracing::debug!("engine closed");
        }
    }

    /// Whether [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Point-in-time statistics snapshot.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.stats.snapshot()
    }

    /// Zero all statistics counters.
    pub fn reset_stats(&self) {
        self.inner.stats.reset();
    }

    /// Drop every cached result. Separate from [`close`](Self::close);
    /// closing does not clear the cache.
    pub fn clear_cache(&self) {
        self.inner.cache.clear();
    }

    /// The configuration this engine was built with.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.inner.config)
            .field("closed", &self.inner.closed.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
