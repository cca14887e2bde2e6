//! Error types for pagesift.
//!
//! This module defines the error types returned by extraction operations.
//! Each variant is programmatically distinguishable; callers match on the
//! enum rather than parsing display strings.

use std::time::Duration;

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input exceeds the configured maximum size. Raised before any
    /// parsing work is done.
    #[error("input of {size} bytes exceeds the configured limit of {limit} bytes")]
    InputTooLarge {
        /// Size of the rejected input in bytes.
        size: usize,
        /// Configured maximum input size in bytes.
        limit: usize,
    },

    /// Input is empty or otherwise unusable. Malformed HTML does not
    /// produce this error; the parser recovers and extraction degrades
    /// gracefully instead.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The pipeline exceeded the configured processing timeout.
    #[error("processing timed out after {elapsed:?}")]
    ProcessingTimeout {
        /// Time spent before the deadline was hit.
        elapsed: Duration,
    },

    /// The engine was closed before or during this call.
    #[error("engine is closed")]
    ProcessorClosed,

    /// Unexpected pipeline fault.
    #[error("internal failure: {0}")]
    InternalFailure(String),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
