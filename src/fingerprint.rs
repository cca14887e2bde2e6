//! Content fingerprints.
//!
//! The cache key is a SHA-256 digest over the serialized extraction
//! options and the raw input bytes, hex-encoded. Two different option
//! sets over identical HTML never collide; identical (bytes, options)
//! pairs always reproduce the same key, across engines and processes.

use sha2::{Digest, Sha256};

use crate::options::ExtractOptions;

/// Compute the fingerprint for an (input, options) pair.
#[must_use]
pub fn compute(html: &[u8], options: &ExtractOptions) -> String {
    let mut hasher = Sha256::new();

    // serde_json emits struct fields in declaration order, so the
    // options serialization is deterministic.
    if let Ok(serialized) = serde_json::to_vec(options) {
        hasher.update(&serialized);
    }
    hasher.update([0u8]);
    hasher.update(html);

    hex::encode(hasher.finalize())
}
