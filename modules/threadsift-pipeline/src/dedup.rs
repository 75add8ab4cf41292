//! Deduplicator — content fingerprints and the new/duplicate decision.
//!
//! The platform resurfaces the same post under different synthetic ids
//! across scrapes, so identity is a hash over normalized content, not the
//! source id. The index is injected (see [`crate::index`]) so the decision
//! logic stays pure and testable.

use sha2::{Digest, Sha256};
use tracing::debug;

use threadsift_common::CanonicalPost;

use crate::index::DedupIndex;

/// Hex SHA-256 over the normalized (text, author identity, url) triple.
///
/// Deterministic across runs: two posts with identical text+author+url
/// fingerprint the same even with different ids or timestamps. Author
/// identity prefers the handle, falling back to the display name.
pub fn fingerprint(text: &str, author: &str, author_handle: &str, url: &str) -> String {
    let author_key = if author_handle.trim().is_empty() {
        author
    } else {
        author_handle
    };
    let mut hasher = Sha256::new();
    hasher.update(text.trim().to_lowercase().as_bytes());
    hasher.update(b"\n");
    hasher.update(author_key.trim().to_lowercase().as_bytes());
    hasher.update(b"\n");
    hasher.update(url.trim().as_bytes());
    hex::encode(hasher.finalize())
}

/// Filter a batch down to posts not yet seen, inserting each survivor into
/// the index. Returns the survivors and the number of duplicates skipped.
/// Within-batch repeats count as duplicates too: the first occurrence wins.
pub fn filter_new(
    posts: Vec<CanonicalPost>,
    index: &mut dyn DedupIndex,
) -> (Vec<CanonicalPost>, u32) {
    let mut fresh = Vec::with_capacity(posts.len());
    let mut skipped = 0u32;
    for post in posts {
        if index.contains(&post.content_hash) {
            debug!(post_id = %post.id, hash = %post.content_hash, "Duplicate post skipped");
            skipped += 1;
            continue;
        }
        index.insert(&post.content_hash, &post.id);
        fresh.push(post);
    }
    (fresh, skipped)
}
