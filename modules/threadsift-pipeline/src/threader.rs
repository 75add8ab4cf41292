//! ThreadReconstructor — heuristic grouping of same-author posts into threads.
//!
//! Reply/parent links are not reliably available from the collector, so this
//! is marker-based clustering, not conversation-graph reconstruction: same
//! author, within a time window, text carrying a continuation marker. The
//! heuristic can both under- and over-group same-author posts within the
//! window.

use std::collections::HashMap;

use chrono::Duration;
use regex::Regex;
use tracing::debug;

use threadsift_common::lexicon::{CONTINUATION_MARKERS, NUMBERING_PATTERN, PART_PATTERN};
use threadsift_common::{CanonicalPost, Thread, ThreadComplexity, ThreadContext};

/// A post's membership in a reconstructed thread, keyed by content hash.
#[derive(Debug, Clone)]
pub struct ThreadSlot {
    pub thread_id: String,
    /// 1-indexed; 1 is the thread start.
    pub position: u32,
    pub length: u32,
}

/// The outcome of thread reconstruction over one run's non-duplicate set.
/// Posts absent from `slots` are standalone. Threads plus standalone posts
/// partition the input exactly once.
#[derive(Debug, Default)]
pub struct ThreadSet {
    pub threads: Vec<Thread>,
    pub slots: HashMap<String, ThreadSlot>,
}

impl ThreadSet {
    pub fn slot(&self, content_hash: &str) -> Option<&ThreadSlot> {
        self.slots.get(content_hash)
    }
}

pub struct ThreadReconstructor {
    window: Duration,
    numbering_re: Regex,
    part_re: Regex,
}

impl ThreadReconstructor {
    pub fn new(window_hours: i64) -> Self {
        Self {
            window: Duration::hours(window_hours),
            numbering_re: Regex::new(NUMBERING_PATTERN).expect("valid numbering regex"),
            part_re: Regex::new(PART_PATTERN).expect("valid part regex"),
        }
    }

    /// True when the text carries any continuation marker: a literal from
    /// the marker table, "N/M" numbering, or "part N".
    pub fn is_continuation(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        CONTINUATION_MARKERS.iter().any(|m| lower.contains(m))
            || self.numbering_re.is_match(text)
            || self.part_re.is_match(text)
    }

    /// Group the non-duplicate set into threads.
    ///
    /// Each post is considered for membership exactly once: group members
    /// are marked processed before the scan moves on, so no post lands in
    /// two threads. Posts without a parseable timestamp or author identity
    /// are standalone, never an error.
    pub fn reconstruct(&self, posts: &[CanonicalPost]) -> ThreadSet {
        let mut processed = vec![false; posts.len()];
        let mut set = ThreadSet::default();

        for i in 0..posts.len() {
            if processed[i] {
                continue;
            }
            processed[i] = true;

            let seed_ts = match posts[i].published_at {
                Some(ts) => ts,
                None => continue, // thread-ineligible, stays standalone
            };
            let seed_author = posts[i].author_key();
            if seed_author.is_empty() {
                continue;
            }

            let mut group = vec![i];
            for j in 0..posts.len() {
                if processed[j] {
                    continue;
                }
                let candidate_ts = match posts[j].published_at {
                    Some(ts) => ts,
                    None => continue,
                };
                if posts[j].author_key() != seed_author {
                    continue;
                }
                if (candidate_ts - seed_ts).abs() > self.window {
                    continue;
                }
                if !self.is_continuation(&posts[j].text) {
                    continue;
                }
                processed[j] = true;
                group.push(j);
            }

            if group.len() < 2 {
                continue; // singleton groups collapse to standalone
            }

            // Ascending by timestamp; ties keep original input order.
            group.sort_by_key(|&idx| (posts[idx].published_at, idx));

            let first = &posts[group[0]];
            let last = &posts[*group.last().expect("non-empty group")];
            let thread_id = synthetic_thread_id(first);
            let span_minutes = match (first.published_at, last.published_at) {
                (Some(a), Some(b)) => (b - a).num_minutes(),
                _ => 0,
            };
            let length = group.len() as u32;

            for (pos, &idx) in group.iter().enumerate() {
                set.slots.insert(
                    posts[idx].content_hash.clone(),
                    ThreadSlot {
                        thread_id: thread_id.clone(),
                        position: pos as u32 + 1,
                        length,
                    },
                );
            }

            debug!(thread_id = %thread_id, length, author = %seed_author, "Thread reconstructed");
            set.threads.push(Thread {
                thread_id,
                author_handle: seed_author,
                post_hashes: group.iter().map(|&idx| posts[idx].content_hash.clone()).collect(),
                length,
                complexity: ThreadComplexity::from_length(length),
                context: ThreadContext::from_span_minutes(span_minutes),
                aggregate_engagement: 0.0,
            });
        }

        set
    }
}

/// Second pass once per-post engagement exists: arithmetic mean over members.
pub fn fill_aggregate_engagement(threads: &mut [Thread], engagement_by_hash: &HashMap<String, f64>) {
    for thread in threads {
        let sum: f64 = thread
            .post_hashes
            .iter()
            .filter_map(|h| engagement_by_hash.get(h))
            .sum();
        if thread.length > 0 {
            thread.aggregate_engagement = sum / thread.length as f64;
        }
    }
}

/// Thread ids are stable for the run and derived from the earliest member:
/// its source id when present, else a prefix of its content hash (source
/// ids are unreliable and sometimes empty).
fn synthetic_thread_id(first: &CanonicalPost) -> String {
    let base = if first.id.trim().is_empty() {
        &first.content_hash[..12.min(first.content_hash.len())]
    } else {
        first.id.trim()
    };
    format!("thread-{base}")
}
