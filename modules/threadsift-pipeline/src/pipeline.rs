//! Pipeline orchestration: normalize → dedup → thread → score → aggregate.
//!
//! Bundles the shared dependencies (config + injected dedup index) and runs
//! the stages in order over one batch. Per-post failures are recovered and
//! logged; input and index failures are fatal before any output exists.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use threadsift_common::{
    PipelineConfig, PostError, ProcessingSummary, ScoredPost, Thread, ThreadsiftError,
};

use crate::aggregator;
use crate::dedup;
use crate::index::DedupIndex;
use crate::normalizer::Normalizer;
use crate::scorer;
use crate::stats::RunStats;
use crate::threader::{fill_aggregate_engagement, ThreadReconstructor};

/// Everything one run produces. Records are created once and never mutated;
/// the summary enumerates any per-post errors encountered.
#[derive(Debug)]
pub struct RunOutput {
    pub posts: Vec<ScoredPost>,
    pub threads: Vec<Thread>,
    pub summary: ProcessingSummary,
    pub stats: RunStats,
}

pub struct Pipeline<'a> {
    config: PipelineConfig,
    index: &'a mut dyn DedupIndex,
    normalizer: Normalizer,
    threader: ThreadReconstructor,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: PipelineConfig, index: &'a mut dyn DedupIndex) -> Self {
        let threader = ThreadReconstructor::new(config.thread_window_hours);
        Self {
            config,
            index,
            normalizer: Normalizer::new(),
            threader,
        }
    }

    /// Process one batch. `now` anchors the recency tiers (and tests).
    ///
    /// An empty batch is fatal — the run aborts with no output written.
    pub fn run(
        &mut self,
        batch: &[threadsift_common::RawPost],
        now: DateTime<Utc>,
    ) -> Result<RunOutput, ThreadsiftError> {
        if batch.is_empty() {
            return Err(ThreadsiftError::EmptyInput);
        }

        let run_id = Uuid::new_v4().to_string();
        let started_at = now;
        let mut stats = RunStats {
            total_input: batch.len() as u32,
            ..Default::default()
        };
        let mut errors: Vec<PostError> = Vec::new();

        // Stage 1: normalize. A bad post is logged and skipped, never fatal.
        let mut canonical = Vec::with_capacity(batch.len());
        for raw in batch {
            match self.normalizer.normalize(raw) {
                Ok(post) => canonical.push(post),
                Err(e) => {
                    warn!(post_id = %raw.id, error = %e, "Normalization failed, skipping post");
                    stats.normalize_failures += 1;
                    errors.push(PostError {
                        post_id: raw.id.clone(),
                        stage: "normalize".to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }
        stats.normalized = canonical.len() as u32;

        // Stage 2: dedup against the injected cross-run index.
        let (fresh, skipped) = dedup::filter_new(canonical, self.index);
        stats.duplicates_skipped = skipped;
        if skipped > 0 {
            info!(skipped, "Duplicates suppressed");
        }

        // Stage 3: thread reconstruction over the full non-duplicate set.
        let mut thread_set = self.threader.reconstruct(&fresh);
        stats.threads_found = thread_set.threads.len() as u32;
        stats.threaded_posts = thread_set.slots.len() as u32;
        stats.standalone_posts = fresh.len() as u32 - stats.threaded_posts;

        // Stage 4: score each post, attaching its thread slot. A scoring
        // failure yields the documented fallback and the run continues.
        let mut posts = Vec::with_capacity(fresh.len());
        for post in fresh {
            let scores = match scorer::score_post(&post, now, self.config.reference_min_words) {
                Ok(s) => s,
                Err(e) => {
                    warn!(post_id = %post.id, error = %e, "Scoring failed, using fallback");
                    stats.score_fallbacks += 1;
                    errors.push(PostError {
                        post_id: post.id.clone(),
                        stage: "score".to_string(),
                        message: e.to_string(),
                    });
                    scorer::fallback_scores()
                }
            };
            let slot = thread_set.slot(&post.content_hash).cloned();
            posts.push(scorer::assemble(post, scores, slot.as_ref()));
        }
        stats.posts_scored = posts.len() as u32;

        // Second pass: per-thread mean engagement now that scores exist.
        let engagement_by_hash: HashMap<String, f64> = posts
            .iter()
            .map(|p| (p.post.content_hash.clone(), p.engagement_score))
            .collect();
        fill_aggregate_engagement(&mut thread_set.threads, &engagement_by_hash);

        // Stage 5: aggregate.
        let summary = aggregator::summarize(
            &run_id,
            started_at,
            Utc::now(),
            stats.total_input,
            stats.duplicates_skipped,
            errors,
            &posts,
            &thread_set.threads,
            &self.config,
        );

        info!(
            run_id = %run_id,
            posts = posts.len(),
            threads = thread_set.threads.len(),
            duplicates = skipped,
            "Pipeline run complete"
        );

        Ok(RunOutput {
            posts,
            threads: thread_set.threads,
            summary,
            stats,
        })
    }
}
