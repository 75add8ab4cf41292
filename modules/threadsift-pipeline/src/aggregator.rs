//! Aggregator — run-level summary: breakdowns, priority bands, thread
//! buckets, and top-N rankings.
//!
//! Output is deterministic for a given input ordering: every sort is stable
//! and ties keep original input order, so reruns diff cleanly.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use threadsift_common::lexicon::TOPIC_RULES;
use threadsift_common::{
    CategoryBreakdown, PipelineConfig, PostError, PriorityBand, ProcessingSummary, RankedPost,
    RankedThread, ScoredPost, Sentiment, Thread,
};

#[allow(clippy::too_many_arguments)]
pub fn summarize(
    run_id: &str,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    total_input: u32,
    duplicates_skipped: u32,
    errors: Vec<PostError>,
    posts: &[ScoredPost],
    threads: &[Thread],
    cfg: &PipelineConfig,
) -> ProcessingSummary {
    ProcessingSummary {
        run_id: run_id.to_string(),
        started_at,
        finished_at,
        total_input,
        duplicates_skipped,
        posts_processed: posts.len() as u32,
        threads_found: threads.len() as u32,
        errors,
        by_content_type: content_type_breakdown(posts),
        by_priority_band: priority_band_breakdown(posts),
        by_sentiment: sentiment_breakdown(posts),
        by_thread_bucket: thread_bucket_breakdown(threads),
        by_thread_complexity: complexity_breakdown(threads),
        top_engagement: top_posts(posts, cfg, |p| p.engagement_score),
        top_priority: top_posts(posts, cfg, |p| p.priority_score),
        longest_threads: longest_threads(threads, posts, cfg),
    }
}

fn pct(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Labels in topic-rule priority order, General last; only nonzero labels
/// appear.
fn content_type_breakdown(posts: &[ScoredPost]) -> Vec<CategoryBreakdown> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for p in posts {
        *counts.entry(p.content_type.as_str()).or_default() += 1;
    }
    let mut labels: Vec<&str> = TOPIC_RULES.iter().map(|r| r.label).collect();
    labels.push(threadsift_common::lexicon::GENERAL_TOPIC);
    labels
        .into_iter()
        .filter_map(|label| {
            let count = *counts.get(label).unwrap_or(&0);
            (count > 0).then(|| CategoryBreakdown {
                label: label.to_string(),
                count: count as u32,
                percentage: pct(count, posts.len()),
            })
        })
        .collect()
}

fn priority_band_breakdown(posts: &[ScoredPost]) -> Vec<CategoryBreakdown> {
    [PriorityBand::High, PriorityBand::Medium, PriorityBand::Low]
        .iter()
        .map(|band| {
            let count = posts
                .iter()
                .filter(|p| PriorityBand::from_score(p.priority_score) == *band)
                .count();
            CategoryBreakdown {
                label: band.to_string(),
                count: count as u32,
                percentage: pct(count, posts.len()),
            }
        })
        .collect()
}

fn sentiment_breakdown(posts: &[ScoredPost]) -> Vec<CategoryBreakdown> {
    [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative]
        .iter()
        .map(|s| {
            let count = posts.iter().filter(|p| p.sentiment == *s).count();
            CategoryBreakdown {
                label: s.to_string(),
                count: count as u32,
                percentage: pct(count, posts.len()),
            }
        })
        .collect()
}

/// Thread length buckets: 2–3, 4–5, 6–10, >10. Standalone posts are not
/// threads and never appear here.
fn thread_bucket_breakdown(threads: &[Thread]) -> Vec<CategoryBreakdown> {
    let bucket = |len: u32| match len {
        0..=3 => "2-3",
        4..=5 => "4-5",
        6..=10 => "6-10",
        _ => ">10",
    };
    ["2-3", "4-5", "6-10", ">10"]
        .iter()
        .map(|label| {
            let count = threads.iter().filter(|t| bucket(t.length) == *label).count();
            CategoryBreakdown {
                label: label.to_string(),
                count: count as u32,
                percentage: pct(count, threads.len()),
            }
        })
        .collect()
}

fn complexity_breakdown(threads: &[Thread]) -> Vec<CategoryBreakdown> {
    use threadsift_common::ThreadComplexity::*;
    [Low, Medium, High, VeryHigh]
        .iter()
        .map(|c| {
            let count = threads.iter().filter(|t| t.complexity == *c).count();
            CategoryBreakdown {
                label: c.to_string(),
                count: count as u32,
                percentage: pct(count, threads.len()),
            }
        })
        .collect()
}

fn preview(text: &str, chars: usize) -> String {
    let mut out: String = text.chars().take(chars).collect();
    if text.chars().count() > chars {
        out.push('…');
    }
    out
}

fn top_posts(
    posts: &[ScoredPost],
    cfg: &PipelineConfig,
    metric: impl Fn(&ScoredPost) -> f64,
) -> Vec<RankedPost> {
    let mut ranked: Vec<&ScoredPost> = posts.iter().collect();
    // Stable sort: ties keep original input order.
    ranked.sort_by(|a, b| metric(b).partial_cmp(&metric(a)).unwrap_or(std::cmp::Ordering::Equal));
    ranked
        .into_iter()
        .take(cfg.top_n)
        .map(|p| RankedPost {
            preview: preview(&p.post.text, cfg.preview_chars),
            author: p.post.author.clone(),
            metric: metric(p),
            url: p.post.url.clone(),
        })
        .collect()
}

fn longest_threads(
    threads: &[Thread],
    posts: &[ScoredPost],
    cfg: &PipelineConfig,
) -> Vec<RankedThread> {
    let by_hash: HashMap<&str, &ScoredPost> = posts
        .iter()
        .map(|p| (p.post.content_hash.as_str(), p))
        .collect();
    let mut ranked: Vec<&Thread> = threads.iter().collect();
    ranked.sort_by(|a, b| b.length.cmp(&a.length));
    ranked
        .into_iter()
        .take(cfg.top_n)
        .map(|t| {
            let first = t.post_hashes.first().and_then(|h| by_hash.get(h.as_str()));
            RankedThread {
                thread_id: t.thread_id.clone(),
                author: t.author_handle.clone(),
                length: t.length,
                preview: first
                    .map(|p| preview(&p.post.text, cfg.preview_chars))
                    .unwrap_or_default(),
                url: first.map(|p| p.post.url.clone()).unwrap_or_default(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use threadsift_common::{CanonicalPost, ThreadComplexity, ThreadContext};

    fn scored(text: &str, content_type: &str, sentiment: Sentiment, priority: f64, engagement: f64) -> ScoredPost {
        ScoredPost {
            post: CanonicalPost {
                id: "p".to_string(),
                text: text.to_string(),
                author: "Jane".to_string(),
                author_handle: "@jane".to_string(),
                url: "https://x.com/1".to_string(),
                published_at: None,
                likes: 0,
                retweets: 0,
                replies: 0,
                has_media: false,
                hashtags: vec![],
                mentions: vec![],
                word_count: 2,
                text_length: 10,
                content_hash: format!("hash-{text}"),
            },
            sentiment,
            content_type: content_type.to_string(),
            engagement_score: engagement,
            priority_score: priority,
            quality_score: 0.5,
            relevance_score: 0.5,
            learning_value: 0.5,
            actionable: false,
            discussion_worthy: false,
            reference_worthy: false,
            key_insights: vec![],
            thread_id: None,
            is_thread_start: false,
            is_thread_part: false,
            thread_position: 1,
            thread_length: 1,
        }
    }

    fn thread(id: &str, length: u32) -> Thread {
        Thread {
            thread_id: id.to_string(),
            author_handle: "@jane".to_string(),
            post_hashes: vec![],
            length,
            complexity: ThreadComplexity::from_length(length),
            context: ThreadContext::RapidFire,
            aggregate_engagement: 0.5,
        }
    }

    fn cfg() -> PipelineConfig {
        PipelineConfig::default()
    }

    #[test]
    fn content_type_counts_and_percentages() {
        let posts = vec![
            scored("a", "AI/ML", Sentiment::Neutral, 50.0, 0.5),
            scored("b", "AI/ML", Sentiment::Neutral, 50.0, 0.5),
            scored("c", "Business", Sentiment::Neutral, 50.0, 0.5),
            scored("d", "General", Sentiment::Neutral, 50.0, 0.5),
        ];
        let breakdown = content_type_breakdown(&posts);
        assert_eq!(breakdown.len(), 3);
        assert_eq!(breakdown[0].label, "AI/ML");
        assert_eq!(breakdown[0].count, 2);
        assert!((breakdown[0].percentage - 50.0).abs() < 1e-9);
        assert_eq!(breakdown.last().unwrap().label, "General");
    }

    #[test]
    fn priority_bands_cover_all_posts() {
        let posts = vec![
            scored("a", "General", Sentiment::Neutral, 85.0, 0.5),
            scored("b", "General", Sentiment::Neutral, 55.0, 0.5),
            scored("c", "General", Sentiment::Neutral, 10.0, 0.5),
        ];
        let bands = priority_band_breakdown(&posts);
        assert_eq!(bands[0].label, "high");
        assert_eq!(bands[0].count, 1);
        assert_eq!(bands[1].count, 1);
        assert_eq!(bands[2].count, 1);
    }

    #[test]
    fn thread_buckets() {
        let threads = vec![thread("t1", 2), thread("t2", 5), thread("t3", 8), thread("t4", 12)];
        let buckets = thread_bucket_breakdown(&threads);
        assert_eq!(buckets.iter().map(|b| b.count).collect::<Vec<_>>(), vec![1, 1, 1, 1]);
    }

    #[test]
    fn empty_run_has_no_nan_percentages() {
        let summary = summarize(
            "run-1",
            Utc::now(),
            Utc::now(),
            0,
            0,
            vec![],
            &[],
            &[],
            &cfg(),
        );
        for b in summary
            .by_priority_band
            .iter()
            .chain(&summary.by_sentiment)
            .chain(&summary.by_thread_bucket)
        {
            assert_eq!(b.percentage, 0.0);
        }
    }

    #[test]
    fn top_posts_stable_ties_keep_input_order() {
        let posts = vec![
            scored("first", "General", Sentiment::Neutral, 50.0, 0.7),
            scored("second", "General", Sentiment::Neutral, 50.0, 0.7),
            scored("third", "General", Sentiment::Neutral, 50.0, 0.9),
        ];
        let top = top_posts(&posts, &cfg(), |p| p.engagement_score);
        assert_eq!(top[0].preview, "third");
        assert_eq!(top[1].preview, "first");
        assert_eq!(top[2].preview, "second");
    }

    #[test]
    fn top_posts_truncated_to_n() {
        let posts: Vec<ScoredPost> = (0..15)
            .map(|i| scored(&format!("p{i}"), "General", Sentiment::Neutral, 50.0, 0.5))
            .collect();
        let top = top_posts(&posts, &cfg(), |p| p.priority_score);
        assert_eq!(top.len(), 10);
    }

    #[test]
    fn preview_truncates_long_text() {
        let long = "x".repeat(300);
        let p = preview(&long, 100);
        assert_eq!(p.chars().count(), 101, "100 chars plus ellipsis");
    }

    #[test]
    fn longest_threads_ranked_desc() {
        let threads = vec![thread("t1", 3), thread("t2", 7), thread("t3", 5)];
        let ranked = longest_threads(&threads, &[], &cfg());
        assert_eq!(ranked[0].thread_id, "t2");
        assert_eq!(ranked[1].thread_id, "t3");
        assert_eq!(ranked[2].thread_id, "t1");
    }
}
