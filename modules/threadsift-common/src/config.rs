use std::env;

/// Pipeline tunables. Defaults match the thresholds the scoring and
/// aggregation tables were calibrated against; env vars override for
/// operational tweaking without a rebuild.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Max gap between two posts of the same author to be thread candidates.
    pub thread_window_hours: i64,
    /// Entries per top-N ranking in the summary.
    pub top_n: usize,
    /// Minimum priority score for the high-priority export subset.
    pub high_priority_min: f64,
    /// Minimum engagement score for the high-engagement export subset.
    pub high_engagement_min: f64,
    /// Word count above which a post is reference-worthy on length alone.
    pub reference_min_words: u32,
    /// Characters kept in ranking previews.
    pub preview_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            thread_window_hours: 24,
            top_n: 10,
            high_priority_min: 70.0,
            high_engagement_min: 0.8,
            reference_min_words: 50,
            preview_chars: 100,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset. Panics with a clear message if a set
    /// var does not parse.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            thread_window_hours: env_parse("THREADSIFT_THREAD_WINDOW_HOURS", d.thread_window_hours),
            top_n: env_parse("THREADSIFT_TOP_N", d.top_n),
            high_priority_min: env_parse("THREADSIFT_HIGH_PRIORITY_MIN", d.high_priority_min),
            high_engagement_min: env_parse("THREADSIFT_HIGH_ENGAGEMENT_MIN", d.high_engagement_min),
            reference_min_words: env_parse("THREADSIFT_REFERENCE_MIN_WORDS", d.reference_min_words),
            preview_chars: env_parse("THREADSIFT_PREVIEW_CHARS", d.preview_chars),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(v) => v
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a valid number, got {v:?}")),
        Err(_) => default,
    }
}
