use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Input contract ---

/// A raw scraped post as delivered by the external collector.
///
/// Every field is tolerant: the collector emits whatever the platform DOM
/// happened to contain, so counts are free-form strings ("1.2K"), the
/// timestamp may be absent, and the id may be empty or unstable across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawPost {
    pub id: String,
    pub text: String,
    pub author: String,
    pub author_handle: String,
    /// ISO-8601 string, possibly empty.
    pub timestamp: String,
    pub url: String,
    pub like_count: String,
    pub retweet_count: String,
    pub reply_count: String,
    pub has_media: bool,
}

// --- Canonical form ---

/// A post after normalization: parsed counts, extracted tags, text features,
/// and the cross-run content fingerprint. Created once per run, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalPost {
    pub id: String,
    pub text: String,
    pub author: String,
    pub author_handle: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub likes: u64,
    pub retweets: u64,
    pub replies: u64,
    pub has_media: bool,
    /// Case preserved; within-post duplicates retained (counts matter downstream).
    pub hashtags: Vec<String>,
    pub mentions: Vec<String>,
    pub word_count: u32,
    pub text_length: u32,
    /// Hex SHA-256 over normalized (text, author identity, url).
    /// Deterministic across runs regardless of source id or timestamp.
    pub content_hash: String,
}

impl CanonicalPost {
    /// Author identity used for fingerprinting and thread grouping:
    /// handle when present, otherwise display name, lowercased.
    pub fn author_key(&self) -> String {
        let key = if self.author_handle.trim().is_empty() {
            &self.author
        } else {
            &self.author_handle
        };
        key.trim().to_lowercase()
    }
}

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Neutral => write!(f, "neutral"),
            Sentiment::Negative => write!(f, "negative"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThreadComplexity {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ThreadComplexity {
    /// Derived from thread length: ≤2 low, ≤5 medium, ≤10 high, else very-high.
    pub fn from_length(length: u32) -> Self {
        match length {
            0..=2 => ThreadComplexity::Low,
            3..=5 => ThreadComplexity::Medium,
            6..=10 => ThreadComplexity::High,
            _ => ThreadComplexity::VeryHigh,
        }
    }
}

impl std::fmt::Display for ThreadComplexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreadComplexity::Low => write!(f, "low"),
            ThreadComplexity::Medium => write!(f, "medium"),
            ThreadComplexity::High => write!(f, "high"),
            ThreadComplexity::VeryHigh => write!(f, "very-high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThreadContext {
    RapidFire,
    SameSession,
    SameDay,
    Extended,
}

impl ThreadContext {
    /// Derived from the first-to-last time span of a thread.
    pub fn from_span_minutes(minutes: i64) -> Self {
        match minutes {
            m if m <= 60 => ThreadContext::RapidFire,
            m if m <= 360 => ThreadContext::SameSession,
            m if m <= 1440 => ThreadContext::SameDay,
            _ => ThreadContext::Extended,
        }
    }
}

impl std::fmt::Display for ThreadContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreadContext::RapidFire => write!(f, "rapid-fire"),
            ThreadContext::SameSession => write!(f, "same-session"),
            ThreadContext::SameDay => write!(f, "same-day"),
            ThreadContext::Extended => write!(f, "extended"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityBand {
    High,
    Medium,
    Low,
}

impl PriorityBand {
    /// high ≥ 70, medium 40–69, low < 40.
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            PriorityBand::High
        } else if score >= 40.0 {
            PriorityBand::Medium
        } else {
            PriorityBand::Low
        }
    }
}

impl std::fmt::Display for PriorityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriorityBand::High => write!(f, "high"),
            PriorityBand::Medium => write!(f, "medium"),
            PriorityBand::Low => write!(f, "low"),
        }
    }
}

// --- Threads ---

/// A heuristically reconstructed thread: same author, close in time,
/// continuation markers. Stable for the lifetime of one processing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    /// Synthetic id derived from the earliest member's post id.
    pub thread_id: String,
    pub author_handle: String,
    /// Member content hashes, ascending by timestamp.
    pub post_hashes: Vec<String>,
    pub length: u32,
    pub complexity: ThreadComplexity,
    pub context: ThreadContext,
    /// Mean of member engagement scores; filled after scoring.
    pub aggregate_engagement: f64,
}

// --- Scored output ---

/// A fully annotated post: canonical form plus every score, flag, and
/// thread-derived field. No field is ever left unset — unscorable posts
/// receive the documented fallback values instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredPost {
    pub post: CanonicalPost,
    pub sentiment: Sentiment,
    pub content_type: String,
    pub engagement_score: f64,
    pub priority_score: f64,
    pub quality_score: f64,
    pub relevance_score: f64,
    pub learning_value: f64,
    pub actionable: bool,
    pub discussion_worthy: bool,
    pub reference_worthy: bool,
    pub key_insights: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    pub is_thread_start: bool,
    pub is_thread_part: bool,
    /// 1-indexed position within the thread; 1 for standalone posts.
    pub thread_position: u32,
    /// Thread length; 1 for standalone posts.
    pub thread_length: u32,
}

// --- Run summary ---

/// A per-post failure recovered during the run. Carried in the summary;
/// never changes the run's success status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostError {
    pub post_id: String,
    pub stage: String,
    pub message: String,
}

/// One label's share of a group-by breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub label: String,
    pub count: u32,
    pub percentage: f64,
}

/// One entry in a top-N ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPost {
    pub preview: String,
    pub author: String,
    pub metric: f64,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedThread {
    pub thread_id: String,
    pub author: String,
    pub length: u32,
    pub preview: String,
    pub url: String,
}

/// Run-level aggregate: totals, breakdowns, rankings, and the per-post
/// error log. Deterministic given deterministic input ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingSummary {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total_input: u32,
    pub duplicates_skipped: u32,
    pub posts_processed: u32,
    pub threads_found: u32,
    pub errors: Vec<PostError>,
    pub by_content_type: Vec<CategoryBreakdown>,
    pub by_priority_band: Vec<CategoryBreakdown>,
    pub by_sentiment: Vec<CategoryBreakdown>,
    pub by_thread_bucket: Vec<CategoryBreakdown>,
    pub by_thread_complexity: Vec<CategoryBreakdown>,
    pub top_engagement: Vec<RankedPost>,
    pub top_priority: Vec<RankedPost>,
    pub longest_threads: Vec<RankedThread>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complexity_boundaries() {
        assert_eq!(ThreadComplexity::from_length(2), ThreadComplexity::Low);
        assert_eq!(ThreadComplexity::from_length(3), ThreadComplexity::Medium);
        assert_eq!(ThreadComplexity::from_length(5), ThreadComplexity::Medium);
        assert_eq!(ThreadComplexity::from_length(6), ThreadComplexity::High);
        assert_eq!(ThreadComplexity::from_length(10), ThreadComplexity::High);
        assert_eq!(ThreadComplexity::from_length(11), ThreadComplexity::VeryHigh);
    }

    #[test]
    fn context_boundaries() {
        assert_eq!(ThreadContext::from_span_minutes(0), ThreadContext::RapidFire);
        assert_eq!(ThreadContext::from_span_minutes(60), ThreadContext::RapidFire);
        assert_eq!(ThreadContext::from_span_minutes(61), ThreadContext::SameSession);
        assert_eq!(ThreadContext::from_span_minutes(360), ThreadContext::SameSession);
        assert_eq!(ThreadContext::from_span_minutes(1440), ThreadContext::SameDay);
        assert_eq!(ThreadContext::from_span_minutes(1441), ThreadContext::Extended);
    }

    #[test]
    fn priority_band_boundaries() {
        assert_eq!(PriorityBand::from_score(70.0), PriorityBand::High);
        assert_eq!(PriorityBand::from_score(69.9), PriorityBand::Medium);
        assert_eq!(PriorityBand::from_score(40.0), PriorityBand::Medium);
        assert_eq!(PriorityBand::from_score(39.9), PriorityBand::Low);
    }

    #[test]
    fn raw_post_tolerates_missing_fields() {
        let raw: RawPost = serde_json::from_str(r#"{"text": "hello"}"#).unwrap();
        assert_eq!(raw.text, "hello");
        assert_eq!(raw.like_count, "");
        assert!(!raw.has_media);
        assert!(raw.timestamp.is_empty());
    }

    #[test]
    fn author_key_prefers_handle() {
        let post = CanonicalPost {
            id: String::new(),
            text: String::new(),
            author: "Jane Doe".to_string(),
            author_handle: "@JaneDoe".to_string(),
            url: String::new(),
            published_at: None,
            likes: 0,
            retweets: 0,
            replies: 0,
            has_media: false,
            hashtags: vec![],
            mentions: vec![],
            word_count: 0,
            text_length: 0,
            content_hash: String::new(),
        };
        assert_eq!(post.author_key(), "@janedoe");
    }

    #[test]
    fn very_high_serializes_kebab_case() {
        let json = serde_json::to_string(&ThreadComplexity::VeryHigh).unwrap();
        assert_eq!(json, "\"very-high\"");
        let json = serde_json::to_string(&ThreadContext::RapidFire).unwrap();
        assert_eq!(json, "\"rapid-fire\"");
    }
}
