//! Scorer — per-post sentiment, topic, engagement, priority, and quality.
//!
//! Pure functions over a single post; thread-aware fields are attached in
//! [`assemble`] once reconstruction has run. All rule tables live in
//! `threadsift_common::lexicon`. Every score is bounded and every field has
//! a documented fallback — downstream consumers never see a null.

use chrono::{DateTime, Utc};

use threadsift_common::lexicon::{
    classify_topic, GENERAL_TOPIC, INSIGHT_RULES, NEGATIVE_WORDS, NEUTRAL_SCORE, POSITIVE_WORDS,
    STRONG_SENTIMENT_WORDS,
};
use threadsift_common::{CanonicalPost, ScoredPost, Sentiment, ThreadsiftError};

use crate::threader::ThreadSlot;

/// Per-post scores before thread annotation.
#[derive(Debug, Clone)]
pub struct PostScores {
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
}

/// Score one post. `now` is passed in so recency tiers are deterministic
/// under test; `reference_min_words` comes from config.
pub fn score_post(
    post: &CanonicalPost,
    now: DateTime<Utc>,
    reference_min_words: u32,
) -> Result<PostScores, ThreadsiftError> {
    let engagement = engagement_score(post.likes, post.retweets, post.replies, post.has_media);
    let sentiment = sentiment(&post.text);
    let topic = classify_topic(&post.text);
    let content_type = topic.map(|t| t.label).unwrap_or(GENERAL_TOPIC).to_string();

    let recency = recency_bonus(post.published_at, now);
    let topic_bonus = topic.map(|t| t.priority_bonus).unwrap_or(0.0);
    let priority = (engagement * 40.0 + recency + topic_bonus).clamp(0.0, 100.0);

    let quality = quality_score(post.word_count);
    let relevance = topic.map(|t| t.relevance).unwrap_or(NEUTRAL_SCORE);
    let learning = topic.map(|t| t.learning_value).unwrap_or(NEUTRAL_SCORE);

    let has_url = !post.url.trim().is_empty();
    let lower = post.text.to_lowercase();
    let actionable = has_url || topic.map(|t| t.technical).unwrap_or(false);
    let discussion_worthy = post.text.contains('?')
        || STRONG_SENTIMENT_WORDS.iter().any(|w| lower.contains(w));
    let reference_worthy = post.word_count > reference_min_words || has_url;

    let key_insights = INSIGHT_RULES
        .iter()
        .filter(|rule| rule.topic == content_type && lower.contains(rule.trigger))
        .map(|rule| rule.insight.to_string())
        .collect();

    Ok(PostScores {
        sentiment,
        content_type,
        engagement_score: engagement,
        priority_score: priority,
        quality_score: quality,
        relevance_score: relevance,
        learning_value: learning,
        actionable,
        discussion_worthy,
        reference_worthy,
        key_insights,
    })
}

/// Documented fallback when scoring a post fails: neutral everything,
/// mid-range scores, no flags. The post stays in the output.
pub fn fallback_scores() -> PostScores {
    PostScores {
        sentiment: Sentiment::Neutral,
        content_type: GENERAL_TOPIC.to_string(),
        engagement_score: 0.5,
        priority_score: 50.0,
        quality_score: 0.5,
        relevance_score: 0.5,
        learning_value: 0.5,
        actionable: false,
        discussion_worthy: false,
        reference_worthy: false,
        key_insights: Vec::new(),
    }
}

/// Baseline 0.5 plus additive tier bonuses, clamped to 1.0.
pub fn engagement_score(likes: u64, retweets: u64, replies: u64, has_media: bool) -> f64 {
    let mut score: f64 = 0.5;
    score += match likes {
        l if l > 1000 => 0.3,
        l if l > 100 => 0.2,
        l if l > 10 => 0.1,
        _ => 0.0,
    };
    score += match retweets {
        r if r > 100 => 0.2,
        r if r > 10 => 0.1,
        _ => 0.0,
    };
    score += match replies {
        r if r > 50 => 0.2,
        r if r > 5 => 0.1,
        _ => 0.0,
    };
    if has_media {
        score += 0.1;
    }
    score.clamp(0.0, 1.0)
}

/// Majority of positive vs negative word occurrences; ties are neutral.
pub fn sentiment(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    let positive: usize = POSITIVE_WORDS.iter().map(|w| lower.matches(w).count()).sum();
    let negative: usize = NEGATIVE_WORDS.iter().map(|w| lower.matches(w).count()).sum();
    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

/// Recency tiers decay from today through the last three months.
/// Posts without a parseable timestamp get no bonus.
pub fn recency_bonus(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(ts) = published_at else { return 0.0 };
    let age_days = (now - ts).num_days();
    match age_days {
        d if d < 1 => 30.0,
        d if d <= 7 => 20.0,
        d if d <= 30 => 10.0,
        d if d <= 90 => 5.0,
        _ => 0.0,
    }
}

/// Normalized word-count proxy: 0.5 when there is no text signal, otherwise
/// ramping from 0.3 toward 1.0 at ~70 words.
pub fn quality_score(word_count: u32) -> f64 {
    if word_count == 0 {
        return 0.5;
    }
    (0.3 + word_count as f64 / 100.0).min(1.0)
}

/// Combine a post, its scores, and its thread slot (if any) into the final
/// record. Standalone posts carry position 1 / length 1 and no thread id.
pub fn assemble(post: CanonicalPost, scores: PostScores, slot: Option<&ThreadSlot>) -> ScoredPost {
    let (thread_id, position, length) = match slot {
        Some(s) => (Some(s.thread_id.clone()), s.position, s.length),
        None => (None, 1, 1),
    };
    ScoredPost {
        post,
        sentiment: scores.sentiment,
        content_type: scores.content_type,
        engagement_score: scores.engagement_score,
        priority_score: scores.priority_score,
        quality_score: scores.quality_score,
        relevance_score: scores.relevance_score,
        learning_value: scores.learning_value,
        actionable: scores.actionable,
        discussion_worthy: scores.discussion_worthy,
        reference_worthy: scores.reference_worthy,
        key_insights: scores.key_insights,
        is_thread_start: thread_id.is_some() && position == 1,
        is_thread_part: thread_id.is_some(),
        thread_id,
        thread_position: position,
        thread_length: length,
    }
}
