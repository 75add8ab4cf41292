//! Normalizer — canonicalizes a raw scraped post into a stable internal shape.
//!
//! Extracts hashtags/mentions, parses free-form metric strings ("1.2K"),
//! parses the timestamp when present, and stamps the content fingerprint.
//! A failure on one post is the caller's to record; it never aborts a batch.

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

use threadsift_common::{CanonicalPost, RawPost, ThreadsiftError};

use crate::dedup::fingerprint;

pub struct Normalizer {
    hashtag_re: Regex,
    mention_re: Regex,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            hashtag_re: Regex::new(r"#\w+").expect("valid hashtag regex"),
            mention_re: Regex::new(r"@\w+").expect("valid mention regex"),
        }
    }

    /// Canonicalize one raw post.
    ///
    /// A post with no text, no author, and no url carries nothing to
    /// fingerprint or score, so it is rejected; everything else tolerates
    /// missing fields.
    pub fn normalize(&self, raw: &RawPost) -> Result<CanonicalPost, ThreadsiftError> {
        if raw.text.trim().is_empty()
            && raw.author.trim().is_empty()
            && raw.author_handle.trim().is_empty()
            && raw.url.trim().is_empty()
        {
            return Err(ThreadsiftError::Normalize(format!(
                "post {:?} has no text, author, or url",
                raw.id
            )));
        }

        let trimmed = raw.text.trim();
        let word_count = if trimmed.is_empty() {
            0
        } else {
            trimmed.split_whitespace().count() as u32
        };

        let hashtags = self
            .hashtag_re
            .find_iter(&raw.text)
            .map(|m| m.as_str().to_string())
            .collect();
        let mentions = self
            .mention_re
            .find_iter(&raw.text)
            .map(|m| m.as_str().to_string())
            .collect();

        let content_hash = fingerprint(&raw.text, &raw.author, &raw.author_handle, &raw.url);

        Ok(CanonicalPost {
            id: raw.id.clone(),
            text: raw.text.clone(),
            author: raw.author.clone(),
            author_handle: raw.author_handle.clone(),
            url: raw.url.clone(),
            published_at: parse_timestamp(&raw.timestamp),
            likes: parse_metric(&raw.like_count),
            retweets: parse_metric(&raw.retweet_count),
            replies: parse_metric(&raw.reply_count),
            has_media: raw.has_media,
            hashtags,
            mentions,
            word_count,
            text_length: trimmed.chars().count() as u32,
            content_hash,
        })
    }
}

/// Parse a free-form count string as scraped from the platform UI:
/// "1234", "1,234", "1.2K", "3M". Anything unparseable is 0 — the collector
/// contract says missing counts default rather than reject.
pub fn parse_metric(raw: &str) -> u64 {
    let s = raw.trim().replace(',', "");
    if s.is_empty() {
        return 0;
    }
    let (num_part, multiplier) = match s.chars().last() {
        Some('k') | Some('K') => (&s[..s.len() - 1], 1_000.0),
        Some('m') | Some('M') => (&s[..s.len() - 1], 1_000_000.0),
        _ => (s.as_str(), 1.0),
    };
    match num_part.parse::<f64>() {
        Ok(n) if n >= 0.0 => (n * multiplier) as u64,
        _ => 0,
    }
}

/// Parse an ISO-8601-ish timestamp. RFC 3339 first, then the common
/// platform variants without offset. Unparseable → None; the post is then
/// thread-ineligible but still scored.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
        // Date-only falls through NaiveDateTime; retry as midnight.
        if fmt == "%Y-%m-%d" {
            if let Ok(date) = chrono::NaiveDate::parse_from_str(s, fmt) {
                return Some(date.and_hms_opt(0, 0, 0).expect("valid midnight").and_utc());
            }
        }
    }
    None
}
