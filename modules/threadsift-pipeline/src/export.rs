//! Exports — the output contract for storage sync, dashboards, and
//! spreadsheets.
//!
//! One file per view in the output directory: the full annotated record
//! set, filtered subsets, the run summary, and a flat row-per-post CSV
//! mirror. All JSON is pretty-printed for diffability.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use threadsift_common::{PipelineConfig, ScoredPost, ThreadsiftError};

use crate::pipeline::RunOutput;

/// Posts at or above the high-priority threshold, input order preserved.
pub fn high_priority(posts: &[ScoredPost], min: f64) -> Vec<&ScoredPost> {
    posts.iter().filter(|p| p.priority_score >= min).collect()
}

/// Posts at or above the high-engagement threshold, input order preserved.
pub fn high_engagement(posts: &[ScoredPost], min: f64) -> Vec<&ScoredPost> {
    posts.iter().filter(|p| p.engagement_score >= min).collect()
}

/// Posts grouped by content type. BTreeMap keeps the key order stable.
pub fn by_topic(posts: &[ScoredPost]) -> BTreeMap<String, Vec<&ScoredPost>> {
    let mut groups: BTreeMap<String, Vec<&ScoredPost>> = BTreeMap::new();
    for post in posts {
        groups.entry(post.content_type.clone()).or_default().push(post);
    }
    groups
}

/// Write every export view into `out_dir`. Creates the directory if needed.
pub fn write_all(
    out_dir: &Path,
    output: &RunOutput,
    cfg: &PipelineConfig,
) -> Result<(), ThreadsiftError> {
    fs::create_dir_all(out_dir)
        .map_err(|e| ThreadsiftError::Export(format!("create {}: {e}", out_dir.display())))?;

    write_json(&out_dir.join("posts.json"), &output.posts)?;
    write_json(&out_dir.join("threads.json"), &output.threads)?;
    write_json(&out_dir.join("summary.json"), &output.summary)?;
    write_json(
        &out_dir.join("high_priority.json"),
        &high_priority(&output.posts, cfg.high_priority_min),
    )?;
    write_json(
        &out_dir.join("high_engagement.json"),
        &high_engagement(&output.posts, cfg.high_engagement_min),
    )?;
    write_json(&out_dir.join("by_topic.json"), &by_topic(&output.posts))?;

    let csv_path = out_dir.join("posts.csv");
    fs::write(&csv_path, to_csv(&output.posts))
        .map_err(|e| ThreadsiftError::Export(format!("write {}: {e}", csv_path.display())))?;

    info!(dir = %out_dir.display(), posts = output.posts.len(), "Exports written");
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ThreadsiftError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| ThreadsiftError::Export(format!("serialize {}: {e}", path.display())))?;
    fs::write(path, json)
        .map_err(|e| ThreadsiftError::Export(format!("write {}: {e}", path.display())))
}

const CSV_HEADER: &str = "id,author,authorHandle,url,publishedAt,text,likes,retweets,replies,\
hasMedia,hashtags,mentions,wordCount,contentHash,sentiment,contentType,engagementScore,\
priorityScore,qualityScore,relevanceScore,learningValue,actionable,discussionWorthy,\
referenceWorthy,threadId,isThreadStart,isThreadPart,threadPosition,threadLength,keyInsights";

/// Flat row-per-post mirror of the record set (RFC 4180 quoting).
/// List fields are pipe-joined inside one cell.
pub fn to_csv(posts: &[ScoredPost]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for p in posts {
        let fields = [
            p.post.id.clone(),
            p.post.author.clone(),
            p.post.author_handle.clone(),
            p.post.url.clone(),
            p.post
                .published_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
            p.post.text.clone(),
            p.post.likes.to_string(),
            p.post.retweets.to_string(),
            p.post.replies.to_string(),
            p.post.has_media.to_string(),
            p.post.hashtags.join("|"),
            p.post.mentions.join("|"),
            p.post.word_count.to_string(),
            p.post.content_hash.clone(),
            p.sentiment.to_string(),
            p.content_type.clone(),
            format_score(p.engagement_score),
            format_score(p.priority_score),
            format_score(p.quality_score),
            format_score(p.relevance_score),
            format_score(p.learning_value),
            p.actionable.to_string(),
            p.discussion_worthy.to_string(),
            p.reference_worthy.to_string(),
            p.thread_id.clone().unwrap_or_default(),
            p.is_thread_start.to_string(),
            p.is_thread_part.to_string(),
            p.thread_position.to_string(),
            p.thread_length.to_string(),
            p.key_insights.join("|"),
        ];
        let row: Vec<String> = fields.iter().map(|f| csv_escape(f)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

fn format_score(v: f64) -> String {
    format!("{v:.3}")
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
