//! End-to-end pipeline runs over fixture batches, including cross-run
//! dedup through a real file-backed index.

use chrono::{DateTime, TimeZone, Utc};

use threadsift_common::{PipelineConfig, RawPost, Sentiment};
use threadsift_pipeline::{export, DedupIndex, FileIndex, MemoryIndex, Pipeline};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).unwrap()
}

fn raw(id: &str, text: &str, handle: &str, ts: &str) -> RawPost {
    RawPost {
        id: id.to_string(),
        text: text.to_string(),
        author: "Author".to_string(),
        author_handle: handle.to_string(),
        timestamp: ts.to_string(),
        url: format!("https://x.com/{handle}/status/{id}"),
        like_count: String::new(),
        retweet_count: String::new(),
        reply_count: String::new(),
        has_media: false,
    }
}

fn fixture_batch() -> Vec<RawPost> {
    vec![
        raw("1", "Great AI thread 1/3", "@jane", "2026-08-20T10:00:00Z"),
        raw("2", "Great AI thread 2/3", "@jane", "2026-08-20T10:10:00Z"),
        raw("3", "Great AI thread 3/3", "@jane", "2026-08-20T10:20:00Z"),
        raw("4", "Is this startup worth watching?", "@bob", "2026-08-20T09:00:00Z"),
        raw("5", "terrible awful release", "@carol", "2026-08-19T09:00:00Z"),
    ]
}

#[test]
fn scenario_thread_positions() {
    let mut index = MemoryIndex::new();
    let mut pipeline = Pipeline::new(PipelineConfig::default(), &mut index);
    let out = pipeline.run(&fixture_batch(), now()).unwrap();

    let first = out.posts.iter().find(|p| p.post.id == "1").unwrap();
    let second = out.posts.iter().find(|p| p.post.id == "2").unwrap();
    assert!(first.is_thread_start);
    assert!(!second.is_thread_start);
    assert_eq!(first.thread_position, 1);
    assert_eq!(second.thread_position, 2);
    assert!(first.thread_length >= 2);
    assert_eq!(first.thread_id, second.thread_id);
}

#[test]
fn scenario_engagement_clamped_to_one() {
    let mut batch = fixture_batch();
    batch[3].like_count = "1200".to_string();
    batch[3].retweet_count = "50".to_string();
    batch[3].has_media = true;

    let mut index = MemoryIndex::new();
    let mut pipeline = Pipeline::new(PipelineConfig::default(), &mut index);
    let out = pipeline.run(&batch, now()).unwrap();
    let post = out.posts.iter().find(|p| p.post.id == "4").unwrap();
    assert!((post.engagement_score - 1.0).abs() < 1e-9);
}

#[test]
fn scenario_cross_run_duplicate_via_file_index() {
    let dir = tempfile::tempdir().unwrap();
    let index_path = dir.path().join("index.jsonl");
    let repeated = raw("77", "same content both runs", "@jane", "2026-08-20T08:00:00Z");

    // Run 1
    {
        let mut index = FileIndex::load(&index_path).unwrap();
        let mut pipeline = Pipeline::new(PipelineConfig::default(), &mut index);
        let out = pipeline.run(std::slice::from_ref(&repeated), now()).unwrap();
        assert_eq!(out.posts.len(), 1);
        index.commit().unwrap();
    }

    // Run 2: same content, new synthetic id.
    let mut resurfaced = repeated.clone();
    resurfaced.id = "9001".to_string();
    let mut index = FileIndex::load(&index_path).unwrap();
    let known_before = index.len();
    let mut pipeline = Pipeline::new(PipelineConfig::default(), &mut index);
    let out = pipeline.run(&[resurfaced], now()).unwrap();
    assert_eq!(out.summary.duplicates_skipped, 1);
    assert!(out.posts.is_empty(), "post does not appear twice in cumulative output");
    index.commit().unwrap();

    let reloaded = FileIndex::load(&index_path).unwrap();
    assert_eq!(reloaded.len(), known_before, "cumulative index count unchanged");
}

#[test]
fn scenario_empty_text_post_survives() {
    let mut index = MemoryIndex::new();
    let mut pipeline = Pipeline::new(PipelineConfig::default(), &mut index);
    let batch = vec![raw("1", "", "@jane", "2026-08-20T10:00:00Z")];
    let out = pipeline.run(&batch, now()).unwrap();
    assert_eq!(out.posts.len(), 1);
    assert_eq!(out.posts[0].post.word_count, 0);
    assert!((out.posts[0].quality_score - 0.5).abs() < 1e-9);
}

#[test]
fn scenario_business_question_discussion_worthy() {
    let mut index = MemoryIndex::new();
    let mut pipeline = Pipeline::new(PipelineConfig::default(), &mut index);
    let out = pipeline.run(&fixture_batch(), now()).unwrap();
    let post = out.posts.iter().find(|p| p.post.id == "4").unwrap();
    assert_eq!(post.content_type, "Business");
    assert!(post.discussion_worthy);
}

#[test]
fn summary_breakdowns_cover_processed_posts() {
    let mut index = MemoryIndex::new();
    let mut pipeline = Pipeline::new(PipelineConfig::default(), &mut index);
    let out = pipeline.run(&fixture_batch(), now()).unwrap();

    let summary = &out.summary;
    assert_eq!(summary.posts_processed, 5);
    assert_eq!(summary.threads_found, 1);

    let sentiment_total: u32 = summary.by_sentiment.iter().map(|b| b.count).sum();
    assert_eq!(sentiment_total, 5);
    let band_total: u32 = summary.by_priority_band.iter().map(|b| b.count).sum();
    assert_eq!(band_total, 5);
    let type_total: u32 = summary.by_content_type.iter().map(|b| b.count).sum();
    assert_eq!(type_total, 5);

    let negative = summary.by_sentiment.iter().find(|b| b.label == "negative").unwrap();
    assert!(negative.count >= 1, "the 'terrible awful release' post");
}

#[test]
fn deterministic_output_for_same_input() {
    let run = || {
        let mut index = MemoryIndex::new();
        let mut pipeline = Pipeline::new(PipelineConfig::default(), &mut index);
        pipeline.run(&fixture_batch(), now()).unwrap()
    };
    let a = run();
    let b = run();
    assert_eq!(
        serde_json::to_string(&a.posts).unwrap(),
        serde_json::to_string(&b.posts).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&a.summary.top_priority).unwrap(),
        serde_json::to_string(&b.summary.top_priority).unwrap()
    );
}

#[test]
fn exports_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("out");

    let cfg = PipelineConfig::default();
    let mut index = MemoryIndex::new();
    let mut pipeline = Pipeline::new(cfg.clone(), &mut index);
    let output = pipeline.run(&fixture_batch(), now()).unwrap();
    export::write_all(&out_dir, &output, &cfg).unwrap();

    for name in [
        "posts.json",
        "threads.json",
        "summary.json",
        "high_priority.json",
        "high_engagement.json",
        "by_topic.json",
        "posts.csv",
    ] {
        assert!(out_dir.join(name).exists(), "{name} missing");
    }

    let posts_json = std::fs::read_to_string(out_dir.join("posts.json")).unwrap();
    let parsed: Vec<serde_json::Value> = serde_json::from_str(&posts_json).unwrap();
    assert_eq!(parsed.len(), 5);

    let csv = std::fs::read_to_string(out_dir.join("posts.csv")).unwrap();
    assert_eq!(csv.lines().count(), 6, "header plus five rows");
}

#[test]
fn no_scored_field_is_null_in_serialized_output() {
    let mut index = MemoryIndex::new();
    let mut pipeline = Pipeline::new(PipelineConfig::default(), &mut index);
    // Include a degenerate post to push the edge cases.
    let mut batch = fixture_batch();
    batch.push(raw("9", "", "@dana", ""));
    let out = pipeline.run(&batch, now()).unwrap();

    let json = serde_json::to_value(&out.posts).unwrap();
    for post in json.as_array().unwrap() {
        for (key, value) in post.as_object().unwrap() {
            // publishedAt is the canonical timestamp and may legitimately be
            // absent; every score/flag field must be concrete.
            if key == "post" {
                continue;
            }
            assert!(!value.is_null(), "field {key} was null");
        }
    }
}

#[test]
fn sentiment_labels_match_contract() {
    let mut index = MemoryIndex::new();
    let mut pipeline = Pipeline::new(PipelineConfig::default(), &mut index);
    let batch = vec![raw("1", "great awesome work", "@jane", "2026-08-20T10:00:00Z")];
    let out = pipeline.run(&batch, now()).unwrap();
    assert_eq!(out.posts[0].sentiment, Sentiment::Positive);
    let json = serde_json::to_string(&out.posts[0]).unwrap();
    assert!(json.contains("\"sentiment\":\"positive\""));
}
