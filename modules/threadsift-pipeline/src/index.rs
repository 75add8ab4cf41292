//! Dedup index — the only state that survives across runs.
//!
//! The index maps content fingerprints to the post id that first carried
//! them. It is injected into the pipeline as a trait object so tests run
//! against [`MemoryIndex`]; production uses [`FileIndex`], a JSON-lines file
//! read once at run start and appended to only after a successful run, so a
//! crash mid-run leaves it unchanged.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use threadsift_common::ThreadsiftError;

pub trait DedupIndex {
    fn contains(&self, hash: &str) -> bool;
    /// Record a fingerprint. Inserting an existing hash is a no-op.
    fn insert(&mut self, hash: &str, post_id: &str);
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory index for tests and single-shot runs.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    entries: HashMap<String, String>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DedupIndex for MemoryIndex {
    fn contains(&self, hash: &str) -> bool {
        self.entries.contains_key(hash)
    }

    fn insert(&mut self, hash: &str, post_id: &str) {
        self.entries
            .entry(hash.to_string())
            .or_insert_with(|| post_id.to_string());
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexEntry {
    hash: String,
    post_id: String,
}

/// File-backed index: one JSON object per line, append-only.
///
/// Inserts during a run are buffered; [`FileIndex::commit`] appends them in
/// one write at the end of a successful run. The file is never rewritten in
/// place.
#[derive(Debug)]
pub struct FileIndex {
    path: PathBuf,
    entries: HashMap<String, String>,
    pending: Vec<IndexEntry>,
}

impl FileIndex {
    /// Load the index from disk. A missing file is an empty index (first
    /// run); an unreadable or malformed file is fatal — without a reliable
    /// index the dedup invariants cannot hold.
    pub fn load(path: &Path) -> Result<Self, ThreadsiftError> {
        let mut entries = HashMap::new();
        if path.exists() {
            let file = File::open(path)
                .map_err(|e| ThreadsiftError::Index(format!("open {}: {e}", path.display())))?;
            for (lineno, line) in BufReader::new(file).lines().enumerate() {
                let line = line.map_err(|e| {
                    ThreadsiftError::Index(format!("read {}: {e}", path.display()))
                })?;
                if line.trim().is_empty() {
                    continue;
                }
                let entry: IndexEntry = serde_json::from_str(&line).map_err(|e| {
                    ThreadsiftError::Index(format!(
                        "parse {} line {}: {e}",
                        path.display(),
                        lineno + 1
                    ))
                })?;
                entries.insert(entry.hash, entry.post_id);
            }
        }
        info!(path = %path.display(), known_hashes = entries.len(), "Loaded dedup index");
        Ok(Self {
            path: path.to_path_buf(),
            entries,
            pending: Vec::new(),
        })
    }

    /// Append all fingerprints recorded this run. Called once, after the run
    /// has produced its full output.
    pub fn commit(&mut self) -> Result<usize, ThreadsiftError> {
        if self.pending.is_empty() {
            return Ok(0);
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| ThreadsiftError::Index(format!("append {}: {e}", self.path.display())))?;
        let mut buf = String::new();
        for entry in &self.pending {
            let line = serde_json::to_string(entry)
                .map_err(|e| ThreadsiftError::Index(format!("serialize index entry: {e}")))?;
            buf.push_str(&line);
            buf.push('\n');
        }
        file.write_all(buf.as_bytes())
            .map_err(|e| ThreadsiftError::Index(format!("write {}: {e}", self.path.display())))?;
        let written = self.pending.len();
        self.pending.clear();
        info!(path = %self.path.display(), appended = written, "Committed dedup index");
        Ok(written)
    }
}

impl DedupIndex for FileIndex {
    fn contains(&self, hash: &str) -> bool {
        self.entries.contains_key(hash)
    }

    fn insert(&mut self, hash: &str, post_id: &str) {
        if self.entries.contains_key(hash) {
            return;
        }
        self.entries.insert(hash.to_string(), post_id.to_string());
        self.pending.push(IndexEntry {
            hash: hash.to_string(),
            post_id: post_id.to_string(),
        });
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
