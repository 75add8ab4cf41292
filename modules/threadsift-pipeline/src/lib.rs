//! Bookmark processing pipeline: normalize → dedup → thread → score → aggregate.
//!
//! Stages run strictly forward over an in-memory batch; the persisted dedup
//! index is the only state shared across runs. Each stage returns new
//! annotated records rather than mutating prior output.

pub mod aggregator;
pub mod dedup;
pub mod export;
pub mod index;
pub mod normalizer;
pub mod pipeline;
pub mod scorer;
pub mod stats;
pub mod threader;

pub use index::{DedupIndex, FileIndex, MemoryIndex};
pub use pipeline::{Pipeline, RunOutput};
pub use stats::RunStats;
