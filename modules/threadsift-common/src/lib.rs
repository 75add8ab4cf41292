pub mod config;
pub mod error;
pub mod lexicon;
pub mod types;

pub use config::PipelineConfig;
pub use error::ThreadsiftError;
pub use types::*;
