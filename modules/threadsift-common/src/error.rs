use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThreadsiftError {
    #[error("Input error: {0}")]
    Input(String),

    #[error("Empty input batch: nothing to process")]
    EmptyInput,

    #[error("Dedup index error: {0}")]
    Index(String),

    #[error("Normalization error: {0}")]
    Normalize(String),

    #[error("Scoring error: {0}")]
    Score(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
