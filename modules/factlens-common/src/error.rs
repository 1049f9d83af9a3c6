use thiserror::Error;

/// Run-level errors. Per-check research failures never appear here —
/// they are absorbed into insufficient findings by the research stage.
#[derive(Error, Debug)]
pub enum FactLensError {
    #[error("Claim is empty")]
    EmptyClaim,

    #[error("Input text is empty")]
    EmptyInput,

    #[error("Planning failed: {0}")]
    Planning(String),

    #[error("Judging failed: {0}")]
    Judging(String),

    #[error("Claim extraction failed: {0}")]
    Extraction(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported provider combination: {0}")]
    Unsupported(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
