use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AiError {
    #[error("invalid rationale input: {0}")]
    InvalidInput(String),

    #[error("inference failed: {0}")]
    InferenceFailed(String),

    #[error("internal error: {0}")]
    Internal(String),
}
