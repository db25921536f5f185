use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodescoutError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Pattern error: {0}")]
    Pattern(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, CodescoutError>;
