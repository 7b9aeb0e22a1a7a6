use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrowOpsError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Cannot advance stage: {0}")]
    StageAdvance(String),
}

pub type Result<T> = std::result::Result<T, GrowOpsError>;
