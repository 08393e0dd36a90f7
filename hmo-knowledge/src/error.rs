use thiserror::Error;

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("data directory not found: {0}")]
    DataDirNotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, KnowledgeError>;
