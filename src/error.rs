//! Error types shared by the store, the pipeline and the server.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// A vector's length disagrees with the dimension fixed by the first `add`.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Embedding error: {0}")]
    Embedding(String),
}

impl StoreError {
    /// True for errors caused by the caller's input rather than the environment.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            StoreError::DimensionMismatch { .. } | StoreError::InvalidArgument(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
