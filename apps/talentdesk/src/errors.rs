use serde_json::{json, Value};
use thiserror::Error;

/// Failures of the key-value substrate itself.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Value stored under '{key}' is not valid JSON for the requested type")]
    Corrupt { key: String },

    #[error("Store lock poisoned")]
    Poisoned,
}

/// Application-level error type.
/// Validation rejections and `NotFound` are recoverable outcomes the view layer
/// turns into messages; only `Store` is a fault.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Question cannot be empty")]
    EmptyQuestion,

    #[error("This question already exists for this job")]
    DuplicateQuestion,

    #[error("Job title cannot be empty")]
    EmptyJobTitle,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl AppError {
    /// Stable machine-readable code for the view layer.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::EmptyQuestion => "EMPTY_QUESTION",
            AppError::DuplicateQuestion => "DUPLICATE_QUESTION",
            AppError::EmptyJobTitle => "EMPTY_JOB_TITLE",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Store(_) => "STORE_ERROR",
        }
    }

    /// True only for substrate failures. Everything else left the store untouched.
    pub fn is_fault(&self) -> bool {
        matches!(self, AppError::Store(_))
    }

    pub fn to_json(&self) -> Value {
        let message = match self {
            AppError::Store(e) => {
                tracing::error!("Store error: {e}");
                "A storage error occurred".to_string()
            }
            other => other.to_string(),
        };

        json!({
            "error": {
                "code": self.code(),
                "message": message
            }
        })
    }
}

pub type AppResult<T> = Result<T, AppError>;
