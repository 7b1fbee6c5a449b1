//! Errors raised while loading plans, schedules and overrides
//!
//! The projection itself never fails; only the I/O edge does.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlanError>;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid row at line {line}: {message}")]
    InvalidRow { line: u64, message: String },
}

impl PlanError {
    pub fn invalid_row(line: u64, message: impl Into<String>) -> Self {
        Self::InvalidRow {
            line,
            message: message.into(),
        }
    }
}
