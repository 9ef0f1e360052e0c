use crate::data_model::{ExclusionReason, Record};
use thiserror::Error;

/// Custom Result type for this crate.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// The Error type for pipeline operations.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Configuration validation error: {0}")]
    ConfigValidationError(String),

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV error: {source}")]
    CsvError {
        #[from]
        source: csv::Error,
    },

    /// Row-level rejection. Counted by the runner, never surfaced to the user.
    #[error("Record filtered out ({reason}): {detail}")]
    RecordFiltered {
        record: Box<Record>,
        reason: ExclusionReason,
        detail: String,
    },

    #[error("Error in processing step '{step_name}': {source}")]
    StepError {
        step_name: String,
        source: Box<PipelineError>,
    },

    #[error("No records survived filtering; nothing to write to '{0}'")]
    EmptyOutput(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl PipelineError {
    /// Shorthand used by filter steps to reject a record.
    pub fn filtered(record: Record, reason: ExclusionReason, detail: impl Into<String>) -> Self {
        PipelineError::RecordFiltered {
            record: Box::new(record),
            reason,
            detail: detail.into(),
        }
    }
}
