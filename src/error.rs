//! Error types for loading inputs and running projections

use thiserror::Error;

/// Errors raised by the loaders and the projection engine
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// Too few valid historical rows to fit a trend
    #[error("insufficient data: {valid} valid historical rows, at least {required} required")]
    InsufficientData { valid: usize, required: usize },

    /// No historical rows at all, so there is no month to anchor the projection
    #[error("historical cancellation table is empty")]
    EmptyHistory,

    #[error("invalid month: {0:?}")]
    InvalidMonth(String),

    #[error("unknown category: {0:?}")]
    UnknownCategory(String),

    #[error("unknown currency: {0:?}")]
    UnknownCurrency(String),

    /// Projection settings that cannot produce a meaningful run
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProjectionError>;
