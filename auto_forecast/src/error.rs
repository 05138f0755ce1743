//! Error types for the auto_forecast crate

use std::time::Duration;
use thiserror::Error;

/// A candidate that was dropped from the selection pool, with the reason
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFailure {
    /// Stable name of the candidate
    pub model: String,
    /// Why the candidate was excluded
    pub reason: String,
}

impl std::fmt::Display for CandidateFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.model, self.reason)
    }
}

/// Custom error types for the auto_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The sequence is shorter than the candidate's minimum window
    #[error("Insufficient data for {model}: need at least {required} observations, got {actual}")]
    InsufficientData {
        model: String,
        required: usize,
        actual: usize,
    },

    /// Prediction requested from a model that holds no trained state
    #[error("Cannot predict before the model is trained")]
    PredictBeforeTrain,

    /// Trained-only state (metrics, persisted form) requested too early
    #[error("Model is not trained: cannot {0}")]
    NotTrained(&'static str),

    /// Every candidate failed to train
    #[error("No candidate model trained successfully ({} failed)", .failures.len())]
    SelectionExhausted { failures: Vec<CandidateFailure> },

    /// Name does not belong to the model registry
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// A candidate exceeded its training time budget
    #[error("Training {model} exceeded {limit:?}")]
    TrainingTimeout { model: String, limit: Duration },

    /// A candidate's training thread ended without reporting a result
    #[error("Training {0} stopped without producing a result")]
    TrainingAborted(String),

    /// Error from the numeric primitives
    #[error("Math error: {0}")]
    MathError(#[from] forecast_math::MathError),

    /// Error from JSON (de)serialization
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
