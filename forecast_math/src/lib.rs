//! # Forecast Math
//!
//! Numeric building blocks for the forecasting candidates: window averages,
//! least-squares regression and exponential smoothing recurrences.

use thiserror::Error;

pub mod moving_averages;
pub mod regression;
pub mod smoothing;

pub use moving_averages::{trimmed_mean, SimpleMovingAverage, WeightedMovingAverage};
pub use regression::{LinearFit, PolynomialFit};
pub use smoothing::{DoubleExponentialSmoothing, ExponentialSmoothing, HoltWinters};

/// Errors that can occur in forecasting calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for forecasting math operations
pub type Result<T> = std::result::Result<T, MathError>;
