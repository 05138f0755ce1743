//! # Auto Forecast
//!
//! Automatic selection of a time series forecasting model.
//!
//! ## Features
//!
//! - Nine candidate algorithms behind one [`ForecastModel`] trait: Olympic
//!   (trimmed windowed average), moving averages, naive carry-forward, linear
//!   and polynomial regression, simple, double and triple exponential smoothing
//! - In-sample error metrics (bias, MAD, MAPE, MSE, SAE) for every candidate
//! - Deterministic arg-min selection with parallel training on rayon
//! - JSON persistence of the chosen model
//! - CSV loading of `(timestamp, value)` series
//!
//! ## Quick Start
//!
//! ```rust
//! use auto_forecast::{AutoForecastConfig, AutoForecastModel, DataSequence};
//! use chrono::{Duration, TimeZone, Utc};
//!
//! # fn main() -> Result<(), auto_forecast::ForecastError> {
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let values: Vec<f64> = (0..20).map(|i| 2.0 + 3.0 * i as f64).collect();
//! let history = DataSequence::from_values(start, Duration::days(1), &values)?;
//!
//! let mut model = AutoForecastModel::new(AutoForecastConfig::default())?;
//! let selection = model.train(&history)?;
//! assert_eq!(selection.winner, "LinearRegressionModel");
//!
//! // forecast the next five days
//! let mut horizon = history.horizon(5)?;
//! model.predict(&mut horizon)?;
//! assert!((horizon.values()[0] - 62.0).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```

pub mod candidate;
pub mod config;
pub mod data;
pub mod error;
pub mod facade;
pub mod metrics;
pub mod models;
pub mod report;
pub mod selector;
pub mod utils;

// Re-export commonly used types
pub use crate::candidate::{Candidate, ModelRecord};
pub use crate::config::{AutoForecastConfig, ModelConfig, SelectionConfig};
pub use crate::data::{DataLoader, DataPoint, DataSequence};
pub use crate::error::{CandidateFailure, ForecastError, Result};
pub use crate::facade::{AutoForecastModel, UNSELECTED};
pub use crate::metrics::{ErrorMetrics, MetricWeights, SelectionMetric};
pub use crate::models::{ForecastModel, InSampleFit, ModelKind};
pub use crate::report::{LastChosenModel, LogReporter, NoopReporter, SelectionReporter};
pub use crate::selector::{CandidateScore, ModelSelector, Selection, SelectionOutcome};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
