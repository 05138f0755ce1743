//! # Auto Forecast Workspace
//!
//! Umbrella crate re-exporting the workspace members:
//!
//! - [`forecast_math`]: window averages, least-squares fits and exponential
//!   smoothing recurrences
//! - [`auto_forecast`]: candidate models, error metrics and automatic model
//!   selection
//!
//! ## Example
//!
//! ```
//! use auto_forecast_workspace::auto_forecast::{AutoForecastConfig, AutoForecastModel, UNSELECTED};
//!
//! let model = AutoForecastModel::new(AutoForecastConfig::default()).unwrap();
//! assert_eq!(model.name(), UNSELECTED);
//! ```

pub use auto_forecast;
pub use forecast_math;
