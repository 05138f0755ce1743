//! Fit-quality metrics and the comparison used to rank candidates

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// In-sample error metrics of a trained candidate
///
/// Errors are signed as `fitted - actual`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorMetrics {
    /// Mean signed deviation
    pub bias: f64,
    /// Mean absolute deviation
    pub mad: f64,
    /// Mean absolute percentage error, as a fraction, over non-zero actuals
    pub mape: f64,
    /// Mean squared error
    pub mse: f64,
    /// Sum of absolute errors
    pub sae: f64,
}

impl ErrorMetrics {
    /// Compute the metrics of `fitted` against the aligned `actual` values
    ///
    /// Points whose actual value is zero do not contribute to MAPE. When every
    /// actual is zero MAPE is 0.
    pub fn compute(fitted: &[f64], actual: &[f64]) -> Result<Self> {
        if fitted.len() != actual.len() || fitted.is_empty() {
            return Err(ForecastError::DataError(format!(
                "Fitted ({}) and actual ({}) values must have the same non-zero length",
                fitted.len(),
                actual.len()
            )));
        }

        let errors: Vec<f64> = fitted.iter().zip(actual).map(|(f, a)| f - a).collect();

        let bias = errors.iter().mean();
        let mad = errors.iter().map(|e| e.abs()).mean();
        let mse = errors.iter().map(|e| e * e).mean();
        let sae = errors.iter().map(|e| e.abs()).sum::<f64>();

        let percentage: Vec<f64> = errors
            .iter()
            .zip(actual)
            .filter(|(_, &a)| a != 0.0)
            .map(|(e, a)| e.abs() / a.abs())
            .collect();
        let mape = if percentage.is_empty() {
            0.0
        } else {
            percentage.iter().mean()
        };

        Ok(Self {
            bias,
            mad,
            mape,
            mse,
            sae,
        })
    }

    /// Tab-separated debug line: the five metrics followed by two reserved zeros
    pub fn debug_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t0\t0",
            self.bias, self.mad, self.mape, self.mse, self.sae
        )
    }
}

impl std::fmt::Display for ErrorMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "bias={:.4} mad={:.4} mape={:.4} mse={:.4} sae={:.4}",
            self.bias, self.mad, self.mape, self.mse, self.sae
        )
    }
}

/// Weights of a linear combination of metrics; bias enters as its absolute value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricWeights {
    pub bias: f64,
    pub mad: f64,
    pub mape: f64,
    pub mse: f64,
    pub sae: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            bias: 0.0,
            mad: 0.0,
            mape: 0.0,
            mse: 1.0,
            sae: 0.0,
        }
    }
}

impl MetricWeights {
    fn as_array(&self) -> [f64; 5] {
        [self.bias, self.mad, self.mape, self.mse, self.sae]
    }

    /// Check that every weight is finite and non-negative and at least one is positive
    pub fn validate(&self) -> Result<()> {
        let weights = self.as_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ForecastError::InvalidParameter(
                "Metric weights must be finite and non-negative".to_string(),
            ));
        }
        if weights.iter().all(|w| *w == 0.0) {
            return Err(ForecastError::InvalidParameter(
                "At least one metric weight must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Relative margin a score must undercut the incumbent's by to count as better
pub const SCORE_RELATIVE_TOLERANCE: f64 = 1e-9;

/// Absolute margin below which two scores are a tie (floating-point residue of exact fits)
pub const SCORE_ABSOLUTE_TOLERANCE: f64 = 1e-9;

/// Metric that decides which of two candidates fits better (lower wins)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMetric {
    /// Absolute value of the bias
    Bias,
    Mad,
    Mape,
    #[default]
    Mse,
    Sae,
    /// Weighted sum of all five metrics
    Weighted(MetricWeights),
}

impl SelectionMetric {
    /// Score of a metrics tuple under this metric
    pub fn score(&self, metrics: &ErrorMetrics) -> f64 {
        match self {
            SelectionMetric::Bias => metrics.bias.abs(),
            SelectionMetric::Mad => metrics.mad,
            SelectionMetric::Mape => metrics.mape,
            SelectionMetric::Mse => metrics.mse,
            SelectionMetric::Sae => metrics.sae,
            SelectionMetric::Weighted(w) => {
                w.bias * metrics.bias.abs()
                    + w.mad * metrics.mad
                    + w.mape * metrics.mape
                    + w.mse * metrics.mse
                    + w.sae * metrics.sae
            }
        }
    }

    /// Strict comparison: `candidate` beats the incumbent when its score is lower
    /// by more than the tolerance.
    ///
    /// Any candidate beats an absent incumbent. Scores within
    /// `max(SCORE_RELATIVE_TOLERANCE * |incumbent|, SCORE_ABSOLUTE_TOLERANCE)`
    /// of each other tie, and ties never replace the incumbent.
    pub fn better_than(&self, candidate: &ErrorMetrics, incumbent: Option<&ErrorMetrics>) -> bool {
        match incumbent {
            None => true,
            Some(incumbent) => {
                let incumbent = self.score(incumbent);
                let margin =
                    (SCORE_RELATIVE_TOLERANCE * incumbent.abs()).max(SCORE_ABSOLUTE_TOLERANCE);
                self.score(candidate) < incumbent - margin
            }
        }
    }

    /// Short label for reports
    pub fn label(&self) -> &'static str {
        match self {
            SelectionMetric::Bias => "bias",
            SelectionMetric::Mad => "mad",
            SelectionMetric::Mape => "mape",
            SelectionMetric::Mse => "mse",
            SelectionMetric::Sae => "sae",
            SelectionMetric::Weighted(_) => "weighted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_compute_metrics() {
        let actual = [10.0, 20.0, 30.0, 40.0];
        let fitted = [12.0, 18.0, 33.0, 40.0];
        let m = ErrorMetrics::compute(&fitted, &actual).unwrap();

        assert_relative_eq!(m.bias, 3.0 / 4.0, epsilon = 1e-12);
        assert_relative_eq!(m.mad, 7.0 / 4.0, epsilon = 1e-12);
        assert_relative_eq!(m.mse, 17.0 / 4.0, epsilon = 1e-12);
        assert_relative_eq!(m.sae, 7.0, epsilon = 1e-12);
        assert_relative_eq!(m.mape, (0.2 + 0.1 + 0.1) / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mape_skips_zero_actuals() {
        let actual = [0.0, 10.0, 20.0];
        let fitted = [5.0, 11.0, 18.0];
        let m = ErrorMetrics::compute(&fitted, &actual).unwrap();

        // only the two non-zero actuals: (0.1 + 0.1) / 2
        assert_relative_eq!(m.mape, 0.1, epsilon = 1e-12);
        // the zero actual still counts everywhere else
        assert_relative_eq!(m.sae, 8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mape_all_zero_actuals() {
        let m = ErrorMetrics::compute(&[1.0, -1.0], &[0.0, 0.0]).unwrap();
        assert_eq!(m.mape, 0.0);
    }

    #[test]
    fn test_compute_rejects_bad_input() {
        assert!(ErrorMetrics::compute(&[], &[]).is_err());
        assert!(ErrorMetrics::compute(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_debug_line_layout() {
        let m = ErrorMetrics {
            bias: 1.0,
            mad: 2.0,
            mape: 0.5,
            mse: 4.0,
            sae: 8.0,
        };
        assert_eq!(m.debug_line(), "1\t2\t0.5\t4\t8\t0\t0");
    }

    #[test]
    fn test_better_than_is_strict() {
        let low = ErrorMetrics {
            bias: -3.0,
            mad: 1.0,
            mape: 0.1,
            mse: 1.0,
            sae: 10.0,
        };
        let high = ErrorMetrics {
            bias: 2.0,
            mse: 2.0,
            ..low
        };

        let metric = SelectionMetric::Mse;
        assert!(metric.better_than(&low, None));
        assert!(metric.better_than(&low, Some(&high)));
        assert!(!metric.better_than(&high, Some(&low)));
        assert!(!metric.better_than(&low, Some(&low)));

        // bias is compared by magnitude
        assert!(SelectionMetric::Bias.better_than(&high, Some(&low)));
    }

    #[test]
    fn test_rounding_residue_is_a_tie() {
        let exact = |mse: f64| ErrorMetrics {
            bias: 0.0,
            mad: mse.sqrt(),
            mape: 0.0,
            mse,
            sae: 0.0,
        };
        let metric = SelectionMetric::Mse;

        // residues of two exact fits do not reorder the candidates
        assert!(!metric.better_than(&exact(1.18e-30), Some(&exact(3.31e-30))));
        assert!(!metric.better_than(&exact(0.0), Some(&exact(3.02e-29))));
        assert!(!metric.better_than(&exact(1e6), Some(&exact(1e6 + 1e-4))));

        assert!(metric.better_than(&exact(1e-6), Some(&exact(1e-3))));
        assert!(metric.better_than(&exact(1e6), Some(&exact(1e6 + 1.0))));
    }

    #[test]
    fn test_weighted_score() {
        let m = ErrorMetrics {
            bias: -1.0,
            mad: 2.0,
            mape: 0.5,
            mse: 4.0,
            sae: 8.0,
        };
        let metric = SelectionMetric::Weighted(MetricWeights {
            bias: 1.0,
            mad: 0.0,
            mape: 2.0,
            mse: 0.5,
            sae: 0.0,
        });
        assert_relative_eq!(metric.score(&m), 1.0 + 1.0 + 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_weights_validation() {
        assert!(MetricWeights::default().validate().is_ok());
        let zero = MetricWeights {
            mse: 0.0,
            ..MetricWeights::default()
        };
        assert!(zero.validate().is_err());
        let negative = MetricWeights {
            mad: -1.0,
            ..MetricWeights::default()
        };
        assert!(negative.validate().is_err());
    }
}
