//! Least-squares regression
//!
//! Contains batch fits used for trend forecasting:
//! - Linear Regression (ordinary least squares line)
//! - Polynomial Regression (normal equations, Gaussian elimination)

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Pivot magnitude below which the normal equations are treated as singular.
const SINGULAR_PIVOT: f64 = 1e-12;

/// Fitted straight line `y = intercept + slope * x`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
}

impl LinearFit {
    /// Fit a least-squares line through the points `(xs[i], ys[i])`
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(MathError::InvalidInput(format!(
                "x and y lengths differ ({} vs {})",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < 2 {
            return Err(MathError::InsufficientData(
                "Not enough data for linear regression. Need at least 2 points.".to_string(),
            ));
        }

        let n = xs.len() as f64;
        let x_mean = xs.iter().sum::<f64>() / n;
        let y_mean = ys.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (&x, &y) in xs.iter().zip(ys) {
            numerator += (x - x_mean) * (y - y_mean);
            denominator += (x - x_mean) * (x - x_mean);
        }

        if denominator.abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Cannot calculate slope: x values are too similar".to_string(),
            ));
        }

        let slope = numerator / denominator;
        Ok(Self {
            intercept: y_mean - slope * x_mean,
            slope,
        })
    }

    /// Value of the line at `x`
    pub fn value_at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fitted polynomial, coefficients in ascending order of power
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialFit {
    coefficients: Vec<f64>,
}

impl PolynomialFit {
    /// Fit a least-squares polynomial of the given degree
    pub fn fit(xs: &[f64], ys: &[f64], degree: usize) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(MathError::InvalidInput(format!(
                "x and y lengths differ ({} vs {})",
                xs.len(),
                ys.len()
            )));
        }
        if degree == 0 {
            return Err(MathError::InvalidInput(
                "Polynomial degree must be at least 1".to_string(),
            ));
        }
        let terms = degree + 1;
        if xs.len() < terms {
            return Err(MathError::InsufficientData(format!(
                "Not enough data for a degree {} polynomial. Need {} points, have {}.",
                degree,
                terms,
                xs.len()
            )));
        }

        // Normal equations: (X^T X) c = X^T y, with (X^T X)[j][k] = sum x^(j+k)
        let mut power_sums = vec![0.0; 2 * degree + 1];
        let mut rhs = vec![0.0; terms];
        for (&x, &y) in xs.iter().zip(ys) {
            let mut p = 1.0;
            for (k, sum) in power_sums.iter_mut().enumerate() {
                *sum += p;
                if k < terms {
                    rhs[k] += p * y;
                }
                p *= x;
            }
        }

        let mut matrix: Vec<Vec<f64>> = (0..terms)
            .map(|row| power_sums[row..row + terms].to_vec())
            .collect();

        let coefficients = solve_linear_system(&mut matrix, &mut rhs)?;
        Ok(Self { coefficients })
    }

    /// Value of the polynomial at `x` (Horner's scheme)
    pub fn value_at(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * x + c)
    }

    /// Coefficients in ascending order of power
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Degree of the polynomial
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }
}

/// Solve `matrix * x = rhs` in place with partial pivoting
fn solve_linear_system(matrix: &mut [Vec<f64>], rhs: &mut [f64]) -> Result<Vec<f64>> {
    let n = rhs.len();

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&a, &b| matrix[a][col].abs().total_cmp(&matrix[b][col].abs()))
            .unwrap_or(col);

        if matrix[pivot_row][col].abs() < SINGULAR_PIVOT {
            return Err(MathError::CalculationError(
                "Normal equations are singular".to_string(),
            ));
        }

        matrix.swap(col, pivot_row);
        rhs.swap(col, pivot_row);

        for row in col + 1..n {
            let factor = matrix[row][col] / matrix[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                matrix[row][k] -= factor * matrix[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut solution = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| matrix[row][k] * solution[k]).sum();
        solution[row] = (rhs[row] - tail) / matrix[row][row];
    }

    Ok(solution)
}
