use auto_forecast::error::{CandidateFailure, ForecastError};
use std::io;
use std::time::Duration;

#[test]
fn test_error_conversion() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    assert!(matches!(
        ForecastError::from(io_error),
        ForecastError::IoError(_)
    ));

    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(matches!(
        ForecastError::from(json_error),
        ForecastError::Serialization(_)
    ));

    let math_error = forecast_math::MathError::InvalidInput("bad".to_string());
    assert!(matches!(
        ForecastError::from(math_error),
        ForecastError::MathError(_)
    ));
}

#[test]
fn test_error_display() {
    let error = ForecastError::InvalidParameter("alpha must be between 0 and 1".to_string());
    assert_eq!(
        error.to_string(),
        "Invalid parameter: alpha must be between 0 and 1"
    );

    let error = ForecastError::InsufficientData {
        model: "OlympicModel".to_string(),
        required: 8,
        actual: 3,
    };
    assert_eq!(
        error.to_string(),
        "Insufficient data for OlympicModel: need at least 8 observations, got 3"
    );

    let error = ForecastError::SelectionExhausted {
        failures: vec![
            CandidateFailure {
                model: "NaiveForecastingModel".to_string(),
                reason: "too short".to_string(),
            },
            CandidateFailure {
                model: "OlympicModel".to_string(),
                reason: "too short".to_string(),
            },
        ],
    };
    assert_eq!(
        error.to_string(),
        "No candidate model trained successfully (2 failed)"
    );

    let error = ForecastError::TrainingTimeout {
        model: "PolynomialRegressionModel".to_string(),
        limit: Duration::from_millis(250),
    };
    assert_eq!(
        error.to_string(),
        "Training PolynomialRegressionModel exceeded 250ms"
    );

    assert_eq!(
        ForecastError::PredictBeforeTrain.to_string(),
        "Cannot predict before the model is trained"
    );
}
