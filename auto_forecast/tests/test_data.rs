use auto_forecast::data::{DataLoader, DataPoint, DataSequence};
use auto_forecast::error::ForecastError;
use chrono::{Duration, TimeZone, Utc};
use std::io::Write;
use tempfile::NamedTempFile;

fn csv_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

#[test]
fn test_data_loader_from_csv() {
    let file = csv_file(&[
        "date,open,close,volume",
        "2023-01-01,100.0,103.0,1000",
        "2023-01-02,103.0,106.0,1200",
        "2023-01-03,106.0,108.0,1500",
    ]);

    let data = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(data.len(), 3);
    assert!(!data.is_empty());
    assert_eq!(data.values(), vec![103.0, 106.0, 108.0]);
    assert_eq!(data.interval(), Some(Duration::days(1)));
}

#[test]
fn test_data_loader_epoch_and_fallback_columns() {
    let file = csv_file(&["t,reading", "1700000000,1.5", "1700003600,2.5"]);

    let data = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(data.values(), vec![1.5, 2.5]);
    assert_eq!(
        data.first_timestamp(),
        Some(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
    );
    assert_eq!(data.interval(), Some(Duration::hours(1)));
}

#[test]
fn test_data_loader_rejects_bad_input() {
    let unsorted = csv_file(&["date,value", "2023-01-02,1.0", "2023-01-01,2.0"]);
    assert!(matches!(
        DataLoader::from_csv(unsorted.path()),
        Err(ForecastError::DataError(_))
    ));

    let bad_value = csv_file(&["date,value", "2023-01-01,abc"]);
    assert!(DataLoader::from_csv(bad_value.path()).is_err());

    let empty = csv_file(&["date,value"]);
    assert!(DataLoader::from_csv(empty.path()).is_err());

    assert!(matches!(
        DataLoader::from_csv("/nonexistent/series.csv"),
        Err(ForecastError::IoError(_))
    ));
}

#[test]
fn test_sequence_operations() {
    let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let data =
        DataSequence::from_values(start, Duration::weeks(1), &[1.0, 2.0, 3.0, 4.0]).unwrap();

    let slice = data.slice(1, Some(3)).unwrap();
    assert_eq!(slice.values(), vec![2.0, 3.0]);
    assert!(data.slice(3, Some(2)).is_err());

    let horizon = data.horizon(3).unwrap();
    assert_eq!(horizon.len(), 3);
    assert_eq!(
        horizon.last_timestamp(),
        Some(start + Duration::weeks(6))
    );

    let points = vec![DataPoint::new(start, 1.0)];
    let single = DataSequence::new(points).unwrap();
    assert_eq!(single.interval(), None);
}
