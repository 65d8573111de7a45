use std::fs;

use insee_deces::acquisition::ensure_years;
use insee_deces::{AcquisitionOutcome, FetchError, PipelineConfig, ensure_local, load};

use crate::utils::{MockFetcher, build_archive, insee_file, insee_row};

#[test]
fn test_ensure_local_is_idempotent() {
    let data_dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig::new(data_dir.path());
    let archive = build_archive(&[(
        "Deces_2021.csv",
        insee_file(&[insee_row("19400101", "20210615", "1", "")]),
    )]);
    let fetcher = MockFetcher::new().serve("Deces_2021.zip", archive);

    let first = ensure_local(&config, &fetcher, 2021).unwrap();
    let extracted = data_dir.path().join("2021").join("Deces_2021.csv");
    let content = fs::read_to_string(&extracted).unwrap();

    let second = ensure_local(&config, &fetcher, 2021).unwrap();

    assert!(matches!(first, AcquisitionOutcome::Extracted { entries: 1, .. }));
    assert!(matches!(second, AcquisitionOutcome::AlreadyPresent { .. }));
    assert_eq!(fetcher.requests().len(), 1);
    assert_eq!(fs::read_to_string(&extracted).unwrap(), content);
}

#[test]
fn test_http_error_leaves_no_partial_directory() {
    let data_dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig::new(data_dir.path());
    let fetcher = MockFetcher::new();

    let outcome = ensure_local(&config, &fetcher, 2022).unwrap();
    match &outcome {
        AcquisitionOutcome::Unavailable { url, error, .. } => {
            assert!(url.ends_with("Deces_2022.zip"));
            assert!(matches!(error, FetchError::Status { status: 404, .. }));
        }
        other => panic!("expected Unavailable, got {other:?}"),
    }
    assert_eq!(fs::read_dir(data_dir.path()).unwrap().count(), 0);

    // Nothing on disk: ingestion yields an empty dataset, not an error
    let dataset = load(&config, 2022).unwrap();
    assert!(dataset.is_empty());
}

#[test]
fn test_corrupt_archive_is_an_error_and_leaves_nothing() {
    let data_dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig::new(data_dir.path());
    let fetcher = MockFetcher::new().serve("Deces_2021.zip", b"not a zip".to_vec());

    assert!(ensure_local(&config, &fetcher, 2021).is_err());
    assert!(!data_dir.path().join("2021").exists());
    let leftovers: Vec<_> = fs::read_dir(data_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert!(leftovers.is_empty(), "left behind {leftovers:?}");
}

#[test]
fn test_fetch_range_continues_past_unavailable_periods() {
    let data_dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig::new(data_dir.path());
    let archive = build_archive(&[(
        "Deces_2021.csv",
        insee_file(&[insee_row("19400101", "20210615", "1", "")]),
    )]);
    let fetcher = MockFetcher::new().serve("Deces_2021.zip", archive);

    let outcomes = ensure_years(&config, &fetcher, 2020..=2022).unwrap();
    let available: Vec<bool> = outcomes.iter().map(AcquisitionOutcome::is_available).collect();
    assert_eq!(available, vec![false, true, false]);
    assert_eq!(fetcher.requests().len(), 3);
}
