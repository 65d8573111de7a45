use std::sync::Arc;

use insee_deces::{Pipeline, PipelineConfig};

use crate::utils::{MockFetcher, build_archive, insee_file, insee_row};

fn fetcher() -> Arc<MockFetcher> {
    let year_archive = |year: i32| {
        build_archive(&[(
            format!("Deces_{year}.csv").as_str(),
            insee_file(&[
                insee_row("19400101", &format!("{year}0615"), "1", ""),
                insee_row("19450303", &format!("{year}0101"), "2", "ESPAGNE"),
            ]),
        )])
    };
    Arc::new(
        MockFetcher::new()
            .serve("Deces_2020.zip", year_archive(2020))
            .serve("Deces_2021.zip", year_archive(2021)),
    )
}

#[test]
fn test_switching_years_reuses_cached_stages() {
    let data_dir = tempfile::tempdir().unwrap();
    let fetcher = fetcher();
    let pipeline =
        Pipeline::with_fetcher(PipelineConfig::new(data_dir.path()), Arc::clone(&fetcher)).unwrap();

    let first_2021 = pipeline.select_year(2021).unwrap();
    let first_2020 = pipeline.select_year(2020).unwrap();
    let again_2021 = pipeline.select_year(2021).unwrap();

    assert_eq!(first_2021.year(), Some(2021));
    assert_eq!(first_2020.year(), Some(2020));
    assert_eq!(first_2021.len(), 2);
    assert_eq!(first_2020.len(), 2);
    assert!(Arc::ptr_eq(&first_2021, &again_2021));
    assert_eq!(fetcher.requests().len(), 2);
    assert_eq!(pipeline.selected_year(), Some(2021));
}

#[test]
fn test_unavailable_year_yields_empty_dataset() {
    let data_dir = tempfile::tempdir().unwrap();
    let fetcher = fetcher();
    let pipeline =
        Pipeline::with_fetcher(PipelineConfig::new(data_dir.path()), Arc::clone(&fetcher)).unwrap();

    let dataset = pipeline.select_year(2022).unwrap();
    assert!(dataset.is_empty());

    // Unavailable outcomes are not cached, so the next selection tries again
    pipeline.select_year(2022).unwrap();
    assert_eq!(fetcher.requests().len(), 2);
}

#[test]
fn test_deleted_period_directory_is_fetched_again() {
    let data_dir = tempfile::tempdir().unwrap();
    let fetcher = fetcher();
    let pipeline =
        Pipeline::with_fetcher(PipelineConfig::new(data_dir.path()), Arc::clone(&fetcher)).unwrap();

    pipeline.run(2020).unwrap();
    std::fs::remove_dir_all(data_dir.path().join("2020")).unwrap();
    let dataset = pipeline.run(2020).unwrap();

    assert_eq!(dataset.len(), 2);
    assert_eq!(fetcher.requests().len(), 2);
}

#[test]
fn test_unsupported_year_is_rejected() {
    let data_dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::with_fetcher(PipelineConfig::new(data_dir.path()), fetcher()).unwrap();
    assert!(pipeline.select_year(1969).is_err());
    assert!(pipeline.select_year(2030).is_err());
}
