use std::fs::File;

use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use insee_deces::{AgeBucket, PipelineConfig, Sex, load, write_parquet};

use crate::utils::{insee_row, timed_execution, write_source_file};

#[test]
fn test_end_to_end_two_files() {
    let data_dir = tempfile::tempdir().unwrap();
    let dir = data_dir.path().join("2020");
    write_source_file(&dir, "Deces_2020_a.csv", &[insee_row("19400101", "20200615", "1", "")]);
    write_source_file(&dir, "Deces_2020_b.csv", &[insee_row("20200101", "20190101", "2", "")]);

    let config = PipelineConfig::new(data_dir.path());
    let (elapsed, dataset) = timed_execution(|| load(&config, 2020).unwrap());
    println!("Loaded {} records in {elapsed:?}", dataset.len());

    assert_eq!(dataset.len(), 1);
    let record = &dataset.records()[0];
    assert_eq!(record.sex, Sex::Male);
    assert!((record.age - 80.45).abs() < 0.01);
    assert_eq!(record.death_year, 2020);
    assert_eq!(record.death_month, 6);
    assert_eq!(record.age_bucket, AgeBucket::From80To90);
    assert_eq!(dataset.stats().rows_read, 2);
    assert_eq!(dataset.stats().negative_ages, 1);
}

#[test]
fn test_repeated_loads_are_identical() {
    let data_dir = tempfile::tempdir().unwrap();
    let dir = data_dir.path().join("2020");
    for (idx, month) in ["01", "02", "03", "04"].iter().enumerate() {
        let rows: Vec<String> = (0..25)
            .map(|day| {
                insee_row(
                    &format!("19{:02}0101", 20 + day),
                    &format!("2020{month}{:02}", day + 1),
                    if day % 2 == 0 { "1" } else { "2" },
                    if day % 3 == 0 { "ALGERIE" } else { "" },
                )
            })
            .collect();
        write_source_file(&dir, &format!("Deces_2020_M{:02}.csv", idx + 1), &rows);
    }

    let config = PipelineConfig::new(data_dir.path());
    let first = load(&config, 2020).unwrap();
    let second = load(&config, 2020).unwrap();

    assert_eq!(first.len(), 100);
    assert_eq!(first, second);
    // Concatenated in file-name order
    let months: Vec<u32> = first.iter().map(|r| r.death_month).collect();
    assert!(months.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_queries_over_loaded_dataset() {
    let data_dir = tempfile::tempdir().unwrap();
    write_source_file(
        &data_dir.path().join("2020"),
        "Deces_2020.csv",
        &[
            insee_row("19400101", "20200615", "1", "ALGERIE"),
            insee_row("19300101", "20200110", "2", "ALGERIE"),
            insee_row("20150101", "20200110", "2", "MAROC"),
            insee_row("19200101", "20201231", "1", ""),
        ],
    );

    let dataset = load(&PipelineConfig::new(data_dir.path()), 2020).unwrap();
    assert_eq!(dataset.len(), 4);

    let monthly = dataset.monthly_counts_by_sex();
    assert_eq!(monthly.total.iter().sum::<usize>(), dataset.len());
    assert_eq!(monthly.total[0], 2);
    assert_eq!(monthly.women[0], 2);
    assert_eq!(monthly.men[11], 1);

    assert_eq!(dataset.women().len() + dataset.men().len(), dataset.len());

    let top = dataset.top_birth_countries(5);
    assert_eq!(top, vec![("ALGERIE".to_string(), 2), ("MAROC".to_string(), 1)]);

    let buckets = dataset.age_bucket_counts();
    assert_eq!(buckets.len(), 11);
    assert_eq!(buckets.iter().map(|(_, n)| n).sum::<usize>(), 4);
    assert_eq!(buckets[AgeBucket::From0To10.index()].1, 1);
    assert_eq!(buckets[AgeBucket::From100.index()].1, 1);
}

#[test]
fn test_export_to_parquet() {
    let data_dir = tempfile::tempdir().unwrap();
    write_source_file(
        &data_dir.path().join("2021"),
        "Deces_2021.csv",
        &[
            insee_row("19400101", "20210615", "1", ""),
            insee_row("19500202", "20210303", "2", "ITALIE"),
        ],
    );
    let dataset = load(&PipelineConfig::new(data_dir.path()), 2021).unwrap();

    let output = data_dir.path().join("out").join("deces_2021.parquet");
    write_parquet(&output, &[dataset.to_record_batch().unwrap()]).unwrap();

    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&output).unwrap())
        .unwrap()
        .build()
        .unwrap();
    let rows: usize = reader.map(|batch| batch.unwrap().num_rows()).sum();
    assert_eq!(rows, 2);
}
