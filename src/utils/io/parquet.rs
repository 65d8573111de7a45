//! Parquet output
//!
//! Writes Arrow record batches to a single Parquet file.

use std::fs::File;
use std::path::Path;
use std::time::Instant;

use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use crate::error::util::ensure_directory;
use crate::error::{DecesError, Result};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Write `batches` to `path`, creating parent directories as needed
///
/// All batches must share the schema of the first one. Writing an empty slice
/// is a no-op.
pub fn write_parquet(path: &Path, batches: &[RecordBatch]) -> Result<()> {
    let Some(first) = batches.first() else {
        log::warn!("Nothing to write to {}", path.display());
        return Ok(());
    };

    log_operation_start("Writing parquet file", path);
    let start = Instant::now();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_directory(parent)?;
    }

    let file = File::create(path).map_err(|e| DecesError::io(path, e))?;
    let mut writer = ArrowWriter::try_new(file, first.schema(), None)?;
    let mut rows = 0;
    for batch in batches {
        writer.write(batch)?;
        rows += batch.num_rows();
    }
    writer.close()?;

    log_operation_complete("Wrote", path, rows, Some(start.elapsed()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Int32Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use std::sync::Arc;

    #[test]
    fn test_write_and_read_back() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("year", DataType::Int32, false),
            Field::new("label", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int32Array::from(vec![2020, 2021])),
                Arc::new(StringArray::from(vec![Some("a"), None])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("deaths.parquet");
        write_parquet(&path, &[batch]).unwrap();

        let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&path).unwrap())
            .unwrap()
            .build()
            .unwrap();
        let rows: usize = reader.map(|b| b.unwrap().num_rows()).sum();
        assert_eq!(rows, 2);
    }

    #[test]
    fn test_empty_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("none.parquet");
        write_parquet(&path, &[]).unwrap();
        assert!(!path.exists());
    }
}
