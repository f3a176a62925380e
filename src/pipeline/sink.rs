use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;
use log::info;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;
use parquet::format::KeyValue;
use tempfile::NamedTempFile;

use super::PipelineError;
use crate::rollup::PeptideIntensity;
use crate::schema::{columns, create_peptide_schema_arc};

/// Consumer of final peptide rows
pub trait PeptideSink {
    /// Accept one sample's rows
    fn write_rows(&mut self, rows: &[PeptideIntensity]) -> Result<(), PipelineError>;
}

impl PeptideSink for Vec<PeptideIntensity> {
    fn write_rows(&mut self, rows: &[PeptideIntensity]) -> Result<(), PipelineError> {
        self.extend_from_slice(rows);
        Ok(())
    }
}

impl<S: PeptideSink + ?Sized> PeptideSink for &mut S {
    fn write_rows(&mut self, rows: &[PeptideIntensity]) -> Result<(), PipelineError> {
        (**self).write_rows(rows)
    }
}

impl<S: PeptideSink> PeptideSink for Option<S> {
    fn write_rows(&mut self, rows: &[PeptideIntensity]) -> Result<(), PipelineError> {
        match self {
            Some(sink) => sink.write_rows(rows),
            None => Ok(()),
        }
    }
}

impl<A: PeptideSink, B: PeptideSink> PeptideSink for (A, B) {
    fn write_rows(&mut self, rows: &[PeptideIntensity]) -> Result<(), PipelineError> {
        self.0.write_rows(rows)?;
        self.1.write_rows(rows)
    }
}

/// Temporary file next to `path`, persisted over it on success
fn temporary_next_to(path: &Path) -> Result<NamedTempFile, PipelineError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok(tempfile::Builder::new().prefix(".pepnorm-").tempfile_in(dir)?)
}

/// Delimited-text peptide writer.
///
/// Rows go to a temporary file that replaces `path` only in [`finish`](Self::finish);
/// a writer dropped without finishing leaves no output behind.
pub struct CsvPeptideWriter {
    path: PathBuf,
    writer: csv::Writer<NamedTempFile>,
    rows_written: usize,
}

impl CsvPeptideWriter {
    /// Comma-separated writer
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        Self::with_delimiter(path, b',')
    }

    /// Writer with a custom field delimiter
    pub fn with_delimiter<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Self, PipelineError> {
        let path = path.as_ref().to_path_buf();
        let temp = temporary_next_to(&path)?;
        let writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(temp);
        Ok(Self {
            path,
            writer,
            rows_written: 0,
        })
    }

    /// Flush, then move the output into place
    pub fn finish(mut self) -> Result<usize, PipelineError> {
        if self.rows_written == 0 {
            // header only
            self.writer.write_record([
                columns::PEPTIDE_CANONICAL,
                columns::PROTEIN_NAME,
                columns::SAMPLE_ID,
                columns::NORM_INTENSITY,
                columns::OUTPUT_CONDITION,
            ])?;
        }
        let temp = self.writer.into_inner().map_err(|e| e.into_error())?;
        temp.persist(&self.path).map_err(|e| e.error)?;
        info!("Wrote {} peptide rows to {}", self.rows_written, self.path.display());
        Ok(self.rows_written)
    }
}

impl PeptideSink for CsvPeptideWriter {
    fn write_rows(&mut self, rows: &[PeptideIntensity]) -> Result<(), PipelineError> {
        for row in rows {
            self.writer.serialize(row)?;
        }
        self.rows_written += rows.len();
        Ok(())
    }
}

/// Parquet peptide writer (ZSTD, one row group per `row_group_size` rows).
///
/// Like [`CsvPeptideWriter`], output only appears once [`finish`](Self::finish) succeeds.
pub struct ParquetPeptideWriter {
    path: PathBuf,
    writer: ArrowWriter<NamedTempFile>,
    schema: Arc<Schema>,
    buffer: Vec<PeptideIntensity>,
    row_group_size: usize,
    rows_written: usize,
}

impl ParquetPeptideWriter {
    /// Default rows per row group
    pub const DEFAULT_ROW_GROUP_SIZE: usize = 100_000;

    /// Create a writer for `path`
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path = path.as_ref().to_path_buf();
        let schema = create_peptide_schema_arc();
        let props = WriterProperties::builder()
            .set_compression(Compression::ZSTD(ZstdLevel::try_new(3).unwrap_or_default()))
            .set_max_row_group_size(Self::DEFAULT_ROW_GROUP_SIZE)
            .set_key_value_metadata(Some(vec![KeyValue {
                key: "pepnorm:version".to_string(),
                value: Some(env!("CARGO_PKG_VERSION").to_string()),
            }]))
            .build();
        let writer = ArrowWriter::try_new(temporary_next_to(&path)?, schema.clone(), Some(props))?;
        Ok(Self {
            path,
            writer,
            schema,
            buffer: Vec::new(),
            row_group_size: Self::DEFAULT_ROW_GROUP_SIZE,
            rows_written: 0,
        })
    }

    fn flush_buffer(&mut self) -> Result<(), PipelineError> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let rows = std::mem::take(&mut self.buffer);
        let arrays: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.canonical.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.protein.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.sample.as_str()))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.norm_intensity))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.condition.as_str()))),
        ];
        let batch = RecordBatch::try_new(self.schema.clone(), arrays)?;
        self.writer.write(&batch)?;
        self.rows_written += rows.len();
        Ok(())
    }

    /// Write the footer, then move the output into place
    pub fn finish(mut self) -> Result<usize, PipelineError> {
        self.flush_buffer()?;
        let temp = self.writer.into_inner()?;
        temp.persist(&self.path).map_err(|e| e.error)?;
        info!("Wrote {} peptide rows to {}", self.rows_written, self.path.display());
        Ok(self.rows_written)
    }
}

impl PeptideSink for ParquetPeptideWriter {
    fn write_rows(&mut self, rows: &[PeptideIntensity]) -> Result<(), PipelineError> {
        self.buffer.extend_from_slice(rows);
        if self.buffer.len() >= self.row_group_size {
            self.flush_buffer()?;
        }
        Ok(())
    }
}

/// Read a peptide parquet file written by [`ParquetPeptideWriter`]
pub fn read_peptide_parquet<P: AsRef<Path>>(path: P) -> Result<Vec<PeptideIntensity>, PipelineError> {
    use arrow::array::Array;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    fn strings<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray, PipelineError> {
        batch
            .column_by_name(name)
            .and_then(|c| c.as_any().downcast_ref::<StringArray>())
            .ok_or_else(|| {
                PipelineError::ArrowError(arrow::error::ArrowError::SchemaError(format!(
                    "missing Utf8 column {}",
                    name
                )))
            })
    }

    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(path)?)?.build()?;
    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch?;
        let canonical = strings(&batch, columns::PEPTIDE_CANONICAL)?;
        let protein = strings(&batch, columns::PROTEIN_NAME)?;
        let sample = strings(&batch, columns::SAMPLE_ID)?;
        let condition = strings(&batch, columns::OUTPUT_CONDITION)?;
        let intensity = batch
            .column_by_name(columns::NORM_INTENSITY)
            .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
            .ok_or_else(|| {
                PipelineError::ArrowError(arrow::error::ArrowError::SchemaError(
                    "missing Float64 NormIntensity column".to_string(),
                ))
            })?;
        for i in 0..batch.num_rows() {
            rows.push(PeptideIntensity {
                canonical: canonical.value(i).to_string(),
                protein: protein.value(i).to_string(),
                sample: sample.value(i).to_string(),
                norm_intensity: intensity.value(i),
                condition: condition.value(i).to_string(),
            });
        }
    }
    Ok(rows)
}
