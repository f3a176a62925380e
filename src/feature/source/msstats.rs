use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use log::debug;
use serde::Deserialize;

use super::{FeatureBatches, FeatureSource, SourceError};
use crate::feature::RawFeature;

/// One row of an MSstats input table
#[derive(Debug, Deserialize)]
struct MsstatsRow {
    #[serde(rename = "ProteinName")]
    protein_name: String,
    #[serde(rename = "PeptideSequence")]
    peptide_sequence: String,
    #[serde(rename = "PeptideCanonical", default)]
    peptide_canonical: Option<String>,
    #[serde(rename = "PrecursorCharge", default)]
    precursor_charge: Option<i32>,
    #[serde(rename = "Intensity", default, deserialize_with = "csv::invalid_option")]
    intensity: Option<f64>,
    #[serde(rename = "Reference")]
    reference: String,
    #[serde(rename = "Run", default)]
    run: Option<String>,
    #[serde(rename = "Condition")]
    condition: String,
    #[serde(rename = "BioReplicate", default)]
    bio_replicate: Option<String>,
    #[serde(rename = "Fraction", default)]
    fraction: Option<String>,
    #[serde(rename = "Channel", default)]
    channel: Option<String>,
    #[serde(rename = "IsotopeLabelType", default)]
    isotope_label_type: Option<String>,
    #[serde(rename = "searchScore", default, deserialize_with = "csv::invalid_option")]
    search_score: Option<f64>,
}

impl From<MsstatsRow> for RawFeature {
    fn from(row: MsstatsRow) -> Self {
        let run = row.run.unwrap_or_else(|| row.reference.clone());
        RawFeature {
            protein_accessions: row.protein_name,
            peptidoform: row.peptide_sequence,
            canonical: row.peptide_canonical.filter(|s| !s.is_empty()),
            charge: row.precursor_charge.unwrap_or(0),
            intensity: row.intensity.unwrap_or(f64::NAN),
            reference: row.reference,
            run,
            condition: row.condition,
            bio_replicate: row.bio_replicate.unwrap_or_default(),
            fraction: row.fraction.filter(|s| !s.is_empty()),
            channel: row.channel.filter(|s| !s.is_empty()),
            isotope_label: row.isotope_label_type,
            sample_accession: None,
            score: row.search_score,
        }
    }
}

/// Streaming reader over an MSstats-format CSV/TSV, optionally gzip-compressed
#[derive(Debug, Clone)]
pub struct CsvFeatureSource {
    path: PathBuf,
    batch_size: usize,
    delimiter: u8,
}

impl CsvFeatureSource {
    /// Open an MSstats table.
    ///
    /// The delimiter is a tab for `.tsv`/`.tsv.gz` files and a comma otherwise.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SourceError::MissingSource(path.to_path_buf()));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let name = name.strip_suffix(".gz").unwrap_or(&name);
        let delimiter = if name.ends_with(".tsv") { b'\t' } else { b',' };

        Ok(Self {
            path: path.to_path_buf(),
            batch_size: super::DEFAULT_BATCH_SIZE,
            delimiter,
        })
    }

    /// Set the number of rows per batch
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Override the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn is_gzip(&self) -> bool {
        self.path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
    }
}

impl FeatureSource for CsvFeatureSource {
    fn batches(&self, samples: Option<&HashSet<String>>) -> Result<FeatureBatches<'_>, SourceError> {
        let file = BufReader::new(File::open(&self.path)?);
        let input: Box<dyn Read> = if self.is_gzip() {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };
        let reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(input);
        debug!("Streaming {} in batches of {}", self.path.display(), self.batch_size);

        Ok(Box::new(CsvBatches {
            rows: reader.into_deserialize(),
            batch_size: self.batch_size,
            samples: samples.cloned(),
            done: false,
        }))
    }
}

struct CsvBatches {
    rows: csv::DeserializeRecordsIntoIter<Box<dyn Read>, MsstatsRow>,
    batch_size: usize,
    samples: Option<HashSet<String>>,
    done: bool,
}

impl Iterator for CsvBatches {
    type Item = Result<Vec<RawFeature>, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut batch = Vec::with_capacity(self.batch_size.min(65_536));
        while batch.len() < self.batch_size {
            match self.rows.next() {
                Some(Ok(row)) => batch.push(RawFeature::from(row)),
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                None => {
                    self.done = true;
                    break;
                }
            }
        }
        if batch.is_empty() {
            return None;
        }
        if let Some(samples) = &self.samples {
            super::retain_samples(&mut batch, samples);
        }
        Some(Ok(batch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TABLE: &str = "ProteinName,PeptideSequence,PrecursorCharge,Intensity,Reference,Run,Condition,BioReplicate,Fraction\n\
        P1,PEPTIDEK,2,100.0,run1.mzML,1,A,1,1\n\
        P1,PEPTIDER,2,NA,run1.mzML,1,A,1,1\n\
        sp|P2|P2_HUMAN,ANOTHERK,3,50.5,run2.mzML,2,B,2,\n";

    #[test]
    fn test_reads_csv_batches() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(TABLE.as_bytes()).unwrap();

        let source = CsvFeatureSource::open(file.path()).unwrap().with_batch_size(2);
        let batches: Vec<_> = source.batches(None).unwrap().map(|b| b.unwrap()).collect();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len(), 2);
        assert_eq!(batches[0][0].intensity, 100.0);
        assert!(batches[0][1].intensity.is_nan());
        assert_eq!(batches[1][0].fraction, None);
        assert_eq!(batches[1][0].charge, 3);
    }

    #[test]
    fn test_reads_gzip_tsv() {
        let mut file = tempfile::Builder::new().suffix(".tsv.gz").tempfile().unwrap();
        {
            let mut encoder = flate2::write::GzEncoder::new(&mut file, flate2::Compression::default());
            encoder.write_all(TABLE.replace(',', "\t").as_bytes()).unwrap();
            encoder.finish().unwrap();
        }

        let source = CsvFeatureSource::open(file.path()).unwrap();
        let rows: usize = source.batches(None).unwrap().map(|b| b.unwrap().len()).sum();
        assert_eq!(rows, 3);
    }
}
