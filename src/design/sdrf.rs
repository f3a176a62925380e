use std::io::Read;

use serde::{Deserialize, Serialize};

use super::DesignError;

const SOURCE_NAME: &str = "source name";
const DATA_FILE: &str = "comment[data file]";
const LABEL: &str = "comment[label]";
const TECHNICAL_REPLICATE: &str = "comment[technical replicate]";

/// One assay row of an SDRF-Proteomics design table
///
/// Reference: <https://github.com/bigbio/proteomics-sample-metadata>
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SdrfRow {
    /// Sample name (`source name`)
    pub source_name: String,

    /// Spectrum file of the assay (`comment[data file]`)
    pub data_file: String,

    /// Label of the assay (`comment[label]`), e.g. "label free sample" or "TMT126"
    pub label: String,

    /// Technical replicate (`comment[technical replicate]`), when present
    pub technical_replicate: Option<String>,
}

impl SdrfRow {
    /// Create a new row
    pub fn new(source_name: &str, data_file: &str, label: &str) -> Self {
        Self {
            source_name: source_name.to_string(),
            data_file: data_file.to_string(),
            label: label.to_string(),
            technical_replicate: None,
        }
    }

    /// Parse all rows of a tab-separated SDRF table.
    ///
    /// Header matching is case-insensitive. Rows with an empty source name are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Self>, DesignError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|s| s.to_lowercase().trim().to_string())
            .collect();

        let column = |name: &str| -> Result<usize, DesignError> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DesignError::MissingColumn(name.to_string()))
        };

        let source_idx = column(SOURCE_NAME)?;
        let file_idx = column(DATA_FILE)?;
        let label_idx = column(LABEL)?;
        let tech_idx = headers.iter().position(|h| h == TECHNICAL_REPLICATE);

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let field = |idx: usize| record.get(idx).map(str::trim).unwrap_or_default();

            let source_name = field(source_idx);
            if source_name.is_empty() {
                continue;
            }

            rows.push(SdrfRow {
                source_name: source_name.to_string(),
                data_file: field(file_idx).to_string(),
                label: field(label_idx).to_string(),
                technical_replicate: tech_idx
                    .map(field)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string),
            });
        }

        Ok(rows)
    }
}
