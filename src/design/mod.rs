//! # Experiment Design Resolver
//!
//! Parses an SDRF-Proteomics design table and resolves:
//!
//! 1. the label type of the experiment (label-free, TMT or iTRAQ),
//! 2. the channel map of the isobaric kit, when multiplexed,
//! 3. the ordered list of unique sample names,
//! 4. the join index used to attach each feature to its sample.
//!
//! The resolved [`ExperimentDesign`] is built once and is read-only for the
//! remainder of a run.
//!
//! ```rust
//! use pepnorm::design::{ExperimentDesign, LabelType};
//!
//! let sdrf = "source name\tcomment[data file]\tcomment[label]\n\
//!             PXD1-S1\trun1.raw\tlabel free sample\n\
//!             PXD1-S2\trun2.raw\tlabel free sample\n";
//! let design = ExperimentDesign::from_reader(sdrf.as_bytes())?;
//! assert_eq!(design.label(), LabelType::Lfq);
//! assert_eq!(design.sample_for("run2", None), Some("PXD1-S2"));
//! # Ok::<(), pepnorm::design::DesignError>(())
//! ```

mod error;
mod label;
mod sdrf;

#[cfg(test)]
mod tests;

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, info};

pub use error::DesignError;
pub use label::{
    resolve_label, ChannelMap, LabelType, ITRAQ4PLEX, ITRAQ8PLEX, TMT10PLEX, TMT11PLEX,
    TMT16PLEX, TMT6PLEX,
};
pub use sdrf::SdrfRow;

/// Spectrum file suffixes stripped to obtain a reference name
const SPECTRUM_SUFFIXES: [&str; 6] = [".mzML", ".MZML", ".raw", ".RAW", ".d", ".wiff"];

/// Reference name of a spectrum file or spectrum reference.
///
/// Everything from the first known spectrum-file suffix on is removed, so
/// `20150820_Haura-Pilot-TMT1-bRPLC03-2.mzML_controllerType=0 scan=16340`
/// becomes `20150820_Haura-Pilot-TMT1-bRPLC03-2`.
pub fn spectrum_prefix(reference: &str) -> &str {
    let cut = SPECTRUM_SUFFIXES
        .iter()
        .filter_map(|suffix| reference.find(suffix))
        .min()
        .unwrap_or(reference.len());
    &reference[..cut]
}

/// Study accession of a sample: the token before the first hyphen
pub fn study_accession(sample: &str) -> &str {
    sample.split('-').next().unwrap_or(sample)
}

/// Resolved experiment design
#[derive(Debug, Clone)]
pub struct ExperimentDesign {
    label: LabelType,
    channels: Option<&'static ChannelMap>,
    samples: Vec<String>,
    technical_replicates: usize,
    index: HashMap<(String, Option<u32>), String>,
}

impl ExperimentDesign {
    /// Load and resolve an SDRF file
    pub fn from_sdrf_file<P: AsRef<Path>>(path: P) -> Result<Self, DesignError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DesignError::MissingSource(path.to_path_buf()));
        }
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Resolve a design from any reader over an SDRF table
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DesignError> {
        Self::from_rows(SdrfRow::from_reader(reader)?)
    }

    /// Resolve a design from already parsed SDRF rows
    pub fn from_rows(rows: Vec<SdrfRow>) -> Result<Self, DesignError> {
        let (label, channels) = resolve_label(rows.iter().map(|r| r.label.as_str()))?;

        let mut samples = Vec::new();
        let mut seen = HashSet::new();
        let mut technical = HashSet::new();
        let mut index = HashMap::new();

        for row in &rows {
            if seen.insert(row.source_name.clone()) {
                samples.push(row.source_name.clone());
            }
            technical.insert(row.technical_replicate.clone());

            let channel = channels.and_then(|map| map.channel(&row.label));
            let reference = spectrum_prefix(&row.data_file).to_string();
            if label.is_multiplexed() && channel.is_none() {
                debug!("label {} has no channel in the resolved kit", row.label);
                continue;
            }
            index
                .entry((reference, channel))
                .or_insert_with(|| row.source_name.clone());
        }

        info!(
            "Resolved {} design: {} samples, {} assays{}",
            label,
            samples.len(),
            rows.len(),
            channels
                .map(|c| format!(", channel map {}", c.name()))
                .unwrap_or_default()
        );

        Ok(Self {
            label,
            channels,
            samples,
            technical_replicates: technical.len().max(1),
            index,
        })
    }

    /// Label type of the experiment
    pub fn label(&self) -> LabelType {
        self.label
    }

    /// Channel map of a multiplexed experiment
    pub fn channel_map(&self) -> Option<&'static ChannelMap> {
        self.channels
    }

    /// Unique sample names in order of first appearance
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    /// Number of distinct technical replicates
    pub fn technical_replicates(&self) -> usize {
        self.technical_replicates
    }

    /// Channel number of a raw channel value.
    ///
    /// Label names are looked up in the channel map; plain integers are taken as-is.
    pub fn resolve_channel(&self, raw: &str) -> Option<u32> {
        let raw = raw.trim();
        self.channels
            .and_then(|map| map.channel(raw))
            .or_else(|| raw.parse().ok())
    }

    /// Sample of an assay, keyed by reference name and (for multiplexed data) channel
    pub fn sample_for(&self, reference: &str, channel: Option<u32>) -> Option<&str> {
        let channel = if self.label.is_multiplexed() {
            Some(channel?)
        } else {
            None
        };
        self.index
            .get(&(reference.to_string(), channel))
            .map(String::as_str)
    }
}
