use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Markers of decoy, contaminant and entrapment accessions
const DECOY_CONTAMINANT_MARKERS: [&str; 3] = ["CONTAMINANT", "ENTRAPMENT", "DECOY"];

/// Protein-level exclusion rules applied before normalized values are rolled up
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProteinFilter {
    /// Accessions to exclude; a protein is excluded when it contains any of them
    #[serde(default)]
    pub remove_ids: Vec<String>,

    /// Exclude decoy, contaminant and entrapment proteins
    #[serde(default)]
    pub remove_decoy_contaminants: bool,
}

impl ProteinFilter {
    /// Filter that keeps everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Load accessions to exclude from a file with one id per line
    pub fn with_ids_file<P: AsRef<Path>>(mut self, path: P) -> std::io::Result<Self> {
        let content = fs::read_to_string(path)?;
        self.remove_ids.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
        );
        Ok(self)
    }

    /// Enable or disable decoy/contaminant removal
    pub fn with_decoy_contaminant_removal(mut self, remove: bool) -> Self {
        self.remove_decoy_contaminants = remove;
        self
    }

    /// Whether the filter would never exclude anything
    pub fn is_empty(&self) -> bool {
        self.remove_ids.is_empty() && !self.remove_decoy_contaminants
    }

    /// Whether rows of `protein` are kept
    pub fn retains(&self, protein: &str) -> bool {
        if self.remove_decoy_contaminants
            && DECOY_CONTAMINANT_MARKERS.iter().any(|m| protein.contains(m))
        {
            return false;
        }
        !self.remove_ids.iter().any(|id| protein.contains(id.as_str()))
    }
}
