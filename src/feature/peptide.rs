use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

fn modification_regex() -> &'static Regex {
    static MODIFICATION: OnceLock<Regex> = OnceLock::new();
    MODIFICATION.get_or_init(|| Regex::new(r"[\(\[].*?[\)\]]").expect("valid modification regex"))
}

/// Peptide sequence without modification annotations.
///
/// Bracketed or parenthesized annotations are removed, then `.` and `-`
/// separators. The function is idempotent.
///
/// ```
/// use pepnorm::feature::canonical_peptide;
///
/// assert_eq!(canonical_peptide(".(Acetyl)ASPDWGYDDKNGPEQWSK."), "ASPDWGYDDKNGPEQWSK");
/// assert_eq!(canonical_peptide("AAM[15.9949]PEPTIDE"), "AAMPEPTIDE");
/// ```
pub fn canonical_peptide(peptide: &str) -> String {
    modification_regex()
        .replace_all(peptide, "")
        .chars()
        .filter(|c| *c != '.' && *c != '-')
        .collect()
}

/// Parse a protein accession field.
///
/// UniProt-style identifiers with exactly two pipes (`db|id|name`) are reduced to
/// their trailing name segment; multi-protein fields stay semicolon joined.
///
/// ```
/// use pepnorm::feature::parse_protein_accession;
///
/// assert_eq!(
///     parse_protein_accession("tr|CONTAMINANT_Q3SX28|CONTAMINANT_TPM2_BOVIN;P12345"),
///     "CONTAMINANT_TPM2_BOVIN;P12345"
/// );
/// ```
pub fn parse_protein_accession(accessions: &str) -> String {
    accessions
        .split(';')
        .map(|accession| {
            if accession.matches('|').count() == 2 {
                accession.rsplit('|').next().unwrap_or(accession)
            } else {
                accession
            }
        })
        .collect::<Vec<_>>()
        .join(";")
}

/// Memoized sequence → canonical sequence mapping
#[derive(Debug, Default)]
pub struct CanonicalCache {
    cache: HashMap<String, String>,
    hits: usize,
}

impl CanonicalCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical form of `peptide`, computed at most once per distinct sequence
    pub fn canonical(&mut self, peptide: &str) -> &str {
        if self.cache.contains_key(peptide) {
            self.hits += 1;
        } else {
            self.cache
                .insert(peptide.to_string(), canonical_peptide(peptide));
        }
        // present: inserted above if missing
        self.cache.get(peptide).map(String::as_str).unwrap_or_default()
    }

    /// Number of distinct sequences seen
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether no sequence has been seen yet
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Number of lookups answered from the cache
    pub fn hits(&self) -> usize {
        self.hits
    }
}
