use super::*;
use crate::design::SdrfRow;
use crate::feature::{MemorySource, RawFeature};
use crate::normalize::NormalizationMethod;
use crate::scratch::MemoryScratch;

fn design() -> ExperimentDesign {
    ExperimentDesign::from_rows(vec![
        SdrfRow::new("PXD1-S1", "run1.raw", "label free sample"),
        SdrfRow::new("PXD1-S2", "run2.raw", "label free sample"),
    ])
    .unwrap()
}

fn feature(protein: &str, peptide: &str, charge: i32, reference: &str, intensity: f64) -> RawFeature {
    RawFeature {
        protein_accessions: protein.to_string(),
        peptidoform: peptide.to_string(),
        charge,
        intensity,
        reference: reference.to_string(),
        run: reference.trim_end_matches(".raw").to_string(),
        condition: "heart".to_string(),
        bio_replicate: "1".to_string(),
        ..Default::default()
    }
}

fn source() -> MemorySource {
    MemorySource::new(vec![
        vec![
            feature("PROTA", "PEPTIDEAAK", 2, "run1.raw", 10.0),
            feature("PROTA", "PEPTIDEAAK", 3, "run1.raw", 5.0),
            feature("PROTA", "PEPTIDEBBK", 2, "run1.raw", 4.0),
            feature("PROTA", "SHAREDPEPTIDE", 2, "run1.raw", 8.0),
            feature("PROTB", "ONLYPEPTIDEK", 2, "run1.raw", 100.0),
        ],
        vec![
            feature("PROTA", "PEPTIDEAAK", 2, "run2.raw", 20.0),
            feature("PROTA", "PEPT(Oxidation)IDEBBK", 2, "run2.raw", 6.0),
            feature("PROTB", "SHAREDPEPTIDE", 2, "run2.raw", 7.0),
            feature("PROTA", "PEPTIDEAAK", 2, "run9.raw", 1.0),
        ],
    ])
}

fn run(config: PipelineConfig) -> (PipelineReport, Vec<PeptideIntensity>) {
    let mut features: MemoryScratch<FeatureRecord> = MemoryScratch::new();
    let mut peptides: MemoryScratch<PeptideIntensity> = MemoryScratch::new();
    let mut out = Vec::new();
    let report = Pipeline::new(config)
        .run_with_scratch(&source(), &design(), &mut features, &mut peptides, &mut out)
        .unwrap();
    (report, out)
}

fn value(rows: &[PeptideIntensity], sample: &str, peptide: &str) -> Option<f64> {
    rows.iter()
        .find(|r| r.sample == sample && r.canonical == peptide)
        .map(|r| r.norm_intensity)
}

#[test]
fn test_run_without_normalization() {
    let config = PipelineConfig {
        normalization: NormalizationMethod::None,
        ..Default::default()
    };
    let (report, rows) = run(config);

    assert_eq!(report.strong_proteins, vec!["PROTA".to_string()]);
    assert_eq!(report.ambiguous_peptides, 1);
    assert_eq!(report.ingest.dropped_unmatched_sample, 1);
    assert_eq!(report.samples_processed, 2);
    assert_eq!(report.quantile_reference, None);

    // charges 2 and 3 are summed
    assert_eq!(value(&rows, "PXD1-S1", "PEPTIDEAAK"), Some(15.0));
    assert_eq!(value(&rows, "PXD1-S1", "PEPTIDEBBK"), Some(4.0));
    assert_eq!(value(&rows, "PXD1-S2", "PEPTIDEAAK"), Some(20.0));
    assert_eq!(value(&rows, "PXD1-S2", "PEPTIDEBBK"), Some(6.0));
    // SHAREDPEPTIDE is kept where it was assigned to the strong protein
    assert_eq!(value(&rows, "PXD1-S1", "SHAREDPEPTIDE"), Some(8.0));
    assert_eq!(value(&rows, "PXD1-S2", "SHAREDPEPTIDE"), None);
    assert_eq!(value(&rows, "PXD1-S1", "ONLYPEPTIDEK"), None);
    assert!(rows.iter().all(|r| r.protein == "PROTA"));
    assert_eq!(rows.len(), 5);
    assert_eq!(report.rows_written, 5);
}

#[test]
fn test_run_with_quantile_normalization() {
    let (report, rows) = run(PipelineConfig::default());

    let reference = report.quantile_reference.unwrap();
    // S1 strong values [10, 8, 5, 4], S2 [20, 6]
    assert_eq!(reference.len(), 4);
    assert_eq!(reference[0], 15.0);
    assert_eq!(reference[1], 7.0);
    assert_eq!(reference[2], 5.0);
    assert_eq!(reference[3], 4.0);

    // S2: 20 -> 15, 6 -> 7
    assert_eq!(value(&rows, "PXD1-S2", "PEPTIDEAAK"), Some(15.0));
    assert_eq!(value(&rows, "PXD1-S2", "PEPTIDEBBK"), Some(7.0));
    // S1: 10 -> 15 and 5 -> 5 summed
    assert_eq!(value(&rows, "PXD1-S1", "PEPTIDEAAK"), Some(20.0));
    assert_eq!(value(&rows, "PXD1-S1", "SHAREDPEPTIDE"), Some(7.0));
}

#[test]
fn test_low_frequency_filter() {
    let config = PipelineConfig {
        normalization: NormalizationMethod::None,
        remove_low_frequency_peptides: true,
        ..Default::default()
    };
    let (report, rows) = run(config);

    // SHAREDPEPTIDE survives rollup in S1 only and is dropped
    assert_eq!(report.low_frequency_rows_removed, 1);
    assert_eq!(value(&rows, "PXD1-S1", "SHAREDPEPTIDE"), None);
    assert_eq!(rows.len(), 4);
}

#[test]
fn test_protein_filter_skips_empty_samples() {
    let config = PipelineConfig {
        normalization: NormalizationMethod::None,
        remove_ids: vec!["PROTA".to_string()],
        ..Default::default()
    };
    let (report, rows) = run(config);
    assert!(rows.is_empty());
    assert_eq!(report.strong_proteins, vec!["PROTA".to_string()]);
    assert_eq!(report.samples_skipped, 2);
    assert_eq!(report.samples_processed, 0);
}

#[test]
fn test_log2_transform() {
    let config = PipelineConfig {
        normalization: NormalizationMethod::None,
        log2: true,
        ..Default::default()
    };
    let (_, rows) = run(config);
    assert_eq!(value(&rows, "PXD1-S1", "PEPTIDEBBK"), Some(2.0));
}
