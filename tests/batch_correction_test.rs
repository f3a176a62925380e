//! Integration tests for batch-effect correction
//!
//! iBAQ tables are written to a temporary folder, loaded by pattern,
//! corrected and written back out.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use pepnorm::batch_correction::{
    correct_batches, BatchCorrectionError, CorrectionColumns, EmpiricalBayes, LongEntry, LongTable,
    TableFormat, WideMatrix,
};
use proptest::prelude::*;
use tempfile::tempdir;

const NOISE: [f64; 3] = [0.1, -0.15, 0.05];

/// Write a study's iBAQ table: 6 proteins x 3 samples, shifted by `shift`
fn write_study(path: &Path, study: &str, shift: f64) {
    let mut file = File::create(path).unwrap();
    writeln!(file, "# iBAQ values of {}", study).unwrap();
    writeln!(file, "ProteinName\tSampleID\tCondition\tIbaq").unwrap();
    for p in 0..6 {
        for s in 0..3 {
            let value = 10.0 + p as f64 + shift + NOISE[(p + s) % 3];
            writeln!(file, "PROT{}\t{}-S{}\theart\t{}", p, study, s + 1, value).unwrap();
        }
    }
}

fn batch_means(table: &LongTable, column: &str) -> HashMap<(String, String), f64> {
    let proteins = table.column("ProteinName").unwrap();
    let samples = table.column("SampleID").unwrap();
    let values = table.column(column).unwrap();

    let mut sums: HashMap<(String, String), (f64, usize)> = HashMap::new();
    for ((protein, sample), value) in proteins.iter().zip(&samples).zip(&values) {
        let study = sample.split('-').next().unwrap().to_string();
        let entry = sums.entry((protein.to_string(), study)).or_default();
        entry.0 += value.parse::<f64>().unwrap();
        entry.1 += 1;
    }
    sums.into_iter().map(|(k, (sum, n))| (k, sum / n as f64)).collect()
}

/// Test loading a folder, correcting and writing the result
#[test]
fn test_folder_correction_round_trip() {
    let dir = tempdir().unwrap();
    write_study(&dir.path().join("STUDYA.ibaq.tsv"), "STUDYA", 0.0);
    write_study(&dir.path().join("STUDYB.ibaq.tsv"), "STUDYB", 4.0);
    fs::write(dir.path().join("notes.txt"), "not a table").unwrap();

    let table = LongTable::from_folder(dir.path(), "*ibaq.tsv", TableFormat::default()).unwrap();
    assert_eq!(table.len(), 36);

    let corrected = correct_batches(&table, &CorrectionColumns::default(), &EmpiricalBayes::new()).unwrap();
    assert_eq!(
        corrected.headers(),
        &["ProteinName", "SampleID", "Condition", "Ibaq", "IbaqBec"].map(String::from)
    );
    // original values are untouched
    assert_eq!(corrected.column("Ibaq").unwrap(), table.column("Ibaq").unwrap());

    let before = batch_means(&corrected, "Ibaq");
    let after = batch_means(&corrected, "IbaqBec");
    for p in 0..6 {
        let key = |study: &str| (format!("PROT{}", p), study.to_string());
        assert!((before[&key("STUDYA")] - before[&key("STUDYB")]).abs() > 3.5);
        assert!((after[&key("STUDYA")] - after[&key("STUDYB")]).abs() < 0.5);
    }

    let out = dir.path().join("corrected.tsv");
    corrected.write(File::create(&out).unwrap(), b'\t').unwrap();
    let reloaded = LongTable::from_path(&out, TableFormat::default()).unwrap();
    assert_eq!(reloaded, corrected);
}

/// Test that an empty match is an error
#[test]
fn test_folder_without_matches() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("PXD1.csv"), "a,b\n1,2\n").unwrap();
    let err = LongTable::from_folder(dir.path(), "*ibaq.tsv", TableFormat::default()).unwrap_err();
    assert!(matches!(err, BatchCorrectionError::NoInput { .. }));
}

/// Test that invalid sample names abort the correction
#[test]
fn test_invalid_sample_names() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mixed.ibaq.tsv");
    fs::write(&path, "ProteinName\tSampleID\tIbaq\nP1\tabc_123\t1.0\nP1\tSTUDY1-S01\t2.0\n").unwrap();

    let table = LongTable::from_path(&path, TableFormat::default()).unwrap();
    match correct_batches(&table, &CorrectionColumns::default(), &EmpiricalBayes::new()) {
        Err(BatchCorrectionError::InvalidSampleId(ids)) => assert_eq!(ids, vec!["abc_123".to_string()]),
        other => panic!("unexpected {:?}", other),
    }
}

fn long_entries() -> impl Strategy<Value = Vec<LongEntry>> {
    prop::collection::hash_map((0usize..8, 0usize..6), -1e6f64..1e6, 1..40).prop_map(|cells| {
        cells
            .into_iter()
            .map(|((p, s), v)| (format!("P{}", p), format!("STUDY{}-S{}", s % 2, s), v))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_pivot_round_trip(entries in long_entries()) {
        let wide = WideMatrix::pivot_wider(&entries).unwrap();
        let mut back = wide.pivot_longer();
        let mut expected = entries.clone();
        back.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
        expected.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
        prop_assert_eq!(back, expected);
    }

    #[test]
    fn prop_pivot_ignores_input_order(entries in long_entries()) {
        let mut reversed = entries.clone();
        reversed.reverse();
        prop_assert_eq!(
            WideMatrix::pivot_wider(&entries).unwrap(),
            WideMatrix::pivot_wider(&reversed).unwrap()
        );
    }
}
