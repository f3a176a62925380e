use super::*;

fn entry(row: &str, column: &str, value: f64) -> LongEntry {
    (row.to_string(), column.to_string(), value)
}

fn table(rows: &[(&str, &str, &str)]) -> LongTable {
    LongTable::new(
        vec!["ProteinName".to_string(), "SampleID".to_string(), "Ibaq".to_string()],
        rows.iter()
            .map(|(p, s, v)| vec![p.to_string(), s.to_string(), v.to_string()])
            .collect(),
    )
}

#[test]
fn test_sample_id_validation_lists_every_offender() {
    assert!(validate_sample_ids(&["STUDY1-S01", "PXD1-2-3"]).is_ok());
    match validate_sample_ids(&["abc_123", "STUDY1-S01", "bad-", "x y"]) {
        Err(BatchCorrectionError::InvalidSampleId(ids)) => {
            assert_eq!(ids, vec!["abc_123", "bad-", "x y"]);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_batch_ids_factorize_by_first_appearance() {
    assert_eq!(
        batch_ids(&["PXD2-S1", "PXD1-S1", "PXD2-S2", "PXD3-S1", "PXD1-S2"]),
        vec![0, 1, 0, 2, 1]
    );
}

#[test]
fn test_pivot_wider_sorts_and_leaves_gaps() {
    let wide = WideMatrix::pivot_wider(&[
        entry("P2", "S2", 1.0),
        entry("P1", "S1", 2.0),
        entry("P1", "S2", 3.0),
    ])
    .unwrap();
    assert_eq!(wide.rows(), &["P1".to_string(), "P2".to_string()]);
    assert_eq!(wide.columns(), &["S1".to_string(), "S2".to_string()]);
    assert_eq!(wide.get(1, 0), None);
    assert_eq!(wide.to_dense(0.0), vec![vec![2.0, 3.0], vec![0.0, 1.0]]);
}

#[test]
fn test_pivot_wider_rejects_duplicates() {
    let err = WideMatrix::pivot_wider(&[entry("P1", "S1", 1.0), entry("P1", "S1", 2.0)]).unwrap_err();
    assert!(matches!(err, BatchCorrectionError::DuplicateEntry { .. }));
}

#[test]
fn test_with_dense_checks_shape() {
    let wide = WideMatrix::pivot_wider(&[entry("P1", "S1", 1.0)]).unwrap();
    assert!(wide.with_dense(vec![vec![1.0, 2.0]]).is_err());
    assert!(wide.with_dense(vec![vec![5.0]]).is_ok());
}

#[test]
fn test_combat_rejects_shape_mismatch() {
    let err = EmpiricalBayes::new()
        .correct(&[vec![1.0, 2.0, 3.0]], &[0, 1])
        .unwrap_err();
    assert!(matches!(err, BatchCorrectionError::MalformedBatchCorrectionInput(_)));
}

fn shifted_matrix() -> (Vec<Vec<f64>>, Vec<usize>) {
    let noise = [0.1, -0.2, 0.05, 0.15, -0.1, 0.0];
    let batches = vec![0, 0, 0, 1, 1, 1];
    let matrix = (0..8)
        .map(|g| {
            let base = 20.0 + g as f64;
            (0..6)
                .map(|j| {
                    let shift = if batches[j] == 1 { 3.0 } else { 0.0 };
                    base + shift + noise[(j + g) % 6]
                })
                .collect()
        })
        .collect();
    (matrix, batches)
}

fn batch_gap(matrix: &[Vec<f64>], g: usize) -> f64 {
    let a: f64 = matrix[g][..3].iter().sum::<f64>() / 3.0;
    let b: f64 = matrix[g][3..].iter().sum::<f64>() / 3.0;
    (a - b).abs()
}

#[test]
fn test_combat_removes_location_shift() {
    let (matrix, batches) = shifted_matrix();
    let corrected = EmpiricalBayes::new().correct(&matrix, &batches).unwrap();

    assert_eq!(corrected.len(), matrix.len());
    for g in 0..matrix.len() {
        assert!(batch_gap(&matrix, g) > 2.5);
        assert!(batch_gap(&corrected, g) < 0.5, "feature {} still shifted", g);
        // feature means are preserved
        let before: f64 = matrix[g].iter().sum::<f64>() / 6.0;
        let after: f64 = corrected[g].iter().sum::<f64>() / 6.0;
        assert!((before - after).abs() < 0.5);
    }
}

#[test]
fn test_combat_mean_only_and_constant_rows() {
    let (mut matrix, batches) = shifted_matrix();
    matrix.push(vec![7.0; 6]);
    let corrected = EmpiricalBayes::mean_only().correct(&matrix, &batches).unwrap();
    assert_eq!(corrected[8], vec![7.0; 6]);
    assert!(batch_gap(&corrected, 0) < 0.5);
}

#[test]
fn test_combat_single_batch_is_identity() {
    let matrix = vec![vec![1.0, 2.0, 3.0]];
    let corrected = EmpiricalBayes::new().correct(&matrix, &[0, 0, 0]).unwrap();
    assert_eq!(corrected, matrix);
}

/// Adds the batch code to every cell so the merge can be checked exactly
struct AddBatch;

impl BatchCorrector for AddBatch {
    fn correct(
        &self,
        matrix: &[Vec<f64>],
        batches: &[usize],
    ) -> Result<Vec<Vec<f64>>, BatchCorrectionError> {
        check_shape(matrix, batches)?;
        Ok(matrix
            .iter()
            .map(|row| row.iter().zip(batches).map(|(v, b)| v + *b as f64).collect())
            .collect())
    }
}

#[test]
fn test_correct_batches_merges_corrected_column() {
    let input = table(&[
        ("P1", "PXD1-S1", "10"),
        ("P1", "PXD2-S1", "20"),
        ("P2", "PXD2-S1", "NA"),
        ("P2", "PXD1-S1", "5"),
    ]);
    let out = correct_batches(&input, &CorrectionColumns::default(), &AddBatch).unwrap();

    assert_eq!(out.headers().last().map(String::as_str), Some("IbaqBec"));
    // the non-numeric row shares its key with the zero-filled cell
    let corrected = out.column("IbaqBec").unwrap();
    assert_eq!(corrected, vec!["10", "21", "1", "5"]);
}

#[test]
fn test_correct_batches_rejects_invalid_samples() {
    let input = table(&[("P1", "abc_123", "1"), ("P1", "STUDY1-S01", "2")]);
    let err = correct_batches(&input, &CorrectionColumns::default(), &EmpiricalBayes::new()).unwrap_err();
    match err {
        BatchCorrectionError::InvalidSampleId(ids) => assert_eq!(ids, vec!["abc_123"]),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_correct_batches_missing_column() {
    let input = table(&[("P1", "PXD1-S1", "1")]);
    let columns = CorrectionColumns {
        value: "riBAQ".to_string(),
        ..Default::default()
    };
    let err = correct_batches(&input, &columns, &AddBatch).unwrap_err();
    assert!(matches!(err, BatchCorrectionError::MissingColumn(c) if c == "riBAQ"));
}

#[test]
fn test_glob_to_regex() {
    let re = glob_to_regex("*ibaq.tsv").unwrap();
    assert!(re.is_match("PXD1.ibaq.tsv"));
    assert!(!re.is_match("PXD1.ibaq.tsv.bak"));
    assert!(!re.is_match("PXD1_ibaqXtsv"));
}

#[test]
fn test_table_concat_aligns_columns() {
    let mut a = LongTable::new(vec!["A".into(), "B".into()], vec![vec!["1".into(), "2".into()]]);
    let b = LongTable::new(vec!["B".into(), "C".into()], vec![vec!["3".into(), "4".into()]]);
    a.concat(b);
    assert_eq!(a.headers(), &["A".to_string(), "B".to_string(), "C".to_string()]);
    assert_eq!(a.rows()[0], vec!["1", "2", ""]);
    assert_eq!(a.rows()[1], vec!["", "3", "4"]);
}

#[test]
fn test_table_reader_skips_comments() {
    let text = "# generated\nProteinName\tSampleID\tIbaq\nP1\tPXD1-S1\t1.5\n";
    let t = LongTable::from_reader(text.as_bytes(), TableFormat::default()).unwrap();
    assert_eq!(t.len(), 1);
    assert_eq!(t.column("Ibaq").unwrap(), vec!["1.5"]);
}
