use super::*;

const LFQ_SDRF: &str = "source name\tcharacteristics[organism]\tcomment[data file]\tcomment[label]\tcomment[technical replicate]
PXD001-Sample1\tHomo sapiens\ta05058.raw\tlabel free sample\t1
PXD001-Sample1\tHomo sapiens\ta05059.raw\tlabel free sample\t2
PXD001-Sample2\tHomo sapiens\ta05060.raw\tlabel free sample\t1";

fn tmt_rows(labels: &[&str]) -> Vec<SdrfRow> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| SdrfRow::new(&format!("PXD002-S{}", i + 1), "plex1.mzML", label))
        .collect()
}

#[test]
fn test_lfq_design() {
    let design = ExperimentDesign::from_reader(LFQ_SDRF.as_bytes()).unwrap();

    assert_eq!(design.label(), LabelType::Lfq);
    assert!(design.channel_map().is_none());
    assert_eq!(design.samples(), &["PXD001-Sample1", "PXD001-Sample2"]);
    assert_eq!(design.technical_replicates(), 2);
    assert_eq!(design.sample_for("a05059", None), Some("PXD001-Sample1"));
    assert_eq!(design.sample_for("a05060", Some(3)), Some("PXD001-Sample2"));
    assert_eq!(design.sample_for("unknown", None), None);
}

#[test]
fn test_single_label_is_always_lfq() {
    for label in ["label free sample", "TMT126", "whatever"] {
        let (label_type, map) = resolve_label([label, label]).unwrap();
        assert_eq!(label_type, LabelType::Lfq);
        assert!(map.is_none());
    }
}

#[test]
fn test_tmt_kit_selection() {
    let (label, map) = resolve_label(["TMT126", "TMT127", "TMT128"]).unwrap();
    assert_eq!(label, LabelType::Tmt);
    assert_eq!(map, Some(&TMT6PLEX));

    let ten = [
        "TMT126", "TMT127N", "TMT127C", "TMT128N", "TMT128C", "TMT129N", "TMT129C",
    ];
    assert_eq!(resolve_label(ten).unwrap().1, Some(&TMT10PLEX));

    let (_, map) = resolve_label(["TMT126", "TMT131C"]).unwrap();
    assert_eq!(map, Some(&TMT11PLEX));

    let (_, map) = resolve_label(["TMT126", "TMT134N"]).unwrap();
    assert_eq!(map, Some(&TMT16PLEX));

    let (label, _) = resolve_label(["tmt126", "tmt127"]).unwrap();
    assert_eq!(label, LabelType::Tmt);
}

#[test]
fn test_itraq_kit_selection() {
    let (label, map) = resolve_label(["iTRAQ114", "iTRAQ115", "iTRAQ116"]).unwrap();
    assert_eq!(label, LabelType::Itraq);
    assert_eq!(map, Some(&ITRAQ4PLEX));

    let labels = ["ITRAQ113", "ITRAQ114", "ITRAQ115", "ITRAQ116", "ITRAQ117"];
    assert_eq!(resolve_label(labels).unwrap().1, Some(&ITRAQ8PLEX));
}

#[test]
fn test_unsupported_label_type() {
    let err = resolve_label(["SILAC light", "SILAC heavy"]).unwrap_err();
    match err {
        DesignError::UnsupportedLabelType(labels) => {
            assert_eq!(labels, vec!["SILAC heavy".to_string(), "SILAC light".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(matches!(
        resolve_label(Vec::<String>::new()),
        Err(DesignError::UnsupportedLabelType(_))
    ));
}

#[test]
fn test_tmt_design_join() {
    let design = ExperimentDesign::from_rows(tmt_rows(&["TMT126", "TMT127", "TMT128"])).unwrap();

    assert_eq!(design.label(), LabelType::Tmt);
    assert_eq!(design.resolve_channel("TMT127"), Some(2));
    assert_eq!(design.resolve_channel("3"), Some(3));
    assert_eq!(design.resolve_channel("TMT999"), None);
    assert_eq!(design.sample_for("plex1", Some(2)), Some("PXD002-S2"));
    assert_eq!(design.sample_for("plex1", None), None);
}

#[test]
fn test_missing_column() {
    let sdrf = "source name\tcomment[data file]\nS1\ta.raw\n";
    let err = ExperimentDesign::from_reader(sdrf.as_bytes()).unwrap_err();
    assert!(matches!(err, DesignError::MissingColumn(c) if c == "comment[label]"));
}

#[test]
fn test_missing_source() {
    let err = ExperimentDesign::from_sdrf_file("/nonexistent/design.sdrf.tsv").unwrap_err();
    assert!(matches!(err, DesignError::MissingSource(_)));
}

#[test]
fn test_spectrum_prefix() {
    assert_eq!(
        spectrum_prefix("20150820_Haura-Pilot-TMT1-bRPLC03-2.mzML_controllerType=0 scan=16340"),
        "20150820_Haura-Pilot-TMT1-bRPLC03-2"
    );
    assert_eq!(spectrum_prefix("a05058.raw"), "a05058");
    assert_eq!(spectrum_prefix("a05058.RAW"), "a05058");
    assert_eq!(spectrum_prefix("run.wiff"), "run");
    assert_eq!(spectrum_prefix("plain"), "plain");
}

#[test]
fn test_study_accession() {
    assert_eq!(study_accession("PXD004452-Sample-3"), "PXD004452");
    assert_eq!(study_accession("nohyphen"), "nohyphen");
}
