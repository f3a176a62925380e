use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};

use pepnorm::design::ExperimentDesign;
use pepnorm::feature::open_source;
use pepnorm::pipeline::{CsvPeptideWriter, ParquetPeptideWriter, Pipeline, PipelineConfig};

use super::config::NormalizationConfig;
use super::Features2PeptidesArgs;

/// Merge flags over the config file over the defaults
fn resolve_config(args: &Features2PeptidesArgs, file: NormalizationConfig) -> PipelineConfig {
    let defaults = PipelineConfig::default();
    PipelineConfig {
        min_aa: args.min_aa.or(file.min_aa).unwrap_or(defaults.min_aa),
        min_unique: args.min_unique.or(file.min_unique).unwrap_or(defaults.min_unique),
        remove_low_frequency_peptides: args.remove_low_frequency_peptides
            || file.remove_low_frequency_peptides.unwrap_or(false),
        normalization: args.normalization.or(file.method).unwrap_or(defaults.normalization),
        log2: args.log2 || file.log2.unwrap_or(false),
        selection: args.selection.or(file.selection).unwrap_or(defaults.selection),
        remove_decoy_contaminants: args.remove_decoy_contaminants
            || file.remove_decoy_contaminants.unwrap_or(false),
        remove_ids: file.remove_ids.unwrap_or_default(),
        batch_size: args.batch_size.or(file.batch_size).unwrap_or(defaults.batch_size),
    }
}

/// Parquet output path next to the CSV output
fn parquet_path(output: &Path) -> PathBuf {
    output.with_extension("parquet")
}

/// Normalize a feature table into peptide intensities
pub fn run(args: Features2PeptidesArgs) -> Result<()> {
    let file_config = super::config::Config::load(args.config.as_deref())?;
    let config = resolve_config(&args, file_config.normalization);

    let mut filter = config.protein_filter();
    if let Some(ids) = &args.remove_ids_file {
        filter = filter
            .with_ids_file(ids)
            .with_context(|| format!("Failed to read protein ids: {}", ids.display()))?;
    }

    info!("pepnorm - features to peptides");
    info!("==============================");
    info!("Features: {}", args.features.display());
    info!("SDRF:     {}", args.sdrf.display());
    info!("Output:   {}", args.output.display());
    info!("Normalization: {} (log2: {})", config.normalization, config.log2);
    info!("Peptidoform selection: {}", config.selection);
    info!("min_aa: {}, min_unique: {}", config.min_aa, config.min_unique);

    // Both inputs are checked before any output exists
    let design = ExperimentDesign::from_sdrf_file(&args.sdrf)
        .with_context(|| format!("Failed to load SDRF: {}", args.sdrf.display()))?;
    let source = open_source(&args.features, config.batch_size)
        .with_context(|| format!("Failed to open features: {}", args.features.display()))?;

    let csv = CsvPeptideWriter::create(&args.output)
        .with_context(|| format!("Failed to create output: {}", args.output.display()))?;
    let parquet = if args.save_parquet {
        Some(ParquetPeptideWriter::create(parquet_path(&args.output)).context("Failed to create Parquet output")?)
    } else {
        None
    };

    let mut sink = (csv, parquet);
    let report = Pipeline::new(config)
        .with_protein_filter(filter)
        .run(source.as_ref(), &design, &mut sink)
        .context("Normalization failed")?;

    let (csv, parquet) = sink;
    let rows = csv.finish().context("Failed to finish CSV output")?;
    if let Some(parquet) = parquet {
        parquet.finish().context("Failed to finish Parquet output")?;
        info!("Parquet output: {}", parquet_path(&args.output).display());
    }

    if let Some(path) = &args.report_json {
        report
            .write_json(path)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
    }

    info!("Normalization complete!");
    info!("  {}", report.ingest);
    info!("  {}", report);
    info!("  Rows written: {}", rows);

    Ok(())
}
