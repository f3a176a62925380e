use anyhow::{bail, Context, Result};
use log::info;
use std::fs::File;
use std::io::BufWriter;

use pepnorm::batch_correction::{correct_batches, CorrectionColumns, EmpiricalBayes, LongTable, TableFormat};

use super::config::BatchCorrectionConfig;
use super::CorrectBatchesArgs;

/// Default file name pattern inside the input folder
const DEFAULT_PATTERN: &str = "*ibaq.tsv";

/// Single byte of a separator or comment argument; `\t` is accepted literally
fn single_byte(value: &str, what: &str) -> Result<u8> {
    let value = if value == "\\t" { "\t" } else { value };
    match value.as_bytes() {
        [byte] => Ok(*byte),
        _ => bail!("{} must be a single character, got {:?}", what, value),
    }
}

fn resolve_format(args: &CorrectBatchesArgs, file: &BatchCorrectionConfig) -> Result<TableFormat> {
    let defaults = TableFormat::default();
    let delimiter = match args.separator.as_deref().or(file.separator.as_deref()) {
        Some(sep) => single_byte(sep, "separator")?,
        None => defaults.delimiter,
    };
    let comment = match args.comment.as_deref().or(file.comment.as_deref()) {
        Some("") => None,
        Some(comment) => Some(single_byte(comment, "comment prefix")?),
        None => defaults.comment,
    };
    Ok(TableFormat { delimiter, comment })
}

fn resolve_columns(args: &CorrectBatchesArgs, file: BatchCorrectionConfig) -> CorrectionColumns {
    let defaults = CorrectionColumns::default();
    CorrectionColumns {
        sample: args
            .sample_id_column
            .clone()
            .or(file.sample_id_column)
            .unwrap_or(defaults.sample),
        protein: args
            .protein_id_column
            .clone()
            .or(file.protein_id_column)
            .unwrap_or(defaults.protein),
        value: args.ibaq_column.clone().or(file.ibaq_column).unwrap_or(defaults.value),
    }
}

/// Correct batch effects of every iBAQ table in a folder
pub fn run(args: CorrectBatchesArgs) -> Result<()> {
    if !args.folder.is_dir() {
        bail!("Input folder does not exist: {}", args.folder.display());
    }

    let file_config = super::config::Config::load(args.config.as_deref())?.batch_correction;
    let format = resolve_format(&args, &file_config)?;
    let pattern = args
        .pattern
        .clone()
        .or_else(|| file_config.pattern.clone())
        .unwrap_or_else(|| DEFAULT_PATTERN.to_string());
    let columns = resolve_columns(&args, file_config);

    info!("pepnorm - batch-effect correction");
    info!("=================================");
    info!("Folder:  {} ({})", args.folder.display(), pattern);
    info!("Output:  {}", args.output.display());
    info!("Columns: {}, {}, {}", columns.sample, columns.protein, columns.value);

    let table = LongTable::from_folder(&args.folder, &pattern, format)
        .with_context(|| format!("Failed to load tables from {}", args.folder.display()))?;

    let corrector = if args.mean_only {
        EmpiricalBayes::mean_only()
    } else {
        EmpiricalBayes::new()
    };
    let corrected = correct_batches(&table, &columns, &corrector).context("Batch correction failed")?;

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create output: {}", args.output.display()))?;
    corrected
        .write(BufWriter::new(file), format.delimiter)
        .context("Failed to write corrected table")?;

    info!("Batch correction complete!");
    info!("  Rows written: {}", corrected.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CorrectBatchesArgs {
        CorrectBatchesArgs {
            folder: "ibaq".into(),
            output: "out.tsv".into(),
            pattern: None,
            separator: None,
            comment: None,
            sample_id_column: None,
            protein_id_column: None,
            ibaq_column: None,
            mean_only: false,
            config: None,
        }
    }

    #[test]
    fn test_single_byte() {
        assert_eq!(single_byte(",", "separator").unwrap(), b',');
        assert_eq!(single_byte("\\t", "separator").unwrap(), b'\t');
        assert!(single_byte(";;", "separator").is_err());
    }

    #[test]
    fn test_format_resolution() {
        let file = BatchCorrectionConfig {
            separator: Some(",".to_string()),
            comment: Some(String::new()),
            ..Default::default()
        };
        let format = resolve_format(&args(), &file).unwrap();
        assert_eq!(format.delimiter, b',');
        assert_eq!(format.comment, None);

        let mut flags = args();
        flags.separator = Some("\\t".to_string());
        let format = resolve_format(&flags, &file).unwrap();
        assert_eq!(format.delimiter, b'\t');
    }

    #[test]
    fn test_column_resolution() {
        let mut flags = args();
        flags.ibaq_column = Some("riBAQ".to_string());
        let file = BatchCorrectionConfig {
            sample_id_column: Some("Sample".to_string()),
            ibaq_column: Some("IbaqNorm".to_string()),
            ..Default::default()
        };
        let columns = resolve_columns(&flags, file);
        assert_eq!(columns.sample, "Sample");
        assert_eq!(columns.protein, "ProteinName");
        assert_eq!(columns.value, "riBAQ");
    }
}
