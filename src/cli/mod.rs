use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use pepnorm::normalize::NormalizationMethod;
use pepnorm::rollup::PeptidoformSelection;

mod config;
mod correct_batches;
mod features2peptides;

/// pepnorm - Streaming peptide normalization for quantitative proteomics
#[derive(Parser)]
#[command(name = "pepnorm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a feature table into peptide intensities per sample
    #[command(name = "features2peptides")]
    Features2peptides(Features2PeptidesArgs),

    /// Remove batch effects from iBAQ tables
    CorrectBatches(CorrectBatchesArgs),
}

/// Arguments of `features2peptides`
#[derive(Args, Debug)]
pub struct Features2PeptidesArgs {
    /// Feature table (quantms.io .parquet, or MSstats .csv/.tsv, optionally gzipped)
    #[arg(value_name = "FEATURES")]
    features: PathBuf,

    /// SDRF experiment design
    #[arg(short, long, value_name = "SDRF")]
    sdrf: PathBuf,

    /// Output CSV file of normalized peptide intensities
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Normalization method (quantile/qnorm, run-median/msstats, none)
    #[arg(long = "nmethod")]
    normalization: Option<NormalizationMethod>,

    /// Best-peptidoform criterion (intensity, score)
    #[arg(long)]
    selection: Option<PeptidoformSelection>,

    /// Minimum canonical peptide length
    #[arg(long)]
    min_aa: Option<usize>,

    /// Minimum unique peptides of a kept protein
    #[arg(long)]
    min_unique: Option<usize>,

    /// Log2-transform intensities before normalization
    #[arg(long)]
    log2: bool,

    /// Drop peptides observed in too few samples
    #[arg(long)]
    remove_low_frequency_peptides: bool,

    /// Drop decoy, contaminant and entrapment proteins
    #[arg(long)]
    remove_decoy_contaminants: bool,

    /// File with protein accessions to drop, one per line
    #[arg(long, value_name = "FILE")]
    remove_ids_file: Option<PathBuf>,

    /// Also write the peptide table as Parquet next to the CSV output
    #[arg(long)]
    save_parquet: bool,

    /// Write the run report as JSON
    #[arg(long, value_name = "FILE")]
    report_json: Option<PathBuf>,

    /// Rows per feature batch
    #[arg(short = 'b', long, hide = true)]
    batch_size: Option<usize>,
}

/// Arguments of `correct-batches`
#[derive(Args, Debug)]
pub struct CorrectBatchesArgs {
    /// Folder with the iBAQ tables to correct
    #[arg(short, long, value_name = "FOLDER")]
    folder: PathBuf,

    /// Output TSV file
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// File name pattern of the tables inside the folder (default: *ibaq.tsv)
    #[arg(short, long)]
    pattern: Option<String>,

    /// Column separator (default: tab)
    #[arg(long)]
    separator: Option<String>,

    /// Comment line prefix (default: #, empty to disable)
    #[arg(long)]
    comment: Option<String>,

    /// Sample id column (default: SampleID)
    #[arg(long)]
    sample_id_column: Option<String>,

    /// Protein id column (default: ProteinName)
    #[arg(long)]
    protein_id_column: Option<String>,

    /// Value column (default: Ibaq)
    #[arg(long)]
    ibaq_column: Option<String>,

    /// Correct batch means only, not variances
    #[arg(long)]
    mean_only: bool,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Features2peptides(args) => features2peptides::run(args),
        Commands::CorrectBatches(args) => correct_batches::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_correct_batches() {
        let cli = Cli::parse_from(["pepnorm", "-vv", "correct-batches", "-f", "ibaq", "-o", "out.tsv", "--mean-only"]);
        assert_eq!(cli.verbosity(), 2);
        match cli.command {
            Commands::CorrectBatches(args) => {
                assert!(args.mean_only);
                assert_eq!(args.pattern, None);
            }
            _ => panic!("expected correct-batches"),
        }
    }

    #[test]
    fn test_unknown_method_is_rejected() {
        let result = Cli::try_parse_from([
            "pepnorm", "features2peptides", "f.parquet", "-s", "d.tsv", "-o", "o.csv", "--nmethod", "zscore",
        ]);
        assert!(result.is_err());
    }
}
