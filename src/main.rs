//! # pepnorm
//!
//! Command-line front end of the pepnorm library.
//!
//! ## Usage
//!
//! ```bash
//! # Normalize a quantms.io feature table
//! pepnorm -v features2peptides PXD000001.feature.parquet \
//!     --sdrf PXD000001.sdrf.tsv --output PXD000001.peptides.csv \
//!     --nmethod quantile --remove-low-frequency-peptides --save-parquet
//!
//! # Batch-correct every *ibaq.tsv table of a folder
//! pepnorm correct-batches --folder ibaq/ --output ibaq_corrected.tsv
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
