//! `mkp extract` arguments.

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Package file (.mkp)
    pub file: PathBuf,

    /// Output directory
    #[arg(short = 'o', long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Extract directly into the output directory instead of <name>-<version>/
    #[arg(long)]
    pub no_prefix: bool,

    /// JSON file overriding read limits
    #[arg(long, value_name = "FILE")]
    pub limits: Option<PathBuf>,
}
