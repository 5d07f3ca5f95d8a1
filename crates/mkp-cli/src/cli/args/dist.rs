//! `mkp dist` arguments.

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct DistArgs {
    /// Package source directory
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Package metadata file (YAML or JSON), relative to DIR
    #[arg(long, default_value = "package.yaml")]
    pub info: PathBuf,

    /// Comma-separated category directories to pack (default: the standard set)
    #[arg(long, value_delimiter = ',', conflicts_with = "include_all")]
    pub categories: Option<Vec<String>>,

    /// Pack every non-hidden top-level directory except dist/
    #[arg(long)]
    pub include_all: bool,

    /// Leave out files whose absolute path matches REGEX (repeatable)
    #[arg(long, value_name = "REGEX")]
    pub exclude: Vec<String>,
}
