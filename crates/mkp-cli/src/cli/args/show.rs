//! `mkp show` arguments.

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Package file (.mkp)
    pub file: PathBuf,

    /// Print metadata as JSON
    #[arg(long)]
    pub json: bool,
}
