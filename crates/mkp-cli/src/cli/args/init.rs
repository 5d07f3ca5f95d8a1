//! `mkp init` arguments.

use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Package name
    #[arg(long, default_value = "example")]
    pub name: String,

    /// Author name
    #[arg(long, default_value = "John Doe")]
    pub author: String,

    /// Package version
    #[arg(long, default_value = "0.1.0")]
    pub version: String,

    /// Package description
    #[arg(long, default_value = "Example package")]
    pub description: String,

    /// Package title
    #[arg(long, default_value = "Example")]
    pub title: String,

    /// Download URL
    #[arg(long, alias = "download_url", default_value = "http://example.com/")]
    pub download_url: String,

    /// Minimum required monitoring site version
    #[arg(long, alias = "min_required", default_value = "1.2.3")]
    pub min_required: String,

    /// Allow running in a directory that already has content
    #[arg(long)]
    pub ignore_non_empty: bool,
}
