//! Build a package from a source tree into `<root>/dist`.

use crate::collect::{self, Categories, ExcludePatterns, DIST_DIR};
use crate::error::{IoResultExt, MkpError, Result};
use crate::info::Info;
use crate::package::{self, PACKAGE_EXTENSION};
use std::path::{Path, PathBuf};

/// Collection settings for [`dist`].
#[derive(Debug, Clone, Default)]
pub struct DistOptions {
    pub categories: Categories,
    pub exclude: ExcludePatterns,
}

/// Artifact file name for a record, `<name>-<version>.mkp`.
pub fn package_file_name(info: &Info) -> Result<String> {
    let name = info
        .name()
        .ok_or_else(|| MkpError::usage("package metadata has no 'name'"))?;
    let version = info
        .version()
        .ok_or_else(|| MkpError::usage("package metadata has no 'version'"))?;
    Ok(format!("{name}-{version}.{PACKAGE_EXTENSION}"))
}

/// Collect files below `root`, record them in `info` and write the artifact.
///
/// Returns the path of the written package.
pub fn dist(info: &mut Info, root: &Path, options: &DistOptions) -> Result<PathBuf> {
    let file_name = package_file_name(info)?;
    let files = collect::find_files(root, &options.categories, &options.exclude)?;
    info.set_files(&files);
    tracing::info!(
        categories = files.len(),
        files = collect::count_files(&files),
        "collected package files"
    );

    let dist_dir = root.join(DIST_DIR);
    std::fs::create_dir_all(&dist_dir).at_path(&dist_dir)?;

    let outfile = dist_dir.join(file_name);
    package::pack_to_file(info, root, &outfile)?;
    Ok(outfile)
}
