//! Source tree scanning.
//!
//! Each category is a top-level directory of the source root. Files below it
//! are collected with their path relative to that directory. Hidden entries
//! (leading `.`), editor backups (trailing `~`) and anything matching an
//! exclusion pattern are left out.

use crate::error::{IoResultExt, MkpError, Result};
use indexmap::IndexMap;
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Category name -> relative file paths, in category scan order.
pub type FileLists = IndexMap<String, Vec<String>>;

/// Output directory below the source root. Never a category.
pub const DIST_DIR: &str = "dist";

/// Categories known to the monitoring site.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "agents",
    "checkman",
    "checks",
    "doc",
    "inventory",
    "notifications",
    "pnp-templates",
    "web",
    "lib",
    "agent_based",
];

/// Which top-level directories are scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Categories {
    /// Exactly these directories.
    Explicit(Vec<String>),
    /// Every non-hidden directory of the source root except [`DIST_DIR`].
    IncludeAll,
}

impl Default for Categories {
    fn default() -> Self {
        Self::Explicit(DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect())
    }
}

impl Categories {
    pub fn explicit<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Explicit(names.into_iter().map(Into::into).collect())
    }

    /// Reject category lists that would pack the output directory.
    pub fn validate(&self) -> Result<()> {
        if let Self::Explicit(names) = self {
            if names.iter().any(|n| n == DIST_DIR) {
                return Err(MkpError::usage(format!(
                    "'{DIST_DIR}' is the output directory and cannot be packaged as a category"
                )));
            }
        }
        Ok(())
    }

    /// Resolve to concrete directory names for `root`.
    pub fn resolve(&self, root: &Path) -> Result<Vec<String>> {
        self.validate()?;
        match self {
            Self::Explicit(names) => Ok(names.clone()),
            Self::IncludeAll => discover_categories(root),
        }
    }
}

/// Compiled exclusion regexes, matched against absolute file paths.
#[derive(Debug, Clone, Default)]
pub struct ExcludePatterns {
    patterns: Vec<Regex>,
}

impl ExcludePatterns {
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(p)
                    .map_err(|e| MkpError::usage(format!("invalid exclude pattern '{p}': {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True if any pattern matches somewhere in `path`.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(path))
    }
}

/// Collect files for every category below `root`.
///
/// Categories without any surviving file are omitted from the result.
pub fn find_files(
    root: &Path,
    categories: &Categories,
    exclude: &ExcludePatterns,
) -> Result<FileLists> {
    let names = categories.resolve(root)?;
    let abs_root = std::path::absolute(root).at_path(root)?;

    let mut result = FileLists::new();
    for name in names {
        let files = find_files_in_directory(&abs_root.join(&name), exclude)?;
        tracing::debug!(category = %name, count = files.len(), "collected category");
        if !files.is_empty() {
            result.insert(name, files);
        }
    }
    Ok(result)
}

/// Total number of files over all categories.
pub fn count_files(files: &FileLists) -> usize {
    files.values().map(Vec::len).sum()
}

fn find_files_in_directory(dir: &Path, exclude: &ExcludePatterns) -> Result<Vec<String>> {
    let mut result = Vec::new();
    if !dir.is_dir() {
        return Ok(result);
    }

    let walker = WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()));

    for entry in walker {
        let entry = entry.map_err(|e| walk_error(dir, e))?;
        // Links to directories are neither descended into nor packed.
        if entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir()) {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.ends_with('~') {
            continue;
        }
        let abs = path_to_slash(entry.path());
        if exclude.is_excluded(&abs) {
            tracing::debug!(path = %abs, "excluded by pattern");
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(dir)
            .map_err(|_| MkpError::format(format!("{} escapes {}", abs, dir.display())))?;
        result.push(path_to_slash(rel));
    }
    Ok(result)
}

fn discover_categories(root: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(names),
        Err(e) => return Err(MkpError::io(root, e)),
    };
    for entry in entries {
        let entry = entry.at_path(root)?;
        let file_type = entry.file_type().at_path(entry.path())?;
        if !file_type.is_dir() {
            continue;
        }
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy().into_owned();
        if is_hidden(&file_name) || name == DIST_DIR {
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn path_to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn walk_error(dir: &Path, err: walkdir::Error) -> MkpError {
    let path = err.path().map_or_else(|| dir.to_path_buf(), PathBuf::from);
    match err.into_io_error() {
        Some(io) => MkpError::io(path, io),
        None => MkpError::format(format!("filesystem loop detected at {}", path.display())),
    }
}
