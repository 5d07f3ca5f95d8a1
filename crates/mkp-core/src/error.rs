//! Error types for package building and extraction.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for mkp operations.
pub type Result<T> = std::result::Result<T, MkpError>;

/// Errors that can occur while collecting, packing or extracting a package.
#[derive(Debug, Error)]
pub enum MkpError {
    /// Metadata bytes do not follow the literal or JSON grammar.
    #[error("cannot parse {entry}: {message}")]
    Parse { entry: String, message: String },

    /// The archive is missing a required entry or its data is corrupt.
    #[error("invalid package: {message}")]
    Format { message: String },

    /// Underlying filesystem failure.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid caller input. Raised before anything is written.
    #[error("{message}")]
    Usage { message: String },
}

impl MkpError {
    pub fn parse(entry: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            entry: entry.into(),
            message: message.into(),
        }
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Returns true for caller mistakes (as opposed to bad packages or IO).
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage { .. })
    }

    /// Suggested exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage { .. } => 2,
            _ => 1,
        }
    }
}

/// Attach a path to a bare `io::Error`.
pub(crate) trait IoResultExt<T> {
    fn at_path(self, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn at_path(self, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|e| MkpError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_split_usage_from_package_errors() {
        assert_eq!(MkpError::usage("bad flag").exit_code(), 2);
        assert_eq!(MkpError::format("no info").exit_code(), 1);
        assert_eq!(MkpError::parse("info", "eof").exit_code(), 1);
    }

    #[test]
    fn io_error_mentions_path() {
        let err = MkpError::io(
            "/tmp/missing/file",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert!(err.to_string().contains("/tmp/missing/file"));
        assert!(!err.is_usage());
    }
}
