//! Package artifact format.
//!
//! A package is a gzip tar holding the metadata record twice (`info`,
//! `info.json`) plus one uncompressed `<category>.tar` per non-empty
//! category.

mod limits;
mod reader;
mod writer;

pub use limits::{ReadLimits, ReadLimitsOverrides};
pub use reader::{load_bytes, load_file, Package};
pub use writer::{pack_to_bytes, pack_to_file};

/// File extension of package artifacts.
pub const PACKAGE_EXTENSION: &str = "mkp";
