//! Build and read `.mkp` plugin packages.
//!
//! A package bundles the files of a plugin, grouped by category (agents,
//! checks, web, ...), together with its metadata record. See [`package`] for
//! the artifact layout.

pub mod collect;
pub mod dist;
pub mod error;
pub mod info;
pub mod package;

pub use collect::{find_files, Categories, ExcludePatterns, FileLists, DEFAULT_CATEGORIES, DIST_DIR};
pub use dist::{dist, package_file_name, DistOptions};
pub use error::{MkpError, Result};
pub use info::{
    decode_info, decode_info_json, encode_info, encode_info_json, patch_info, Info, InfoValue,
    PACKAGED_BY,
};
pub use package::{
    load_bytes, load_file, pack_to_bytes, pack_to_file, Package, ReadLimits, ReadLimitsOverrides,
};
