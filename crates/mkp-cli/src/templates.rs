//! Files written by `mkp init`.

use crate::cli::args::InitArgs;
use std::collections::BTreeMap;

pub const PACKAGE_YAML_HEADER: &str = "\
# Package metadata for `mkp dist`.
# `files`, `num_files` and `version.packaged` are filled in at build time.
";

pub const DIST_SH: &str = r#"#!/bin/sh
# Build the package into dist/.
set -e
cd "$(dirname "$0")"
exec mkp dist --info package.yaml "$@"
"#;

/// Render `package.yaml` for the given init arguments.
pub fn package_yaml(args: &InitArgs) -> Result<String, serde_yaml::Error> {
    let fields: BTreeMap<&str, &str> = [
        ("author", args.author.as_str()),
        ("description", args.description.as_str()),
        ("download_url", args.download_url.as_str()),
        ("name", args.name.as_str()),
        ("title", args.title.as_str()),
        ("version", args.version.as_str()),
        ("version.min_required", args.min_required.as_str()),
    ]
    .into_iter()
    .collect();
    Ok(format!("{PACKAGE_YAML_HEADER}{}", serde_yaml::to_string(&fields)?))
}
