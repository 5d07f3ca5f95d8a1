use crate::cli::args::ExtractArgs;
use crate::config;
use crate::exit_codes;
use anyhow::Context;
use mkp_core::{encode_info, Info, MkpError, Package, ReadLimits};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub fn run(args: ExtractArgs) -> anyhow::Result<i32> {
    let limits = match &args.limits {
        Some(path) => config::load_limits(path)?,
        None => ReadLimits::default(),
    };

    let file = File::open(&args.file).map_err(|e| MkpError::io(&args.file, e))?;
    let package = Package::open_with_limits(BufReader::new(file), limits)
        .with_context(|| format!("failed to open {}", args.file.display()))?;

    if package.json_info().is_none() {
        tracing::warn!(file = %args.file.display(), "package has no readable info.json");
    }

    let dest = extract_path(&args.output_dir, args.no_prefix, package.info());
    std::fs::create_dir_all(&dest).map_err(|e| MkpError::io(&dest, e))?;
    package
        .extract_files(&dest)
        .with_context(|| format!("failed to extract into {}", dest.display()))?;
    write_info_files(&package, &dest)?;

    println!("{}", dest.display());
    Ok(exit_codes::SUCCESS)
}

/// `<output>/<name>-<version>` unless prefixing is disabled.
fn extract_path(output_dir: &Path, no_prefix: bool, info: &Info) -> PathBuf {
    if no_prefix {
        return output_dir.to_path_buf();
    }
    let name = info.name().unwrap_or_else(|| "package".to_string());
    let version = info.version().unwrap_or_else(|| "unknown".to_string());
    output_dir.join(format!("{name}-{version}"))
}

/// Write the metadata next to the restored categories.
fn write_info_files(package: &Package, dest: &Path) -> anyhow::Result<()> {
    let info_path = dest.join("info");
    std::fs::write(&info_path, encode_info(package.info())?)
        .map_err(|e| MkpError::io(&info_path, e))?;

    let json = match package.json_info() {
        Some(info) => {
            let mut text = serde_json::to_string_pretty(&info.to_json())?;
            text.push('\n');
            text
        }
        None => "{}\n".to_string(),
    };
    let json_path = dest.join("info.json");
    std::fs::write(&json_path, json).map_err(|e| MkpError::io(&json_path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_falls_back_for_missing_identity() {
        let info = Info::new();
        assert_eq!(
            extract_path(Path::new("out"), false, &info),
            Path::new("out/package-unknown")
        );

        let info: Info = [("name", "foo"), ("version", "42")].into_iter().collect();
        assert_eq!(
            extract_path(Path::new("out"), false, &info),
            Path::new("out/foo-42")
        );
        assert_eq!(extract_path(Path::new("out"), true, &info), Path::new("out"));
    }
}
