use crate::cli::args::InitArgs;
use crate::exit_codes;
use crate::templates;
use anyhow::Context;
use mkp_core::{MkpError, DEFAULT_CATEGORIES};
use std::path::Path;

pub fn run(args: InitArgs) -> anyhow::Result<i32> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    scaffold(&cwd, &args)?;
    Ok(exit_codes::SUCCESS)
}

/// Create the category directories, `package.yaml` and `dist.sh` in `root`.
pub(crate) fn scaffold(root: &Path, args: &InitArgs) -> anyhow::Result<()> {
    if !args.ignore_non_empty {
        ensure_empty(root)?;
    }

    for category in DEFAULT_CATEGORIES {
        let dir = root.join(category);
        std::fs::create_dir_all(&dir).map_err(|e| MkpError::io(&dir, e))?;
    }

    let package_yaml = templates::package_yaml(args).context("rendering package.yaml")?;
    write_file_if_missing(&root.join("package.yaml"), &package_yaml)?;

    let dist_sh = root.join("dist.sh");
    write_file_if_missing(&dist_sh, templates::DIST_SH)?;
    make_executable(&dist_sh)?;
    Ok(())
}

/// Only non-hidden entries count.
fn ensure_empty(root: &Path) -> anyhow::Result<()> {
    let entries = std::fs::read_dir(root).map_err(|e| MkpError::io(root, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| MkpError::io(root, e))?;
        if !entry.file_name().to_string_lossy().starts_with('.') {
            return Err(MkpError::usage(format!(
                "{} is not empty; use --ignore-non-empty to override",
                root.display()
            ))
            .into());
        }
    }
    Ok(())
}

fn write_file_if_missing(path: &Path, content: &str) -> anyhow::Result<()> {
    if path.exists() {
        println!("Skipped {} (exists)", path.display());
        return Ok(());
    }
    std::fs::write(path, content).map_err(|e| MkpError::io(path, e))?;
    println!("Created {}", path.display());
    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .map_err(|e| MkpError::io(path, e))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> anyhow::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;
    use clap::Parser;
    use tempfile::tempdir;

    fn init_args(extra: &[&str]) -> InitArgs {
        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: InitArgs,
        }
        let argv = std::iter::once("init").chain(extra.iter().copied());
        Wrapper::parse_from(argv).args
    }

    #[test]
    fn scaffold_creates_project() {
        let dir = tempdir().unwrap();
        scaffold(dir.path(), &init_args(&["--name", "testpkg", "--version", "1.2.3"])).unwrap();

        for category in DEFAULT_CATEGORIES {
            assert!(dir.path().join(category).is_dir(), "{category} missing");
        }
        let info = config::load_info(&dir.path().join("package.yaml")).unwrap();
        assert_eq!(info.get_str("name"), Some("testpkg"));
        assert_eq!(info.get_str("version"), Some("1.2.3"));
        assert_eq!(info.get_str("version.min_required"), Some("1.2.3"));
        assert_eq!(info.get_str("author"), Some("John Doe"));
        assert!(dir.path().join("dist.sh").is_file());
    }

    #[test]
    fn refuses_non_empty_directory() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("README"), "x").unwrap();

        let err = scaffold(dir.path(), &init_args(&[])).unwrap_err();
        assert_eq!(exit_codes::for_error(&err), exit_codes::USAGE_ERROR);

        scaffold(dir.path(), &init_args(&["--ignore-non-empty"])).unwrap();
        assert!(dir.path().join("package.yaml").is_file());
    }

    #[test]
    fn hidden_entries_do_not_count() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        scaffold(dir.path(), &init_args(&[])).unwrap();
    }

    #[test]
    fn existing_metadata_is_kept() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("package.yaml"), "name: mine\n").unwrap();
        scaffold(dir.path(), &init_args(&["--ignore-non-empty"])).unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("package.yaml")).unwrap(),
            "name: mine\n"
        );
    }
}
