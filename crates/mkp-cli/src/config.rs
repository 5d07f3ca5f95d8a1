//! Loading of CLI input files: package metadata and read limit overrides.

use mkp_core::{Info, MkpError, ReadLimits, ReadLimitsOverrides};
use std::path::Path;

/// Read package metadata from a YAML or JSON file.
///
/// Files ending in `.json` are parsed as JSON, everything else as YAML. The
/// document must be a mapping.
pub fn load_info(path: &Path) -> Result<Info, MkpError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        MkpError::usage(format!(
            "cannot read package metadata {}: {e}",
            path.display()
        ))
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let value: serde_json::Value = if is_json {
        serde_json::from_str(&text).map_err(|e| invalid(path, e))?
    } else {
        serde_yaml::from_str(&text).map_err(|e| invalid(path, e))?
    };

    Info::from_json(value).ok_or_else(|| {
        MkpError::usage(format!(
            "package metadata {} must be a mapping",
            path.display()
        ))
    })
}

/// Default limits with overrides from a JSON file applied.
pub fn load_limits(path: &Path) -> Result<ReadLimits, MkpError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        MkpError::usage(format!("cannot read limits file {}: {e}", path.display()))
    })?;
    let overrides: ReadLimitsOverrides =
        serde_json::from_str(&text).map_err(|e| invalid(path, e))?;
    Ok(ReadLimits::default().apply(overrides))
}

fn invalid(path: &Path, err: impl std::fmt::Display) -> MkpError {
    MkpError::usage(format!("invalid {}: {err}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mkp_core::InfoValue;
    use tempfile::tempdir;

    #[test]
    fn reads_yaml_metadata() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("package.yaml");
        std::fs::write(
            &path,
            "name: foo\nversion: '42'\nversion.usable_until: null\nnum: 3\n",
        )
        .unwrap();

        let info = load_info(&path).unwrap();
        assert_eq!(info.get_str("name"), Some("foo"));
        assert_eq!(info.get_str("version"), Some("42"));
        assert_eq!(info.get("version.usable_until"), Some(&InfoValue::None));
        assert_eq!(info.get("num"), Some(&InfoValue::Int(3)));
    }

    #[test]
    fn reads_json_metadata() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(&path, r#"{"name": "foo", "version": "1.0"}"#).unwrap();
        assert_eq!(load_info(&path).unwrap().name().as_deref(), Some("foo"));
    }

    #[test]
    fn rejects_non_mapping_and_missing_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("package.yaml");
        std::fs::write(&path, "- a\n- b\n").unwrap();
        assert!(load_info(&path).unwrap_err().is_usage());
        assert!(load_info(&dir.path().join("absent.yaml"))
            .unwrap_err()
            .is_usage());
    }

    #[test]
    fn limits_overrides_apply() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("limits.json");
        std::fs::write(&path, r#"{"max_path_len": 128}"#).unwrap();
        let limits = load_limits(&path).unwrap();
        assert_eq!(limits.max_path_len, 128);
        assert_eq!(limits.max_info_bytes, ReadLimits::default().max_info_bytes);

        std::fs::write(&path, r#"{"max_bogus": 1}"#).unwrap();
        assert!(load_limits(&path).unwrap_err().is_usage());
    }
}
