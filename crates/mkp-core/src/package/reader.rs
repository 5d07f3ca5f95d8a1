//! Package reader.

use super::limits::{LimitReader, ReadLimits};
use crate::collect::FileLists;
use crate::error::{IoResultExt, MkpError, Result};
use crate::info::{self, Info, INFO_ENTRY, INFO_JSON_ENTRY};
use flate2::read::GzDecoder;
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Component, Path};

/// An opened package artifact.
///
/// The outer archive is read completely on open; metadata is decoded eagerly
/// and category archives are kept in memory until extracted.
#[derive(Debug)]
pub struct Package {
    info: Info,
    json_info: Option<Info>,
    entry_names: Vec<String>,
    members: HashMap<String, Vec<u8>>,
}

impl Package {
    /// Open a package with default [`ReadLimits`].
    pub fn open<R: Read>(reader: R) -> Result<Self> {
        Self::open_with_limits(reader, ReadLimits::default())
    }

    pub fn open_with_limits<R: Read>(reader: R, limits: ReadLimits) -> Result<Self> {
        // Bound the decompressed size before tar ever sees the stream.
        let decoder = GzDecoder::new(reader);
        let limited = LimitReader::new(decoder, limits.max_decode_bytes, "LimitDecodeBytes");
        let mut archive = tar::Archive::new(limited);

        let mut entry_names = Vec::new();
        let mut members = HashMap::new();

        let entries = archive.entries().map_err(corrupt)?;
        for entry in entries {
            let mut entry = entry.map_err(corrupt)?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let name = entry.path().map_err(corrupt)?.to_string_lossy().into_owned();

            if name.len() > limits.max_path_len {
                return Err(MkpError::format(format!(
                    "entry name length {} exceeds limit {}",
                    name.len(),
                    limits.max_path_len
                )));
            }

            let size = entry.header().size().map_err(corrupt)?;
            let is_metadata = name == INFO_ENTRY || name == INFO_JSON_ENTRY;
            if is_metadata && size > limits.max_info_bytes {
                return Err(MkpError::format(format!(
                    "'{name}' declared size {size} exceeds limit {}",
                    limits.max_info_bytes
                )));
            }

            let mut data = Vec::new();
            entry.read_to_end(&mut data).map_err(corrupt)?;
            tracing::debug!(entry = %name, bytes = data.len(), "read archive entry");

            if members.insert(name.clone(), data).is_some() {
                tracing::warn!(entry = %name, "duplicate archive entry, keeping the last one");
            } else {
                entry_names.push(name);
            }
        }

        let info = match members.get(INFO_ENTRY) {
            Some(bytes) => info::decode_info(bytes)?,
            None => return Err(MkpError::format(format!("missing '{INFO_ENTRY}' entry"))),
        };

        let json_info = match members.get(INFO_JSON_ENTRY) {
            None => None,
            Some(bytes) => match info::decode_info_json(bytes) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring unreadable '{INFO_JSON_ENTRY}'");
                    None
                }
            },
        };

        members.remove(INFO_ENTRY);
        members.remove(INFO_JSON_ENTRY);

        Ok(Self {
            info,
            json_info,
            entry_names,
            members,
        })
    }

    /// Metadata decoded from the `info` entry.
    pub fn info(&self) -> &Info {
        &self.info
    }

    /// Metadata decoded from `info.json`, if present and readable.
    pub fn json_info(&self) -> Option<&Info> {
        self.json_info.as_ref()
    }

    /// File lists declared by the metadata.
    pub fn files(&self) -> Result<FileLists> {
        self.info.files()
    }

    /// Outer archive entries in archive order.
    pub fn entry_names(&self) -> &[String] {
        &self.entry_names
    }

    /// Restore every declared category below `dest`.
    ///
    /// Each category directory must not exist yet. Only members listed in the
    /// metadata are written; anything else inside a category archive is
    /// ignored.
    pub fn extract_files(&self, dest: &Path) -> Result<()> {
        let files = self.files()?;
        for (category, names) in &files {
            if names.is_empty() {
                continue;
            }
            check_relative(category)?;
            for name in names {
                check_relative(name)?;
            }

            let tar_name = format!("{category}.tar");
            let data = self.members.get(&tar_name).ok_or_else(|| {
                MkpError::format(format!("missing '{tar_name}' for category '{category}'"))
            })?;

            let category_dir = dest.join(category);
            std::fs::create_dir_all(dest).at_path(dest)?;
            std::fs::create_dir(&category_dir).at_path(&category_dir)?;

            extract_category(data, &category_dir, names)?;
            tracing::debug!(category = %category, files = names.len(), "extracted category");
        }
        tracing::info!(dest = %dest.display(), "extracted package");
        Ok(())
    }
}

/// Open a package held in memory.
pub fn load_bytes(bytes: &[u8]) -> Result<Package> {
    Package::open(Cursor::new(bytes))
}

/// Open a package file.
pub fn load_file(path: &Path) -> Result<Package> {
    let file = File::open(path).at_path(path)?;
    Package::open(BufReader::new(file))
}

fn extract_category(data: &[u8], dir: &Path, names: &[String]) -> Result<()> {
    let mut wanted: BTreeSet<&str> = names.iter().map(String::as_str).collect();

    let mut archive = tar::Archive::new(Cursor::new(data));
    archive.set_preserve_mtime(false);
    archive.set_preserve_permissions(true);

    for entry in archive.entries().map_err(corrupt)? {
        let mut entry = entry.map_err(corrupt)?;
        let name = entry.path().map_err(corrupt)?.to_string_lossy().into_owned();
        if !wanted.remove(name.as_str()) {
            tracing::debug!(member = %name, "skipping unlisted member");
            continue;
        }

        // unpack_in refuses to write through links that leave `dir`.
        let target = dir.join(&name);
        if !entry.unpack_in(dir).at_path(&target)? {
            return Err(MkpError::format(format!("unsafe member '{name}' in category archive")));
        }
    }

    for missing in wanted {
        tracing::warn!(member = %missing, dir = %dir.display(), "listed file not found in package");
    }
    Ok(())
}

/// Names from the metadata must stay inside their category directory.
fn check_relative(name: &str) -> Result<()> {
    let path = Path::new(name);
    let safe = !name.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if safe {
        Ok(())
    } else {
        Err(MkpError::format(format!("unsafe path '{name}' in file list")))
    }
}

fn corrupt(err: std::io::Error) -> MkpError {
    MkpError::format(format!("corrupt archive data: {err}"))
}
