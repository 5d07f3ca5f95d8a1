//! Package writer.
//!
//! The artifact is a gzip tar holding, in order:
//! - `info`: literal encoding of the metadata record
//! - `info.json`: JSON encoding of the same record
//! - `<category>.tar`: one uncompressed tar per non-empty category
//!
//! Outer headers are fully deterministic. Inner archives use
//! [`tar::HeaderMode::Deterministic`], which keeps the executable bit.

use crate::error::{IoResultExt, MkpError, Result};
use crate::info::{self, Info, INFO_ENTRY, INFO_JSON_ENTRY};
use flate2::{Compression, GzBuilder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tar::{Builder, Header, HeaderMode};

/// Path reported for write failures of [`pack_to_bytes`].
const MEMORY_SINK: &str = "<in-memory package>";

/// Build the artifact for `info` in memory.
///
/// `info` is patched with the packaging identity before encoding.
pub fn pack_to_bytes(info: &mut Info, root: &Path) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_package(info, root, &mut buffer, Path::new(MEMORY_SINK))?;
    Ok(buffer)
}

/// Build the artifact for `info` and store it at `outfile`.
///
/// The data goes to a temporary file next to `outfile` which is renamed into
/// place once complete.
pub fn pack_to_file(info: &mut Info, root: &Path, outfile: &Path) -> Result<()> {
    let dir = match outfile.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = tempfile::NamedTempFile::new_in(dir).at_path(dir)?;

    let mut out = BufWriter::new(tmp.as_file());
    write_package(info, root, &mut out, outfile)?;
    out.flush().at_path(outfile)?;
    drop(out);

    tmp.as_file().sync_all().at_path(tmp.path())?;
    tmp.persist(outfile).map_err(|e| MkpError::io(outfile, e.error))?;

    tracing::info!(path = %outfile.display(), "wrote package");
    Ok(())
}

fn write_package<W: Write>(info: &mut Info, root: &Path, writer: W, sink: &Path) -> Result<()> {
    info::patch_info(info);
    let files = info.files()?;
    let info_bytes = info::encode_info(info)?;
    let json_bytes = info::encode_info_json(info)?;

    let encoder = GzBuilder::new()
        .mtime(0) // Epoch
        .operating_system(255) // Unknown (deterministic)
        .write(writer, Compression::default());

    let mut tar = Builder::new(encoder);
    tar.mode(HeaderMode::Deterministic);

    write_entry(&mut tar, INFO_ENTRY, &info_bytes).at_path(sink)?;
    write_entry(&mut tar, INFO_JSON_ENTRY, &json_bytes).at_path(sink)?;

    for (category, names) in &files {
        if names.is_empty() {
            continue;
        }
        let inner = build_category_tar(&root.join(category), names)?;
        tracing::debug!(
            category = %category,
            files = names.len(),
            bytes = inner.len(),
            "packed category"
        );
        write_entry(&mut tar, &format!("{category}.tar"), &inner).at_path(sink)?;
    }

    let encoder = tar.into_inner().at_path(sink)?;
    encoder.finish().at_path(sink)?;
    Ok(())
}

fn build_category_tar(dir: &Path, names: &[String]) -> Result<Vec<u8>> {
    let mut tar = Builder::new(Vec::new());
    tar.mode(HeaderMode::Deterministic);
    tar.follow_symlinks(true);

    for name in names {
        let source = dir.join(name);
        let mut file = File::open(&source).at_path(&source)?;
        tar.append_file(name, &mut file).at_path(&source)?;
    }

    tar.into_inner().at_path(dir)
}

fn write_entry<T: Write>(tar: &mut Builder<T>, path: &str, data: &[u8]) -> std::io::Result<()> {
    let mut header = Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_uid(0);
    header.set_gid(0);
    header.set_mtime(0);
    header.set_entry_type(tar::EntryType::Regular);
    header.set_cksum();

    tar.append_data(&mut header, path, data)
}
