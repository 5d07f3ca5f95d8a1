//! Package metadata record and its two encodings.
//!
//! - `info`: Python-literal text (see [`literal`]), always present.
//! - `info.json`: the same record as JSON, optional on read.

pub mod literal;
pub mod value;

pub use literal::{LiteralError, MAX_LITERAL_DEPTH};
pub use value::{Info, InfoValue, FILES_KEY, NUM_FILES_KEY, VERSION_PACKAGED_KEY};

use crate::error::{MkpError, Result};

/// Identity written to `version.packaged` on every build.
pub const PACKAGED_BY: &str = "mkp-rs";

/// Archive entry holding the literal encoding.
pub const INFO_ENTRY: &str = "info";
/// Archive entry holding the JSON encoding.
pub const INFO_JSON_ENTRY: &str = "info.json";

/// Stamp the packaging tool identity, replacing any caller-supplied value.
pub fn patch_info(info: &mut Info) {
    info.insert(VERSION_PACKAGED_KEY, PACKAGED_BY);
}

/// Encode the record as literal text.
pub fn encode_info(info: &Info) -> Result<Vec<u8>> {
    literal::format_info(info)
        .map(String::into_bytes)
        .map_err(|e| MkpError::usage(format!("cannot encode {INFO_ENTRY}: {e}")))
}

/// Encode the record as JSON.
pub fn encode_info_json(info: &Info) -> Result<Vec<u8>> {
    serde_json::to_vec(&info.to_json())
        .map_err(|e| MkpError::usage(format!("cannot encode {INFO_JSON_ENTRY}: {e}")))
}

/// Decode literal text into a record.
pub fn decode_info(bytes: &[u8]) -> Result<Info> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| MkpError::parse(INFO_ENTRY, format!("not valid UTF-8: {e}")))?;
    literal::parse_info(text).map_err(|e| MkpError::parse(INFO_ENTRY, e.to_string()))
}

/// Decode JSON into a record; the document must be an object.
pub fn decode_info_json(bytes: &[u8]) -> Result<Info> {
    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| MkpError::parse(INFO_JSON_ENTRY, e.to_string()))?;
    Info::from_json(value)
        .ok_or_else(|| MkpError::parse(INFO_JSON_ENTRY, "top-level value is not an object"))
}
