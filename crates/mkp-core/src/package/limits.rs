//! Resource limits and bounded readers for opening packages.

use serde::Deserialize;
use std::io::Read;

/// Resource limits applied while opening a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadLimits {
    /// Total decompressed size of the outer archive.
    pub max_decode_bytes: u64,
    /// Size of the `info` and `info.json` entries.
    pub max_info_bytes: u64,
    /// Length of any archive member name.
    pub max_path_len: usize,
}

impl Default for ReadLimits {
    fn default() -> Self {
        Self {
            max_decode_bytes: 1024 * 1024 * 1024, // 1 GB uncompressed
            max_info_bytes: 10 * 1024 * 1024,     // 10 MB
            max_path_len: 4096,
        }
    }
}

/// Partial overrides for `ReadLimits`. Used for CLI/config JSON parsing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadLimitsOverrides {
    pub max_decode_bytes: Option<u64>,
    pub max_info_bytes: Option<u64>,
    pub max_path_len: Option<usize>,
}

impl ReadLimits {
    /// Apply overrides onto these defaults. Only `Some` values override.
    pub fn apply(self, overrides: ReadLimitsOverrides) -> Self {
        Self {
            max_decode_bytes: overrides.max_decode_bytes.unwrap_or(self.max_decode_bytes),
            max_info_bytes: overrides.max_info_bytes.unwrap_or(self.max_info_bytes),
            max_path_len: overrides.max_path_len.unwrap_or(self.max_path_len),
        }
    }
}

/// A reader that limits the total number of bytes read and fails explicitly on overflow.
pub(crate) struct LimitReader<R> {
    inner: R,
    limit: u64,
    read: u64,
    error_tag: &'static str,
}

impl<R: Read> LimitReader<R> {
    pub(crate) fn new(inner: R, limit: u64, error_tag: &'static str) -> Self {
        Self {
            inner,
            limit,
            read: 0,
            error_tag,
        }
    }
}

impl<R: Read> Read for LimitReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.read >= self.limit {
            // Only fail if there really is more data.
            let mut probe = [0u8; 1];
            return match self.inner.read(&mut probe)? {
                0 => Ok(0),
                _ => Err(std::io::Error::other(format!(
                    "{}: exceeded limit of {} bytes",
                    self.error_tag, self.limit
                ))),
            };
        }

        let max_to_read = (self.limit - self.read).min(buf.len() as u64) as usize;
        let n = self.inner.read(&mut buf[..max_to_read])?;
        self.read += n as u64;

        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn overrides_only_replace_given_fields() {
        let overrides: ReadLimitsOverrides =
            serde_json::from_str(r#"{"max_info_bytes": 1024}"#).unwrap();
        let limits = ReadLimits::default().apply(overrides);
        assert_eq!(limits.max_info_bytes, 1024);
        assert_eq!(limits.max_decode_bytes, ReadLimits::default().max_decode_bytes);
    }

    #[test]
    fn overrides_reject_unknown_fields() {
        assert!(serde_json::from_str::<ReadLimitsOverrides>(r#"{"max_events": 1}"#).is_err());
    }

    #[test]
    fn limit_reader_allows_exact_size() {
        let mut out = Vec::new();
        LimitReader::new(Cursor::new(vec![7u8; 16]), 16, "LimitTest")
            .read_to_end(&mut out)
            .unwrap();
        assert_eq!(out.len(), 16);
    }

    #[test]
    fn limit_reader_fails_past_limit() {
        let mut out = Vec::new();
        let err = LimitReader::new(Cursor::new(vec![7u8; 17]), 16, "LimitTest")
            .read_to_end(&mut out)
            .unwrap_err();
        assert!(err.to_string().contains("LimitTest"));
    }
}
