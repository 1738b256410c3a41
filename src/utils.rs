//! Utility functions that may be helpful for implementing
//! and testing MapReduce.
//!

use anyhow::{Context, Result};
use bytes::Bytes;
use std::fs;
use std::path::Path;

/// Read an entire [`Bytes`] slice into a [`String`].
///
/// Returns an error if the slice contains invalid UTF-8.
pub fn string_from_bytes(buf: Bytes) -> Result<String> {
    Ok(String::from_utf8(buf.as_ref().into())?)
}

/// Reads a whole file, naming the path in the error.
pub fn read_file(path: &Path) -> Result<Bytes> {
    let buf = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Bytes::from(buf))
}

/// Iterates over the non-blank lines of a text, paired with their
/// 1-based line numbers.
pub fn data_lines(s: &str) -> impl Iterator<Item = (usize, &str)> {
    s.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blank_lines_and_keeps_numbers() {
        let lines = data_lines("a\n\n  \nb\r\n").collect::<Vec<_>>();
        assert_eq!(lines, vec![(1, "a"), (4, "b")]);
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        assert!(string_from_bytes(Bytes::from_static(&[0xff, 0xfe])).is_err());
        assert_eq!(string_from_bytes(Bytes::from_static(b"ok")).unwrap(), "ok");
    }
}
