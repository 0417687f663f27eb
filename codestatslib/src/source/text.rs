//! Binary sniffing and text decoding.
//!
//! Every file goes through [`read_source`] before it is counted. Files with
//! an extension the language table knows as text skip the binary sniff;
//! everything else is checked on its first [`SNIFF_LEN`] bytes.

use std::fs;
use std::path::Path;

use log::debug;

use crate::data::language::{extension_of, LanguageTable};
use crate::error::CodestatsError;
use crate::Result;

/// Number of leading bytes inspected by [`is_binary`].
pub const SNIFF_LEN: usize = 4096;

/// Share of non-text bytes above which a file counts as binary.
const NON_TEXT_RATIO: f64 = 0.30;

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";
const UTF16_LE_BOM: &[u8] = b"\xff\xfe";
const UTF16_BE_BOM: &[u8] = b"\xfe\xff";

const BINARY_MAGIC: &[&[u8]] = &[
    b"\x00\x01",
    b"\xff\xd8\xff",
    b"PK\x03\x04",
    b"\x7fELF",
    b"\x89PNG",
    b"GIF8",
];

fn has_bom(head: &[u8]) -> bool {
    head.starts_with(UTF16_LE_BOM) || head.starts_with(UTF16_BE_BOM) || head.starts_with(UTF8_BOM)
}

fn is_text_byte(byte: u8) -> bool {
    matches!(byte, 0x20..=0x7e | b'\n' | b'\r' | b'\t' | 0x08 | 0x0c | 0x1b)
}

/// Decide whether a file head looks binary.
///
/// Only the first [`SNIFF_LEN`] bytes of `head` are inspected.
/// Bytes outside printable ASCII and the usual control characters count as
/// non-text, so heavily non-ASCII UTF-8 without a BOM can trip the ratio
/// check.
pub fn is_binary(head: &[u8]) -> bool {
    let head = &head[..head.len().min(SNIFF_LEN)];
    if head.is_empty() || has_bom(head) {
        return false;
    }
    if BINARY_MAGIC.iter().any(|magic| head.starts_with(magic)) {
        return true;
    }
    if head.contains(&0) {
        return true;
    }

    let non_text = head.iter().filter(|&&b| !is_text_byte(b)).count();
    non_text as f64 / head.len() as f64 > NON_TEXT_RATIO
}

/// Decode raw file bytes into a string.
///
/// UTF-16 is recognised by its BOM, a UTF-8 BOM is stripped, and anything
/// else is read as UTF-8 with invalid sequences replaced.
pub fn decode(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(UTF16_LE_BOM) {
        return decode_utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_BE_BOM) {
        return decode_utf16(rest, u16::from_be_bytes);
    }
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    let mut text: String = char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();
    if bytes.len() % 2 == 1 {
        text.push(char::REPLACEMENT_CHARACTER);
    }
    text
}

/// Iterator over the lines of a source, see [`split_lines`].
#[derive(Debug, Clone)]
pub struct SourceLines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for SourceLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let Some(at) = self.rest.find(['\r', '\n']) else {
            return Some(std::mem::take(&mut self.rest));
        };
        let line = &self.rest[..at];
        let terminator = if self.rest[at..].starts_with("\r\n") { 2 } else { 1 };
        self.rest = &self.rest[at + terminator..];
        Some(line)
    }
}

/// Split a source into lines on `\n`, `\r\n` and a lone `\r`.
///
/// Like [`str::lines`], a final terminator does not start an empty line.
///
/// ```rust
/// use codestatslib::source::split_lines;
///
/// let lines: Vec<&str> = split_lines("a\r\nb\rc\n\nd").collect();
/// assert_eq!(lines, vec!["a", "b", "c", "", "d"]);
/// ```
pub fn split_lines(source: &str) -> SourceLines<'_> {
    SourceLines { rest: source }
}

/// Read a file as text.
///
/// Returns `Ok(None)` when the file is skipped: larger than
/// `max_file_size`, or sniffed as binary. IO failures are returned as
/// [`CodestatsError::FileRead`].
pub fn read_source(
    path: &Path,
    table: &LanguageTable,
    max_file_size: Option<u64>,
) -> Result<Option<String>> {
    let read_error = |source| CodestatsError::FileRead {
        path: path.to_path_buf(),
        source,
    };

    if let Some(limit) = max_file_size {
        let size = fs::metadata(path).map_err(read_error)?.len();
        if size > limit {
            debug!("skipping {} ({size} bytes > {limit})", path.display());
            return Ok(None);
        }
    }

    let bytes = fs::read(path).map_err(read_error)?;
    if !table.is_text_like(&extension_of(path)) && is_binary(&bytes) {
        debug!("skipping binary file {}", path.display());
        return Ok(None);
    }

    Ok(Some(decode(&bytes)))
}
