//! Input loading: file or stdin, with encoding_rs decoding.
//!
//! Jira's Excel-flavored exports are frequently Windows-1252 rather than
//! UTF-8, so the raw bytes are decoded through a caller-selected encoding
//! before any parsing happens. The `-` path convention routes stdin.

use std::{
    fs,
    io::Read,
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

/// Reads the whole input as text: a file path, or stdin when the path is
/// `-`.
pub fn read_input_text(path: &Path, encoding: &'static Encoding) -> Result<String> {
    let bytes = if is_dash(path) {
        let mut buffer = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut buffer)
            .context("Reading stdin")?;
        buffer
    } else {
        fs::read(path).with_context(|| format!("Opening input file {path:?}"))?
    };
    decode_bytes(&bytes, encoding)
}
