//! Text decoding for extracts produced by legacy Windows tools.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use encoding_rs::{UTF_8, WINDOWS_1252};

use crate::error::{IngestError, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode `bytes` as UTF-8 (BOM stripped), falling back to Windows-1252
/// when the bytes are not valid UTF-8.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => text,
        None => {
            tracing::debug!("input is not UTF-8, decoding as Windows-1252");
            WINDOWS_1252.decode_without_bom_handling(bytes).0
        }
    }
}

/// Read and decode a text file.
pub fn read_text(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = fs::read(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode_text(&bytes).into_owned())
}
