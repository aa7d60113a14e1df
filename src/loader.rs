//! Page loading: raw bytes to decoded text.

use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::WINDOWS_1255;
use tracing::debug;

use crate::error::PageError;

pub struct Page {
    pub source: PathBuf,
    pub text: String,
}

pub fn load(path: &Path) -> Result<Page, PageError> {
    let bytes = fs::read(path).map_err(|source| PageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = decode(&bytes).unwrap_or_else(|| {
        debug!(page = %path.display(), "not windows-1255, decoding as lossy utf-8");
        String::from_utf8_lossy(&bytes).into_owned()
    });
    Ok(Page {
        source: path.to_path_buf(),
        text: normalize_newlines(text),
    })
}

/// Strict windows-1255 decode. Bytes the code page leaves unassigned come
/// back from the WHATWG table as C1 controls (or U+05BA for 0xCA) and are
/// rejected along with outright malformed input.
pub fn decode(bytes: &[u8]) -> Option<String> {
    let text = WINDOWS_1255.decode_without_bom_handling_and_without_replacement(bytes)?;
    if text
        .chars()
        .any(|c| matches!(c, '\u{80}'..='\u{9f}' | '\u{5ba}'))
    {
        return None;
    }
    Some(text.into_owned())
}

fn normalize_newlines(text: String) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text
    }
}
