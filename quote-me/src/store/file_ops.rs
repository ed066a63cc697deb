//! File operations for the quote store
//!
//! Reads and writes `{ "quotes": [...] }` documents. Writes go to a sibling
//! temp file first and are renamed into place, so readers never observe a
//! half-written document.

use quote_types::QuoteDocument;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{StoreError, StoreResult};

/// Serialize a document the way it is stored on disk (pretty, two-space indent)
pub fn to_pretty_json(doc: &QuoteDocument) -> StoreResult<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Read a document, returning an empty one if the file does not exist yet
pub fn read_document(path: &Path) -> StoreResult<QuoteDocument> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(QuoteDocument::default()),
        Err(e) => return Err(StoreError::io(path, e)),
    };

    // An empty file is treated like a fresh store
    if content.trim().is_empty() {
        return Ok(QuoteDocument::default());
    }

    Ok(serde_json::from_str(&content)?)
}

/// Write a document, replacing whatever was there (creates parent directories as needed)
pub fn write_document(path: &Path, doc: &QuoteDocument) -> StoreResult<()> {
    let json = to_pretty_json(doc)?;
    write_atomic(path, json.as_bytes()).map_err(|e| StoreError::io(path, e))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = temp_path(path);
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
