//! Reading and writing the JSON databases.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{read_required, DexError, Result};

/// Serialize `value` as indented JSON and move it over `path` in one step.
///
/// The destination directory is created if needed. The document goes to
/// a temporary file there and is renamed into place, so readers never
/// see a partial file.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, value).map_err(|e| DexError::Json {
        context: path.display().to_string(),
        source: e,
    })?;
    tmp.write_all(b"\n")?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| DexError::Io(e.error))?;
    Ok(())
}

/// Load a database produced by one of the extractors.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = read_required(path)?;
    serde_json::from_str(&text).map_err(|e| DexError::Json {
        context: path.display().to_string(),
        source: e,
    })
}
