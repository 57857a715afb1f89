//! Error type shared by every pipeline stage.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DexError>;

#[derive(Error, Debug)]
pub enum DexError {
    #[error("required input not found: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no `enum NationalDexOrder` declaration in {}", path.display())]
    MissingEnum { path: PathBuf },

    #[error("national dex enumerator {name} has ordinal {ordinal}, past the u16 range")]
    OrdinalOverflow { name: String, ordinal: usize },

    #[error("malformed JSON in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("network error fetching {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("dataset {name} unavailable from both network and local copy")]
    DatasetUnavailable { name: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl DexError {
    /// True for errors that mean a mandatory input was absent.
    pub fn is_missing_input(&self) -> bool {
        matches!(self, DexError::MissingInput { .. } | DexError::MissingEnum { .. })
    }
}

/// Read a file that the run cannot proceed without.
pub fn read_required(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(DexError::MissingInput {
            path: path.to_path_buf(),
        });
    }
    fs::read_to_string(path).map_err(|source| DexError::FileAccess {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a file whose absence only removes its contribution.
///
/// Returns `Ok(None)` when the file does not exist. A file that exists
/// but cannot be read is still reported, so the caller can decide to
/// skip it with a warning.
pub fn read_optional(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    fs::read_to_string(path)
        .map(Some)
        .map_err(|source| DexError::FileAccess {
            path: path.to_path_buf(),
            source,
        })
}
