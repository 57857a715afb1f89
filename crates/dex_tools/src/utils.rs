use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::CONFIG_FILE;

/// Nearest ancestor of the working directory that holds `dex.toml` or
/// `src/data/pokemon`. Falls back to the working directory.
pub fn find_project_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Failed to read the working directory")?;
    Ok(project_root_from(&cwd).unwrap_or(cwd))
}

fn project_root_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE).is_file() || dir.join("src/data/pokemon").is_dir())
        .map(Path::to_path_buf)
}

/// Write `text` to `path`, or to stdout when there is no path.
pub fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Split a comma-separated path list, dropping empty items.
pub fn split_paths(list: &str) -> Vec<PathBuf> {
    list.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}
