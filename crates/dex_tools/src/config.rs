//! `dex.toml` and the resolved project context.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context as _, Result};
use dex_data::randbats::default_sources;
use dex_data::{DatasetSource, Layout};
use serde::{Deserialize, Serialize};

use crate::utils::find_project_root;

pub const CONFIG_FILE: &str = "dex.toml";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: Layout,
    pub randbats: RandbatsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RandbatsConfig {
    pub timeout_secs: u64,
    pub sources: Vec<DatasetSource>,
}

impl Default for RandbatsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            sources: default_sources(),
        }
    }
}

impl Config {
    /// Load `dex.toml` from `root`, or defaults when there is none.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

/// Project root, config, and the layout resolved against the root.
#[derive(Debug, Clone)]
pub struct Context {
    pub root: PathBuf,
    pub config: Config,
    pub layout: Layout,
}

impl Context {
    /// `root` overrides the directory search.
    pub fn resolve(root: Option<PathBuf>) -> Result<Self> {
        let root = match root {
            Some(root) => root,
            None => find_project_root()?,
        };
        let config = Config::load(&root)?;
        let layout = config.paths.under(&root);
        tracing::debug!(root = %root.display(), "project context");
        Ok(Self { root, config, layout })
    }

    /// Network timeout, with a CLI override in seconds.
    pub fn timeout(&self, override_secs: Option<u64>) -> Duration {
        Duration::from_secs(override_secs.unwrap_or(self.config.randbats.timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.paths, Layout::default());
        assert_eq!(config.randbats.timeout_secs, 10);
        assert_eq!(config.randbats.sources.len(), 3);
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"
[paths]
tool_dir = "out"

[randbats]
timeout_secs = 3
[[randbats.sources]]
file = "local.json"
"#,
        )
        .unwrap();

        let ctx = Context::resolve(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(ctx.layout.tool_dir, dir.path().join("out"));
        assert_eq!(
            ctx.layout.teachable_file,
            dir.path().join("src/data/pokemon/teachable_learnsets.h")
        );
        assert_eq!(ctx.timeout(None), Duration::from_secs(3));
        assert_eq!(ctx.timeout(Some(20)), Duration::from_secs(20));
        assert_eq!(ctx.config.randbats.sources.len(), 1);
        assert!(ctx.config.randbats.sources[0].url.is_none());
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[paths\n").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }
}
