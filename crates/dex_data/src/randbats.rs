//! Random-battle set datasets: document model, fetch-or-fallback loading,
//! and lookup by normalised species name.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::decoder::normalize_name;
use crate::error::{DexError, Result};

/// Per-stat spreads as they appear in the dataset (`{"atk": 0}`).
pub type StatSpread = BTreeMap<String, u8>;

/// One role of a species, e.g. `"Doubles Support"`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abilities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
    #[serde(default)]
    pub moves: Vec<String>,
    #[serde(rename = "teraTypes", default, skip_serializing_if = "Vec::is_empty")]
    pub tera_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evs: Option<StatSpread>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ivs: Option<StatSpread>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
}

/// One species of a dataset, keyed by display name in [`Dataset`].
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RandbatsEntry {
    #[serde(default)]
    pub level: Option<u8>,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub evs: Option<StatSpread>,
    #[serde(default)]
    pub ivs: Option<StatSpread>,
    #[serde(default)]
    pub roles: BTreeMap<String, RoleSet>,
}

impl RandbatsEntry {
    /// Role abilities, falling back to the species-level list.
    pub fn abilities_for<'a>(&'a self, role: &'a RoleSet) -> &'a [String] {
        role.abilities.as_deref().unwrap_or(&self.abilities)
    }

    pub fn items_for<'a>(&'a self, role: &'a RoleSet) -> &'a [String] {
        role.items.as_deref().unwrap_or(&self.items)
    }

    pub fn evs_for<'a>(&'a self, role: &'a RoleSet) -> Option<&'a StatSpread> {
        role.evs.as_ref().or(self.evs.as_ref())
    }

    pub fn ivs_for<'a>(&'a self, role: &'a RoleSet) -> Option<&'a StatSpread> {
        role.ivs.as_ref().or(self.ivs.as_ref())
    }
}

/// Display name → entry.
pub type Dataset = BTreeMap<String, RandbatsEntry>;

/// A dataset that was loaded, with the file name it is known by.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub name: String,
    pub data: Dataset,
}

impl LoadedDataset {
    /// `gen9randombattle.json` → `Gen9 randombattle`.
    pub fn source_tag(&self) -> String {
        self.name.replace(".json", "").replace("gen9", "Gen9 ")
    }
}

/// Where a dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSource {
    /// Local copy, relative to the tool directory unless absolute.
    pub file: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// The three published gen 9 datasets.
pub fn default_sources() -> Vec<DatasetSource> {
    ["gen9randomdoublesbattle.json", "gen9randombattle.json", "gen9babyrandombattle.json"]
        .into_iter()
        .map(|file| DatasetSource {
            file: file.to_string(),
            url: Some(format!("https://pkmn.github.io/randbats/data/{file}")),
        })
        .collect()
}

/// Fetches a document body over the network.
pub trait Transport {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Blocking HTTP transport with a whole-request timeout.
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str) -> Result<String> {
        let network = |reason: String| DexError::Network {
            url: url.to_string(),
            reason,
        };
        let response = match self.agent.get(url).call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(code, _)) => return Err(network(format!("HTTP {code}"))),
            Err(e) => return Err(network(e.to_string())),
        };
        response.into_string().map_err(|e| network(e.to_string()))
    }
}

/// Loads datasets: one network attempt, then the local copy.
pub struct DatasetLoader<'t> {
    transport: Option<&'t dyn Transport>,
    dir: PathBuf,
}

impl<'t> DatasetLoader<'t> {
    /// `transport` is `None` when running offline.
    pub fn new(dir: impl Into<PathBuf>, transport: Option<&'t dyn Transport>) -> Self {
        Self {
            transport,
            dir: dir.into(),
        }
    }

    fn local_path(&self, source: &DatasetSource) -> PathBuf {
        let file = Path::new(&source.file);
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.dir.join(file)
        }
    }

    /// Load one dataset. No retries.
    pub fn load(&self, source: &DatasetSource) -> Result<Dataset> {
        if let (Some(transport), Some(url)) = (self.transport, source.url.as_deref()) {
            let fetched = transport.fetch(url).and_then(|body| {
                serde_json::from_str::<Dataset>(&body).map_err(|e| DexError::Json {
                    context: url.to_string(),
                    source: e,
                })
            });
            match fetched {
                Ok(data) => {
                    tracing::info!(file = %source.file, entries = data.len(), "fetched dataset");
                    return Ok(data);
                }
                Err(e) => tracing::warn!(file = %source.file, error = %e, "fetch failed, using local copy"),
            }
        }

        let path = self.local_path(source);
        let local = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|text| serde_json::from_str::<Dataset>(&text).map_err(|e| e.to_string()));
        match local {
            Ok(data) => {
                tracing::info!(path = %path.display(), entries = data.len(), "loaded local dataset");
                Ok(data)
            }
            Err(reason) => {
                tracing::warn!(path = %path.display(), %reason, "local dataset unusable");
                Err(DexError::DatasetUnavailable {
                    name: source.file.clone(),
                })
            }
        }
    }

    /// Load every source, skipping the unavailable ones.
    pub fn load_all(&self, sources: &[DatasetSource]) -> Vec<LoadedDataset> {
        sources
            .iter()
            .filter_map(|source| match self.load(source) {
                Ok(data) => Some(LoadedDataset {
                    name: source.file.clone(),
                    data,
                }),
                Err(e) => {
                    tracing::info!(error = %e, "skipping dataset");
                    None
                }
            })
            .collect()
    }
}

/// Read a dataset straight from a local file.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let text = crate::error::read_required(path)?;
    serde_json::from_str(&text).map_err(|e| DexError::Json {
        context: path.display().to_string(),
        source: e,
    })
}

/// Roles of all datasets, merged per normalised species name.
#[derive(Debug, Default, Clone)]
pub struct RoleIndex {
    by_name: HashMap<String, (String, BTreeMap<String, RoleSet>)>,
}

impl RoleIndex {
    /// Later datasets replace same-named roles of earlier ones. The display
    /// name is the first spelling seen.
    pub fn build<'a>(datasets: impl IntoIterator<Item = &'a Dataset>) -> Self {
        let mut index = RoleIndex::default();
        for dataset in datasets {
            for (name, entry) in dataset {
                let (_, roles) = index
                    .by_name
                    .entry(normalize_name(name))
                    .or_insert_with(|| (name.clone(), BTreeMap::new()));
                roles.extend(entry.roles.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
        index
    }

    /// Display name and roles for a species key.
    pub fn lookup(&self, key: &str) -> Option<(&str, &BTreeMap<String, RoleSet>)> {
        self.by_name
            .get(&normalize_name(key))
            .map(|(display, roles)| (display.as_str(), roles))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
