//! Source locations and the load-once source sets the extractors run over.
//!
//! Every input is read exactly once into a [`MoveSources`] or
//! [`SpeciesSources`] value; the stages then borrow from it, so a caller
//! that builds several databases in one process parses each file once.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dex::DexTable;
use crate::error::{read_optional, read_required, DexError, Result};
use crate::family::{FamilyTable, MatchPolicy};
use crate::learnsets::{parse_level_up, parse_move_lists, ListKind};
use crate::models::{MoveDatabase, SpeciesDatabase};
use crate::movedb::{self, Learnsets, MoveReport};
use crate::randbats::RoleIndex;
use crate::species::{extract_species, generation_of, SpeciesReport, SpeciesSource};

/// Project-relative input locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub level_up_dir: PathBuf,
    pub teachable_file: PathBuf,
    pub egg_moves_file: PathBuf,
    pub species_info_dir: PathBuf,
    pub pokedex_header: PathBuf,
    pub species_enabled: PathBuf,
    pub trainers_party: PathBuf,
    /// Databases and dataset copies live here.
    pub tool_dir: PathBuf,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            level_up_dir: "src/data/pokemon/level_up_learnsets".into(),
            teachable_file: "src/data/pokemon/teachable_learnsets.h".into(),
            egg_moves_file: "src/data/pokemon/egg_moves.h".into(),
            species_info_dir: "src/data/pokemon/species_info".into(),
            pokedex_header: "include/constants/pokedex.h".into(),
            species_enabled: "include/config/species_enabled.h".into(),
            trainers_party: "src/data/trainers.party".into(),
            tool_dir: "tools/trainer_gen".into(),
        }
    }
}

impl Layout {
    /// Resolve every relative path against `root`.
    pub fn under(&self, root: &Path) -> Layout {
        let join = |p: &PathBuf| if p.is_absolute() { p.clone() } else { root.join(p) };
        Layout {
            level_up_dir: join(&self.level_up_dir),
            teachable_file: join(&self.teachable_file),
            egg_moves_file: join(&self.egg_moves_file),
            species_info_dir: join(&self.species_info_dir),
            pokedex_header: join(&self.pokedex_header),
            species_enabled: join(&self.species_enabled),
            trainers_party: join(&self.trainers_party),
            tool_dir: join(&self.tool_dir),
        }
    }

    pub fn move_db_path(&self) -> PathBuf {
        self.tool_dir.join("move_data.json")
    }

    pub fn species_db_path(&self) -> PathBuf {
        self.tool_dir.join("pokemon_data.json")
    }
}

/// A source file held in memory.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

impl SourceFile {
    pub fn read(path: &Path) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            text: read_required(path)?,
        })
    }

    pub fn file_name(&self) -> &str {
        self.path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
    }
}

/// Sorted paths in `dir` whose names satisfy `wanted`. A missing directory
/// is a missing input.
fn list_paths(dir: &Path, wanted: impl Fn(&str) -> bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(DexError::MissingInput {
            path: dir.to_path_buf(),
        });
    }
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|source| DexError::FileAccess {
            path: dir.to_path_buf(),
            source,
        })?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.file_name().and_then(|n| n.to_str()).is_some_and(&wanted))
        .collect();
    paths.sort();
    Ok(paths)
}

/// Every matching file in `dir`; one unreadable file fails the whole set.
fn list_sources(dir: &Path, wanted: impl Fn(&str) -> bool) -> Result<Vec<SourceFile>> {
    list_paths(dir, wanted)?.iter().map(|p| SourceFile::read(p)).collect()
}

fn is_level_up_file(name: &str) -> bool {
    name.starts_with("gen_") && name.ends_with(".h")
}

fn is_family_file(name: &str) -> bool {
    name.starts_with("gen_") && name.ends_with("_families.h")
}

/// Species-info headers with their generation, in file-name order.
fn species_info(dir: &Path) -> Result<Vec<(u8, SourceFile)>> {
    Ok(list_sources(dir, is_family_file)?
        .into_iter()
        .map(|file| (generation_of(file.file_name()), file))
        .collect())
}

/// Family headers for propagation. An unreadable header only loses its
/// own families.
fn readable_family_files(dir: &Path) -> Result<Vec<SourceFile>> {
    let files = list_paths(dir, is_family_file)?
        .iter()
        .filter_map(|path| match SourceFile::read(path) {
            Ok(file) => Some(file),
            Err(e) => {
                tracing::warn!(error = %e, "skipping family header");
                None
            }
        })
        .collect();
    Ok(files)
}

/// Inputs of the move database.
#[derive(Debug, Clone)]
pub struct MoveSources {
    pub level_up: Vec<SourceFile>,
    pub teachable: SourceFile,
    pub egg: Option<SourceFile>,
    /// `None` when the species-info directory is absent. Unreadable headers
    /// are left out.
    pub species_info: Option<Vec<SourceFile>>,
}

impl MoveSources {
    /// Read every input. Level-up and teachable data are mandatory.
    pub fn load(layout: &Layout) -> Result<Self> {
        let level_up = list_sources(&layout.level_up_dir, is_level_up_file)?;
        if level_up.is_empty() {
            return Err(DexError::MissingInput {
                path: layout.level_up_dir.join("gen_*.h"),
            });
        }
        let teachable = SourceFile::read(&layout.teachable_file)?;

        let egg = match read_optional(&layout.egg_moves_file) {
            Ok(Some(text)) => Some(SourceFile {
                path: layout.egg_moves_file.clone(),
                text,
            }),
            Ok(None) => {
                tracing::warn!(path = %layout.egg_moves_file.display(), "egg moves file not found");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping egg moves");
                None
            }
        };

        let species_info = match readable_family_files(&layout.species_info_dir) {
            Ok(files) => Some(files),
            Err(e) => {
                tracing::warn!(error = %e, "skipping family propagation");
                None
            }
        };

        Ok(Self {
            level_up,
            teachable,
            egg,
            species_info,
        })
    }

    /// Run the three learnset passes.
    pub fn learnsets(&self) -> Learnsets {
        let mut learnsets = Learnsets::default();
        for file in &self.level_up {
            parse_level_up(&file.text, &mut learnsets.level_up);
        }
        parse_move_lists(&self.teachable.text, ListKind::Teachable, &mut learnsets.teachable);
        if let Some(egg) = &self.egg {
            parse_move_lists(&egg.text, ListKind::Egg, &mut learnsets.egg);
        }
        tracing::info!(
            level_up = learnsets.level_up.len(),
            teachable = learnsets.teachable.len(),
            egg = learnsets.egg.len(),
            "parsed learnsets"
        );
        learnsets
    }

    pub fn families(&self) -> Option<FamilyTable> {
        self.species_info
            .as_ref()
            .map(|files| FamilyTable::from_sources(files.iter().map(|f| f.text.as_str())))
    }

    /// Scan, propagate, merge, and backfill.
    pub fn build(&self, policy: MatchPolicy, roles: &RoleIndex) -> (MoveDatabase, MoveReport) {
        let families = self.families();
        movedb::build(self.learnsets(), families.as_ref(), policy, roles)
    }
}

/// Inputs of the species database.
#[derive(Debug, Clone)]
pub struct SpeciesSources {
    pub species_info: Vec<(u8, SourceFile)>,
    pub dex: DexTable,
}

impl SpeciesSources {
    /// Read every input. Both the headers and the dex enumeration are mandatory.
    pub fn load(layout: &Layout) -> Result<Self> {
        let species_info = species_info(&layout.species_info_dir)?;
        if species_info.is_empty() {
            return Err(DexError::MissingInput {
                path: layout.species_info_dir.join("gen_*_families.h"),
            });
        }
        let dex = DexTable::load(&layout.pokedex_header)?;
        Ok(Self { species_info, dex })
    }

    pub fn build(&self) -> (SpeciesDatabase, SpeciesReport) {
        let sources: Vec<SpeciesSource<'_>> = self
            .species_info
            .iter()
            .map(|(generation, file)| SpeciesSource {
                generation: *generation,
                text: &file.text,
            })
            .collect();
        let (records, report) = extract_species(&sources, &self.dex);
        (SpeciesDatabase::new(records), report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_root() {
        let layout = Layout::default().under(Path::new("/project"));
        assert_eq!(layout.teachable_file, Path::new("/project/src/data/pokemon/teachable_learnsets.h"));
        assert_eq!(layout.move_db_path(), Path::new("/project/tools/trainer_gen/move_data.json"));
    }

    #[test]
    fn test_file_name_filters() {
        assert!(is_level_up_file("gen_1.h"));
        assert!(!is_level_up_file("gen_1.c"));
        assert!(is_family_file("gen_9_families.h"));
        assert!(!is_family_file("shared_dex_text.h"));
    }

    #[test]
    fn test_missing_mandatory_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::default().under(dir.path());
        assert!(MoveSources::load(&layout).unwrap_err().is_missing_input());
        assert!(SpeciesSources::load(&layout).unwrap_err().is_missing_input());
    }
}
