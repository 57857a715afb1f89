//! `species_enabled.h`: which generations and families are compiled in.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{read_optional, Result};
use crate::models::SpeciesRecord;

static DEFINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*#[ \t]*define[ \t]+(P_(?:GEN_\d+_POKEMON|FAMILY_\w+|\w*FORMS?))[ \t]+(\w+)")
        .expect("valid regex")
});

/// Upper bound on reference-resolution passes.
const MAX_PASSES: usize = 10;

pub const GENERATIONS: std::ops::RangeInclusive<u8> = 1..=9;

/// Resolved boolean switches, by define name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnabledConfig {
    defines: BTreeMap<String, bool>,
}

impl EnabledConfig {
    pub fn parse(text: &str) -> Self {
        let pairs: Vec<(&str, &str)> = DEFINE
            .captures_iter(text)
            .filter_map(|caps| Some((caps.get(1)?.as_str(), caps.get(2)?.as_str())))
            .collect();

        let mut defines = BTreeMap::new();
        for (name, value) in &pairs {
            match *value {
                "TRUE" => {
                    defines.insert(name.to_string(), true);
                }
                "FALSE" => {
                    defines.insert(name.to_string(), false);
                }
                _ => {}
            }
        }

        for _ in 0..MAX_PASSES {
            let mut changed = false;
            for (name, value) in &pairs {
                if matches!(*value, "TRUE" | "FALSE") {
                    continue;
                }
                let Some(&resolved) = defines.get(*value) else {
                    continue;
                };
                if defines.get(*name) != Some(&resolved) {
                    defines.insert(name.to_string(), resolved);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        Self { defines }
    }

    /// Read the config header. A missing header yields an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        match read_optional(path)? {
            Some(text) => Ok(Self::parse(&text)),
            None => {
                tracing::warn!(path = %path.display(), "species_enabled.h not found");
                Ok(Self::default())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.defines.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.defines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defines.is_empty()
    }

    /// Every family define with its value, sorted by name.
    pub fn families(&self) -> impl Iterator<Item = (&str, bool)> {
        self.defines
            .iter()
            .filter(|(name, _)| name.starts_with("P_FAMILY_"))
            .map(|(name, &on)| (name.as_str(), on))
    }

    pub fn enabled_families(&self) -> BTreeSet<&str> {
        self.families().filter(|(_, on)| *on).map(|(name, _)| name).collect()
    }

    pub fn generation_enabled(&self, generation: u8) -> bool {
        self.get(&format!("P_GEN_{generation}_POKEMON")).unwrap_or(false)
    }

    pub fn enabled_generations(&self) -> BTreeSet<u8> {
        GENERATIONS.filter(|&g| self.generation_enabled(g)).collect()
    }

    /// The family switch decides when present, otherwise the generation's.
    pub fn is_enabled(&self, family: Option<&str>, generation: u8) -> bool {
        family
            .and_then(|f| self.get(f))
            .unwrap_or_else(|| self.generation_enabled(generation))
    }

    /// Drop records that are compiled out.
    pub fn retain_enabled(&self, records: &mut Vec<SpeciesRecord>) -> usize {
        let before = records.len();
        records.retain(|r| self.is_enabled(r.family.as_deref(), r.generation));
        before - records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = "\
#define P_GEN_1_POKEMON TRUE
#define P_GEN_2_POKEMON FALSE
#define P_ALOLAN_FORMS  TRUE

#define P_FAMILY_BULBASAUR      P_GEN_1_POKEMON
#define P_FAMILY_CHIKORITA      P_GEN_2_POKEMON
#define P_FAMILY_CHAIN_C        P_FAMILY_CHAIN_B
#define P_FAMILY_CHAIN_B        P_FAMILY_CHAIN_A
#define P_FAMILY_CHAIN_A        P_GEN_1_POKEMON
#define P_FAMILY_GHOST          P_UNDEFINED_SWITCH
";

    #[test]
    fn test_literal_and_reference_values() {
        let config = EnabledConfig::parse(CONFIG);
        assert_eq!(config.get("P_GEN_1_POKEMON"), Some(true));
        assert_eq!(config.get("P_ALOLAN_FORMS"), Some(true));
        assert_eq!(config.get("P_FAMILY_BULBASAUR"), Some(true));
        assert_eq!(config.get("P_FAMILY_CHIKORITA"), Some(false));
    }

    #[test]
    fn test_chained_references_resolve_over_passes() {
        let config = EnabledConfig::parse(CONFIG);
        assert_eq!(config.get("P_FAMILY_CHAIN_C"), Some(true));
        assert_eq!(config.get("P_FAMILY_GHOST"), None);
    }

    #[test]
    fn test_queries() {
        let config = EnabledConfig::parse(CONFIG);
        assert_eq!(config.enabled_generations(), BTreeSet::from([1]));
        assert!(config.enabled_families().contains("P_FAMILY_BULBASAUR"));
        assert!(!config.enabled_families().contains("P_FAMILY_CHIKORITA"));
        assert_eq!(config.families().count(), 5);

        assert!(config.is_enabled(Some("P_FAMILY_BULBASAUR"), 2));
        assert!(!config.is_enabled(Some("P_FAMILY_CHIKORITA"), 1));
        assert!(config.is_enabled(Some("P_FAMILY_UNKNOWN"), 1));
        assert!(!config.is_enabled(None, 3));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = EnabledConfig::load(&dir.path().join("species_enabled.h")).unwrap();
        assert!(config.is_empty());
    }
}
