//! Stat, type, ability, and generation filters over the species database.

use std::collections::HashMap;

use crate::models::{SpeciesRecord, Stat};

/// Inclusive bounds; an unset side is unbounded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: Option<u16>,
    pub max: Option<u16>,
}

impl Bounds {
    pub fn new(min: Option<u16>, max: Option<u16>) -> Self {
        Self { min, max }
    }

    pub fn is_set(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    pub fn contains(&self, value: u16) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

#[derive(Debug, Default, Clone)]
pub struct Criteria {
    pub generation: Option<u8>,
    /// Any-of, case-insensitive.
    pub types: Vec<String>,
    /// Case-insensitive substring of a regular or hidden ability.
    pub ability: Option<String>,
    pub bst: Bounds,
    pub stats: HashMap<Stat, Bounds>,
}

impl Criteria {
    /// True when no criterion was given. A blank ability still counts as
    /// given, though it matches every record.
    pub fn is_empty(&self) -> bool {
        self.generation.is_none()
            && self.types.is_empty()
            && self.ability.is_none()
            && !self.bst.is_set()
            && !self.stats.values().any(Bounds::is_set)
    }

    fn ability_needle(&self) -> Option<String> {
        self.ability
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_lowercase)
    }

    pub fn matches(&self, record: &SpeciesRecord) -> bool {
        if self.generation.is_some_and(|g| g != record.generation) {
            return false;
        }
        if !self.types.is_empty()
            && !self
                .types
                .iter()
                .any(|wanted| record.types.iter().any(|t| t.eq_ignore_ascii_case(wanted)))
        {
            return false;
        }
        if let Some(needle) = self.ability_needle() {
            let found = record
                .abilities
                .iter()
                .chain(record.hidden_ability.iter())
                .any(|a| a.to_lowercase().contains(&needle));
            if !found {
                return false;
            }
        }
        if !self.bst.contains(record.bst) {
            return false;
        }
        self.stats
            .iter()
            .all(|(&stat, bounds)| bounds.contains(record.base_stats.get(stat)))
    }

    /// Matching records, in database order.
    pub fn apply<'a>(&self, records: &'a [SpeciesRecord]) -> Vec<&'a SpeciesRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Three-line listing entry.
pub fn format_detailed(index: usize, record: &SpeciesRecord) -> String {
    let types = if record.types.is_empty() {
        "Unknown".to_string()
    } else {
        record.types.join("/")
    };
    let s = &record.base_stats;
    format!(
        "{index:3}. {:<20} ({})\n     Gen: {}  Types: {types:<20} BST: {}\n     HP: {:3}  Atk: {:3}  Def: {:3}  SpA: {:3}  SpD: {:3}  Spe: {:3}\n",
        record.name, record.species, record.generation, record.bst, s.hp, s.atk, s.def, s.spa, s.spd, s.spe
    )
}

pub fn format_compact(index: usize, record: &SpeciesRecord) -> String {
    format!(
        "{index:3}. {:<25} Gen: {}  BST: {:3}",
        record.name, record.generation, record.bst
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BaseStats;

    fn record(species: &str, bst_each: u16, types: &[&str], generation: u8) -> SpeciesRecord {
        let base_stats = BaseStats {
            hp: bst_each,
            atk: bst_each,
            def: bst_each,
            spa: bst_each,
            spd: bst_each,
            spe: bst_each,
        };
        SpeciesRecord {
            species: species.to_string(),
            name: species.to_string(),
            nat_dex_num: 0,
            bst: base_stats.total(),
            base_stats,
            types: types.iter().map(|t| t.to_string()).collect(),
            abilities: vec!["Intimidate".into()],
            hidden_ability: Some("Moxie".into()),
            generation,
            family: None,
        }
    }

    fn records() -> Vec<SpeciesRecord> {
        vec![
            record("LOW", 250 / 6, &["Fire"], 1),
            record("MID", 350 / 6, &["Water", "Flying"], 2),
            record("HIGH", 450 / 6, &["Dragon"], 3),
        ]
    }

    #[test]
    fn test_bst_range_selects_middle() {
        let mut data = records();
        data[0].bst = 250;
        data[1].bst = 350;
        data[2].bst = 450;
        let criteria = Criteria {
            bst: Bounds::new(Some(300), Some(400)),
            ..Default::default()
        };
        let hits: Vec<_> = criteria.apply(&data).into_iter().map(|r| r.species.as_str()).collect();
        assert_eq!(hits, vec!["MID"]);
    }

    #[test]
    fn test_bounds_inclusive() {
        let bounds = Bounds::new(Some(10), Some(20));
        assert!(bounds.contains(10));
        assert!(bounds.contains(20));
        assert!(!bounds.contains(21));
        assert!(Bounds::default().contains(u16::MAX));
    }

    #[test]
    fn test_type_any_of_case_insensitive() {
        let data = records();
        let criteria = Criteria {
            types: vec!["flying".into(), "DRAGON".into()],
            ..Default::default()
        };
        assert_eq!(criteria.apply(&data).len(), 2);
    }

    #[test]
    fn test_ability_matches_hidden_substring() {
        let data = records();
        let criteria = Criteria {
            ability: Some("mox".into()),
            generation: Some(3),
            ..Default::default()
        };
        let hits = criteria.apply(&data);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].species, "HIGH");
    }

    #[test]
    fn test_stat_bounds() {
        let data = records();
        let mut criteria = Criteria::default();
        criteria.stats.insert(Stat::Spe, Bounds::new(Some(58), None));
        assert_eq!(criteria.apply(&data).len(), 2);
    }

    #[test]
    fn test_empty_criteria() {
        assert!(Criteria::default().is_empty());
        let blank_ability = Criteria {
            ability: Some("  ".into()),
            ..Default::default()
        };
        assert!(!blank_ability.is_empty());
        let mut stat_only = Criteria::default();
        stat_only.stats.insert(Stat::Hp, Bounds::new(None, Some(50)));
        assert!(!stat_only.is_empty());
    }

    #[test]
    fn test_blank_ability_matches_everything() {
        let data = records();
        let criteria = Criteria {
            ability: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(criteria.apply(&data).len(), data.len());
    }

    #[test]
    fn test_format_compact() {
        let line = format_compact(1, &records()[0]);
        assert!(line.starts_with("  1. LOW"));
        assert!(line.ends_with("BST: 246"));
    }
}
