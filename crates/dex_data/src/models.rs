//! JSON documents produced by the extractors and read by the query tools.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::learnsets::LevelUpMove;
use crate::randbats::RoleSet;

/// Provenance string recorded in every database header.
pub const SOURCE: &str = "pokeemerald-expansion";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BaseStats {
    pub hp: u16,
    pub atk: u16,
    pub def: u16,
    pub spa: u16,
    pub spd: u16,
    pub spe: u16,
}

/// One of the six base stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Hp,
    Atk,
    Def,
    Spa,
    Spd,
    Spe,
}

impl Stat {
    pub const ALL: [Stat; 6] = [Stat::Hp, Stat::Atk, Stat::Def, Stat::Spa, Stat::Spd, Stat::Spe];

    /// Short key used in the JSON documents and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Stat::Hp => "hp",
            Stat::Atk => "atk",
            Stat::Def => "def",
            Stat::Spa => "spa",
            Stat::Spd => "spd",
            Stat::Spe => "spe",
        }
    }

    /// Label used in team notation (`EVs: 252 Atk / 4 SpD`).
    pub fn label(self) -> &'static str {
        match self {
            Stat::Hp => "HP",
            Stat::Atk => "Atk",
            Stat::Def => "Def",
            Stat::Spa => "SpA",
            Stat::Spd => "SpD",
            Stat::Spe => "Spe",
        }
    }
}

impl BaseStats {
    pub fn get(&self, stat: Stat) -> u16 {
        match stat {
            Stat::Hp => self.hp,
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::Spa => self.spa,
            Stat::Spd => self.spd,
            Stat::Spe => self.spe,
        }
    }

    /// Sum of the six stats, saturating at `u16::MAX`.
    pub fn total(&self) -> u16 {
        Stat::ALL.iter().fold(0u16, |acc, &s| acc.saturating_add(self.get(s)))
    }
}

/// A species entry of `pokemon_data.json`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SpeciesRecord {
    pub species: String,
    pub name: String,
    #[serde(rename = "natDexNum")]
    pub nat_dex_num: u16,
    #[serde(rename = "baseStats")]
    pub base_stats: BaseStats,
    pub bst: u16,
    pub types: Vec<String>,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(
        rename = "hiddenAbility",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub hidden_ability: Option<String>,
    pub generation: u8,
    #[serde(default)]
    pub family: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SpeciesMetadata {
    pub total_pokemon: usize,
    pub source: String,
    pub generation: u8,
}

/// `pokemon_data.json`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SpeciesDatabase {
    pub metadata: SpeciesMetadata,
    pub pokemon: Vec<SpeciesRecord>,
}

impl SpeciesDatabase {
    pub fn new(pokemon: Vec<SpeciesRecord>) -> Self {
        Self {
            metadata: SpeciesMetadata {
                total_pokemon: pokemon.len(),
                source: SOURCE.to_string(),
                generation: 9,
            },
            pokemon,
        }
    }
}

/// A species entry of `move_data.json`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveRecord {
    pub species: String,
    pub name: String,
    #[serde(default)]
    pub level_up_moves: Vec<LevelUpMove>,
    #[serde(default)]
    pub teachable_moves: Vec<String>,
    #[serde(default)]
    pub egg_moves: Vec<String>,
    #[serde(default)]
    pub randbats_movesets: BTreeMap<String, RoleSet>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveMetadata {
    pub total_pokemon: usize,
    pub with_level_up_moves: usize,
    pub with_teachable_moves: usize,
    pub with_egg_moves: usize,
    pub with_randbats_movesets: usize,
    pub source: String,
}

/// `move_data.json`, keyed and sorted by species key.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveDatabase {
    pub metadata: MoveMetadata,
    pub pokemon: BTreeMap<String, MoveRecord>,
}

impl MoveDatabase {
    /// Wrap records, computing the header counts.
    pub fn new(pokemon: BTreeMap<String, MoveRecord>) -> Self {
        let count = |pred: fn(&MoveRecord) -> bool| pokemon.values().filter(|r| pred(r)).count();
        let metadata = MoveMetadata {
            total_pokemon: pokemon.len(),
            with_level_up_moves: count(|r| !r.level_up_moves.is_empty()),
            with_teachable_moves: count(|r| !r.teachable_moves.is_empty()),
            with_egg_moves: count(|r| !r.egg_moves.is_empty()),
            with_randbats_movesets: count(|r| !r.randbats_movesets.is_empty()),
            source: SOURCE.to_string(),
        };
        Self { metadata, pokemon }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_record_field_names() {
        let record = SpeciesRecord {
            species: "BULBASAUR".into(),
            name: "Bulbasaur".into(),
            nat_dex_num: 1,
            base_stats: BaseStats {
                hp: 45,
                atk: 49,
                def: 49,
                spa: 65,
                spd: 65,
                spe: 45,
            },
            bst: 318,
            types: vec!["Grass".into(), "Poison".into()],
            abilities: vec!["Overgrow".into()],
            hidden_ability: None,
            generation: 1,
            family: Some("P_FAMILY_BULBASAUR".into()),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["natDexNum"], 1);
        assert_eq!(json["baseStats"]["spa"], 65);
        assert!(json.get("hiddenAbility").is_none());
        assert_eq!(record.base_stats.total(), record.bst);
    }

    #[test]
    fn test_total_saturates() {
        let stats = BaseStats {
            hp: 20000,
            atk: 20000,
            def: 20000,
            spa: 20000,
            spd: 20000,
            spe: 20000,
        };
        assert_eq!(stats.total(), u16::MAX);
    }

    #[test]
    fn test_move_metadata_counts() {
        let mut pokemon = BTreeMap::new();
        pokemon.insert(
            "A".to_string(),
            MoveRecord {
                species: "A".into(),
                name: "A".into(),
                teachable_moves: vec!["Tackle".into()],
                ..Default::default()
            },
        );
        pokemon.insert(
            "B".to_string(),
            MoveRecord {
                species: "B".into(),
                name: "B".into(),
                egg_moves: vec!["Wish".into()],
                teachable_moves: vec!["Tackle".into()],
                ..Default::default()
            },
        );
        let db = MoveDatabase::new(pokemon);
        assert_eq!(db.metadata.total_pokemon, 2);
        assert_eq!(db.metadata.with_teachable_moves, 2);
        assert_eq!(db.metadata.with_egg_moves, 1);
        assert_eq!(db.metadata.with_level_up_moves, 0);
        assert_eq!(db.metadata.source, SOURCE);
    }
}
