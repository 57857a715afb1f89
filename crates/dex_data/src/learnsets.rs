//! Learnset array parsing: level-up, teachable and egg-move tables.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::decoder::move_name;
use crate::scanner::BraceBlocks;

static LEVEL_UP_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"static\s+const\s+struct\s+LevelUpMove\s+s(\w+)LevelUpLearnset\[\]\s*=\s*\{")
        .expect("valid regex")
});

static TEACHABLE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"static\s+const\s+u16\s+s(\w+)TeachableLearnset\[\]\s*=\s*\{").expect("valid regex")
});

static EGG_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"static\s+const\s+u16\s+s(\w+)EggMoveLearnset\[\]\s*=\s*\{").expect("valid regex")
});

static LEVEL_UP_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"LEVEL_UP_MOVE\s*\(\s*(\d+)\s*,\s*(MOVE_\w+)\s*\)").expect("valid regex")
});

static MOVE_CONSTANT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bMOVE_\w+").expect("valid regex"));

/// Terminator constant of teachable and egg-move arrays.
const UNAVAILABLE: &str = "MOVE_UNAVAILABLE";

/// One `LEVEL_UP_MOVE(level, move)` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpMove {
    pub level: u8,
    #[serde(rename = "move")]
    pub name: String,
}

/// Species key → level-up moves, in source order.
pub type LevelUpLearnsets = BTreeMap<String, Vec<LevelUpMove>>;

/// Species key → unique move names.
pub type MoveLists = BTreeMap<String, Vec<String>>;

/// The two flat move-list array kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Teachable,
    Egg,
}

impl ListKind {
    fn header(self) -> &'static Regex {
        match self {
            ListKind::Teachable => &TEACHABLE_HEADER,
            ListKind::Egg => &EGG_HEADER,
        }
    }
}

fn species_key(ident: &str) -> Option<String> {
    let key = ident.to_uppercase();
    (key != "NONE").then_some(key)
}

/// Parse every level-up learnset array in `text` into `out`.
///
/// Arrays with no entries are skipped; a key seen again replaces the
/// earlier array.
pub fn parse_level_up(text: &str, out: &mut LevelUpLearnsets) {
    for block in BraceBlocks::new(text, &LEVEL_UP_HEADER) {
        let Some(key) = species_key(block.ident) else {
            continue;
        };
        let moves: Vec<LevelUpMove> = LEVEL_UP_ENTRY
            .captures_iter(block.body)
            .filter_map(|caps| {
                let level = caps[1].parse().ok();
                if level.is_none() {
                    tracing::debug!(species = %key, level = &caps[1], "level out of range");
                }
                Some(LevelUpMove {
                    level: level?,
                    name: move_name(&caps[2]),
                })
            })
            .collect();
        if !moves.is_empty() {
            out.insert(key, moves);
        }
    }
}

/// Parse every teachable or egg-move array in `text` into `out`.
///
/// `MOVE_UNAVAILABLE` is ignored and repeated moves are kept once, at
/// their first position.
pub fn parse_move_lists(text: &str, kind: ListKind, out: &mut MoveLists) {
    for block in BraceBlocks::new(text, kind.header()) {
        let Some(key) = species_key(block.ident) else {
            continue;
        };
        let mut seen = HashSet::new();
        let moves: Vec<String> = MOVE_CONSTANT
            .find_iter(block.body)
            .map(|m| m.as_str())
            .filter(|token| *token != UNAVAILABLE)
            .map(move_name)
            .filter(|name| seen.insert(name.clone()))
            .collect();
        if !moves.is_empty() {
            out.insert(key, moves);
        }
    }
}

/// Total number of entries across all lists.
pub fn entry_count<T>(lists: &BTreeMap<String, Vec<T>>) -> usize {
    lists.values().map(Vec::len).sum()
}
