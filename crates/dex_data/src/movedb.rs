//! Assembly of `move_data.json` from the learnset passes.

use std::collections::{BTreeMap, BTreeSet};

use crate::decoder::title_words;
use crate::family::{propagate, FamilyTable, MatchPolicy, PropagationReport};
use crate::learnsets::{entry_count, LevelUpLearnsets, MoveLists};
use crate::models::{MoveDatabase, MoveRecord};
use crate::randbats::RoleIndex;

/// Gender-variant suffixes whose egg moves may seed the base form.
pub const GENDER_SUFFIXES: [&str; 4] = ["_M", "_F", "_MALE", "_FEMALE"];

/// Parsed learnsets, one map per pass.
#[derive(Debug, Default, Clone)]
pub struct Learnsets {
    pub level_up: LevelUpLearnsets,
    pub teachable: MoveLists,
    pub egg: MoveLists,
}

/// What happened while building the database.
#[derive(Debug, Default, Clone)]
pub struct MoveReport {
    pub level_up_entries: usize,
    pub teachable_entries: usize,
    pub egg_entries: usize,
    /// `None` when no family data was available.
    pub propagation: Option<PropagationReport>,
    pub backfilled: usize,
    pub randbats_matched: usize,
}

/// Run propagation, merge, and backfill over parsed learnsets.
///
/// `families` is `None` when the species-info headers are absent; egg
/// moves are then used as parsed.
pub fn build(
    learnsets: Learnsets,
    families: Option<&FamilyTable>,
    policy: MatchPolicy,
    roles: &RoleIndex,
) -> (MoveDatabase, MoveReport) {
    let Learnsets {
        level_up,
        teachable,
        egg,
    } = learnsets;
    let mut report = MoveReport::default();

    let egg = match families {
        Some(families) => {
            let (egg, propagation) = propagate(&egg, families, policy);
            report.propagation = Some(propagation);
            egg
        }
        None => egg,
    };

    report.level_up_entries = entry_count(&level_up);
    report.teachable_entries = entry_count(&teachable);
    report.egg_entries = entry_count(&egg);

    let mut records = merge(level_up, teachable, egg, roles, &mut report.randbats_matched);
    report.backfilled = backfill_gender_variants(&mut records);
    if report.backfilled > 0 {
        tracing::info!(count = report.backfilled, "copied egg moves from gender variants");
    }

    (MoveDatabase::new(records), report)
}

/// One record per key seen in any pass, with empty lists for missing passes.
fn merge(
    mut level_up: LevelUpLearnsets,
    mut teachable: MoveLists,
    mut egg: MoveLists,
    roles: &RoleIndex,
    matched: &mut usize,
) -> BTreeMap<String, MoveRecord> {
    let keys: BTreeSet<String> = level_up
        .keys()
        .chain(teachable.keys())
        .chain(egg.keys())
        .cloned()
        .collect();

    keys.into_iter()
        .map(|key| {
            let mut record = MoveRecord {
                name: title_words(&key),
                level_up_moves: level_up.remove(&key).unwrap_or_default(),
                teachable_moves: teachable.remove(&key).unwrap_or_default(),
                egg_moves: egg.remove(&key).unwrap_or_default(),
                randbats_movesets: BTreeMap::new(),
                species: key.clone(),
            };
            if let Some((display, sets)) = roles.lookup(&key) {
                record.name = display.to_string();
                record.randbats_movesets = sets.clone();
                *matched += 1;
            }
            (key, record)
        })
        .collect()
}

/// Copy egg moves from a gender variant to its base form.
///
/// Only a base form that exists and has no egg moves is filled, so
/// non-empty data is never overwritten. Returns the number of forms
/// filled.
pub fn backfill_gender_variants(records: &mut BTreeMap<String, MoveRecord>) -> usize {
    let variants: Vec<(String, String)> = records
        .keys()
        .flat_map(|key| {
            GENDER_SUFFIXES
                .iter()
                .filter_map(move |suffix| key.strip_suffix(suffix))
                .map(move |base| (key.clone(), base.to_string()))
        })
        .collect();

    let mut filled = 0;
    for (variant, base) in variants {
        let moves = match records.get(&variant) {
            Some(r) if !r.egg_moves.is_empty() => r.egg_moves.clone(),
            _ => continue,
        };
        if let Some(target) = records.get_mut(&base) {
            if target.egg_moves.is_empty() {
                target.egg_moves = moves;
                filled += 1;
            }
        }
    }
    filled
}
