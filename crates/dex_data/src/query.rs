//! Species lookup and move listing over the move database.

use std::collections::BTreeSet;
use std::fmt::Write;

use crate::decoder::normalize_name;
use crate::models::{MoveDatabase, MoveRecord};

/// Candidates listed when a search is ambiguous.
pub const CANDIDATE_LIMIT: usize = 10;

const RULE_WIDTH: usize = 80;
const TEACHABLE_COLUMNS: usize = 3;
const ITEM_PREVIEW: usize = 5;

#[derive(Debug)]
pub enum Lookup<'a> {
    Found(&'a MoveRecord),
    /// Every substring match, in key order.
    Ambiguous(Vec<&'a MoveRecord>),
    NotFound,
}

/// Find a species by key or display name, ignoring case and punctuation.
///
/// An exact normalised match wins; otherwise a single substring match is
/// accepted.
pub fn find<'a>(db: &'a MoveDatabase, search: &str) -> Lookup<'a> {
    let wanted = normalize_name(search);
    if wanted.is_empty() {
        return Lookup::NotFound;
    }

    if let Some(record) = db
        .pokemon
        .values()
        .find(|r| normalize_name(&r.species) == wanted || normalize_name(&r.name) == wanted)
    {
        return Lookup::Found(record);
    }

    let mut partial: Vec<&MoveRecord> = db
        .pokemon
        .values()
        .filter(|r| normalize_name(&r.species).contains(&wanted) || normalize_name(&r.name).contains(&wanted))
        .collect();
    match partial.len() {
        0 => Lookup::NotFound,
        1 => Lookup::Found(partial.remove(0)),
        _ => Lookup::Ambiguous(partial),
    }
}

/// Which sections of a record to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct View {
    pub level_up: bool,
    pub teachable: bool,
    pub randbats: bool,
}

impl Default for View {
    fn default() -> Self {
        Self {
            level_up: true,
            teachable: true,
            randbats: true,
        }
    }
}

impl View {
    pub fn level_only() -> Self {
        Self {
            level_up: true,
            teachable: false,
            randbats: false,
        }
    }

    pub fn teachable_only() -> Self {
        Self {
            level_up: false,
            teachable: true,
            randbats: false,
        }
    }
}

/// Distinct level-up and teachable move names visible under `view`.
pub fn unique_moves<'a>(record: &'a MoveRecord, view: View) -> BTreeSet<&'a str> {
    let mut moves = BTreeSet::new();
    if view.level_up {
        moves.extend(record.level_up_moves.iter().map(|m| m.name.as_str()));
    }
    if view.teachable {
        moves.extend(record.teachable_moves.iter().map(String::as_str));
    }
    moves
}

/// Full text listing of one species.
pub fn render(record: &MoveRecord, view: View) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let thin = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "{rule}\n{} ({})\n{rule}", record.name, record.species);

    if view.level_up && !record.level_up_moves.is_empty() {
        let _ = writeln!(out, "\nLEVEL-UP MOVES ({} total)\n{thin}", record.level_up_moves.len());
        for m in &record.level_up_moves {
            let _ = writeln!(out, "  Lv.{:3}  {}", m.level, m.name);
        }
    } else {
        let _ = writeln!(out, "\nLEVEL-UP MOVES: None defined");
    }

    if view.teachable && !record.teachable_moves.is_empty() {
        let _ = writeln!(
            out,
            "\nTEACHABLE MOVES (TMs/HMs/Tutor) - {} total\n{thin}",
            record.teachable_moves.len()
        );
        for row in record.teachable_moves.chunks(TEACHABLE_COLUMNS) {
            let cells: String = row.iter().map(|m| format!("{m:<25}")).collect();
            let _ = writeln!(out, "  {}", cells.trim_end());
        }
    } else {
        let _ = writeln!(out, "\nTEACHABLE MOVES: None defined");
    }

    if view.randbats {
        if record.randbats_movesets.is_empty() {
            let _ = writeln!(out, "\nRANDOM BATTLES MOVESETS: None available");
        } else {
            let _ = writeln!(
                out,
                "\nRANDOM BATTLES MOVESETS ({} roles)\n{thin}",
                record.randbats_movesets.len()
            );
            for (role, set) in &record.randbats_movesets {
                let _ = writeln!(out, "\n  Role: {role}");
                if !set.moves.is_empty() {
                    let _ = writeln!(out, "    Moves ({}): {}", set.moves.len(), set.moves.join(", "));
                }
                if let Some(abilities) = set.abilities.as_ref().filter(|a| !a.is_empty()) {
                    let _ = writeln!(out, "    Abilities: {}", abilities.join(", "));
                }
                if let Some(items) = set.items.as_ref().filter(|i| !i.is_empty()) {
                    let shown = &items[..items.len().min(ITEM_PREVIEW)];
                    let _ = writeln!(out, "    Items: {}", shown.join(", "));
                    if items.len() > ITEM_PREVIEW {
                        let _ = writeln!(out, "           ... and {} more", items.len() - ITEM_PREVIEW);
                    }
                }
            }
        }
    }

    let _ = writeln!(out, "\n{rule}");
    out
}
