//! `trainers.party` → simulator-importable team text.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static TRAINER_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^=== (TRAINER_\w+) ===[ \t]*\r?$").expect("valid regex"));

/// Trainer metadata lines; only `Name:` is kept.
const TRAINER_FIELDS: &[&str] = &[
    "Name:",
    "Class:",
    "Pic:",
    "Gender:",
    "Music:",
    "Double Battle:",
    "AI:",
    "Items:",
    "Battle Type:",
    "Mugshot:",
    "Starting Status:",
    "Party Size:",
    "Pool Rules:",
];

/// Lines the simulator does not understand.
const EXPANSION_FIELDS: &[&str] = &["Tags:", "Dynamax Level:", "Gigantamax:", "Tera Type:"];

/// Lines that continue the current Pokémon.
const MON_FIELDS: &[&str] = &[
    "-", "Level:", "Ability:", "IVs:", "EVs:", "Nature:", "Shiny:", "Happiness:", "Ball:",
];

fn starts_with_any(line: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| line.starts_with(p))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trainer {
    pub id: String,
    pub name: String,
    /// One block of lines per Pokémon.
    pub pokemon: Vec<String>,
}

impl Trainer {
    fn parse(id: &str, body: &str) -> Self {
        let mut trainer = Trainer {
            id: id.to_string(),
            name: String::new(),
            pokemon: Vec::new(),
        };
        let mut current: Vec<&str> = Vec::new();

        for line in body.lines().map(str::trim_end) {
            if line.is_empty() || line.starts_with("/*") || line.starts_with("*/") {
                continue;
            }
            if starts_with_any(line, TRAINER_FIELDS) {
                if let Some(name) = line.strip_prefix("Name:") {
                    trainer.name = name.trim().to_string();
                }
                continue;
            }
            let expansion = starts_with_any(line, EXPANSION_FIELDS);
            if !expansion && !starts_with_any(line, MON_FIELDS) {
                if !current.is_empty() {
                    trainer.pokemon.push(current.join("\n"));
                }
                current = vec![line];
            } else if !expansion && !current.is_empty() {
                current.push(line);
            }
        }
        if !current.is_empty() {
            trainer.pokemon.push(current.join("\n"));
        }
        trainer
    }

    /// `ID - Name`, or the bare ID for unnamed trainers.
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            self.id.clone()
        } else {
            format!("{} - {}", self.id, self.name)
        }
    }

    /// Team text, headed by the trainer's name.
    pub fn to_showdown(&self) -> String {
        let name = if self.name.is_empty() { &self.id } else { &self.name };
        let mut out = format!("=== {name} ({}) ===\n\n", self.id);
        for mon in &self.pokemon {
            out.push_str(mon);
            out.push_str("\n\n");
        }
        out
    }
}

/// Trainers of a party file, keyed by ID. Trainers without Pokémon are left out.
#[derive(Debug, Default, Clone)]
pub struct PartyFile {
    trainers: BTreeMap<String, Trainer>,
}

impl PartyFile {
    pub fn parse(text: &str) -> Self {
        let headers: Vec<(usize, usize, &str)> = TRAINER_HEADER
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some((whole.start(), whole.end(), caps.get(1)?.as_str()))
            })
            .collect();

        let mut trainers = BTreeMap::new();
        for (i, &(_, body_start, id)) in headers.iter().enumerate() {
            let body_end = headers.get(i + 1).map_or(text.len(), |next| next.0);
            let trainer = Trainer::parse(id, &text[body_start..body_end]);
            if trainer.pokemon.is_empty() {
                tracing::debug!(trainer = id, "no pokemon, skipping");
                continue;
            }
            trainers.insert(id.to_string(), trainer);
        }
        Self { trainers }
    }

    pub fn len(&self) -> usize {
        self.trainers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trainers.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Trainer> {
        self.trainers.get(id)
    }

    /// All trainers, sorted by ID.
    pub fn trainers(&self) -> impl Iterator<Item = &Trainer> {
        self.trainers.values()
    }

    /// Trainers whose display name contains `term`, ignoring case.
    pub fn search<'a>(&'a self, term: &str) -> Vec<&'a Trainer> {
        let term = term.to_lowercase();
        self.trainers()
            .filter(|t| t.display_name().to_lowercase().contains(&term))
            .collect()
    }

    /// Every trainer's team, one after another.
    pub fn export_all(&self) -> String {
        self.trainers().map(Trainer::to_showdown).collect()
    }
}
