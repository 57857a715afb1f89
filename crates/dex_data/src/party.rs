//! Random-battle sets → trainer-party notation, with party-pool tags.

use phf::{phf_map, phf_set};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::decoder::title_words;
use crate::models::Stat;
use crate::randbats::{LoadedDataset, RandbatsEntry, RoleSet, StatSpread};

/// Moves listed per set.
pub const MAX_MOVES: usize = 4;

/// Generated trainers only draw species whose dataset level is in this range.
pub const POOL_LEVELS: std::ops::RangeInclusive<u8> = 75..=85;

/// Level assumed for dataset entries that do not state one.
const DEFAULT_LEVEL: u8 = 100;

const DEFAULT_EV: u8 = 0;
const DEFAULT_IV: u8 = 31;

/// Pool tag implied by a role. Roles not listed carry no tag.
static ROLE_TAGS: phf::Map<&'static str, &'static str> = phf_map! {
    "Doubles Fast Attacker" => "Lead",
    "Doubles Setup Sweeper" => "Ace",
    "Doubles Support" => "Support",
    "Doubles Wallbreaker" => "Ace",
    "Doubles Bulky Setup" => "Ace",
};

static WEATHER_SETTERS: phf::Set<&'static str> = phf_set! {
    "Drought", "Drizzle", "Snow Warning", "Sand Stream",
    "Electric Surge", "Grassy Surge", "Misty Surge", "Psychic Surge",
};

static WEATHER_ABUSERS: phf::Set<&'static str> = phf_set! {
    "Chlorophyll", "Swift Swim", "Sand Rush", "Slush Rush",
    "Surge Surfer", "Solar Power", "Rain Dish", "Ice Body",
    "Protosynthesis", "Quark Drive",
};

/// Conversion strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// First role, first variant, no tags.
    Single,
    /// Every role and variant, with comment headers.
    AllRoles,
    /// Every role and variant, tagged for pool building.
    #[default]
    Pool,
    /// One generated trainer per dataset.
    TrainerPool,
}

#[derive(Debug, Clone, Copy)]
pub struct ConvertOptions {
    pub mode: Mode,
    pub pool_size: usize,
    pub party_size: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Pool,
            pool_size: 8,
            party_size: 4,
        }
    }
}

/// One rendered set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetVariant {
    pub text: String,
    pub role: String,
    pub tags: Vec<String>,
    /// 1-based.
    pub variant: usize,
}

/// Role tags plus weather tags from any of `abilities`.
pub fn tags_for(role: &str, abilities: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = ROLE_TAGS.get(role).map(|t| t.to_string()).into_iter().collect();
    let mut add = |tag: &str| {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    };
    for ability in abilities {
        if WEATHER_SETTERS.contains(ability.as_str()) {
            add("Weather Setter");
        }
        if WEATHER_ABUSERS.contains(ability.as_str()) {
            add("Weather Abuser");
        }
    }
    tags
}

/// `252 HP / 0 Atk / ...`, filling absent stats with `default`.
pub fn format_spread(values: &StatSpread, default: u8) -> String {
    Stat::ALL
        .iter()
        .map(|stat| {
            let value = values.get(stat.key()).copied().unwrap_or(default);
            format!("{value} {}", stat.label())
        })
        .collect::<Vec<_>>()
        .join(" / ")
}

/// The `variant`th pick, or the first one when the list is shorter.
fn pick(list: &[String], variant: usize) -> Option<&str> {
    list.get(variant).or(list.first()).map(String::as_str)
}

/// Up to [`MAX_MOVES`] moves; longer lists are sampled with a seed fixed
/// per variant so the same input always yields the same sets.
fn select_moves(moves: &[String], variant: usize) -> Vec<&str> {
    if moves.len() <= MAX_MOVES {
        return moves.iter().map(String::as_str).collect();
    }
    let mut rng = StdRng::seed_from_u64(variant as u64);
    moves
        .choose_multiple(&mut rng, MAX_MOVES)
        .map(String::as_str)
        .collect()
}

/// Render one role as one or two sets.
///
/// A second variant is produced when the role offers more than one
/// ability or item, or more than five moves.
pub fn role_variants(
    species: &str,
    entry: &RandbatsEntry,
    role_name: &str,
    role: &RoleSet,
    include_tags: bool,
) -> Vec<SetVariant> {
    let abilities = entry.abilities_for(role);
    let items = entry.items_for(role);
    let count = if abilities.len() > 1 || items.len() > 1 || role.moves.len() > 5 {
        2
    } else {
        1
    };

    (0..count)
        .map(|variant| {
            let mut lines = Vec::new();
            match pick(items, variant) {
                Some(item) => lines.push(format!("{species} @ {item}")),
                None => lines.push(species.to_string()),
            }
            if let Some(ability) = pick(abilities, variant) {
                lines.push(format!("Ability: {ability}"));
            }
            if let Some(evs) = entry.evs_for(role).filter(|s| !s.is_empty()) {
                lines.push(format!("EVs: {}", format_spread(evs, DEFAULT_EV)));
            }
            if let Some(ivs) = entry.ivs_for(role).filter(|s| !s.is_empty()) {
                lines.push(format!("IVs: {}", format_spread(ivs, DEFAULT_IV)));
            }
            if let Some(tera) = pick(&role.tera_types, variant) {
                lines.push(format!("Tera Type: {tera}"));
            }
            let tags = if include_tags {
                tags_for(role_name, abilities)
            } else {
                Vec::new()
            };
            if !tags.is_empty() {
                lines.push(format!("Tags: {}", tags.join(" / ")));
            }
            for mv in select_moves(&role.moves, variant) {
                lines.push(format!("- {mv}"));
            }

            SetVariant {
                text: lines.join("\n"),
                role: role_name.to_string(),
                tags,
                variant: variant + 1,
            }
        })
        .collect()
}

/// Every role of a species, in role-name order.
pub fn species_sets(species: &str, entry: &RandbatsEntry, include_tags: bool) -> Vec<SetVariant> {
    entry
        .roles
        .iter()
        .flat_map(|(role_name, role)| role_variants(species, entry, role_name, role, include_tags))
        .collect()
}

/// A trainer with a party pool drawn at random from one dataset.
pub fn trainer_pool<R: Rng + ?Sized>(
    trainer_id: &str,
    trainer_class: &str,
    dataset: &LoadedDataset,
    options: &ConvertOptions,
    rng: &mut R,
) -> String {
    let display = title_words(trainer_id.strip_prefix("TRAINER_").unwrap_or(trainer_id));
    let header = [
        format!("=== {trainer_id} ==="),
        format!("Name: {display}"),
        format!("Class: {trainer_class}"),
        format!("Pic: {trainer_class}"),
        "Gender: Male".to_string(),
        "Music: Male".to_string(),
        "Double Battle: Yes".to_string(),
        "AI: Check Bad Move / Try To Faint / Check Viability".to_string(),
        format!("Party Size: {}", options.party_size),
        "Pool Rules: Weather Doubles".to_string(),
    ]
    .join("\n");

    let mut names: Vec<&String> = dataset.data.keys().collect();
    names.shuffle(rng);

    let members: Vec<String> = names
        .into_iter()
        .filter(|name| {
            let level = dataset.data[name.as_str()].level.unwrap_or(DEFAULT_LEVEL);
            POOL_LEVELS.contains(&level)
        })
        .filter_map(|name| {
            species_sets(name, &dataset.data[name.as_str()], true)
                .into_iter()
                .next()
                .map(|set| set.text)
        })
        .take(options.pool_size)
        .collect();

    if members.is_empty() {
        return format!("{header}\n");
    }
    format!("{header}\n\n{}", members.join("\n\n"))
}

/// Convert loaded datasets into party entries, in dataset order.
pub fn convert<R: Rng + ?Sized>(
    datasets: &[LoadedDataset],
    options: &ConvertOptions,
    rng: &mut R,
) -> Vec<String> {
    let mut entries = Vec::new();

    for dataset in datasets {
        tracing::info!(file = %dataset.name, species = dataset.data.len(), "converting dataset");
        match options.mode {
            Mode::Single => {
                for (name, entry) in &dataset.data {
                    if let Some(set) = species_sets(name, entry, false).into_iter().next() {
                        entries.push(set.text);
                    }
                }
            }
            Mode::AllRoles => {
                let tag = dataset.source_tag();
                for (name, entry) in &dataset.data {
                    let sets = species_sets(name, entry, true);
                    let labelled = sets.len() > 1;
                    for set in sets {
                        if !labelled {
                            entries.push(set.text);
                            continue;
                        }
                        let variant = if set.variant > 1 {
                            format!(" (Variant {})", set.variant)
                        } else {
                            String::new()
                        };
                        entries.push(format!(
                            "/* {name} - {}{variant} - {tag} */\n{}",
                            set.role, set.text
                        ));
                    }
                }
            }
            Mode::Pool => {
                for (name, entry) in &dataset.data {
                    entries.extend(species_sets(name, entry, true).into_iter().map(|s| s.text));
                }
            }
            Mode::TrainerPool => {
                let stem = dataset.name.split('.').next().unwrap_or(&dataset.name);
                let trainer_id = format!("TRAINER_EXAMPLE_{}", stem.to_uppercase());
                let trainer = trainer_pool(&trainer_id, "Ace Trainer", dataset, options, rng);
                entries.push(format!("/* From {} */\n{trainer}", dataset.name));
            }
        }
    }
    entries
}
