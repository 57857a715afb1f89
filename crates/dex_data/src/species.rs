//! Species stat blocks from the `gen_<N>_families.h` headers.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;

use crate::decoder::{ability_name, title_words, type_label};
use crate::dex::{DexTable, ResolveReport, Resolver, DIAGNOSTIC_SAMPLE};
use crate::family::FamilyTable;
use crate::models::{BaseStats, SpeciesRecord, Stat};
use crate::scanner::{first_capture, species_entries, Block};

static SPECIES_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\.speciesName\s*=\s*_\(\s*"([^"]*)"\s*\)"#).expect("valid regex"));

static NAT_DEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.natDexNum\s*=\s*NATIONAL_DEX_(\w+)").expect("valid regex"));

static TYPES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.types\s*=\s*MON_TYPES\s*\(([^)]*)\)").expect("valid regex"));

static ABILITIES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.abilities\s*=\s*\{([^}]*)\}").expect("valid regex"));

static TYPE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bTYPE_\w+").expect("valid regex"));

static ABILITY_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bABILITY_\w+").expect("valid regex"));

static GEN_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"gen_(\d+)_families").expect("valid regex"));

static STAT_FIELDS: LazyLock<[(Stat, Regex); 6]> = LazyLock::new(|| {
    let field = |name: &str| Regex::new(&format!(r"\.{name}\s*=\s*(\d+)")).expect("valid regex");
    [
        (Stat::Hp, field("baseHP")),
        (Stat::Atk, field("baseAttack")),
        (Stat::Def, field("baseDefense")),
        (Stat::Spa, field("baseSpAttack")),
        (Stat::Spd, field("baseSpDefense")),
        (Stat::Spe, field("baseSpeed")),
    ]
});

const SKIPPED_KEYS: [&str; 2] = ["NONE", "EGG"];

/// Generation number encoded in a `gen_<N>_families.h` file name, 0 if absent.
pub fn generation_of(file_name: &str) -> u8 {
    first_capture(&GEN_FILE, file_name)
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

/// Typed view of one designated species entry, before cross-referencing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesEntry {
    pub key: String,
    pub name: Option<String>,
    /// `NATIONAL_DEX_<X>` suffix, when the entry names one.
    pub dex_key: Option<String>,
    pub stats: Option<BaseStats>,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub hidden_ability: Option<String>,
}

impl SpeciesEntry {
    /// Decode the fields of one `[SPECIES_<KEY>] = { ... }` block.
    ///
    /// Fields take their first occurrence in the body, so the primary
    /// branch of an `#if`/`#else` pair is used.
    pub fn parse(block: Block<'_>) -> Self {
        let body = block.body;

        let mut stats = BaseStats::default();
        let mut complete = true;
        // Base stats are `u8` fields in the game, so a wider value is malformed.
        for (stat, pattern) in STAT_FIELDS.iter() {
            match first_capture(pattern, body).and_then(|v| v.parse::<u8>().ok()) {
                Some(value) => set_stat(&mut stats, *stat, u16::from(value)),
                None => {
                    complete = false;
                    break;
                }
            }
        }

        let types = first_capture(&TYPES, body)
            .map(|inner| {
                TYPE_TOKEN
                    .find_iter(inner)
                    .filter_map(|t| type_label(t.as_str()))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let slots: Vec<&str> = first_capture(&ABILITIES, body)
            .map(|inner| ABILITY_TOKEN.find_iter(inner).map(|t| t.as_str()).collect())
            .unwrap_or_default();
        let mut abilities: Vec<String> = Vec::new();
        for slot in slots.iter().take(2).filter(|s| **s != "ABILITY_NONE") {
            let label = ability_name(slot);
            if !abilities.contains(&label) {
                abilities.push(label);
            }
        }
        let hidden_ability = slots
            .get(2)
            .filter(|s| **s != "ABILITY_NONE")
            .map(|s| ability_name(s));

        Self {
            key: block.ident.to_string(),
            name: first_capture(&SPECIES_NAME, body).map(str::to_string),
            dex_key: first_capture(&NAT_DEX, body).map(str::to_string),
            stats: complete.then_some(stats),
            types,
            abilities,
            hidden_ability,
        }
    }
}

fn set_stat(stats: &mut BaseStats, stat: Stat, value: u16) {
    let slot = match stat {
        Stat::Hp => &mut stats.hp,
        Stat::Atk => &mut stats.atk,
        Stat::Def => &mut stats.def,
        Stat::Spa => &mut stats.spa,
        Stat::Spd => &mut stats.spd,
        Stat::Spe => &mut stats.spe,
    };
    *slot = value;
}

/// One parsed species-info header.
#[derive(Debug, Clone)]
pub struct SpeciesSource<'a> {
    pub generation: u8,
    pub text: &'a str,
}

/// Counters for the species pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SpeciesReport {
    pub parsed: usize,
    /// Entries dropped for a missing stat or no decodable type.
    pub malformed: usize,
    pub malformed_sample: Vec<String>,
    pub ordinals: ResolveReport,
}

impl SpeciesReport {
    fn reject(&mut self, key: &str) {
        self.malformed += 1;
        if self.malformed_sample.len() < DIAGNOSTIC_SAMPLE {
            self.malformed_sample.push(key.to_string());
        }
        tracing::debug!(species = key, "dropping incomplete stat block");
    }
}

/// Build the species list from every header.
///
/// A key defined in several headers keeps its last definition. The
/// result is ordered by national dex ordinal, then display name.
pub fn extract_species(sources: &[SpeciesSource<'_>], dex: &DexTable) -> (Vec<SpeciesRecord>, SpeciesReport) {
    let mut report = SpeciesReport::default();
    let mut by_key: BTreeMap<String, SpeciesRecord> = BTreeMap::new();
    let mut resolver = Resolver::new(dex);

    for source in sources {
        let families = FamilyTable::from_sources([source.text]);
        for block in species_entries(source.text) {
            if SKIPPED_KEYS.contains(&block.ident) {
                continue;
            }
            report.parsed += 1;
            let entry = SpeciesEntry::parse(block);
            let Some(stats) = entry.stats else {
                report.reject(&entry.key);
                continue;
            };
            if entry.types.is_empty() {
                report.reject(&entry.key);
                continue;
            }

            let dex_key = entry.dex_key.as_deref().unwrap_or(&entry.key);
            let record = SpeciesRecord {
                nat_dex_num: resolver.resolve(dex_key),
                name: entry.name.unwrap_or_else(|| title_words(&entry.key)),
                base_stats: stats,
                bst: stats.total(),
                types: entry.types,
                abilities: entry.abilities,
                hidden_ability: entry.hidden_ability,
                generation: source.generation,
                family: families.family_name_of(&entry.key).map(str::to_string),
                species: entry.key,
            };
            by_key.insert(record.species.clone(), record);
        }
    }

    report.ordinals = resolver.finish();
    let mut records: Vec<SpeciesRecord> = by_key.into_values().collect();
    records.sort_by(|a, b| (a.nat_dex_num, &a.name).cmp(&(b.nat_dex_num, &b.name)));
    (records, report)
}

/// Figures printed after an extraction.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SpeciesSummary {
    pub highest_bst: Option<u16>,
    pub lowest_bst: Option<u16>,
    /// Most common types, largest first, ties by name.
    pub top_types: Vec<(String, usize)>,
}

pub fn summarize(records: &[SpeciesRecord]) -> SpeciesSummary {
    let mut type_count: HashMap<&str, usize> = HashMap::new();
    for record in records {
        for t in &record.types {
            *type_count.entry(t.as_str()).or_default() += 1;
        }
    }
    let mut top_types: Vec<(String, usize)> = type_count
        .into_iter()
        .map(|(t, n)| (t.to_string(), n))
        .collect();
    top_types.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top_types.truncate(5);

    SpeciesSummary {
        highest_bst: records.iter().map(|r| r.bst).max(),
        lowest_bst: records.iter().map(|r| r.bst).filter(|&b| b > 0).min(),
        top_types,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GEN_1: &str = r#"
#if P_FAMILY_BULBASAUR
    [SPECIES_BULBASAUR] =
    {
        .baseHP        = 45,
        .baseAttack    = 49,
        .baseDefense   = 49,
        .baseSpeed     = 45,
        .baseSpAttack  = 65,
        .baseSpDefense = 65,
        .types = MON_TYPES(TYPE_GRASS, TYPE_POISON),
        .abilities = { ABILITY_OVERGROW, ABILITY_NONE, ABILITY_CHLOROPHYLL },
        .speciesName = _("Bulbasaur"),
        .natDexNum = NATIONAL_DEX_BULBASAUR,
    },

    [SPECIES_IVYSAUR] =
    {
        .baseHP        = 60,
        .baseAttack    = 62,
        .baseDefense   = 63,
        .baseSpAttack  = 80,
        .baseSpDefense = 80,
        .types = MON_TYPES(TYPE_GRASS, TYPE_POISON),
        .speciesName = _("Ivysaur"),
        .natDexNum = NATIONAL_DEX_IVYSAUR,
    },
#endif //P_FAMILY_BULBASAUR

    [SPECIES_NONE] = { .baseHP = 1 },
    [SPECIES_MR_MIME] =
    {
    #if P_UPDATED_STATS >= GEN_6
        .baseSpDefense = 120,
    #else
        .baseSpDefense = 100,
    #endif
        .baseHP = 40, .baseAttack = 45, .baseDefense = 65, .baseSpeed = 90, .baseSpAttack = 100,
        .types = MON_TYPES(TYPE_PSYCHIC, TYPE_FAIRY),
        .abilities = { ABILITY_SOUNDPROOF, ABILITY_FILTER, ABILITY_TECHNICIAN },
    },
"#;

    fn dex() -> DexTable {
        DexTable::from_declarations("NATIONAL_DEX_NONE, NATIONAL_DEX_BULBASAUR, NATIONAL_DEX_IVYSAUR").unwrap()
    }

    #[test]
    fn test_generation_of() {
        assert_eq!(generation_of("gen_4_families.h"), 4);
        assert_eq!(generation_of("species_info.h"), 0);
    }

    #[test]
    fn test_missing_stat_drops_only_that_entry() {
        let sources = [SpeciesSource {
            generation: 1,
            text: GEN_1,
        }];
        let (records, report) = extract_species(&sources, &dex());
        let keys: Vec<_> = records.iter().map(|r| r.species.as_str()).collect();
        assert_eq!(keys, vec!["MR_MIME", "BULBASAUR"]);
        assert_eq!(report.malformed, 1);
        assert_eq!(report.malformed_sample, vec!["IVYSAUR".to_string()]);
    }

    #[test]
    fn test_fields_decoded() {
        let sources = [SpeciesSource {
            generation: 1,
            text: GEN_1,
        }];
        let (records, report) = extract_species(&sources, &dex());
        let bulbasaur = records.iter().find(|r| r.species == "BULBASAUR").unwrap();
        assert_eq!(bulbasaur.nat_dex_num, 1);
        assert_eq!(bulbasaur.bst, 318);
        assert_eq!(bulbasaur.types, vec!["Grass", "Poison"]);
        assert_eq!(bulbasaur.abilities, vec!["Overgrow"]);
        assert_eq!(bulbasaur.hidden_ability.as_deref(), Some("Chlorophyll"));
        assert_eq!(bulbasaur.family.as_deref(), Some("P_FAMILY_BULBASAUR"));

        let mime = records.iter().find(|r| r.species == "MR_MIME").unwrap();
        assert_eq!(mime.name, "Mr Mime");
        assert_eq!(mime.base_stats.spd, 120);
        assert_eq!(mime.nat_dex_num, 0);
        assert_eq!(mime.family, None);
        assert_eq!(report.ordinals.unresolved_sample, vec!["MR_MIME".to_string()]);
    }

    #[test]
    fn test_last_file_wins() {
        let later = "[SPECIES_BULBASAUR] = { .baseHP = 1, .baseAttack = 1, .baseDefense = 1, .baseSpAttack = 1, .baseSpDefense = 1, .baseSpeed = 1, .types = MON_TYPES(TYPE_NORMAL) },";
        let sources = [
            SpeciesSource {
                generation: 1,
                text: GEN_1,
            },
            SpeciesSource {
                generation: 9,
                text: later,
            },
        ];
        let (records, _) = extract_species(&sources, &dex());
        let bulbasaur: Vec<_> = records.iter().filter(|r| r.species == "BULBASAUR").collect();
        assert_eq!(bulbasaur.len(), 1);
        assert_eq!(bulbasaur[0].bst, 6);
        assert_eq!(bulbasaur[0].generation, 9);
    }

    #[test]
    fn test_out_of_range_stat_is_malformed() {
        let text = "[SPECIES_BULBASAUR] = { .baseHP = 20000, .baseAttack = 20000, .baseDefense = 20000, .baseSpAttack = 20000, .baseSpDefense = 20000, .baseSpeed = 20000, .types = MON_TYPES(TYPE_GRASS) },\n[SPECIES_IVYSAUR] = { .baseHP = 255, .baseAttack = 255, .baseDefense = 255, .baseSpAttack = 255, .baseSpDefense = 255, .baseSpeed = 255, .types = MON_TYPES(TYPE_GRASS) },";
        let sources = [SpeciesSource { generation: 1, text }];
        let (records, report) = extract_species(&sources, &dex());
        assert_eq!(report.malformed, 1);
        assert_eq!(report.malformed_sample, vec!["BULBASAUR".to_string()]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].bst, 1530);
    }

    #[test]
    fn test_summary() {
        let sources = [SpeciesSource {
            generation: 1,
            text: GEN_1,
        }];
        let (records, _) = extract_species(&sources, &dex());
        let summary = summarize(&records);
        assert_eq!(summary.highest_bst, Some(460));
        assert_eq!(summary.lowest_bst, Some(318));
        assert_eq!(summary.top_types[0].1, 1);
        assert_eq!(summary.top_types.len(), 4);
    }
}
