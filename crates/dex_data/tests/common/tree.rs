//! A throwaway project tree with a handful of species.

use std::fs;
use std::path::Path;

use dex_data::Layout;
use tempfile::TempDir;

pub const LEVEL_UP_GEN_1: &str = r#"
static const struct LevelUpMove sBulbasaurLevelUpLearnset[] = {
    LEVEL_UP_MOVE( 1, MOVE_TACKLE),
    LEVEL_UP_MOVE( 3, MOVE_GROWL),
    LEVEL_UP_MOVE( 9, MOVE_VINE_WHIP),
    LEVEL_UP_END
};

static const struct LevelUpMove sIvysaurLevelUpLearnset[] = {
    LEVEL_UP_MOVE( 1, MOVE_TACKLE),
    LEVEL_UP_MOVE(20, MOVE_RAZOR_LEAF),
    LEVEL_UP_END
};

static const struct LevelUpMove sNidoranFLevelUpLearnset[] = {
    LEVEL_UP_MOVE( 1, MOVE_SCRATCH),
    LEVEL_UP_END
};

static const struct LevelUpMove sNoneLevelUpLearnset[] = {
    LEVEL_UP_MOVE( 1, MOVE_POUND),
    LEVEL_UP_END
};
"#;

pub const TEACHABLE: &str = r#"
static const u16 sBulbasaurTeachableLearnset[] = {
    MOVE_SOLAR_BEAM,
    MOVE_TOXIC,
    MOVE_SOLAR_BEAM,
    MOVE_UNAVAILABLE,
};

static const u16 sIvysaurTeachableLearnset[] = {
    MOVE_SOLAR_BEAM,
    MOVE_UNAVAILABLE,
};
"#;

pub const EGG_MOVES: &str = r#"
static const u16 sBulbasaurEggMoveLearnset[] = {
    MOVE_PETAL_DANCE,
    MOVE_CURSE,
    MOVE_UNAVAILABLE,
};
"#;

pub const SPECIES_GEN_1: &str = r#"
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
        .baseSpeed     = 60,
        .baseSpAttack  = 80,
        .baseSpDefense = 80,
        .types = MON_TYPES(TYPE_GRASS, TYPE_POISON),
        .abilities = { ABILITY_OVERGROW, ABILITY_NONE, ABILITY_CHLOROPHYLL },
        .speciesName = _("Ivysaur"),
        .natDexNum = NATIONAL_DEX_IVYSAUR,
    },
#endif //P_FAMILY_BULBASAUR

#if P_FAMILY_NIDORAN
    [SPECIES_NIDORAN_F] =
    {
        .baseHP        = 55,
        .baseAttack    = 47,
        .baseDefense   = 52,
        .baseSpeed     = 41,
        .baseSpAttack  = 40,
        .baseSpDefense = 40,
        .types = MON_TYPES(TYPE_POISON),
        .abilities = { ABILITY_POISON_POINT, ABILITY_RIVALRY, ABILITY_HUSTLE },
        .speciesName = _("Nidoran♀"),
        .natDexNum = NATIONAL_DEX_NIDORAN_F,
    },
#endif //P_FAMILY_NIDORAN
"#;

pub const POKEDEX: &str = r#"
#ifndef GUARD_CONSTANTS_POKEDEX_H
#define GUARD_CONSTANTS_POKEDEX_H

enum NationalDexOrder
{
    NATIONAL_DEX_NONE,
    NATIONAL_DEX_BULBASAUR,
    NATIONAL_DEX_IVYSAUR,
    NATIONAL_DEX_NIDORAN_F,
};

#endif
"#;

pub const SPECIES_ENABLED: &str = r#"
#define P_GEN_1_POKEMON TRUE
#define P_GEN_2_POKEMON FALSE
#define P_FAMILY_BULBASAUR P_GEN_1_POKEMON
#define P_FAMILY_NIDORAN FALSE
"#;

pub const RANDBATS: &str = r#"{
    "Bulbasaur": {
        "level": 95,
        "abilities": ["Overgrow", "Chlorophyll"],
        "items": ["Leftovers"],
        "roles": {
            "Bulky Support": {
                "moves": ["Giga Drain", "Sleep Powder", "Sludge Bomb", "Leech Seed"]
            }
        }
    }
}"#;

/// A populated project under a temporary directory.
pub struct ProjectTree {
    pub dir: TempDir,
    pub layout: Layout,
}

impl ProjectTree {
    /// Every input present.
    pub fn full() -> Self {
        let tree = Self::empty();
        tree.write(&tree.layout.level_up_dir.join("gen_1.h"), LEVEL_UP_GEN_1);
        tree.write(&tree.layout.teachable_file, TEACHABLE);
        tree.write(&tree.layout.egg_moves_file, EGG_MOVES);
        tree.write(&tree.layout.species_info_dir.join("gen_1_families.h"), SPECIES_GEN_1);
        tree.write(&tree.layout.pokedex_header, POKEDEX);
        tree.write(&tree.layout.species_enabled, SPECIES_ENABLED);
        tree.write(&tree.layout.tool_dir.join("gen9randombattle.json"), RANDBATS);
        tree
    }

    /// The directory with nothing in it.
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let layout = Layout::default().under(dir.path());
        Self { dir, layout }
    }

    pub fn write(&self, path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(path, contents).expect("write fixture file");
    }

    pub fn remove(&self, path: &Path) {
        fs::remove_file(path).expect("remove fixture file");
    }
}
