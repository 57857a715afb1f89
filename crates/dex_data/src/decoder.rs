//! Symbolic constant → display label decoding.

use heck::ToTitleCase;
use phf::phf_map;

/// Move constants whose display spelling is not plain title case.
static MOVE_EXCEPTIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "WILLOWISP" => "Will-O-Wisp",
    "WILL_O_WISP" => "Will-O-Wisp",
    "XSCISSOR" => "X-Scissor",
    "X_SCISSOR" => "X-Scissor",
    "UTURN" => "U-turn",
    "U_TURN" => "U-turn",
    "VCREATE" => "V-create",
    "V_CREATE" => "V-create",
    "DOUBLE_EDGE" => "Double-Edge",
    "SELF_DESTRUCT" => "Self-Destruct",
    "SOFT_BOILED" => "Soft-Boiled",
    "LOCK_ON" => "Lock-On",
    "MUD_SLAP" => "Mud-Slap",
    "WAKE_UP_SLAP" => "Wake-Up Slap",
    "FREEZE_DRY" => "Freeze-Dry",
    "TRICK_OR_TREAT" => "Trick-or-Treat",
    "BABY_DOLL_EYES" => "Baby-Doll Eyes",
    "POWER_UP_PUNCH" => "Power-Up Punch",
    "MULTI_ATTACK" => "Multi-Attack",
    "ALL_OUT_PUMMELING" => "All-Out Pummeling",
};

static ABILITY_EXCEPTIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "RKS_SYSTEM" => "RKS System",
    "SOUL_HEART" => "Soul-Heart",
    "WELL_BAKED_BODY" => "Well-Baked Body",
    "MINDS_EYE" => "Mind's Eye",
};

/// Type constants that map to a display label. Anything else is dropped.
static TYPE_LABELS: phf::Map<&'static str, &'static str> = phf_map! {
    "TYPE_NONE" => "None",
    "TYPE_NORMAL" => "Normal",
    "TYPE_FIGHTING" => "Fighting",
    "TYPE_FLYING" => "Flying",
    "TYPE_POISON" => "Poison",
    "TYPE_GROUND" => "Ground",
    "TYPE_ROCK" => "Rock",
    "TYPE_BUG" => "Bug",
    "TYPE_GHOST" => "Ghost",
    "TYPE_STEEL" => "Steel",
    "TYPE_MYSTERY" => "Mystery",
    "TYPE_FIRE" => "Fire",
    "TYPE_WATER" => "Water",
    "TYPE_GRASS" => "Grass",
    "TYPE_ELECTRIC" => "Electric",
    "TYPE_PSYCHIC" => "Psychic",
    "TYPE_ICE" => "Ice",
    "TYPE_DRAGON" => "Dragon",
    "TYPE_DARK" => "Dark",
    "TYPE_FAIRY" => "Fairy",
};

/// Decodes constants of one family (`MOVE_*`, `ABILITY_*`, ...).
#[derive(Clone, Copy)]
pub struct Decoder {
    prefix: &'static str,
    exceptions: &'static phf::Map<&'static str, &'static str>,
}

pub static MOVES: Decoder = Decoder {
    prefix: "MOVE_",
    exceptions: &MOVE_EXCEPTIONS,
};

pub static ABILITIES: Decoder = Decoder {
    prefix: "ABILITY_",
    exceptions: &ABILITY_EXCEPTIONS,
};

impl Decoder {
    /// Turn `MOVE_SOLAR_BEAM` into `Solar Beam`.
    ///
    /// The prefix is optional; a bare body such as `SOLAR_BEAM` decodes
    /// the same way.
    pub fn label(&self, token: &str) -> String {
        let body = token.strip_prefix(self.prefix).unwrap_or(token);
        if let Some(label) = self.exceptions.get(body) {
            return (*label).to_string();
        }
        title_words(body)
    }
}

/// Move constant → display name.
pub fn move_name(token: &str) -> String {
    MOVES.label(token)
}

/// Ability constant → display name.
pub fn ability_name(token: &str) -> String {
    ABILITIES.label(token)
}

/// Type constant → display label, `None` for unknown constants.
pub fn type_label(token: &str) -> Option<&'static str> {
    TYPE_LABELS.get(token).copied()
}

/// `MR_MIME` → `Mr Mime`. Used as the fallback display name of a key.
pub fn title_words(body: &str) -> String {
    body.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| word.to_title_case())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalise a species key or display name for cross-source matching.
///
/// Upper-cases and drops `-`, space, `_` and `'`, so `CHARIZARD_MEGA_X`
/// and `Charizard-Mega-X` compare equal.
pub fn normalize_name(name: &str) -> String {
    name.to_uppercase().replace(['-', ' ', '_', '\''], "")
}
