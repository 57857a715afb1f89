//! National dex ordinals and the key → ordinal cross-reference.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{read_required, DexError, Result};
use crate::scanner::matching_brace;

/// Ordinal reported for keys that cannot be resolved.
pub const UNMAPPED: u16 = 0;

/// How many unresolved keys are kept for the end-of-run report.
pub const DIAGNOSTIC_SAMPLE: usize = 5;

/// Form suffixes stripped, in this order, when a key has no entry of its own.
pub const FORM_SUFFIXES: &[&str] = &[
    "_MEGA", "_MEGA_X", "_MEGA_Y", "_GMAX", "_ALOLA", "_GALAR", "_HISUI", "_PALDEA", "_PRIMAL",
    "_ORIGIN", "_THERIAN", "_BLACK", "_WHITE", "_BLUE", "_RED", "_ORANGE", "_YELLOW", "_GREEN",
    "_PURPLE", "_INDIGO", "_VIOLET", "_SHADOW", "_PURIFIED", "_SKY", "_UNBOUND", "_CORE",
    "_ATTACK", "_DEFENSE", "_SPEED", "_PLANT", "_SANDY", "_TRASH", "_FROST", "_FAN", "_MOW",
    "_WASH", "_HEAT", "_BLADE",
];

static ENUM_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"enum\s+NationalDexOrder\s*\{").expect("valid regex"));

static DEX_CONSTANT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"NATIONAL_DEX_(\w+)").expect("valid regex"));

/// Key → ordinal table, in declaration order starting at 0.
#[derive(Debug, Default, Clone)]
pub struct DexTable {
    ordinals: HashMap<String, u16>,
    order: Vec<String>,
}

impl DexTable {
    /// Build from the enumerator list itself (`NATIONAL_DEX_A, NATIONAL_DEX_B, ...`).
    ///
    /// A name declared twice keeps its first ordinal. An enumerator past
    /// `u16::MAX` is an error.
    pub fn from_declarations(body: &str) -> Result<Self> {
        let mut table = DexTable::default();
        for (ordinal, caps) in DEX_CONSTANT.captures_iter(body).enumerate() {
            let name = &caps[1];
            if table.ordinals.contains_key(name) {
                continue;
            }
            let ordinal = u16::try_from(ordinal).map_err(|_| DexError::OrdinalOverflow {
                name: name.to_string(),
                ordinal,
            })?;
            table.ordinals.insert(name.to_string(), ordinal);
            table.order.push(name.to_string());
        }
        Ok(table)
    }

    /// Locate `enum NationalDexOrder { ... }` in a header and build from its body.
    pub fn parse_header(text: &str, path: &Path) -> Result<Self> {
        let missing = || DexError::MissingEnum {
            path: path.to_path_buf(),
        };
        let decl = ENUM_DECL.find(text).ok_or_else(missing)?;
        let open = decl.end() - 1;
        let close = matching_brace(text.as_bytes(), open).ok_or_else(missing)?;
        Self::from_declarations(&text[open + 1..close])
    }

    /// Read and parse the pokedex header. Absence aborts the run.
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_required(path)?;
        Self::parse_header(&text, path)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The first `n` declared names, for progress output.
    pub fn sample(&self, n: usize) -> impl Iterator<Item = (&str, u16)> {
        self.order
            .iter()
            .take(n)
            .map(|name| (name.as_str(), self.ordinals[name]))
    }

    /// Exact lookup.
    pub fn get(&self, key: &str) -> Option<u16> {
        self.ordinals.get(key).copied()
    }

    /// Exact lookup, then one retry with the first matching form suffix removed.
    pub fn lookup(&self, key: &str) -> Option<u16> {
        if let Some(ordinal) = self.get(key) {
            return Some(ordinal);
        }
        let base = FORM_SUFFIXES
            .iter()
            .find_map(|suffix| key.strip_suffix(suffix))?;
        self.get(base)
    }
}

/// Resolution counters gathered over a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolveReport {
    pub mapped: usize,
    pub total: usize,
    /// First few keys that fell back to [`UNMAPPED`].
    pub unresolved_sample: Vec<String>,
}

/// Resolves keys against a [`DexTable`], never failing.
pub struct Resolver<'a> {
    table: &'a DexTable,
    report: ResolveReport,
}

impl<'a> Resolver<'a> {
    pub fn new(table: &'a DexTable) -> Self {
        Self {
            table,
            report: ResolveReport::default(),
        }
    }

    /// Ordinal for `key`, or [`UNMAPPED`] with the key noted for diagnostics.
    pub fn resolve(&mut self, key: &str) -> u16 {
        self.report.total += 1;
        match self.table.lookup(key) {
            Some(ordinal) => {
                self.report.mapped += 1;
                ordinal
            }
            None => {
                if self.report.unresolved_sample.len() < DIAGNOSTIC_SAMPLE {
                    self.report.unresolved_sample.push(key.to_string());
                }
                tracing::debug!(key, "no national dex entry");
                UNMAPPED
            }
        }
    }

    pub fn finish(self) -> ResolveReport {
        self.report
    }
}
