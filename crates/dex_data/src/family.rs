//! Evolutionary family tables and inherited-move propagation.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::dex::DIAGNOSTIC_SAMPLE;
use crate::scanner::FamilyBlocks;

/// How a learnset key that is not itself a family member finds its family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Exact key, then underscore-insensitive equality, then the first member
    /// whose underscore-stripped key is a prefix of the key's (or vice versa).
    /// `BASCULIN` reaches `BASCULIN_RED_STRIPED` this way.
    #[default]
    PrefixOverlap,
    /// Exact key, then underscore-insensitive equality only.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Family {
    pub name: String,
    pub members: Vec<String>,
}

/// Family name → members, with a reverse index from member to family.
#[derive(Debug, Default, Clone)]
pub struct FamilyTable {
    families: Vec<Family>,
    by_name: HashMap<String, usize>,
    by_member: HashMap<String, usize>,
    /// Members in first-seen order; prefix matching scans this.
    member_order: Vec<String>,
}

impl FamilyTable {
    pub fn from_sources<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
        let mut table = FamilyTable::default();
        for text in texts {
            table.add_source(text);
        }
        table
    }

    /// Add every family block of one species-info header.
    ///
    /// A family already known keeps its first definition; a species listed
    /// under several families belongs to the last one seen.
    pub fn add_source(&mut self, text: &str) {
        for block in FamilyBlocks::new(text) {
            let members: Vec<String> = block.members().map(str::to_uppercase).collect();
            if members.is_empty() || self.by_name.contains_key(block.name) {
                continue;
            }
            let idx = self.families.len();
            for member in &members {
                if self.by_member.insert(member.clone(), idx).is_none() {
                    self.member_order.push(member.clone());
                }
            }
            self.by_name.insert(block.name.to_string(), idx);
            self.families.push(Family {
                name: block.name.to_string(),
                members,
            });
        }
    }

    pub fn families(&self) -> &[Family] {
        &self.families
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Family a member is listed under, by exact key.
    pub fn family_name_of(&self, member: &str) -> Option<&str> {
        self.by_member
            .get(member)
            .map(|&idx| self.families[idx].name.as_str())
    }

    fn find(&self, key: &str, policy: MatchPolicy) -> Option<usize> {
        if let Some(&idx) = self.by_member.get(key) {
            return Some(idx);
        }
        let wanted = key.replace('_', "");

        if let Some(member) = self
            .member_order
            .iter()
            .find(|m| m.replace('_', "") == wanted)
        {
            return self.by_member.get(member).copied();
        }
        if policy == MatchPolicy::Strict {
            return None;
        }
        self.member_order
            .iter()
            .find(|m| {
                let actual = m.replace('_', "");
                actual.starts_with(&wanted) || wanted.starts_with(&actual)
            })
            .and_then(|member| self.by_member.get(member).copied())
    }

    /// The family `key` belongs to under `policy`.
    pub fn family_of(&self, key: &str, policy: MatchPolicy) -> Option<&Family> {
        self.find(key, policy).map(|idx| &self.families[idx])
    }
}

/// Outcome counters for [`propagate`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PropagationReport {
    /// Members that had no inherited moves before and received some.
    pub propagated: usize,
    pub families_touched: usize,
    /// First few keys that matched no family.
    pub unmatched_sample: Vec<String>,
    pub unmatched: usize,
}

/// Give every member of a family the sorted union of the family's inherited moves.
///
/// Keys that match no family keep their own list untouched. Running this
/// on its own output changes nothing.
pub fn propagate(
    moves: &BTreeMap<String, Vec<String>>,
    families: &FamilyTable,
    policy: MatchPolicy,
) -> (BTreeMap<String, Vec<String>>, PropagationReport) {
    let mut report = PropagationReport::default();
    let mut pooled: BTreeMap<usize, BTreeSet<&str>> = BTreeMap::new();

    for (species, list) in moves {
        match families.find(species, policy) {
            Some(idx) => {
                pooled
                    .entry(idx)
                    .or_default()
                    .extend(list.iter().map(String::as_str));
            }
            None => {
                report.unmatched += 1;
                if report.unmatched_sample.len() < DIAGNOSTIC_SAMPLE {
                    report.unmatched_sample.push(species.clone());
                }
            }
        }
    }

    let mut updated = moves.clone();
    for (idx, union) in &pooled {
        let list: Vec<String> = union.iter().map(|m| m.to_string()).collect();
        for member in &families.families[*idx].members {
            if !updated.contains_key(member) {
                report.propagated += 1;
            }
            updated.insert(member.clone(), list.clone());
        }
    }
    report.families_touched = pooled.len();

    tracing::debug!(
        propagated = report.propagated,
        families = report.families_touched,
        "propagated inherited moves"
    );
    (updated, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moves(entries: &[(&str, Vec<&str>)]) -> BTreeMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|m| m.to_string()).collect()))
            .collect()
    }

    const TEST_FAMILY: &str = "\
#if P_FAMILY_TEST
    [SPECIES_A] = { .baseHP = 1 },
    [SPECIES_B] = { .baseHP = 2 },
#endif //P_FAMILY_TEST
";

    #[test]
    fn test_family_union_reaches_all_members() {
        let table = FamilyTable::from_sources([TEST_FAMILY]);
        let input = moves(&[("A", vec!["Tackle"]), ("B", vec![])]);
        let (out, report) = propagate(&input, &table, MatchPolicy::default());
        assert_eq!(out["A"], vec!["Tackle"]);
        assert_eq!(out["B"], vec!["Tackle"]);
        assert_eq!(report.propagated, 0);
    }

    #[test]
    fn test_missing_members_are_added() {
        let table = FamilyTable::from_sources([TEST_FAMILY]);
        let input = moves(&[("A", vec!["Tackle", "Ember"])]);
        let (out, report) = propagate(&input, &table, MatchPolicy::default());
        assert_eq!(out["B"], vec!["Ember", "Tackle"]);
        assert_eq!(report.propagated, 1);
    }

    #[test]
    fn test_propagation_is_idempotent() {
        let source = "\
#if P_FAMILY_BASCULIN
[SPECIES_BASCULIN_RED_STRIPED] = {},
[SPECIES_BASCULIN_BLUE_STRIPED] = {},
[SPECIES_BASCULEGION_M] = {},
#endif
#if P_FAMILY_PICHU
[SPECIES_PICHU] = {},
[SPECIES_PIKACHU] = {},
#endif
";
        let table = FamilyTable::from_sources([source]);
        let input = moves(&[
            ("BASCULIN", vec!["Aqua Jet", "Bite"]),
            ("BASCULINBLUESTRIPED", vec!["Whirlpool"]),
            ("PICHU", vec!["Wish", "Charge"]),
            ("LONELY", vec!["Splash"]),
        ]);
        let (once, _) = propagate(&input, &table, MatchPolicy::PrefixOverlap);
        let (twice, _) = propagate(&once, &table, MatchPolicy::PrefixOverlap);
        assert_eq!(once, twice);
        assert_eq!(once["LONELY"], vec!["Splash"]);
        assert_eq!(once["PIKACHU"], vec!["Charge", "Wish"]);
        assert_eq!(
            once["BASCULEGION_M"],
            vec!["Aqua Jet", "Bite", "Whirlpool"]
        );
    }

    #[test]
    fn test_strict_policy_skips_prefix_matches() {
        let source = "#if P_FAMILY_BASCULIN\n[SPECIES_BASCULIN_RED_STRIPED] = {},\n#endif\n";
        let table = FamilyTable::from_sources([source]);
        let input = moves(&[("BASCULIN", vec!["Bite"]), ("BASCULINREDSTRIPED", vec!["Flail"])]);

        let (out, report) = propagate(&input, &table, MatchPolicy::Strict);
        assert_eq!(out["BASCULIN_RED_STRIPED"], vec!["Flail"]);
        assert_eq!(report.unmatched_sample, vec!["BASCULIN".to_string()]);

        let (out, report) = propagate(&input, &table, MatchPolicy::PrefixOverlap);
        assert_eq!(out["BASCULIN_RED_STRIPED"], vec!["Bite", "Flail"]);
        assert_eq!(report.unmatched, 0);
    }

    #[test]
    fn test_first_family_definition_wins() {
        let a = "#if P_FAMILY_X\n[SPECIES_ONE] = {},\n#endif\n";
        let b = "#if P_FAMILY_X\n[SPECIES_TWO] = {},\n#endif\n";
        let table = FamilyTable::from_sources([a, b]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.families()[0].members, vec!["ONE".to_string()]);
        assert_eq!(table.family_name_of("ONE"), Some("P_FAMILY_X"));
        assert_eq!(table.family_name_of("TWO"), None);
    }
}
