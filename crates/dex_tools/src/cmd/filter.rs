use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use dex_data::filter::{format_compact, format_detailed, Bounds, Criteria};
use dex_data::store::read_json;
use dex_data::{SpeciesDatabase, Stat};

use crate::config::Context;
use crate::UsageError;

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Species database (defaults to <tool_dir>/pokemon_data.json)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Generation (1-9)
    #[arg(long = "gen", value_parser = clap::value_parser!(u8).range(1..=9))]
    pub generation: Option<u8>,

    /// Type, any-of when repeated
    #[arg(long = "type")]
    pub types: Vec<String>,

    /// Ability name or part of one
    #[arg(long)]
    pub ability: Option<String>,

    #[arg(long)]
    pub min_bst: Option<u16>,
    #[arg(long)]
    pub max_bst: Option<u16>,
    #[arg(long)]
    pub min_hp: Option<u16>,
    #[arg(long)]
    pub max_hp: Option<u16>,
    #[arg(long)]
    pub min_atk: Option<u16>,
    #[arg(long)]
    pub max_atk: Option<u16>,
    #[arg(long)]
    pub min_def: Option<u16>,
    #[arg(long)]
    pub max_def: Option<u16>,
    #[arg(long)]
    pub min_spa: Option<u16>,
    #[arg(long)]
    pub max_spa: Option<u16>,
    #[arg(long)]
    pub min_spd: Option<u16>,
    #[arg(long)]
    pub max_spd: Option<u16>,
    #[arg(long)]
    pub min_spe: Option<u16>,
    #[arg(long)]
    pub max_spe: Option<u16>,

    /// One line per species
    #[arg(long)]
    pub compact: bool,

    /// Print only the number of matches
    #[arg(long, conflicts_with = "compact")]
    pub count: bool,
}

impl FilterArgs {
    fn criteria(&self) -> Criteria {
        let stats: HashMap<Stat, Bounds> = [
            (Stat::Hp, self.min_hp, self.max_hp),
            (Stat::Atk, self.min_atk, self.max_atk),
            (Stat::Def, self.min_def, self.max_def),
            (Stat::Spa, self.min_spa, self.max_spa),
            (Stat::Spd, self.min_spd, self.max_spd),
            (Stat::Spe, self.min_spe, self.max_spe),
        ]
        .into_iter()
        .map(|(stat, min, max)| (stat, Bounds::new(min, max)))
        .filter(|(_, bounds)| bounds.is_set())
        .collect();

        Criteria {
            generation: self.generation,
            types: self.types.clone(),
            ability: self.ability.clone(),
            bst: Bounds::new(self.min_bst, self.max_bst),
            stats,
        }
    }
}

pub fn execute(ctx: &Context, args: FilterArgs) -> Result<()> {
    let criteria = args.criteria();
    if criteria.is_empty() {
        return Err(UsageError(
            "no filter given; use --gen, --type, --ability, or a --min-*/--max-* bound".into(),
        )
        .into());
    }

    let path = args.input.clone().unwrap_or_else(|| ctx.layout.species_db_path());
    let db: SpeciesDatabase = read_json(&path)
        .with_context(|| format!("Failed to load {} (run `dex extract-species` first)", path.display()))?;

    let hits = criteria.apply(&db.pokemon);
    if args.count {
        println!("{}", hits.len());
        return Ok(());
    }

    println!("Found {} of {} species\n", hits.len(), db.pokemon.len());
    for (i, record) in hits.iter().enumerate() {
        if args.compact {
            println!("{}", format_compact(i + 1, record));
        } else {
            println!("{}", format_detailed(i + 1, record));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_criteria_is_usage_error() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::resolve(Some(dir.path().to_path_buf())).unwrap();
        let err = execute(&ctx, FilterArgs::default()).unwrap_err();
        assert!(err.is::<UsageError>());
    }

    #[test]
    fn test_stat_bounds_collected() {
        let args = FilterArgs {
            min_spe: Some(100),
            max_hp: Some(60),
            ..Default::default()
        };
        let criteria = args.criteria();
        assert_eq!(criteria.stats.len(), 2);
        assert_eq!(criteria.stats[&Stat::Spe], Bounds::new(Some(100), None));
        assert!(!criteria.is_empty());
    }

    #[test]
    fn test_missing_database_is_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::resolve(Some(dir.path().to_path_buf())).unwrap();
        let args = FilterArgs {
            min_bst: Some(500),
            ..Default::default()
        };
        let err = execute(&ctx, args).unwrap_err();
        let dex = err.downcast_ref::<dex_data::DexError>().unwrap();
        assert!(dex.is_missing_input());
    }

    #[test]
    fn test_blank_ability_is_a_criterion() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::resolve(Some(dir.path().to_path_buf())).unwrap();
        let args = FilterArgs {
            ability: Some(String::new()),
            ..Default::default()
        };
        let err = execute(&ctx, args).unwrap_err();
        assert!(!err.is::<UsageError>());
        assert_eq!(crate::exit_code(&err), 3);
    }
}
