use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use dex_data::enabled::EnabledConfig;
use dex_data::species::summarize;
use dex_data::store::write_json_atomic;
use dex_data::{SpeciesDatabase, SpeciesSources};

use crate::config::Context;

const PREVIEW: usize = 3;

#[derive(Args, Debug)]
pub struct ExtractSpeciesArgs {
    /// Output path (defaults to <tool_dir>/pokemon_data.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Keep only species enabled in species_enabled.h
    #[arg(long)]
    pub enabled_only: bool,
}

pub fn execute(ctx: &Context, args: ExtractSpeciesArgs) -> Result<()> {
    let layout = &ctx.layout;
    println!("{}", "=".repeat(60));
    println!("Species database extraction");
    println!("{}", "=".repeat(60));

    let sources = SpeciesSources::load(layout).context("Failed to load species sources")?;
    println!("Species-info files: {}", sources.species_info.len());
    println!("National dex entries: {}", sources.dex.len());
    for (name, ordinal) in sources.dex.sample(3) {
        println!("  {name} = {ordinal}");
    }

    let (mut db, report) = sources.build();
    if args.enabled_only {
        let enabled = EnabledConfig::load(&layout.species_enabled)?;
        let removed = enabled.retain_enabled(&mut db.pokemon);
        println!("Disabled species removed: {removed}");
        db = SpeciesDatabase::new(db.pokemon);
    }

    let output = args.output.unwrap_or_else(|| layout.species_db_path());
    write_json_atomic(&output, &db).with_context(|| format!("Failed to write {}", output.display()))?;

    let summary = summarize(&db.pokemon);
    println!("\n{}", "=".repeat(60));
    println!("Summary");
    println!("{}", "=".repeat(60));
    println!("Blocks parsed:    {}", report.parsed);
    println!("Species written:  {}", db.metadata.total_pokemon);
    if report.malformed > 0 {
        println!(
            "Dropped (incomplete stats or types): {} (e.g. {})",
            report.malformed,
            report.malformed_sample.join(", ")
        );
    }
    println!(
        "Dex numbers mapped: {}/{}",
        report.ordinals.mapped, report.ordinals.total
    );
    if !report.ordinals.unresolved_sample.is_empty() {
        println!("Unresolved (e.g.): {}", report.ordinals.unresolved_sample.join(", "));
    }
    if let (Some(high), Some(low)) = (summary.highest_bst, summary.lowest_bst) {
        println!("Highest BST: {high}");
        println!("Lowest BST:  {low}");
    }
    println!("\nTop types:");
    for (type_name, count) in &summary.top_types {
        println!("  {type_name:<10} {count}");
    }

    println!("\nPreview:");
    for record in db.pokemon.iter().take(PREVIEW) {
        println!(
            "  #{:04} {} [{}] BST {}",
            record.nat_dex_num,
            record.name,
            record.types.join("/"),
            record.bst
        );
    }

    tracing::info!(path = %output.display(), species = db.metadata.total_pokemon, "species database written");
    println!("\nSaved to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dex_data::store::read_json;
    use std::fs;
    use std::path::Path;

    const GEN_1: &str = "#if P_FAMILY_BULBASAUR
    [SPECIES_BULBASAUR] =
    {
        .baseHP = 45, .baseAttack = 49, .baseDefense = 49,
        .baseSpeed = 45, .baseSpAttack = 65, .baseSpDefense = 65,
        .types = MON_TYPES(TYPE_GRASS, TYPE_POISON),
        .speciesName = _(\"Bulbasaur\"),
        .natDexNum = NATIONAL_DEX_BULBASAUR,
    },
#endif //P_FAMILY_BULBASAUR

#if P_FAMILY_NIDORAN
    [SPECIES_NIDORAN_F] =
    {
        .baseHP = 55, .baseAttack = 47, .baseDefense = 52,
        .baseSpeed = 41, .baseSpAttack = 40, .baseSpDefense = 40,
        .types = MON_TYPES(TYPE_POISON),
        .natDexNum = NATIONAL_DEX_NIDORAN_F,
    },
#endif //P_FAMILY_NIDORAN
";

    const POKEDEX: &str = "enum NationalDexOrder
{
    NATIONAL_DEX_NONE,
    NATIONAL_DEX_BULBASAUR,
    NATIONAL_DEX_NIDORAN_F,
};
";

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn project() -> (tempfile::TempDir, Context) {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::resolve(Some(dir.path().to_path_buf())).unwrap();
        write(&ctx.layout.species_info_dir.join("gen_1_families.h"), GEN_1);
        write(&ctx.layout.pokedex_header, POKEDEX);
        (dir, ctx)
    }

    #[test]
    fn test_writes_to_layout_path() {
        let (_dir, ctx) = project();
        let args = ExtractSpeciesArgs {
            output: None,
            enabled_only: false,
        };
        execute(&ctx, args).unwrap();

        let db: SpeciesDatabase = read_json(&ctx.layout.species_db_path()).unwrap();
        assert_eq!(db.metadata.total_pokemon, 2);
        assert_eq!(db.pokemon[0].species, "BULBASAUR");
        assert_eq!(db.pokemon[0].nat_dex_num, 1);
        assert_eq!(db.pokemon[0].bst, 318);
    }

    #[test]
    fn test_enabled_only_prunes() {
        let (_dir, ctx) = project();
        write(
            &ctx.layout.species_enabled,
            "#define P_GEN_1_POKEMON TRUE\n#define P_FAMILY_BULBASAUR P_GEN_1_POKEMON\n#define P_FAMILY_NIDORAN FALSE\n",
        );
        let args = ExtractSpeciesArgs {
            output: None,
            enabled_only: true,
        };
        execute(&ctx, args).unwrap();

        let db: SpeciesDatabase = read_json(&ctx.layout.species_db_path()).unwrap();
        assert_eq!(db.metadata.total_pokemon, 1);
        assert_eq!(db.pokemon[0].name, "Bulbasaur");
    }

    #[test]
    fn test_missing_pokedex_exits_with_missing_input() {
        let (_dir, ctx) = project();
        fs::remove_file(&ctx.layout.pokedex_header).unwrap();
        let args = ExtractSpeciesArgs {
            output: None,
            enabled_only: false,
        };
        let err = execute(&ctx, args).unwrap_err();
        assert_eq!(crate::exit_code(&err), 3);
        assert!(!ctx.layout.species_db_path().exists());
    }
}
