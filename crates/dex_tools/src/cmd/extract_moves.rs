use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use dex_data::store::write_json_atomic;
use dex_data::{DatasetLoader, HttpTransport, MatchPolicy, MoveSources, RoleIndex, Transport};

use crate::config::Context;

const PREVIEW: usize = 2;

#[derive(Args, Debug)]
pub struct ExtractMovesArgs {
    /// Output path (defaults to <tool_dir>/move_data.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Use local dataset copies only
    #[arg(long)]
    pub offline: bool,

    /// Dataset download timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Match families by exact or underscore-insensitive key only
    #[arg(long)]
    pub strict_families: bool,
}

pub fn execute(ctx: &Context, args: ExtractMovesArgs) -> Result<()> {
    let layout = &ctx.layout;
    println!("{}", "=".repeat(60));
    println!("Move database extraction");
    println!("{}", "=".repeat(60));

    let sources = MoveSources::load(layout).context("Failed to load learnset sources")?;
    println!("Level-up files:   {}", sources.level_up.len());
    println!("Teachable file:   {}", sources.teachable.path.display());
    match &sources.egg {
        Some(egg) => println!("Egg moves file:   {}", egg.path.display()),
        None => println!("Egg moves file:   (missing, skipped)"),
    }

    let http = HttpTransport::new(ctx.timeout(args.timeout));
    let transport: Option<&dyn Transport> = if args.offline { None } else { Some(&http) };
    let loader = DatasetLoader::new(layout.tool_dir.clone(), transport);
    let datasets = loader.load_all(&ctx.config.randbats.sources);
    let roles = RoleIndex::build(datasets.iter().map(|d| &d.data));
    println!("Random-battle datasets: {} loaded, {} species", datasets.len(), roles.len());

    let policy = if args.strict_families {
        MatchPolicy::Strict
    } else {
        MatchPolicy::PrefixOverlap
    };
    let (db, report) = sources.build(policy, &roles);

    let output = args.output.unwrap_or_else(|| layout.move_db_path());
    write_json_atomic(&output, &db).with_context(|| format!("Failed to write {}", output.display()))?;

    let meta = &db.metadata;
    println!("\n{}", "=".repeat(60));
    println!("Summary");
    println!("{}", "=".repeat(60));
    println!("Total species:           {}", meta.total_pokemon);
    println!(
        "With level-up moves:     {} ({} entries)",
        meta.with_level_up_moves, report.level_up_entries
    );
    println!(
        "With teachable moves:    {} ({} entries)",
        meta.with_teachable_moves, report.teachable_entries
    );
    println!("With egg moves:          {} ({} entries)", meta.with_egg_moves, report.egg_entries);
    println!("With random-battle sets: {}", meta.with_randbats_movesets);
    match &report.propagation {
        Some(p) => {
            println!("Egg moves propagated:    {} across {} families", p.propagated, p.families_touched);
            if p.unmatched > 0 {
                println!("No family found:         {} (e.g. {})", p.unmatched, p.unmatched_sample.join(", "));
            }
        }
        None => println!("Egg moves propagated:    skipped (no species info)"),
    }
    println!("Backfilled from gender variants: {}", report.backfilled);

    println!("\nPreview:");
    for record in db.pokemon.values().take(PREVIEW) {
        println!(
            "  {} ({}): {} level-up, {} teachable, {} egg",
            record.name,
            record.species,
            record.level_up_moves.len(),
            record.teachable_moves.len(),
            record.egg_moves.len()
        );
    }

    tracing::info!(path = %output.display(), species = meta.total_pokemon, "move database written");
    println!("\nSaved to {}", output.display());
    Ok(())
}
