use std::path::PathBuf;

use anyhow::{anyhow, Context as _, Result};
use clap::Args;
use dex_data::error::read_required;
use dex_data::showdown::PartyFile;

use crate::config::Context;
use crate::utils::write_output;

#[derive(Args, Debug, Default)]
pub struct ShowdownArgs {
    /// Trainer-party file (defaults to src/data/trainers.party)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// List trainers as `ID - Name`
    #[arg(long, conflicts_with_all = ["trainer", "search"])]
    pub list: bool,

    /// List trainers whose ID or name contains this text
    #[arg(long, conflicts_with = "trainer")]
    pub search: Option<String>,

    /// Export a single trainer
    #[arg(short, long)]
    pub trainer: Option<String>,
}

pub fn execute(ctx: &Context, args: ShowdownArgs) -> Result<()> {
    let path = args.input.clone().unwrap_or_else(|| ctx.layout.trainers_party.clone());
    let text = read_required(&path).with_context(|| format!("Failed to load {}", path.display()))?;
    let party = PartyFile::parse(&text);
    tracing::info!(trainers = party.len(), "parsed party file");

    if args.list {
        println!("Found {} trainers:", party.len());
        for trainer in party.trainers() {
            println!("  {}", trainer.display_name());
        }
        return Ok(());
    }

    if let Some(term) = &args.search {
        let matching = party.search(term);
        println!("Found {} trainers matching '{term}':", matching.len());
        for trainer in matching {
            println!("  {}", trainer.display_name());
        }
        return Ok(());
    }

    let export = match &args.trainer {
        Some(id) => party
            .get(id)
            .map(|t| t.to_showdown())
            .ok_or_else(|| anyhow!("trainer '{id}' not found; use --list to see all trainers"))?,
        None => party.export_all(),
    };
    write_output(args.output.as_deref(), &export)?;
    if let Some(path) = &args.output {
        println!("Exported to {}", path.display());
    }
    Ok(())
}
