use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use dex_data::enabled::{EnabledConfig, GENERATIONS};

use crate::config::Context;

const ENABLED_SAMPLE: usize = 10;
const DISABLED_SAMPLE: usize = 5;

#[derive(Args, Debug)]
pub struct EnabledArgs {
    /// species_enabled.h (defaults to include/config/species_enabled.h)
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

pub fn execute(ctx: &Context, args: EnabledArgs) -> Result<()> {
    let path = args.input.unwrap_or_else(|| ctx.layout.species_enabled.clone());
    let config = EnabledConfig::load(&path)?;
    print!("{}", summary(&config));
    Ok(())
}

/// Generation switches, family counts, and a sample of each side.
fn summary(config: &EnabledConfig) -> String {
    let mut out = String::from("Generations:\n");
    for generation in GENERATIONS {
        let status = if config.generation_enabled(generation) {
            "enabled"
        } else {
            "disabled"
        };
        let _ = writeln!(out, "  Gen {generation}: {status}");
    }

    let (enabled, disabled): (Vec<_>, Vec<_>) = config.families().partition(|(_, on)| *on);
    let _ = writeln!(out, "\nFamilies: {} enabled, {} disabled", enabled.len(), disabled.len());

    if !enabled.is_empty() {
        let _ = writeln!(out, "\nEnabled (first {ENABLED_SAMPLE}):");
        for (name, _) in enabled.iter().take(ENABLED_SAMPLE) {
            let _ = writeln!(out, "  {name}");
        }
    }
    if !disabled.is_empty() {
        let _ = writeln!(out, "\nDisabled (first {DISABLED_SAMPLE}):");
        for (name, _) in disabled.iter().take(DISABLED_SAMPLE) {
            let _ = writeln!(out, "  {name}");
        }
    }
    out
}
