//! `dex` - data tools for a pokeemerald-expansion checkout.
//!
//! Builds the species and move databases from the project's headers and
//! answers questions over them.
//!
//! Usage:
//!   dex extract-moves
//!   dex extract-species --enabled-only
//!   dex filter --type fire --min-spe 100
//!   dex query charizard --level-only
//!   dex convert --mode trainer-pool --seed 7
//!   dex showdown --list

mod cmd;
mod config;
mod utils;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use cmd::{convert, enabled, extract_moves, extract_species, filter, query, showdown};
use dex_data::DexError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "dex_data=info,dex_tools=info";
const VERBOSE_LOG_FILTER: &str = "dex_data=debug,dex_tools=debug";

#[derive(Parser)]
#[command(name = "dex")]
#[command(about = "Species, stat and learnset tools for pokeemerald-expansion", long_about = None)]
struct Cli {
    /// Project root (defaults to the nearest directory with dex.toml or src/data/pokemon)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build move_data.json from the learnset headers
    ExtractMoves(extract_moves::ExtractMovesArgs),

    /// Build pokemon_data.json from the species-info headers
    ExtractSpecies(extract_species::ExtractSpeciesArgs),

    /// Filter the species database by stats, types, abilities or generation
    Filter(filter::FilterArgs),

    /// Show the moves a species can learn
    Query(query::QueryArgs),

    /// Convert random-battle sets to trainer-party notation
    Convert(convert::ConvertArgs),

    /// Export trainers.party teams as simulator text
    Showdown(showdown::ShowdownArgs),

    /// Report which generations and families are enabled
    Enabled(enabled::EnabledArgs),
}

/// A request that cannot run as given.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct UsageError(pub String);

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_LOG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Exit status for a failed command, from the first recognised cause.
fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if cause.is::<UsageError>() {
            return 2;
        }
        if let Some(dex) = cause.downcast_ref::<DexError>() {
            return match dex {
                DexError::MissingInput { .. } | DexError::MissingEnum { .. } => 3,
                DexError::DatasetUnavailable { .. } => 4,
                _ => 1,
            };
        }
    }
    1
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = match config::Context::resolve(cli.root) {
        Ok(ctx) => ctx,
        Err(err) => {
            eprintln!("Error: {err:#}");
            return ExitCode::from(exit_code(&err));
        }
    };

    let result = match cli.command {
        Commands::ExtractMoves(args) => extract_moves::execute(&ctx, args),
        Commands::ExtractSpecies(args) => extract_species::execute(&ctx, args),
        Commands::Filter(args) => filter::execute(&ctx, args),
        Commands::Query(args) => query::execute(&ctx, args),
        Commands::Convert(args) => convert::execute(&ctx, args),
        Commands::Showdown(args) => showdown::execute(&ctx, args),
        Commands::Enabled(args) => enabled::execute(&ctx, args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}
