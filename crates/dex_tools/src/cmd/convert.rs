use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use dex_data::party::{convert, ConvertOptions, Mode};
use dex_data::randbats::{load_file, LoadedDataset};
use dex_data::{DatasetLoader, DexError, HttpTransport, Transport};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Context;
use crate::utils::{split_paths, write_output};

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModeArg {
    /// First role of each species, untagged
    Single,
    /// Every role and variant, with comment headers
    AllRoles,
    /// Every role and variant, tagged
    #[default]
    Pool,
    /// One generated trainer per dataset
    TrainerPool,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Single => Mode::Single,
            ModeArg::AllRoles => Mode::AllRoles,
            ModeArg::Pool => Mode::Pool,
            ModeArg::TrainerPool => Mode::TrainerPool,
        }
    }
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Comma-separated dataset files (defaults to the configured sources)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = ModeArg::Pool)]
    pub mode: ModeArg,

    /// Pokémon per generated trainer pool
    #[arg(long, default_value_t = 8)]
    pub pool_size: usize,

    /// Party size of generated trainers
    #[arg(long, default_value_t = 4)]
    pub party_size: usize,

    /// Seed for repeatable trainer pools
    #[arg(long)]
    pub seed: Option<u64>,

    /// Use local dataset copies only
    #[arg(long)]
    pub offline: bool,

    /// Dataset download timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

fn load_inputs(list: &str) -> Vec<LoadedDataset> {
    split_paths(list)
        .into_iter()
        .filter_map(|path| match load_file(&path) {
            Ok(data) => Some(LoadedDataset {
                name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string()),
                data,
            }),
            Err(e) => {
                tracing::warn!(error = %e, "skipping input");
                None
            }
        })
        .collect()
}

pub fn execute(ctx: &Context, args: ConvertArgs) -> Result<()> {
    let datasets = match &args.input {
        Some(list) => load_inputs(list),
        None => {
            let http = HttpTransport::new(ctx.timeout(args.timeout));
            let transport: Option<&dyn Transport> = if args.offline { None } else { Some(&http) };
            DatasetLoader::new(ctx.layout.tool_dir.clone(), transport).load_all(&ctx.config.randbats.sources)
        }
    };
    if datasets.is_empty() {
        return Err(DexError::DatasetUnavailable {
            name: args.input.unwrap_or_else(|| "random-battle datasets".into()),
        }
        .into());
    }

    let options = ConvertOptions {
        mode: args.mode.into(),
        pool_size: args.pool_size,
        party_size: args.party_size,
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let entries = convert(&datasets, &options, &mut rng);
    tracing::info!(entries = entries.len(), datasets = datasets.len(), "converted");

    let mut text = entries.join("\n\n");
    text.push('\n');
    write_output(args.output.as_deref(), &text)?;
    if let Some(path) = &args.output {
        println!("Wrote {} entries to {}", entries.len(), path.display());
    }
    Ok(())
}
