use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use dex_data::query::{find, render, unique_moves, Lookup, View, CANDIDATE_LIMIT};
use dex_data::store::read_json;
use dex_data::MoveDatabase;

use crate::config::Context;

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Species key or display name; words are joined with spaces
    #[arg(required = true)]
    pub name: Vec<String>,

    /// Move database (defaults to <tool_dir>/move_data.json)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Hide random-battle movesets
    #[arg(long)]
    pub no_randbats: bool,

    /// Show level-up moves only
    #[arg(long, conflicts_with = "teachable_only")]
    pub level_only: bool,

    /// Show teachable moves only
    #[arg(long)]
    pub teachable_only: bool,
}

impl QueryArgs {
    fn view(&self) -> View {
        let mut view = if self.level_only {
            View::level_only()
        } else if self.teachable_only {
            View::teachable_only()
        } else {
            View::default()
        };
        if self.no_randbats {
            view.randbats = false;
        }
        view
    }
}

pub fn execute(ctx: &Context, args: QueryArgs) -> Result<()> {
    let path = args.input.clone().unwrap_or_else(|| ctx.layout.move_db_path());
    let db: MoveDatabase = read_json(&path)
        .with_context(|| format!("Failed to load {} (run `dex extract-moves` first)", path.display()))?;

    let search = args.name.join(" ");
    match find(&db, &search) {
        Lookup::Found(record) => {
            let view = args.view();
            print!("{}", render(record, view));
            println!("Total unique moves: {}", unique_moves(record, view).len());
        }
        Lookup::Ambiguous(candidates) => {
            println!("Multiple species match '{search}':");
            for record in candidates.iter().take(CANDIDATE_LIMIT) {
                println!("  - {} ({})", record.name, record.species);
            }
            if candidates.len() > CANDIDATE_LIMIT {
                println!("  ... and {} more", candidates.len() - CANDIDATE_LIMIT);
            }
            println!("\nPlease be more specific.");
        }
        Lookup::NotFound => {
            println!("Species '{search}' not found in database.");
            println!("Database contains {} species.", db.metadata.total_pokemon);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: QueryArgs,
    }

    fn parse(argv: &[&str]) -> QueryArgs {
        Wrapper::try_parse_from(std::iter::once("query").chain(argv.iter().copied()))
            .unwrap()
            .args
    }

    #[test]
    fn test_view_flags() {
        assert_eq!(parse(&["mr", "mime"]).view(), View::default());
        assert_eq!(parse(&["mew", "--level-only"]).view(), View::level_only());

        let view = parse(&["mew", "--no-randbats"]).view();
        assert!(view.level_up && view.teachable && !view.randbats);
    }

    #[test]
    fn test_conflicting_views_rejected() {
        let argv = ["query", "mew", "--level-only", "--teachable-only"];
        assert!(Wrapper::try_parse_from(argv).is_err());
    }
}
