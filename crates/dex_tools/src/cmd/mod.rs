//! One module per subcommand. Each parses its flags, calls into
//! `dex_data`, and prints the report.

pub mod convert;
pub mod enabled;
pub mod extract_moves;
pub mod extract_species;
pub mod filter;
pub mod query;
pub mod showdown;
