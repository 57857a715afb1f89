//! dex_data - species, stat and learnset databases for pokeemerald-expansion
//!
//! This library mines the project's C headers for species stats, national
//! dex order, evolutionary families and learnsets, merges in random-battle
//! sets, and writes small JSON databases that the query, filter and party
//! conversion tools read back.

/// Error type and file-reading helpers
pub mod error;

/// Block scanners for family, designated-entry and array shapes
pub mod scanner;

/// Constant → display label decoding
pub mod decoder;

/// National dex ordinals
pub mod dex;

/// Evolutionary families and egg-move propagation
pub mod family;

/// Level-up, teachable and egg-move arrays
pub mod learnsets;

/// Species stat blocks
pub mod species;

/// Random-battle datasets
pub mod randbats;

/// Database documents
pub mod models;

/// Move database assembly
pub mod movedb;

/// JSON persistence
pub mod store;

/// Input layout and load-once source sets
pub mod pipeline;

/// species_enabled.h switches
pub mod enabled;

/// Species database filters
pub mod filter;

/// Move database lookup
pub mod query;

/// Trainer-party set conversion
pub mod party;

/// trainers.party → simulator export
pub mod showdown;

// Re-export commonly used types
pub use dex::{DexTable, ResolveReport, Resolver};
pub use error::{DexError, Result};
pub use family::{FamilyTable, MatchPolicy};
pub use models::{BaseStats, MoveDatabase, MoveRecord, SpeciesDatabase, SpeciesRecord, Stat};
pub use pipeline::{Layout, MoveSources, SpeciesSources};
pub use randbats::{DatasetLoader, DatasetSource, HttpTransport, RoleIndex, Transport};
