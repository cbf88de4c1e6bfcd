//! Fixture generator for RaffleManager saved variables.
//!
//! Builds blank, roster, mail and mixed accounts, renders them with the
//! table-literal serializer and writes them without overwriting existing
//! files.

pub mod accounts;
pub mod engine;
pub mod errors;
pub mod identity;
pub mod model;
pub mod output;
pub mod words;

pub use accounts::{Account, AccountKind, AmountPolicy, MailEntry, RosterEntry};
pub use engine::{GeneratedFile, RaffleGenerator, SavedVariables};
pub use errors::GenerationError;
pub use identity::IdentityPool;
pub use model::{AccountCounts, GenerateOptions, GenerationReport, GenerationSummary};
pub use output::{unique_output_path, write_bytes_atomic};
