//! Core contracts for rafflegen.
//!
//! This crate defines the value tree persisted by the RaffleManager addon,
//! the table-literal renderer that writes it, and the parser that reads it
//! back for validation.

pub mod error;
pub mod lua;
pub mod parse;
pub mod value;

pub use error::{Error, Result};
pub use lua::{render_document, render_value};
pub use parse::{Document, parse_document, parse_value};
pub use value::{Key, Table, Value};

/// Top-level variable the addon stores its saved state under.
pub const SAVED_VARIABLES_NAME: &str = "RaffleManager_SavedVariables";

/// Profile table every account is nested under.
pub const DEFAULT_PROFILE: &str = "Default";

/// Per-account wrapper key used by account-wide saved variables.
pub const ACCOUNT_WIDE_KEY: &str = "$AccountWide";
