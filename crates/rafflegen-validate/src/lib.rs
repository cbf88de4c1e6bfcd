//! Consistency checks for RaffleManager saved-variables files.
//!
//! Both validators parse the file into a value tree first, so field order
//! and formatting do not affect what they find.

pub mod amounts;
pub mod errors;
pub mod roster;

use std::path::Path;

use rafflegen_core::{Document, parse_document};

pub use amounts::{AmountOutcome, AmountReport, InvalidAmount, check_amounts, check_amounts_file};
pub use errors::ValidationError;
pub use roster::{RosterReport, RosterViolation, validate_roster, validate_roster_file};

pub(crate) fn read_document(path: &Path) -> Result<Document, ValidationError> {
    let text = std::fs::read_to_string(path).map_err(|err| ValidationError::io(path, err))?;
    Ok(parse_document(&text)?)
}
