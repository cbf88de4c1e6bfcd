use std::fmt;
use std::path::Path;

use rafflegen_core::{Table, Value};
use serde::Serialize;
use tracing::debug;

use crate::errors::ValidationError;
use crate::read_document;

/// Violations listed in the text report; the rest are summarised.
pub const MAX_LISTED_VIOLATIONS: usize = 10;

const ROSTER_KEY: &str = "roster_data";

/// One inconsistent roster entry. `entry` is 1-based across the whole file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RosterViolation {
    Sales {
        entry: usize,
        sales10: i64,
        sales30: i64,
    },
    Purchases {
        entry: usize,
        purchases10: i64,
        purchases30: i64,
    },
    MissingCounter {
        entry: usize,
        field: &'static str,
    },
    NotATable {
        entry: usize,
    },
    /// A `roster_data` value that is neither a list nor an integer-keyed
    /// table. `list` counts `roster_data` keys from 1.
    NotAList {
        list: usize,
    },
}

impl fmt::Display for RosterViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterViolation::Sales {
                entry,
                sales10,
                sales30,
            } => write!(f, "Entry {entry}: sales10 ({sales10}) > sales30 ({sales30})"),
            RosterViolation::Purchases {
                entry,
                purchases10,
                purchases30,
            } => write!(
                f,
                "Entry {entry}: purchases10 ({purchases10}) > purchases30 ({purchases30})"
            ),
            RosterViolation::MissingCounter { entry, field } => {
                write!(f, "Entry {entry}: missing or non-integer {field}")
            }
            RosterViolation::NotATable { entry } => write!(f, "Entry {entry}: not a table"),
            RosterViolation::NotAList { list } => {
                write!(f, "roster_data #{list}: not a list of entries")
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RosterReport {
    pub entries: usize,
    pub violations: Vec<RosterViolation>,
}

impl RosterReport {
    pub fn is_consistent(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for RosterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validated {} roster entries", self.entries)?;
        if self.violations.is_empty() {
            return writeln!(f, "✓ All entries are logically consistent!");
        }
        writeln!(
            f,
            "Found {} logical inconsistencies:",
            self.violations.len()
        )?;
        for violation in self.violations.iter().take(MAX_LISTED_VIOLATIONS) {
            writeln!(f, "  - {violation}")?;
        }
        if self.violations.len() > MAX_LISTED_VIOLATIONS {
            writeln!(
                f,
                "  ... and {} more",
                self.violations.len() - MAX_LISTED_VIOLATIONS
            )?;
        }
        Ok(())
    }
}

/// Check every `roster_data` entry in `root` for 10-day counters above
/// their 30-day counterparts.
pub fn validate_roster(root: &Value) -> RosterReport {
    let mut report = RosterReport::default();
    let mut lists = 0;
    root.walk(&mut |key, value| {
        if key.as_str() != Some(ROSTER_KEY) {
            return;
        }
        lists += 1;
        let Some(entries) = value.sequence_items() else {
            report
                .violations
                .push(RosterViolation::NotAList { list: lists });
            return;
        };
        for entry in entries {
            report.entries += 1;
            let index = report.entries;
            match entry.as_table() {
                Some(table) => check_entry(index, table, &mut report.violations),
                None => report
                    .violations
                    .push(RosterViolation::NotATable { entry: index }),
            }
        }
    });
    report
}

pub fn validate_roster_file(path: &Path) -> Result<RosterReport, ValidationError> {
    let document = read_document(path)?;
    let report = validate_roster(&document.value);
    debug!(
        path = %path.display(),
        entries = report.entries,
        violations = report.violations.len(),
        "roster validated"
    );
    Ok(report)
}

fn check_entry(entry: usize, table: &Table, violations: &mut Vec<RosterViolation>) {
    let mut counter = |field: &'static str| {
        let value = table.get_int(field);
        if value.is_none() {
            violations.push(RosterViolation::MissingCounter { entry, field });
        }
        value
    };
    let sales10 = counter("sales10");
    let sales30 = counter("sales30");
    let purchases10 = counter("purchases10");
    let purchases30 = counter("purchases30");

    if let (Some(sales10), Some(sales30)) = (sales10, sales30) {
        if sales10 > sales30 {
            violations.push(RosterViolation::Sales {
                entry,
                sales10,
                sales30,
            });
        }
    }
    if let (Some(purchases10), Some(purchases30)) = (purchases10, purchases30) {
        if purchases10 > purchases30 {
            violations.push(RosterViolation::Purchases {
                entry,
                purchases10,
                purchases30,
            });
        }
    }
}
