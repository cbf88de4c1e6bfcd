use std::fmt;
use std::path::Path;

use rafflegen_core::Value;
use serde::Serialize;
use tracing::debug;

use crate::errors::ValidationError;
use crate::read_document;

/// Invalid amounts shown in the sample list.
pub const SAMPLE_SIZE: usize = 5;

const TICKET_COST_KEY: &str = "ticket_cost";
const AMOUNT_KEY: &str = "amount";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvalidAmount {
    pub amount: i64,
    pub remainder: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmountReport {
    pub ticket_cost: i64,
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    /// First [`SAMPLE_SIZE`] invalid amounts in document order.
    pub samples: Vec<InvalidAmount>,
}

impl AmountReport {
    pub fn valid_percent(&self) -> f64 {
        percent(self.valid, self.total)
    }

    pub fn invalid_percent(&self) -> f64 {
        percent(self.invalid, self.total)
    }
}

/// Result of an amount check. Short circuits are outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AmountOutcome {
    Checked(AmountReport),
    TicketCostNotFound,
    NonPositiveTicketCost { ticket_cost: i64 },
    NoAmounts { ticket_cost: i64 },
}

impl AmountOutcome {
    /// Whether the check ran to a report. Invalid amounts do not count
    /// against it; every short circuit does.
    pub fn completed(&self) -> bool {
        matches!(self, AmountOutcome::Checked(_))
    }
}

impl fmt::Display for AmountOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountOutcome::TicketCostNotFound => writeln!(f, "Could not find ticket_cost in file"),
            AmountOutcome::NonPositiveTicketCost { ticket_cost } => {
                writeln!(f, "Ticket cost: {ticket_cost}")?;
                writeln!(f, "ticket_cost must be positive")
            }
            AmountOutcome::NoAmounts { ticket_cost } => {
                writeln!(f, "Ticket cost: {ticket_cost}")?;
                writeln!(f, "No mail amounts found")
            }
            AmountOutcome::Checked(report) => {
                writeln!(f, "Ticket cost: {}", report.ticket_cost)?;
                writeln!(f)?;
                writeln!(f, "Total mail entries: {}", report.total)?;
                writeln!(
                    f,
                    "Valid amounts (divisible by {}): {} ({:.1}%)",
                    report.ticket_cost,
                    report.valid,
                    report.valid_percent()
                )?;
                writeln!(
                    f,
                    "Invalid amounts: {} ({:.1}%)",
                    report.invalid,
                    report.invalid_percent()
                )?;
                if !report.samples.is_empty() {
                    writeln!(f)?;
                    writeln!(f, "Sample invalid amounts:")?;
                    for sample in &report.samples {
                        writeln!(f, "  {} (remainder: {})", sample.amount, sample.remainder)?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Classify every `amount` in `root` by divisibility by the first
/// `ticket_cost` found.
pub fn check_amounts(root: &Value) -> AmountOutcome {
    let mut ticket_cost = None;
    let mut amounts = Vec::new();
    root.walk(&mut |key, value| match key.as_str() {
        Some(TICKET_COST_KEY) if ticket_cost.is_none() => ticket_cost = value.as_int(),
        Some(AMOUNT_KEY) => amounts.extend(value.as_int()),
        _ => {}
    });

    let Some(ticket_cost) = ticket_cost else {
        return AmountOutcome::TicketCostNotFound;
    };
    if ticket_cost <= 0 {
        return AmountOutcome::NonPositiveTicketCost { ticket_cost };
    }
    if amounts.is_empty() {
        return AmountOutcome::NoAmounts { ticket_cost };
    }

    let mut report = AmountReport {
        ticket_cost,
        total: amounts.len(),
        valid: 0,
        invalid: 0,
        samples: Vec::new(),
    };
    for amount in amounts {
        let remainder = amount.rem_euclid(ticket_cost);
        if remainder == 0 {
            report.valid += 1;
            continue;
        }
        report.invalid += 1;
        if report.samples.len() < SAMPLE_SIZE {
            report.samples.push(InvalidAmount { amount, remainder });
        }
    }
    AmountOutcome::Checked(report)
}

pub fn check_amounts_file(path: &Path) -> Result<AmountOutcome, ValidationError> {
    let document = read_document(path)?;
    let outcome = check_amounts(&document.value);
    debug!(path = %path.display(), completed = outcome.completed(), "amounts checked");
    Ok(outcome)
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}
