use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::accounts::{AccountKind, AmountPolicy, MAX_TICKET_MULTIPLIER};
use crate::errors::GenerationError;

/// Number of accounts to generate per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCounts {
    pub blank: u32,
    pub roster: u32,
    pub mail: u32,
    pub mixed: u32,
}

impl AccountCounts {
    pub fn get(&self, kind: AccountKind) -> u32 {
        match kind {
            AccountKind::Blank => self.blank,
            AccountKind::Roster => self.roster,
            AccountKind::Mail => self.mail,
            AccountKind::Mixed => self.mixed,
        }
    }

    pub fn increment(&mut self, kind: AccountKind) {
        let slot = match kind {
            AccountKind::Blank => &mut self.blank,
            AccountKind::Roster => &mut self.roster,
            AccountKind::Mail => &mut self.mail,
            AccountKind::Mixed => &mut self.mixed,
        };
        *slot = slot.saturating_add(1);
    }

    pub fn total(&self) -> u64 {
        AccountKind::ALL
            .iter()
            .map(|kind| u64::from(self.get(*kind)))
            .sum()
    }
}

/// Options for one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    pub counts: AccountCounts,
    /// Price of one raffle ticket in gold.
    pub ticket_cost: i64,
    /// Roster entries on each roster and mixed account.
    pub roster_entries: u32,
    /// Mail entries on each mail and mixed account.
    pub mail_entries: u32,
    pub amount_policy: AmountPolicy,
    /// Seed for the ChaCha stream; drawn from the OS when absent.
    pub seed: Option<u64>,
    /// Unix time used as the upper bound of generated timestamps.
    pub now: Option<i64>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            counts: AccountCounts::default(),
            ticket_cost: 1000,
            roster_entries: 10,
            mail_entries: 10,
            amount_policy: AmountPolicy::default(),
            seed: None,
            now: None,
        }
    }
}

impl GenerateOptions {
    /// Largest ticket cost whose generated amounts still fit in an `i64`.
    pub const MAX_TICKET_COST: i64 = i64::MAX / (MAX_TICKET_MULTIPLIER + 1);

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.ticket_cost <= 0 {
            return Err(GenerationError::InvalidOptions(
                "ticket cost must be positive".to_string(),
            ));
        }
        if self.ticket_cost > Self::MAX_TICKET_COST {
            return Err(GenerationError::InvalidOptions(format!(
                "ticket cost must be at most {}",
                Self::MAX_TICKET_COST
            )));
        }
        if self.roster_entries == 0 {
            return Err(GenerationError::InvalidOptions(
                "roster entries per account must be positive".to_string(),
            ));
        }
        if self.mail_entries == 0 {
            return Err(GenerationError::InvalidOptions(
                "mail entries per account must be positive".to_string(),
            ));
        }
        if self.counts.total() == 0 {
            return Err(GenerationError::InvalidOptions(
                "at least one account must be specified".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.amount_policy.valid_ratio) {
            return Err(GenerationError::InvalidOptions(
                "valid ratio must be between 0 and 1".to_string(),
            ));
        }
        if matches!(self.amount_policy.max_offset, Some(offset) if offset <= 0) {
            return Err(GenerationError::InvalidOptions(
                "max offset must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// What a generation run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub accounts: AccountCounts,
    pub roster_entries: u64,
    pub mail_entries: u64,
    pub invalid_amounts: u64,
}

impl GenerationSummary {
    pub fn total_accounts(&self) -> u64 {
        self.accounts.total()
    }
}

/// Report for a generation run written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub output: PathBuf,
    pub seed: u64,
    pub ticket_cost: i64,
    pub summary: GenerationSummary,
    pub bytes_written: u64,
    pub duration_ms: u64,
}
