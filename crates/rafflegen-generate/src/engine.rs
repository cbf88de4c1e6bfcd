use std::path::Path;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use rafflegen_core::{
    ACCOUNT_WIDE_KEY, DEFAULT_PROFILE, Key, SAVED_VARIABLES_NAME, Table, Value, render_document,
};

use crate::accounts::{Account, AccountBuilder, AccountKind};
use crate::errors::GenerationError;
use crate::identity::IdentityPool;
use crate::model::{GenerateOptions, GenerationReport, GenerationSummary};
use crate::output::{unique_output_path, write_bytes_atomic};

/// Accounts keyed by display name, in generation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedVariables {
    pub accounts: Vec<(String, Account)>,
}

impl SavedVariables {
    /// `{ Default = { [name] = { $AccountWide = account } } }`
    pub fn to_value(&self) -> Value {
        let profile: Table = self
            .accounts
            .iter()
            .map(|(name, account)| {
                let wrapper = Table::new().with(ACCOUNT_WIDE_KEY, account.to_value());
                (Key::from(name.as_str()), Value::Table(wrapper))
            })
            .collect();
        Value::Table(Table::new().with(DEFAULT_PROFILE, profile))
    }

    /// Full file contents, trailing newline included.
    pub fn render(&self) -> String {
        render_document(SAVED_VARIABLES_NAME, &self.to_value())
    }
}

/// Output of [`RaffleGenerator::generate`].
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub document: SavedVariables,
    pub summary: GenerationSummary,
}

/// Generates saved-variables fixtures.
///
/// Owns the RNG stream and the identity pool, so names and mail ids stay
/// unique across every call on the same instance.
#[derive(Debug)]
pub struct RaffleGenerator {
    options: GenerateOptions,
    seed: u64,
    now: i64,
    rng: ChaCha8Rng,
    identities: IdentityPool,
}

impl RaffleGenerator {
    pub fn new(options: GenerateOptions) -> Result<Self, GenerationError> {
        options.validate()?;
        let seed = options.seed.unwrap_or_else(|| rand::rng().random());
        let now = options
            .now
            .unwrap_or_else(|| chrono::Utc::now().timestamp());
        Ok(Self {
            options,
            seed,
            now,
            rng: ChaCha8Rng::seed_from_u64(seed),
            identities: IdentityPool::new(),
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Build every requested account, blank first and mixed last.
    pub fn generate(&mut self) -> GeneratedFile {
        let mut document = SavedVariables::default();
        let mut summary = GenerationSummary::default();
        let ticket_cost = self.options.ticket_cost;

        for kind in AccountKind::ALL {
            let count = self.options.counts.get(kind);
            for _ in 0..count {
                let name = self.identities.display_name(&mut self.rng, self.now);
                let account = AccountBuilder {
                    rng: &mut self.rng,
                    identities: &mut self.identities,
                    ticket_cost,
                    roster_entries: self.options.roster_entries,
                    mail_entries: self.options.mail_entries,
                    amount_policy: &self.options.amount_policy,
                    now: self.now,
                }
                .build(kind);

                summary.accounts.increment(kind);
                if let Some(roster) = &account.roster {
                    summary.roster_entries += roster.len() as u64;
                }
                if let Some(mail) = &account.mail {
                    summary.mail_entries += mail.len() as u64;
                    summary.invalid_amounts += mail
                        .iter()
                        .filter(|entry| !entry.is_whole_tickets(ticket_cost))
                        .count() as u64;
                }
                document.accounts.push((name, account));
            }
            debug!(kind = kind.label(), count, "accounts generated");
        }

        GeneratedFile { document, summary }
    }

    /// Generate, render and write to the first free path derived from `requested`.
    pub fn write_file(&mut self, requested: &Path) -> Result<GenerationReport, GenerationError> {
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let output = unique_output_path(requested);

        info!(
            run_id = %run_id,
            seed = self.seed,
            accounts = self.options.counts.total(),
            output = %output.display(),
            "generation started"
        );

        let generated = self.generate();
        let text = generated.document.render();
        write_bytes_atomic(&output, text.as_bytes())?;

        let report = GenerationReport {
            run_id,
            output,
            seed: self.seed,
            ticket_cost: self.options.ticket_cost,
            summary: generated.summary,
            bytes_written: text.len() as u64,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            run_id = %report.run_id,
            output = %report.output.display(),
            bytes_written = report.bytes_written,
            invalid_amounts = report.summary.invalid_amounts,
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok(report)
    }
}

impl GenerationReport {
    pub fn write_json(&self, path: &Path) -> Result<(), GenerationError> {
        let data = serde_json::to_vec_pretty(self)?;
        write_bytes_atomic(path, &data)
    }
}
