//! Account records and the builders that fill them with random data.

use rand::Rng;
use serde::{Deserialize, Serialize};

use rafflegen_core::{Table, Value};

use crate::identity::{IdentityPool, pick};
use crate::words::{MAIL_BODY_TEMPLATES, MAIL_SUBJECT_TEMPLATES, MAIL_SUBJECTS, RANKS};

/// Saved-variables schema version written on every account.
pub const ACCOUNT_VERSION: i64 = 1;

/// Upper bound of 30-day sales, in gold.
pub const MAX_SALES_30: i64 = 5_000_000;

/// Upper bound of 30-day purchases, in gold.
pub const MAX_PURCHASES_30: i64 = 100_000;

/// Ticket multipliers are drawn from `1..=MAX_TICKET_MULTIPLIER`.
pub const MAX_TICKET_MULTIPLIER: i64 = 1000;

/// Earliest account timestamp.
pub const TIMESTAMP_FLOOR: i64 = 1_600_000_000;

/// Chance a mail-carrying account stores a receipt template.
pub const TEMPLATE_PROBABILITY: f64 = 0.7;

/// Shape of a generated account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Blank,
    Roster,
    Mail,
    Mixed,
}

impl AccountKind {
    /// Generation order within a file.
    pub const ALL: [AccountKind; 4] = [
        AccountKind::Blank,
        AccountKind::Roster,
        AccountKind::Mail,
        AccountKind::Mixed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AccountKind::Blank => "blank",
            AccountKind::Roster => "roster",
            AccountKind::Mail => "mail",
            AccountKind::Mixed => "mixed",
        }
    }

    pub fn has_roster(self) -> bool {
        matches!(self, AccountKind::Roster | AccountKind::Mixed)
    }

    pub fn has_mail(self) -> bool {
        matches!(self, AccountKind::Mail | AccountKind::Mixed)
    }
}

/// How mail amounts relate to the ticket cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountPolicy {
    /// Probability that an amount is an exact multiple of the ticket cost.
    pub valid_ratio: f64,
    /// Largest remainder added to an invalid amount. Always capped at
    /// `ticket_cost - 1`.
    pub max_offset: Option<i64>,
}

impl Default for AmountPolicy {
    fn default() -> Self {
        Self {
            valid_ratio: 0.9,
            max_offset: None,
        }
    }
}

impl AmountPolicy {
    /// Draw an amount for one mail entry.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, ticket_cost: i64) -> i64 {
        let amount = rng.random_range(1..=MAX_TICKET_MULTIPLIER) * ticket_cost;
        let max_offset = self
            .max_offset
            .map_or(ticket_cost - 1, |limit| limit.min(ticket_cost - 1));
        if max_offset < 1 || rng.random_bool(self.valid_ratio) {
            amount
        } else {
            amount + rng.random_range(1..=max_offset)
        }
    }
}

/// Guild roster summary for one member.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub account: String,
    pub joined: i64,
    pub rank: String,
    pub sales10: i64,
    pub sales30: i64,
    pub purchases10: i64,
    pub purchases30: i64,
}

impl RosterEntry {
    pub fn to_value(&self) -> Value {
        Value::Table(
            Table::new()
                .with("account", self.account.as_str())
                .with("joined", self.joined)
                .with("sales10", self.sales10)
                .with("purchases30", self.purchases30)
                .with("sales30", self.sales30)
                .with("rank", self.rank.as_str())
                .with("purchases10", self.purchases10),
        )
    }
}

/// Raffle purchase mail received from a player.
#[derive(Debug, Clone, PartialEq)]
pub struct MailEntry {
    pub subject: String,
    pub id: u64,
    pub amount: i64,
    pub user: String,
}

impl MailEntry {
    /// Mail ids are stored as strings, like the game stores id64 values.
    pub fn to_value(&self) -> Value {
        Value::Table(
            Table::new()
                .with("subject", self.subject.as_str())
                .with("id", self.id.to_string())
                .with("amount", self.amount)
                .with("user", self.user.as_str()),
        )
    }

    pub fn is_whole_tickets(&self, ticket_cost: i64) -> bool {
        self.amount % ticket_cost == 0
    }
}

/// Receipt text configured on an account, placeholders left in.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptTemplate {
    pub body: String,
    pub subject: String,
}

/// Account-wide saved state for one display name.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub kind: AccountKind,
    pub version: i64,
    pub ticket_cost: i64,
    pub roster: Option<Vec<RosterEntry>>,
    pub mail: Option<Vec<MailEntry>>,
    pub timestamp: Option<i64>,
    pub template: Option<ReceiptTemplate>,
}

impl Account {
    /// Render the `$AccountWide` table in the addon's field order.
    pub fn to_value(&self) -> Value {
        let mut table = Table::new()
            .with("version", self.version)
            .with("ticket_cost", self.ticket_cost);

        // Mail accounts keep the timestamp right after their mail list.
        let timestamp_follows_mail = self.kind.has_mail();
        if let Some(mail) = &self.mail {
            table.insert("mail_data", sequence(mail, MailEntry::to_value));
        }
        if let (true, Some(timestamp)) = (timestamp_follows_mail, self.timestamp) {
            table.insert("timestamp", timestamp);
        }
        if let Some(roster) = &self.roster {
            table.insert("roster_data", sequence(roster, RosterEntry::to_value));
        }
        if let (false, Some(timestamp)) = (timestamp_follows_mail, self.timestamp) {
            table.insert("timestamp", timestamp);
        }
        if let Some(template) = &self.template {
            table.insert("body", template.body.as_str());
            table.insert("subject", template.subject.as_str());
        }

        Value::Table(table)
    }
}

fn sequence<T>(items: &[T], render: impl Fn(&T) -> Value) -> Value {
    Value::Array(items.iter().map(render).collect())
}

/// Fills accounts for one generation run.
pub struct AccountBuilder<'a, R: Rng + ?Sized> {
    pub rng: &'a mut R,
    pub identities: &'a mut IdentityPool,
    pub ticket_cost: i64,
    pub roster_entries: u32,
    pub mail_entries: u32,
    pub amount_policy: &'a AmountPolicy,
    pub now: i64,
}

impl<R: Rng + ?Sized> AccountBuilder<'_, R> {
    pub fn build(&mut self, kind: AccountKind) -> Account {
        match kind {
            AccountKind::Blank => self.blank(),
            AccountKind::Roster => self.roster_only(),
            AccountKind::Mail => self.mail_only(),
            AccountKind::Mixed => self.mixed(),
        }
    }

    pub fn blank(&mut self) -> Account {
        Account {
            kind: AccountKind::Blank,
            version: ACCOUNT_VERSION,
            ticket_cost: self.ticket_cost,
            roster: None,
            mail: None,
            timestamp: None,
            template: None,
        }
    }

    pub fn roster_only(&mut self) -> Account {
        let roster = self.roster_list();
        let timestamp = self.timestamp();
        Account {
            kind: AccountKind::Roster,
            roster: Some(roster),
            timestamp: Some(timestamp),
            ..self.blank()
        }
    }

    pub fn mail_only(&mut self) -> Account {
        let mail = self.mail_list();
        let timestamp = self.timestamp();
        let template = self.template();
        Account {
            kind: AccountKind::Mail,
            mail: Some(mail),
            timestamp: Some(timestamp),
            template,
            ..self.blank()
        }
    }

    pub fn mixed(&mut self) -> Account {
        let mail = self.mail_list();
        let timestamp = self.timestamp();
        let roster = self.roster_list();
        let template = self.template();
        Account {
            kind: AccountKind::Mixed,
            roster: Some(roster),
            mail: Some(mail),
            timestamp: Some(timestamp),
            template,
            ..self.blank()
        }
    }

    /// 30-day counters first, then each 10-day counter within `[0, 30-day]`.
    pub fn roster_entry(&mut self) -> RosterEntry {
        let sales30 = self.rng.random_range(0..=MAX_SALES_30);
        let purchases30 = self.rng.random_range(0..=MAX_PURCHASES_30);
        let sales10 = self.rng.random_range(0..=sales30);
        let purchases10 = self.rng.random_range(0..=purchases30);

        RosterEntry {
            account: self.identities.display_name(self.rng, self.now),
            joined: self.rng.random_range(0..=self.now.max(0)),
            rank: pick(self.rng, RANKS).to_string(),
            sales10,
            sales30,
            purchases10,
            purchases30,
        }
    }

    pub fn mail_entry(&mut self) -> MailEntry {
        MailEntry {
            subject: pick(self.rng, MAIL_SUBJECTS).to_string(),
            id: self.identities.mail_id(self.rng),
            amount: self.amount_policy.sample(self.rng, self.ticket_cost),
            user: self.identities.display_name(self.rng, self.now),
        }
    }

    fn roster_list(&mut self) -> Vec<RosterEntry> {
        (0..self.roster_entries).map(|_| self.roster_entry()).collect()
    }

    fn mail_list(&mut self) -> Vec<MailEntry> {
        (0..self.mail_entries).map(|_| self.mail_entry()).collect()
    }

    fn timestamp(&mut self) -> i64 {
        self.rng
            .random_range(TIMESTAMP_FLOOR..=self.now.max(TIMESTAMP_FLOOR))
    }

    fn template(&mut self) -> Option<ReceiptTemplate> {
        if !self.rng.random_bool(TEMPLATE_PROBABILITY) {
            return None;
        }
        Some(ReceiptTemplate {
            body: pick(self.rng, MAIL_BODY_TEMPLATES).to_string(),
            subject: pick(self.rng, MAIL_SUBJECT_TEMPLATES).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const NOW: i64 = 1_750_000_000;

    fn with_builder<T>(
        ticket_cost: i64,
        policy: &AmountPolicy,
        run: impl FnOnce(&mut AccountBuilder<'_, ChaCha8Rng>) -> T,
    ) -> T {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut identities = IdentityPool::new();
        let mut builder = AccountBuilder {
            rng: &mut rng,
            identities: &mut identities,
            ticket_cost,
            roster_entries: 3,
            mail_entries: 4,
            amount_policy: policy,
            now: NOW,
        };
        run(&mut builder)
    }

    fn keys(value: &Value) -> Vec<String> {
        value
            .as_table()
            .map(|table| table.keys().map(ToString::to_string).collect())
            .unwrap_or_default()
    }

    #[test]
    fn roster_counters_respect_thirty_day_totals() {
        let policy = AmountPolicy::default();
        with_builder(500, &policy, |builder| {
            for _ in 0..2000 {
                let entry = builder.roster_entry();
                assert!(entry.sales10 <= entry.sales30);
                assert!(entry.purchases10 <= entry.purchases30);
                assert!((0..=MAX_SALES_30).contains(&entry.sales30));
                assert!((0..=MAX_PURCHASES_30).contains(&entry.purchases30));
                assert!((0..=NOW).contains(&entry.joined));
                assert!(RANKS.contains(&entry.rank.as_str()));
            }
        });
    }

    #[test]
    fn valid_ratio_is_close_to_policy() {
        let policy = AmountPolicy::default();
        let valid = with_builder(500, &policy, |builder| {
            (0..1000)
                .map(|_| builder.mail_entry())
                .filter(|entry| entry.is_whole_tickets(500))
                .count()
        });
        let fraction = valid as f64 / 1000.0;
        assert!((0.85..=0.95).contains(&fraction), "valid fraction {fraction}");
    }

    #[test]
    fn invalid_amounts_keep_positive_remainder_below_offset_cap() {
        let policy = AmountPolicy {
            valid_ratio: 0.0,
            max_offset: Some(25),
        };
        with_builder(500, &policy, |builder| {
            for _ in 0..500 {
                let entry = builder.mail_entry();
                let remainder = entry.amount % 500;
                assert!((1..=25).contains(&remainder), "remainder {remainder}");
                assert!(entry.amount > 500);
            }
        });
    }

    #[test]
    fn unit_ticket_cost_always_divides() {
        let policy = AmountPolicy {
            valid_ratio: 0.0,
            max_offset: None,
        };
        with_builder(1, &policy, |builder| {
            for _ in 0..100 {
                let entry = builder.mail_entry();
                assert!((1..=MAX_TICKET_MULTIPLIER).contains(&entry.amount));
            }
        });
    }

    #[test]
    fn account_shapes_follow_field_order() {
        let policy = AmountPolicy::default();
        with_builder(500, &policy, |builder| {
            assert_eq!(keys(&builder.blank().to_value()), ["version", "ticket_cost"]);
            assert_eq!(
                keys(&builder.roster_only().to_value()),
                ["version", "ticket_cost", "roster_data", "timestamp"]
            );

            let mail = builder.mail_only();
            let mut expected = vec!["version", "ticket_cost", "mail_data", "timestamp"];
            if mail.template.is_some() {
                expected.extend(["body", "subject"]);
            }
            assert_eq!(keys(&mail.to_value()), expected);

            let mixed = builder.mixed();
            let mut expected =
                vec!["version", "ticket_cost", "mail_data", "timestamp", "roster_data"];
            if mixed.template.is_some() {
                expected.extend(["body", "subject"]);
            }
            assert_eq!(keys(&mixed.to_value()), expected);
        });
    }

    #[test]
    fn entry_counts_follow_builder_settings() {
        let policy = AmountPolicy::default();
        with_builder(500, &policy, |builder| {
            let account = builder.mixed();
            assert_eq!(account.roster.as_ref().map(Vec::len), Some(3));
            assert_eq!(account.mail.as_ref().map(Vec::len), Some(4));
            let timestamp = account.timestamp.unwrap_or_default();
            assert!((TIMESTAMP_FLOOR..=NOW).contains(&timestamp));
        });
    }

    #[test]
    fn roster_entry_renders_in_addon_field_order() {
        let entry = RosterEntry {
            account: "@KeenBard".to_string(),
            joined: 10,
            rank: "Officer".to_string(),
            sales10: 1,
            sales30: 2,
            purchases10: 3,
            purchases30: 4,
        };
        assert_eq!(
            keys(&entry.to_value()),
            ["account", "joined", "sales10", "purchases30", "sales30", "rank", "purchases10"]
        );
    }

    #[test]
    fn mail_id_is_written_as_string() {
        let entry = MailEntry {
            subject: "tix".to_string(),
            id: 2_800_000_000,
            amount: 1000,
            user: "@WildNomad".to_string(),
        };
        let value = entry.to_value();
        let table = value.as_table().expect("table");
        assert_eq!(table.get("id"), Some(&Value::Str("2800000000".to_string())));
    }
}
