//! Unique display names and mail ids for one generation run.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use rand::Rng;
use tracing::warn;

use crate::words::{ADJECTIVES, NOUNS, capitalize};

/// Attempts at a fresh adjective/noun name before using the time fallback.
pub const NAME_ATTEMPTS: usize = 100;

/// Share of names that carry a numeric suffix.
pub const NUMBER_SUFFIX_PROBABILITY: f64 = 0.3;

/// Mail ids are ten-digit numbers in this range.
pub const MAIL_ID_RANGE: RangeInclusive<u64> = 2_700_000_000..=2_999_999_999;

/// Tracks identifiers already handed out by one generator.
///
/// Names and mail ids are separate pools. Dropping the pool forgets both,
/// so every generator instance starts clean.
#[derive(Debug, Default)]
pub struct IdentityPool {
    used_names: HashSet<String>,
    used_mail_ids: HashSet<u64>,
}

impl IdentityPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw an `@AdjectiveNoun[N]` name not yet issued by this pool.
    ///
    /// After [`NAME_ATTEMPTS`] collisions the name falls back to an
    /// adjective plus the last six digits of `now`. The fallback is recorded
    /// but not checked for collisions.
    pub fn display_name<R: Rng + ?Sized>(&mut self, rng: &mut R, now: i64) -> String {
        if let Some(name) = self.claim_name(|| compose_name(rng)) {
            return name;
        }

        let name = fallback_name(rng, now);
        warn!(name = %name, attempts = NAME_ATTEMPTS, "display name pool exhausted, using fallback");
        self.used_names.insert(name.clone());
        name
    }

    /// Draw a mail id not yet issued by this pool.
    pub fn mail_id<R: Rng + ?Sized>(&mut self, rng: &mut R) -> u64 {
        loop {
            let id = rng.random_range(MAIL_ID_RANGE);
            if self.used_mail_ids.insert(id) {
                return id;
            }
        }
    }

    pub fn names_issued(&self) -> usize {
        self.used_names.len()
    }

    pub fn mail_ids_issued(&self) -> usize {
        self.used_mail_ids.len()
    }

    fn claim_name(&mut self, mut candidate: impl FnMut() -> String) -> Option<String> {
        for _ in 0..NAME_ATTEMPTS {
            let name = candidate();
            if self.used_names.insert(name.clone()) {
                return Some(name);
            }
        }
        None
    }
}

fn compose_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let adjective = capitalize(pick(rng, ADJECTIVES));
    let noun = capitalize(pick(rng, NOUNS));
    if rng.random_bool(NUMBER_SUFFIX_PROBABILITY) {
        format!("@{adjective}{noun}{}", rng.random_range(1..=999))
    } else {
        format!("@{adjective}{noun}")
    }
}

fn fallback_name<R: Rng + ?Sized>(rng: &mut R, now: i64) -> String {
    format!(
        "@{}{:06}",
        capitalize(pick(rng, ADJECTIVES)),
        now.rem_euclid(1_000_000)
    )
}

pub(crate) fn pick<'a, R: Rng + ?Sized>(rng: &mut R, pool: &[&'a str]) -> &'a str {
    pool[rng.random_range(0..pool.len())]
}
