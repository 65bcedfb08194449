//! Per-identity daily request counter.
//!
//! Process-lifetime only: restarting resets every count, and separate
//! processes keep separate counters. Owned by `AppState` and shared via `Arc`.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Daily limit reached. Upgrade for more.")]
pub struct QuotaExceeded {
    pub identity: String,
    pub limit: u32,
    pub used: u32,
}

#[derive(Debug, Default)]
pub struct QuotaStore {
    counts: Mutex<HashMap<(String, NaiveDate), u32>>,
}

impl QuotaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Charges `count` requests to `identity` for today's local date.
    pub fn check_and_increment(
        &self,
        identity: &str,
        count: u32,
        limit: u32,
    ) -> Result<u32, QuotaExceeded> {
        self.check_and_increment_on(identity, Local::now().date_naive(), count, limit)
    }

    /// Charges `count` requests to `identity` on `day`.
    ///
    /// Fails without charging anything when the new total would exceed
    /// `limit`. Returns the new total on success.
    pub fn check_and_increment_on(
        &self,
        identity: &str,
        day: NaiveDate,
        count: u32,
        limit: u32,
    ) -> Result<u32, QuotaExceeded> {
        let mut counts = self
            .counts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let used = counts.entry((identity.to_string(), day)).or_insert(0);

        if used.saturating_add(count) > limit {
            return Err(QuotaExceeded {
                identity: identity.to_string(),
                limit,
                used: *used,
            });
        }

        *used += count;
        debug!("Quota for {identity} on {day}: {}/{limit}", *used);
        Ok(*used)
    }

    /// Requests already charged to `identity` on `day`.
    #[cfg(test)]
    pub fn used_on(&self, identity: &str, day: NaiveDate) -> u32 {
        let counts = self
            .counts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        counts
            .get(&(identity.to_string(), day))
            .copied()
            .unwrap_or(0)
    }
}
