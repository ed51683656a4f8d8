//! # Record Freshness
//!
//! Retention is a passive policy: nothing here mutates or evicts records.
//! Republishing logic elsewhere reads [`MAX_RECORD_AGE`] to pick its cadence,
//! and callers that choose to enforce retention use [`RecordFreshnessPolicy`].

use std::time::Duration;

use shared_types::Record;

use crate::domain::errors::ValidationError;

/// How long a node keeps a record absent independent republishing.
pub const MAX_RECORD_AGE: Duration = Duration::from_secs(36 * 60 * 60);

/// Age check against a configurable window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordFreshnessPolicy {
    max_age: Duration,
}

impl Default for RecordFreshnessPolicy {
    fn default() -> Self {
        Self::new(MAX_RECORD_AGE)
    }
}

impl RecordFreshnessPolicy {
    /// Policy with the given retention window.
    pub fn new(max_age: Duration) -> Self {
        Self { max_age }
    }

    /// The retention window.
    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Whether a record received at `received_at` is still retained at `now`
    /// (both unix seconds). Receive times in the future count as fresh.
    pub fn is_fresh(&self, received_at: u64, now: u64) -> bool {
        now.saturating_sub(received_at) <= self.max_age.as_secs()
    }

    /// Check a record. Records without a receive time are not judged.
    pub fn check(&self, record: &Record, now: u64) -> Result<(), ValidationError> {
        match record.time_received {
            Some(received_at) if !self.is_fresh(received_at, now) => {
                Err(ValidationError::Expired {
                    age_secs: now.saturating_sub(received_at),
                    max_age_secs: self.max_age.as_secs(),
                })
            }
            _ => Ok(()),
        }
    }
}
