//! Upsert sink: keyed overwrite writes with bounded retry.
//!
//! The datastore is an injected collaborator behind the [`Datastore`] trait
//! so the pipeline is testable without a live endpoint. Retries repeat the
//! identical payload; idempotency comes from the key-based overwrite
//! contract, not from pipeline-side deduplication.

use std::time::Duration;

use log::{info, warn};
use thiserror::Error;

use crate::mappings;

#[derive(Debug, Error)]
pub enum SinkError {
    /// Worth retrying: timeouts, throttling, server-side failures.
    #[error("transient datastore failure: {0}")]
    Transient(String),
    /// Not worth retrying: the write itself was rejected.
    #[error("datastore rejected the write: {0}")]
    Terminal(String),
}

impl SinkError {
    pub fn is_transient(&self) -> bool {
        matches!(self, SinkError::Transient(_))
    }
}

/// A keyed batch-upsert destination. Each record's case number decides
/// which stored row it overwrites.
pub trait Datastore {
    fn upsert(&self, table: &str, records: &[serde_json::Value]) -> Result<(), SinkError>;
}

/// Bounded exponential backoff: the wait doubles from `min_backoff` per
/// attempt and never exceeds `max_backoff`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub min_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            min_backoff: Duration::from_secs(4),
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Wait before the attempt following `completed_attempts` failures.
    fn backoff(&self, completed_attempts: u32) -> Duration {
        let doubled = self
            .min_backoff
            .saturating_mul(2u32.saturating_pow(completed_attempts.saturating_sub(1)));
        doubled.min(self.max_backoff)
    }
}

/// Sends the full record set, retrying transient failures up to the policy
/// cap. The last error surfaces to the caller once attempts are exhausted.
pub fn upsert_with_retry(
    store: &dyn Datastore,
    table: &str,
    records: &[serde_json::Value],
    policy: &RetryPolicy,
) -> Result<(), SinkError> {
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match store.upsert(table, records) {
            Ok(()) => {
                info!(
                    "Upserted {} record(s) into '{table}' on attempt {attempt}",
                    records.len()
                );
                return Ok(());
            }
            Err(err) if err.is_transient() && attempt < policy.max_attempts => {
                let wait = policy.backoff(attempt);
                warn!(
                    "Upsert attempt {attempt}/{} failed ({err}); retrying in {:.1}s",
                    policy.max_attempts,
                    wait.as_secs_f64()
                );
                std::thread::sleep(wait);
            }
            Err(err) => return Err(err),
        }
    }
}

/// PostgREST-style HTTP datastore client.
///
/// Upserts POST the record batch with `on_conflict` pinned to the case
/// number and merge-duplicates preference, so repeating the same payload
/// leaves each key at the values from this run.
pub struct PostgrestClient {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
}

impl PostgrestClient {
    pub fn new(base_url: &str, api_key: String) -> Self {
        PostgrestClient {
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(60))
                .build(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

impl Datastore for PostgrestClient {
    fn upsert(&self, table: &str, records: &[serde_json::Value]) -> Result<(), SinkError> {
        let url = format!(
            "{}/rest/v1/{table}?on_conflict={}",
            self.base_url,
            mappings::CASE_NUMBER_COLUMN
        );
        let response = self
            .agent
            .post(&url)
            .set("apikey", &self.api_key)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("Prefer", "resolution=merge-duplicates,return=minimal")
            .send_json(records);

        match response {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                let detail = format!("HTTP {code}: {}", body.trim());
                if code == 408 || code == 429 || code >= 500 {
                    Err(SinkError::Transient(detail))
                } else {
                    Err(SinkError::Terminal(detail))
                }
            }
            Err(ureq::Error::Transport(transport)) => {
                Err(SinkError::Transient(transport.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records every payload it sees and fails the first `failures` calls.
    struct FlakyStore {
        failures: u32,
        transient: bool,
        calls: RefCell<Vec<Vec<serde_json::Value>>>,
    }

    impl FlakyStore {
        fn new(failures: u32, transient: bool) -> Self {
            FlakyStore {
                failures,
                transient,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Datastore for FlakyStore {
        fn upsert(&self, _table: &str, records: &[serde_json::Value]) -> Result<(), SinkError> {
            let mut calls = self.calls.borrow_mut();
            calls.push(records.to_vec());
            if calls.len() as u32 <= self.failures {
                if self.transient {
                    Err(SinkError::Transient("simulated outage".into()))
                } else {
                    Err(SinkError::Terminal("simulated rejection".into()))
                }
            } else {
                Ok(())
            }
        }
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            min_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(2),
        }
    }

    #[test]
    fn two_transient_failures_then_success_takes_three_identical_attempts() {
        let store = FlakyStore::new(2, true);
        let records = vec![serde_json::json!({"CASE_NUMBER": "I-1", "TOTAL_WORKERS": 2})];

        upsert_with_retry(&store, "lca_filings", &records, &fast_policy(3)).unwrap();

        let calls = store.calls.borrow();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|payload| payload == &records));
    }

    #[test]
    fn exhausted_retries_surface_the_last_error() {
        let store = FlakyStore::new(5, true);
        let records = vec![serde_json::json!({"CASE_NUMBER": "I-1"})];

        let err = upsert_with_retry(&store, "lca_filings", &records, &fast_policy(3)).unwrap_err();
        assert!(err.is_transient());
        assert_eq!(store.calls.borrow().len(), 3);
    }

    #[test]
    fn terminal_failures_are_not_retried() {
        let store = FlakyStore::new(1, false);
        let records = vec![serde_json::json!({"CASE_NUMBER": "I-1"})];

        let err = upsert_with_retry(&store, "lca_filings", &records, &fast_policy(3)).unwrap_err();
        assert!(!err.is_transient());
        assert_eq!(store.calls.borrow().len(), 1);
    }

    #[test]
    fn backoff_doubles_from_min_and_clamps_at_max() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_secs(4));
        assert_eq!(policy.backoff(2), Duration::from_secs(8));
        assert_eq!(policy.backoff(3), Duration::from_secs(10));
        assert_eq!(policy.backoff(10), Duration::from_secs(10));
    }
}
