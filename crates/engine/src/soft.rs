//! Per-scenario soft-failure accumulation

use crate::error::{Error, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// A single recorded soft failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftFailure {
    pub message: String,
    pub expected: String,
    pub actual: String,
}

/// Accumulates soft assertion failures for one scenario.
///
/// Clones share the same sink, so every step of a scenario records into one
/// list. Each scenario owns its own instance; sharing one across
/// concurrently running scenarios mixes their reports.
#[derive(Debug, Clone, Default)]
pub struct SoftFailures {
    entries: Arc<Mutex<Vec<SoftFailure>>>,
}

impl SoftFailures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure without raising it.
    pub fn record(&self, failure: SoftFailure) {
        warn!("soft assertion failed: {}", failure.message);
        self.entries.lock().push(failure);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Drain the recorded failures, leaving the sink empty.
    pub fn take(&self) -> Vec<SoftFailure> {
        std::mem::take(&mut *self.entries.lock())
    }

    /// Surface every recorded failure as one aggregate error and clear the
    /// sink. Ok when nothing was recorded.
    pub fn flush(&self) -> Result<()> {
        let failures = self.take();
        if failures.is_empty() {
            return Ok(());
        }
        let report = failures
            .iter()
            .map(|failure| failure.message.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Err(Error::SoftFailures {
            failed: failures.len(),
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(message: &str) -> SoftFailure {
        SoftFailure {
            message: message.to_string(),
            expected: "expected".to_string(),
            actual: "actual".to_string(),
        }
    }

    #[test]
    fn flush_reports_every_recorded_failure_and_clears() {
        let soft = SoftFailures::new();
        soft.record(failure("first"));
        soft.record(failure("second"));

        let err = soft.flush().unwrap_err();
        match err {
            Error::SoftFailures { failed, report } => {
                assert_eq!(failed, 2);
                assert!(report.contains("first"));
                assert!(report.contains("second"));
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(soft.is_empty());
        assert!(soft.flush().is_ok());
    }

    #[test]
    fn clones_record_into_the_same_sink() {
        let soft = SoftFailures::new();
        soft.clone().record(failure("shared"));

        assert_eq!(soft.len(), 1);
    }
}
