//! Poll-and-assert engine
//!
//! Evaluates an actual-value producer against a parsed directive, either
//! once or repeatedly until the comparison passes or a deadline elapses.
//! Hard failures are returned as errors; soft failures are recorded into the
//! scenario's [`SoftFailures`] sink and surfaced at flush time.

use crate::condition::{ConditionKind, ElementState};
use crate::directive::Directive;
use crate::error::{Error, Result};
use crate::soft::{SoftFailure, SoftFailures};
use crate::validation::{text_of, ComparisonKind};
use serde_json::Value;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default assertion timeout, matching the automation layer's convention.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default polling interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

/// Retry budget for a polled assertion.
///
/// Intervals are consumed in order between attempts, the last one repeating
/// until the timeout elapses.
#[derive(Debug, Clone)]
pub struct PollOptions {
    pub timeout: Duration,
    pub intervals: Vec<Duration>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            intervals: vec![DEFAULT_INTERVAL],
        }
    }
}

impl PollOptions {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    fn interval(&self, attempt: usize) -> Duration {
        self.intervals
            .get(attempt)
            .or_else(|| self.intervals.last())
            .copied()
            .unwrap_or(DEFAULT_INTERVAL)
    }
}

/// One evaluated attempt: the negation-adjusted outcome plus the rendered
/// actual value for diagnostics.
struct Attempt {
    pass: bool,
    actual: String,
}

/// A failed comparison, before soft/hard routing.
struct AssertionFailure {
    phrase: String,
    expected: String,
    actual: String,
    timeout_ms: Option<u64>,
}

impl AssertionFailure {
    fn into_error(self) -> Error {
        match self.timeout_ms {
            Some(timeout_ms) => Error::PollTimeout {
                phrase: self.phrase,
                timeout_ms,
                expected: self.expected,
                actual: self.actual,
            },
            None => Error::Assertion {
                phrase: self.phrase,
                expected: self.expected,
                actual: self.actual,
            },
        }
    }

    fn record_into(self, soft: &SoftFailures) {
        let expected = self.expected.clone();
        let actual = self.actual.clone();
        let message = self.into_error().to_string();
        soft.record(SoftFailure {
            message,
            expected,
            actual,
        });
    }
}

/// Assert that the produced value satisfies `directive` against `expected`.
///
/// Without `poll` the producer is evaluated exactly once. With `poll` it is
/// re-evaluated at the configured intervals until the comparison (subject to
/// negation) passes or the timeout elapses. Producer, lookup, grammar, and
/// coercion errors are never retried; only a failed comparison is.
pub async fn expect_value<F, Fut>(
    actual: F,
    expected: &Value,
    directive: &Directive<ComparisonKind>,
    poll: Option<&PollOptions>,
    soft: &SoftFailures,
) -> Result<()>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    let outcome = run(
        || async {
            let value = actual().await?;
            let pass = directive.kind.compare(&value, expected)?;
            Ok(Attempt {
                pass: pass != directive.negate,
                actual: text_of(&value),
            })
        },
        &directive.phrase,
        &text_of(expected),
        poll,
    )
    .await?;

    settle(outcome, directive.soft, soft)
}

/// Assert that `element` satisfies the condition directive, with the same
/// polling and soft-failure semantics as [`expect_value`].
pub async fn expect_condition<E>(
    element: &E,
    directive: &Directive<ConditionKind>,
    poll: Option<&PollOptions>,
    soft: &SoftFailures,
) -> Result<()>
where
    E: ElementState + ?Sized,
{
    let expected = directive.kind.to_string();
    let outcome = run(
        || async {
            let state = directive.kind.check(element).await?;
            Ok(Attempt {
                pass: state != directive.negate,
                actual: format!("{}: {}", directive.kind, state),
            })
        },
        &directive.phrase,
        &expected,
        poll,
    )
    .await?;

    settle(outcome, directive.soft, soft)
}

async fn run<F, Fut>(
    attempt: F,
    phrase: &str,
    expected: &str,
    poll: Option<&PollOptions>,
) -> Result<Option<AssertionFailure>>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Attempt>>,
{
    let failure = |actual: String, timeout_ms: Option<u64>| AssertionFailure {
        phrase: phrase.to_string(),
        expected: expected.to_string(),
        actual,
        timeout_ms,
    };

    let Some(poll) = poll else {
        let result = attempt().await?;
        return Ok((!result.pass).then(|| failure(result.actual, None)));
    };

    let start = Instant::now();
    let mut attempts = 0usize;
    loop {
        let result = attempt().await?;
        attempts += 1;
        if result.pass {
            debug!("'{phrase}' passed after {attempts} attempt(s)");
            return Ok(None);
        }
        if start.elapsed() >= poll.timeout {
            debug!("'{phrase}' timed out after {attempts} attempt(s)");
            return Ok(Some(failure(
                result.actual,
                Some(poll.timeout.as_millis() as u64),
            )));
        }
        tokio::time::sleep(poll.interval(attempts - 1)).await;
    }
}

fn settle(
    outcome: Option<AssertionFailure>,
    soft_mode: bool,
    soft: &SoftFailures,
) -> Result<()> {
    match outcome {
        None => Ok(()),
        Some(failure) if soft_mode => {
            failure.record_into(soft);
            Ok(())
        }
        Some(failure) => Err(failure.into_error()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::parse_validation;
    use serde_json::json;

    fn hard(phrase: &str) -> Directive<ComparisonKind> {
        parse_validation(phrase).unwrap()
    }

    #[tokio::test]
    async fn assert_once_passes_and_fails_immediately() {
        let soft = SoftFailures::new();
        let directive = hard("to equal");

        expect_value(|| async { Ok(json!("a")) }, &json!("a"), &directive, None, &soft)
            .await
            .unwrap();

        let err = expect_value(|| async { Ok(json!("a")) }, &json!("b"), &directive, None, &soft)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Assertion { .. }));
    }

    #[tokio::test]
    async fn negation_inverts_the_outcome() {
        let soft = SoftFailures::new();
        let directive = hard("not to equal");

        expect_value(|| async { Ok(json!("a")) }, &json!("b"), &directive, None, &soft)
            .await
            .unwrap();

        let err = expect_value(|| async { Ok(json!("a")) }, &json!("a"), &directive, None, &soft)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Assertion { .. }));
    }

    #[tokio::test]
    async fn producer_errors_are_not_retried() {
        let soft = SoftFailures::new();
        let directive = hard("to equal");
        let poll = PollOptions::new(Duration::from_secs(5));

        let calls = std::sync::atomic::AtomicU64::new(0);
        let err = expect_value(
            || async {
                calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Err(Error::Driver("gone".to_string()))
            },
            &json!("a"),
            &directive,
            Some(&poll),
            &soft,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Driver(_)));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn soft_failure_is_recorded_not_raised() {
        let soft = SoftFailures::new();
        let directive = hard("to softly equal");

        expect_value(|| async { Ok(json!("a")) }, &json!("b"), &directive, None, &soft)
            .await
            .unwrap();
        expect_value(|| async { Ok(json!("x")) }, &json!("y"), &directive, None, &soft)
            .await
            .unwrap();

        assert_eq!(soft.len(), 2);
        let err = soft.flush().unwrap_err();
        assert!(matches!(err, Error::SoftFailures { failed: 2, .. }));
    }
}
