//! Bounded, delay-spaced retries around a prober.
//!
//! Datagrams can be dropped silently, so one failed handshake is not proof
//! that a server is down. The policy re-probes up to a fixed number of times
//! and spaces attempts at least `delay` apart, measured from the start of
//! each attempt.

use crate::probe::{
    domain::{ProbeFailure, ProbeReport, ProbeTarget},
    ports::Prober,
};
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{Instant, sleep};
use tracing::debug;

const DEFAULT_ATTEMPTS: NonZeroU32 = match NonZeroU32::new(RetryPolicy::DEFAULT_MAX_ATTEMPTS) {
    Some(attempts) => attempts,
    None => NonZeroU32::MIN,
};

/// Error returned when every attempt of a retried probe failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryError {
    /// All attempts were used without an accepted reply.
    #[error("probe of {target} failed after {attempts} attempt(s)")]
    Exhausted {
        /// Probed target.
        target: ProbeTarget,
        /// Number of attempts made.
        attempts: u32,
        /// Failure of the final attempt.
        #[source]
        last: ProbeFailure,
    },
}

impl RetryError {
    /// Returns the failure of the final attempt.
    #[must_use]
    pub const fn last_failure(&self) -> &ProbeFailure {
        match self {
            Self::Exhausted { last, .. } => last,
        }
    }
}

/// Errors returned while building a retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RetryPolicyError {
    /// At least one attempt is required.
    #[error("retry policy requires at least one attempt")]
    ZeroAttempts,
    /// A zero timeout would fail every probe immediately.
    #[error("probe timeout must be greater than zero")]
    ZeroTimeout,
}

/// Outcome of a retried probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryReport {
    attempts_used: u32,
    last_report: ProbeReport,
    error: Option<RetryError>,
}

impl RetryReport {
    /// Returns whether one of the attempts classified the server as up.
    #[must_use]
    pub const fn is_up(&self) -> bool {
        self.error.is_none()
    }

    /// Returns the number of attempts made, including the successful one.
    #[must_use]
    pub const fn attempts_used(&self) -> u32 {
        self.attempts_used
    }

    /// Returns the report of the final attempt.
    #[must_use]
    pub const fn last_report(&self) -> &ProbeReport {
        &self.last_report
    }

    /// Returns the exhaustion error when no attempt succeeded.
    #[must_use]
    pub const fn error(&self) -> Option<&RetryError> {
        self.error.as_ref()
    }

    /// Returns the round-trip time of the successful attempt.
    #[must_use]
    pub fn rtt(&self) -> Option<Duration> {
        self.is_up().then(|| self.last_report.rtt())
    }
}

/// Retry settings for liveness probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: NonZeroU32,
    delay: Duration,
    timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_ATTEMPTS,
            delay: Self::DEFAULT_DELAY,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

impl RetryPolicy {
    /// Default per-phase network timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
    /// Default minimum spacing between attempt starts.
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);
    /// Default number of attempts.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    /// Creates a retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`RetryPolicyError`] when `max_attempts` or `timeout` is zero.
    pub fn new(
        max_attempts: u32,
        delay: Duration,
        timeout: Duration,
    ) -> Result<Self, RetryPolicyError> {
        let attempts = NonZeroU32::new(max_attempts).ok_or(RetryPolicyError::ZeroAttempts)?;
        if timeout.is_zero() {
            return Err(RetryPolicyError::ZeroTimeout);
        }
        Ok(Self {
            max_attempts: attempts,
            delay,
            timeout,
        })
    }

    /// Creates a policy that probes exactly once.
    #[must_use]
    pub const fn single_attempt(timeout: Duration) -> Self {
        Self {
            max_attempts: NonZeroU32::MIN,
            delay: Duration::ZERO,
            timeout,
        }
    }

    /// Returns the maximum number of attempts.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts.get()
    }

    /// Returns the minimum spacing between attempt starts.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns the per-attempt network timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probes `target` until it answers or the attempt budget is spent.
    ///
    /// Returns as soon as an attempt succeeds. After a failed attempt that is
    /// not the last, waits for whatever remains of `delay` since that
    /// attempt started.
    pub async fn check_with_retry<P>(&self, prober: &P, target: &ProbeTarget) -> RetryReport
    where
        P: Prober + ?Sized,
    {
        let max_attempts = self.max_attempts.get();
        let mut attempt: u32 = 1;

        loop {
            let started = Instant::now();
            let report = prober.probe(target, self.timeout).await;

            let Some(failure) = report.failure().cloned() else {
                return RetryReport {
                    attempts_used: attempt,
                    last_report: report,
                    error: None,
                };
            };

            if attempt >= max_attempts {
                return RetryReport {
                    attempts_used: attempt,
                    last_report: report,
                    error: Some(RetryError::Exhausted {
                        target: target.clone(),
                        attempts: attempt,
                        last: failure,
                    }),
                };
            }

            debug!(%target, attempt, max_attempts, error = %failure, "probe attempt failed");

            let remaining = self.delay.saturating_sub(started.elapsed());
            if !remaining.is_zero() {
                sleep(remaining).await;
            }
            attempt = attempt.saturating_add(1);
        }
    }
}
