//! Bounded retry policy for generation calls.

use std::time::Duration;

/// How often and how patiently a generation request is retried.
///
/// Two failure classes share one attempt budget: transport faults wait
/// `transient_delay`, responses without a JSON object wait `format_delay`.
/// Responses that look like JSON but fail to parse are only retried when
/// `retry_invalid_json` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one (minimum 1)
    pub max_attempts: u32,

    /// Base wait after a transport or service fault
    pub transient_delay: Duration,

    /// Base wait after a response with no JSON object
    pub format_delay: Duration,

    /// Multiplier applied per attempt (1.0 = fixed delay)
    pub backoff_factor: f64,

    /// Upper bound for any single wait
    pub max_delay: Duration,

    /// Retry responses whose JSON fails to parse
    pub retry_invalid_json: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            transient_delay: Duration::from_secs(5),
            format_delay: Duration::from_secs(2),
            backoff_factor: 1.0,
            max_delay: Duration::from_secs(60),
            retry_invalid_json: false,
        }
    }
}

impl RetryPolicy {
    /// Policy with no waits, for tests and dry runs.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            transient_delay: Duration::ZERO,
            format_delay: Duration::ZERO,
            ..Default::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_delays(mut self, transient: Duration, format: Duration) -> Self {
        self.transient_delay = transient;
        self.format_delay = format;
        self
    }

    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn with_retry_invalid_json(mut self, enabled: bool) -> Self {
        self.retry_invalid_json = enabled;
        self
    }

    /// Whether another attempt may follow attempt number `attempt` (1-based).
    pub fn has_attempts_left(&self, attempt: u32) -> bool {
        attempt < self.max_attempts.max(1)
    }

    /// Wait before retrying after a transport fault on attempt `attempt`.
    pub fn transient_delay_for(&self, attempt: u32) -> Duration {
        self.scaled(self.transient_delay, attempt)
    }

    /// Wait before retrying after a malformed response on attempt `attempt`.
    pub fn format_delay_for(&self, attempt: u32) -> Duration {
        self.scaled(self.format_delay, attempt)
    }

    fn scaled(&self, base: Duration, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let factor = if self.backoff_factor.is_finite() {
            self.backoff_factor.max(1.0)
        } else {
            1.0
        };
        let secs = base.as_secs_f64() * factor.powi(exponent);
        let capped = secs.min(self.max_delay.as_secs_f64());

        if capped.is_finite() && capped >= 0.0 {
            Duration::from_secs_f64(capped)
        } else {
            self.max_delay
        }
    }
}
