use std::time::Duration;

use tracing::warn;

use crate::error::ConfigError;

/// Fixed-delay retry for short, possibly flaky browser checks.
///
/// The delay is constant between attempts; the sleep blocks the calling
/// thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Policy used for the post-login check: three attempts, two seconds apart.
    pub const POST_LOGIN: RetryPolicy = RetryPolicy {
        max_attempts: 3,
        delay: Duration::from_secs(2),
    };

    /// # Errors
    ///
    /// Returns `ConfigError::ZeroAttempts` when `max_attempts` is zero.
    pub fn new(max_attempts: u32, delay: Duration) -> Result<Self, ConfigError> {
        if max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(Self {
            max_attempts,
            delay,
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `op` until it succeeds or attempts run out.
    ///
    /// Returns the first success immediately. After the last failed attempt
    /// the error from that attempt is returned as-is.
    pub fn run<T, E, F>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        E: std::fmt::Display,
    {
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_attempts => {
                    warn!(
                        attempt,
                        max = self.max_attempts,
                        error = %err,
                        "attempt {}/{} failed, retrying",
                        attempt,
                        self.max_attempts
                    );
                    if !self.delay.is_zero() {
                        std::thread::sleep(self.delay);
                    }
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
