//! Retry policy for ordinary API calls
//!
//! Transient failures (network, 5xx, throttling) are retried with
//! exponential backoff and jitter. This is distinct from the chunk
//! uploader's fixed linear policy: regular CRUD mutations default to a
//! single attempt and opt in where re-sending is safe.

use std::future::Future;
use std::time::Duration;

use log::{debug, warn};
use rand::Rng;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Fire-once: mutations that must not be re-sent.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
            jitter: false,
        }
    }
}

/// Classification of request failures into retry behavior.
#[derive(Debug, Clone, PartialEq)]
pub enum RetryableError {
    /// Connection-level errors (DNS, refused, reset).
    Network,
    /// HTTP 5xx server errors.
    ServerError(u16),
    /// HTTP 429 Too Many Requests.
    RateLimited,
    /// HTTP 408 or client-side timeout.
    Timeout,
    /// Other 4xx; the request is wrong, retrying will not help.
    ClientError(u16),
    /// 401/403; needs re-authentication, not a retry.
    AuthError,
    Unknown,
}

impl RetryableError {
    pub fn should_retry(&self) -> bool {
        matches!(
            self,
            RetryableError::Network
                | RetryableError::ServerError(_)
                | RetryableError::RateLimited
                | RetryableError::Timeout
        )
    }

    pub fn from_status_code(status: u16) -> Self {
        match status {
            401 | 403 => RetryableError::AuthError,
            408 => RetryableError::Timeout,
            429 => RetryableError::RateLimited,
            400..=499 => RetryableError::ClientError(status),
            500..=599 => RetryableError::ServerError(status),
            _ => RetryableError::Unknown,
        }
    }

    pub fn from_reqwest_error(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            RetryableError::Timeout
        } else if error.is_connect() || error.is_request() {
            RetryableError::Network
        } else if let Some(status) = error.status() {
            Self::from_status_code(status.as_u16())
        } else {
            RetryableError::Unknown
        }
    }
}

/// Executes operations under a [`RetryConfig`].
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Run `operation`, retrying retryable failures until the attempt budget
    /// is spent.
    pub async fn execute<F, Fut, T>(&self, operation: F) -> anyhow::Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, reqwest::Error>>,
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!("Operation succeeded on attempt {attempt}");
                    }
                    return Ok(result);
                }
                Err(error) => {
                    let classified = RetryableError::from_reqwest_error(&error);
                    if !classified.should_retry() || attempt >= self.config.max_attempts {
                        warn!(
                            "Operation failed permanently on attempt {attempt} ({classified:?}): {error}"
                        );
                        return Err(error.into());
                    }
                    let delay = self.calculate_delay(attempt);
                    warn!("Operation failed on attempt {attempt} ({classified:?}), retrying in {delay:?}");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Exponential backoff, capped, with optional jitter.
    fn calculate_delay(&self, attempt: u32) -> Duration {
        let delay_ms = (self.config.base_delay.as_millis() as f64)
            * self.config.backoff_multiplier.powi(attempt as i32 - 1);
        let mut delay = Duration::from_millis(delay_ms as u64).min(self.config.max_delay);

        if self.config.jitter {
            let factor = rand::thread_rng().gen_range(0.5..=1.5);
            delay = Duration::from_millis((delay.as_millis() as f64 * factor) as u64);
        }
        delay
    }
}
