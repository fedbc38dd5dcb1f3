//! Exponential backoff with jitter around fallible async operations.
//!
//! Every store call goes through [`Retry`]. A failed attempt is retried
//! while the configured predicate says so and attempts remain; the delay
//! before attempt `n + 1` is
//! `min(base_delay * backoff_multiplier^(n - 1) + uniform(0, jitter), max_delay)`.
//! The final error is returned exactly as the operation produced it.
//!
//! [`Retry::execute_within`] adds an overall deadline. When it expires the
//! pending attempt or backoff sleep is dropped and [`RetryError::TimedOut`]
//! is returned instead of the last transient error.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::StoreError;

/// Decides whether an error on a given attempt (counted from 1) is worth retrying
pub type RetryPredicate<E> = Arc<dyn Fn(&E, u32) -> bool + Send + Sync>;

/// Called before each backoff sleep with the failed attempt, the delay and the error
pub type ProgressCallback<E> = Arc<dyn Fn(u32, Duration, &E) + Send + Sync>;

/// Backoff parameters as plain data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub jitter_ms: u64,
    pub backoff_multiplier: f64,
}

impl RetrySettings {
    /// General purpose profile
    pub const STANDARD: RetrySettings = RetrySettings {
        max_attempts: 10,
        base_delay_ms: 500,
        max_delay_ms: 30_000,
        jitter_ms: 1_000,
        backoff_multiplier: 1.5,
    };

    /// Battle documents: long horizon, tolerant of a peer's write not being visible yet
    pub const BATTLE: RetrySettings = RetrySettings {
        max_attempts: 15,
        base_delay_ms: 1_000,
        max_delay_ms: 20_000,
        jitter_ms: 2_000,
        backoff_multiplier: 1.3,
    };

    /// Lobby and room documents: few attempts, small caps
    pub const ROOM: RetrySettings = RetrySettings {
        max_attempts: 8,
        base_delay_ms: 300,
        max_delay_ms: 5_000,
        jitter_ms: 500,
        backoff_multiplier: 1.5,
    };
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Retry policy for operations failing with `E`
pub struct RetryConfig<E> {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter: Duration,
    pub backoff_multiplier: f64,
    pub should_retry: RetryPredicate<E>,
}

impl<E> Clone for RetryConfig<E> {
    fn clone(&self) -> Self {
        Self {
            max_attempts: self.max_attempts,
            base_delay: self.base_delay,
            max_delay: self.max_delay,
            jitter: self.jitter,
            backoff_multiplier: self.backoff_multiplier,
            should_retry: Arc::clone(&self.should_retry),
        }
    }
}

impl<E> std::fmt::Debug for RetryConfig<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryConfig")
            .field("max_attempts", &self.max_attempts)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .field("jitter", &self.jitter)
            .field("backoff_multiplier", &self.backoff_multiplier)
            .finish_non_exhaustive()
    }
}

impl<E> RetryConfig<E> {
    pub fn new<P>(settings: RetrySettings, should_retry: P) -> Self
    where
        P: Fn(&E, u32) -> bool + Send + Sync + 'static,
    {
        Self {
            max_attempts: settings.max_attempts.max(1),
            base_delay: Duration::from_millis(settings.base_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
            jitter: Duration::from_millis(settings.jitter_ms),
            backoff_multiplier: settings.backoff_multiplier,
            should_retry: Arc::new(should_retry),
        }
    }

    /// Delay before the attempt following `attempt`, jitter included
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let exponential = self.base_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        let jitter = if self.jitter.is_zero() {
            0.0
        } else {
            rand::thread_rng().gen_range(0.0..self.jitter.as_secs_f64())
        };
        let total = (exponential + jitter).min(self.max_delay.as_secs_f64());
        Duration::try_from_secs_f64(total).unwrap_or(self.max_delay)
    }
}

impl RetryConfig<StoreError> {
    pub fn standard() -> Self {
        Self::new(RetrySettings::STANDARD, default_should_retry)
    }

    pub fn battle() -> Self {
        Self::battle_with(RetrySettings::BATTLE)
    }

    pub fn room() -> Self {
        Self::room_with(RetrySettings::ROOM)
    }

    /// Battle-document policy with custom timings
    pub fn battle_with(settings: RetrySettings) -> Self {
        Self::new(settings, battle_should_retry)
    }

    /// Room-document policy with custom timings
    pub fn room_with(settings: RetrySettings) -> Self {
        Self::new(settings, default_should_retry)
    }
}

/// Not-found and unavailable retry, authorization failures are terminal,
/// anything else is retried
pub fn default_should_retry(error: &StoreError, _attempt: u32) -> bool {
    match error {
        StoreError::NotFound(_) | StoreError::Unavailable(_) => true,
        StoreError::PermissionDenied(_) | StoreError::Unauthenticated => false,
        _ => true,
    }
}

/// Only not-found, unavailable and deadline-exceeded retry
pub fn battle_should_retry(error: &StoreError, _attempt: u32) -> bool {
    matches!(
        error,
        StoreError::NotFound(_) | StoreError::Unavailable(_) | StoreError::DeadlineExceeded(_)
    )
}

/// Outcome of [`Retry::execute_within`] when it does not succeed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetryError<E> {
    /// The operation's own final error, unmodified
    #[error(transparent)]
    Failed(E),

    #[error("Gave up after {attempts} attempts: deadline of {deadline:?} expired")]
    TimedOut { attempts: u32, deadline: Duration },
}

/// Runs operations under a [`RetryConfig`]
pub struct Retry<E> {
    config: RetryConfig<E>,
    on_progress: Option<ProgressCallback<E>>,
}

impl<E> Clone for Retry<E> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            on_progress: self.on_progress.clone(),
        }
    }
}

impl<E: std::fmt::Display> Retry<E> {
    pub fn new(config: RetryConfig<E>) -> Self {
        Self {
            config,
            on_progress: None,
        }
    }

    /// Observe every scheduled retry
    pub fn with_progress<F>(mut self, on_progress: F) -> Self
    where
        F: Fn(u32, Duration, &E) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(on_progress));
        self
    }

    pub fn config(&self) -> &RetryConfig<E> {
        &self.config
    }

    /// Run `operation` until it succeeds or the policy gives up
    pub async fn execute<T, F, Fut>(&self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let attempts = AtomicU32::new(0);
        self.run(operation, &attempts).await
    }

    /// Like [`Retry::execute`], but abandon everything once `deadline` has passed
    pub async fn execute_within<T, F, Fut>(
        &self,
        deadline: Duration,
        operation: F,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let attempts = AtomicU32::new(0);
        match tokio::time::timeout(deadline, self.run(operation, &attempts)).await {
            Ok(result) => result.map_err(RetryError::Failed),
            Err(_) => {
                let attempts = attempts.load(Ordering::Relaxed);
                tracing::warn!(attempts, deadline = ?deadline, "Retry deadline expired");
                Err(RetryError::TimedOut { attempts, deadline })
            }
        }
    }

    async fn run<T, F, Fut>(&self, mut operation: F, attempts: &AtomicU32) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            attempts.store(attempt, Ordering::Relaxed);

            let error = match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::debug!(attempt, "Operation succeeded after retrying");
                    }
                    return Ok(value);
                }
                Err(e) => e,
            };

            if !(self.config.should_retry)(&error, attempt) {
                tracing::debug!(attempt, error = %error, "Error is not retryable");
                return Err(error);
            }
            if attempt >= max_attempts {
                tracing::warn!(max_attempts, error = %error, "All attempts failed");
                return Err(error);
            }

            let delay = self.config.delay_for(attempt);
            tracing::warn!(
                attempt = attempt,
                max_attempts = max_attempts,
                delay = ?delay,
                error = %error,
                "Attempt failed, retrying"
            );
            if let Some(on_progress) = &self.on_progress {
                on_progress(attempt, delay, &error);
            }

            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
