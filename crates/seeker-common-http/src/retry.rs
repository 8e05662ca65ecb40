// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Retry logic with exponential backoff and jitter for HTTP requests.

use std::time::Duration;
use tracing::warn;

/// HTTP status codes that indicate a retry is likely to succeed.
const TRANSIENT_STATUSES: [u16; 6] = [408, 429, 500, 502, 503, 504];

/// Returns true when the given status code is in the transient set
/// (408, 429, 500, 502, 503, 504).
pub fn is_transient_status(status: u16) -> bool {
	TRANSIENT_STATUSES.contains(&status)
}

/// Configuration for retrying requests that fail transiently.
///
/// The delay before retry attempt `n` (zero-based) is
/// `base_delay * 2^n` plus a uniform random jitter in `[0, max_jitter)`.
#[derive(Debug, Clone)]
pub struct RetryConfig {
	/// When false, every operation gets exactly one attempt.
	pub enabled: bool,
	/// Total attempt budget, including the initial attempt.
	pub max_attempts: u32,
	/// Backoff base for the exponential delay.
	pub base_delay: Duration,
	/// Exclusive upper bound of the random jitter added to each delay.
	pub max_jitter: Duration,
}

impl Default for RetryConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			max_attempts: 3,
			base_delay: Duration::from_millis(1000),
			max_jitter: Duration::from_millis(1000),
		}
	}
}

impl RetryConfig {
	/// A config that performs a single attempt with no retries.
	pub fn disabled() -> Self {
		Self {
			enabled: false,
			..Self::default()
		}
	}

	fn attempt_budget(&self) -> u32 {
		if self.enabled {
			self.max_attempts.max(1)
		} else {
			1
		}
	}
}

/// Classifies errors by whether retrying the operation could succeed.
pub trait RetryableError {
	fn is_retryable(&self) -> bool;
}

impl RetryableError for reqwest::Error {
	fn is_retryable(&self) -> bool {
		if self.is_timeout() || self.is_connect() {
			return true;
		}

		if let Some(status) = self.status() {
			return is_transient_status(status.as_u16());
		}

		false
	}
}

fn calculate_delay(cfg: &RetryConfig, attempt: u32) -> Duration {
	let backoff = cfg.base_delay.saturating_mul(2u32.saturating_pow(attempt));
	let jitter_ms = cfg.max_jitter.as_millis() as u64;
	if jitter_ms == 0 {
		return backoff;
	}
	backoff + Duration::from_millis(fastrand::u64(0..jitter_ms))
}

/// Runs `f` until it succeeds, returns a non-retryable error, or the
/// attempt budget is exhausted. The last error is surfaced as-is.
pub async fn retry<F, Fut, T, E>(cfg: &RetryConfig, mut f: F) -> Result<T, E>
where
	F: FnMut() -> Fut,
	Fut: std::future::Future<Output = Result<T, E>>,
	E: RetryableError + std::fmt::Debug,
{
	let budget = cfg.attempt_budget();
	let mut attempt = 0;

	loop {
		match f().await {
			Ok(result) => return Ok(result),
			Err(err) => {
				attempt += 1;

				if !err.is_retryable() {
					warn!(
							error = ?err,
							attempt = attempt,
							"non-retryable error encountered"
					);
					return Err(err);
				}

				if attempt >= budget {
					warn!(
							error = ?err,
							attempt = attempt,
							max_attempts = budget,
							"retry attempts exhausted"
					);
					return Err(err);
				}

				let delay = calculate_delay(cfg, attempt - 1);
				warn!(
						error = ?err,
						attempt = attempt,
						max_attempts = budget,
						delay_ms = delay.as_millis(),
						"retrying after error"
				);

				tokio::time::sleep(delay).await;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicU32, Ordering};
	use std::sync::Arc;

	#[derive(Debug)]
	struct MockError {
		retryable: bool,
	}

	impl RetryableError for MockError {
		fn is_retryable(&self) -> bool {
			self.retryable
		}
	}

	fn fast_config() -> RetryConfig {
		RetryConfig {
			enabled: true,
			max_attempts: 3,
			base_delay: Duration::from_millis(1),
			max_jitter: Duration::from_millis(1),
		}
	}

	/// Purpose: Verifies that when an operation returns a non-retryable error,
	/// the retry function immediately returns the error without additional
	/// attempts. Retrying non-retryable errors (e.g. 404 Not Found) wastes
	/// resources and delays error propagation to callers.
	#[tokio::test]
	async fn test_non_retryable_error_fails_immediately() {
		let attempt_count = Arc::new(AtomicU32::new(0));
		let attempt_count_clone = Arc::clone(&attempt_count);

		let cfg = fast_config();

		let result: Result<(), MockError> = retry(&cfg, || {
			let count = Arc::clone(&attempt_count_clone);
			async move {
				count.fetch_add(1, Ordering::SeqCst);
				Err(MockError { retryable: false })
			}
		})
		.await;

		assert!(result.is_err());
		assert_eq!(
			attempt_count.load(Ordering::SeqCst),
			1,
			"non-retryable error should only attempt once"
		);
	}

	/// Purpose: Verifies that when an operation returns a retryable error,
	/// the retry function attempts the operation up to max_attempts times.
	/// This is critical for resilience against transient failures like
	/// network timeouts or temporary service unavailability (429, 503).
	#[tokio::test]
	async fn test_retryable_error_retries_up_to_max_attempts() {
		let attempt_count = Arc::new(AtomicU32::new(0));
		let attempt_count_clone = Arc::clone(&attempt_count);

		let cfg = fast_config();

		let result: Result<(), MockError> = retry(&cfg, || {
			let count = Arc::clone(&attempt_count_clone);
			async move {
				count.fetch_add(1, Ordering::SeqCst);
				Err(MockError { retryable: true })
			}
		})
		.await;

		assert!(result.is_err());
		assert_eq!(
			attempt_count.load(Ordering::SeqCst),
			3,
			"should retry exactly max_attempts times"
		);
	}

	/// Purpose: Verifies that when retries are disabled, a retryable error
	/// still gets exactly one attempt. Callers that opt out of retries must
	/// observe the first failure immediately.
	#[tokio::test]
	async fn test_disabled_config_attempts_once() {
		let attempt_count = Arc::new(AtomicU32::new(0));
		let attempt_count_clone = Arc::clone(&attempt_count);

		let cfg = RetryConfig {
			enabled: false,
			..fast_config()
		};

		let result: Result<(), MockError> = retry(&cfg, || {
			let count = Arc::clone(&attempt_count_clone);
			async move {
				count.fetch_add(1, Ordering::SeqCst);
				Err(MockError { retryable: true })
			}
		})
		.await;

		assert!(result.is_err());
		assert_eq!(attempt_count.load(Ordering::SeqCst), 1);
	}

	/// Purpose: Verifies that when an operation eventually succeeds after
	/// transient failures, the retry function returns the successful result.
	/// This ensures the retry mechanism correctly handles recovery scenarios.
	#[tokio::test]
	async fn test_succeeds_after_retries() {
		let attempt_count = Arc::new(AtomicU32::new(0));
		let attempt_count_clone = Arc::clone(&attempt_count);

		let cfg = RetryConfig {
			max_attempts: 5,
			..fast_config()
		};

		let result: Result<&str, MockError> = retry(&cfg, || {
			let count = Arc::clone(&attempt_count_clone);
			async move {
				let current = count.fetch_add(1, Ordering::SeqCst);
				if current < 2 {
					Err(MockError { retryable: true })
				} else {
					Ok("success")
				}
			}
		})
		.await;

		assert!(result.is_ok());
		assert_eq!(result.unwrap(), "success");
		assert_eq!(
			attempt_count.load(Ordering::SeqCst),
			3,
			"should succeed on third attempt"
		);
	}

	/// Purpose: Verifies that jitter adds randomness to the delay
	/// calculation, preventing the "thundering herd" problem where many
	/// clients retry simultaneously after a shared failure. Without jitter,
	/// exponential backoff alone can still cause synchronized retries.
	#[test]
	fn test_jitter_adds_randomness() {
		let cfg_with_jitter = RetryConfig {
			enabled: true,
			max_attempts: 3,
			base_delay: Duration::from_millis(100),
			max_jitter: Duration::from_millis(1000),
		};

		let cfg_without_jitter = RetryConfig {
			max_jitter: Duration::ZERO,
			..cfg_with_jitter.clone()
		};

		let delays_without_jitter: Vec<Duration> = (0..10)
			.map(|_| calculate_delay(&cfg_without_jitter, 1))
			.collect();

		let delays_with_jitter: Vec<Duration> = (0..10)
			.map(|_| calculate_delay(&cfg_with_jitter, 1))
			.collect();

		let all_same_without_jitter = delays_without_jitter.windows(2).all(|w| w[0] == w[1]);
		assert!(
			all_same_without_jitter,
			"delays without jitter should be identical"
		);

		let all_same_with_jitter = delays_with_jitter.windows(2).all(|w| w[0] == w[1]);
		assert!(!all_same_with_jitter, "delays with jitter should vary");
	}

	/// Purpose: Verifies the exponential floor of the delay schedule: the
	/// delay before retry n is never below base_delay * 2^n regardless of
	/// jitter, and jitter never exceeds its configured bound.
	#[test]
	fn test_delay_floor_and_jitter_bound() {
		let cfg = RetryConfig {
			enabled: true,
			max_attempts: 5,
			base_delay: Duration::from_millis(1000),
			max_jitter: Duration::from_millis(1000),
		};

		for attempt in 0..4 {
			let floor = Duration::from_millis(1000 * 2u64.pow(attempt));
			for _ in 0..10 {
				let delay = calculate_delay(&cfg, attempt);
				assert!(delay >= floor, "delay {delay:?} below floor {floor:?}");
				assert!(
					delay < floor + cfg.max_jitter,
					"delay {delay:?} exceeds jitter bound"
				);
			}
		}
	}

	#[test]
	fn test_transient_status_set() {
		for status in [408, 429, 500, 502, 503, 504] {
			assert!(is_transient_status(status), "{status} should be transient");
		}
		for status in [200, 301, 400, 401, 403, 404, 418, 501] {
			assert!(!is_transient_status(status), "{status} should not be transient");
		}
	}
}
