// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Immutable client configuration.

use std::time::Duration;

use reqwest::Url;
use seeker_common_http::RetryConfig;

use crate::error::{ErrorKind, SearchError};
use crate::types::ValidationIssue;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for a [`SearchClient`](crate::SearchClient).
///
/// Set once at construction; the client never mutates it afterwards, so
/// concurrent calls on the same client need no synchronization.
#[derive(Debug, Clone)]
pub struct ClientConfig {
	pub base_url: Url,
	pub timeout: Duration,
	pub retry: RetryConfig,
}

impl ClientConfig {
	/// Parses and validates the base URL. Only `http` and `https`
	/// schemes are accepted.
	pub fn new(base_url: impl AsRef<str>) -> Result<Self, SearchError> {
		let base_url = Url::parse(base_url.as_ref()).map_err(|e| {
			ErrorKind::Validation(vec![ValidationIssue::InvalidBaseUrl {
				message: e.to_string(),
			}])
		})?;

		if !matches!(base_url.scheme(), "http" | "https") {
			return Err(ErrorKind::Validation(vec![ValidationIssue::UnsupportedScheme {
				scheme: base_url.scheme().to_string(),
			}])
			.into());
		}

		Ok(Self {
			base_url,
			timeout: DEFAULT_TIMEOUT,
			retry: RetryConfig::default(),
		})
	}

	/// Overrides the per-request timeout.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	/// Overrides the retry configuration.
	pub fn with_retry(mut self, retry: RetryConfig) -> Self {
		self.retry = retry;
		self
	}
}
