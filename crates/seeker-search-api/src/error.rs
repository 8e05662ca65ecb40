// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for the search API client.

use chrono::{DateTime, Utc};
use seeker_common_http::{is_transient_status, RetryableError};
use thiserror::Error;

use crate::types::ValidationIssue;

/// Detail payload attached to an HTTP status error: the error body as
/// JSON when the response declared a JSON content type, raw text
/// otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDetail {
	Json(serde_json::Value),
	Text(String),
}

impl std::fmt::Display for ErrorDetail {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ErrorDetail::Json(value) => write!(f, "{value}"),
			ErrorDetail::Text(text) => f.write_str(text),
		}
	}
}

fn issue_summary(issues: &[ValidationIssue]) -> String {
	issues
		.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join("; ")
}

/// The kind of failure a search call can surface.
#[derive(Debug, Error)]
pub enum ErrorKind {
	/// The request failed client-side validation; no network call was
	/// made. Carries every violation, not just the first.
	#[error("invalid search request: {}", issue_summary(.0))]
	Validation(Vec<ValidationIssue>),

	/// The service returned a non-success HTTP status.
	#[error("search API returned status {status}: {detail}")]
	Status { status: u16, detail: ErrorDetail },

	/// The request exceeded the configured timeout.
	#[error("request timed out")]
	Timeout,

	/// Network-level error during HTTP communication.
	#[error("network error: {0}")]
	Network(#[from] reqwest::Error),

	/// The service answered with a success status but a payload that is
	/// not JSON: wrong content type, or a body that failed to parse
	/// despite declaring a JSON content type.
	#[error("expected a JSON response: {reason}")]
	InvalidContentType { content_type: String, reason: String },
}

/// An error raised by [`SearchClient`](crate::SearchClient), tagged with
/// its kind and stamped with the time it was created.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct SearchError {
	pub kind: ErrorKind,
	pub occurred_at: DateTime<Utc>,
}

impl SearchError {
	/// The HTTP status code, when the failure carries one.
	pub fn status(&self) -> Option<u16> {
		match &self.kind {
			ErrorKind::Status { status, .. } => Some(*status),
			ErrorKind::Network(e) => e.status().map(|s| s.as_u16()),
			_ => None,
		}
	}

	/// The validation violations, when the failure is a validation error.
	pub fn validation_issues(&self) -> Option<&[ValidationIssue]> {
		match &self.kind {
			ErrorKind::Validation(issues) => Some(issues),
			_ => None,
		}
	}
}

impl From<ErrorKind> for SearchError {
	fn from(kind: ErrorKind) -> Self {
		Self {
			kind,
			occurred_at: Utc::now(),
		}
	}
}

impl RetryableError for SearchError {
	fn is_retryable(&self) -> bool {
		match &self.kind {
			ErrorKind::Validation(_) => false,
			ErrorKind::Status { status, .. } => is_transient_status(*status),
			ErrorKind::Timeout => true,
			ErrorKind::Network(_) => true,
			ErrorKind::InvalidContentType { .. } => false,
		}
	}
}
