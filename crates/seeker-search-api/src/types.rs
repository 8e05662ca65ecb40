// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Request types and validation for the search API.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum accepted query length, in characters.
pub const MAX_QUERY_LEN: usize = 1000;

/// Valid page range (inclusive).
pub const PAGE_RANGE: std::ops::RangeInclusive<u32> = 1..=10;

/// Maximum safe-search level (0=off, 1=moderate, 2=strict).
pub const MAX_SAFESEARCH_LEVEL: u8 = 2;

/// Language codes accepted by the search service. `all` disables
/// language filtering; the rest are ISO 639-1 codes.
pub const ALLOWED_LANGUAGES: &[&str] = &[
	"all", "ar", "de", "en", "es", "fr", "hi", "it", "ja", "ko", "nl", "pl",
	"pt", "ru", "sv", "tr", "zh",
];

/// The kind of search to perform, sent as the `type` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
	Web,
	Images,
	Videos,
	News,
	Suggestions,
	Panel,
}

impl SearchKind {
	/// Wire value for the `type` query parameter.
	pub fn as_str(&self) -> &'static str {
		match self {
			SearchKind::Web => "web",
			SearchKind::Images => "images",
			SearchKind::Videos => "videos",
			SearchKind::News => "news",
			SearchKind::Suggestions => "suggestions",
			SearchKind::Panel => "panel",
		}
	}
}

impl std::fmt::Display for SearchKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A single request-validation violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
	/// Query is missing or blank after trimming.
	#[error("query must not be empty")]
	EmptyQuery,

	/// Query exceeds [`MAX_QUERY_LEN`] characters.
	#[error("query exceeds {MAX_QUERY_LEN} characters (got {len})")]
	QueryTooLong { len: usize },

	/// Page is outside the valid range.
	#[error("page must be between 1 and 10 (got {page})")]
	PageOutOfRange { page: u32 },

	/// Safe-search level is outside the valid range.
	#[error("safesearch level must be between 0 and 2 (got {level})")]
	SafeSearchOutOfRange { level: u8 },

	/// Language code is not in the allowed set.
	#[error("unsupported language code: {lang:?}")]
	UnsupportedLanguage { lang: String },

	/// Base URL could not be parsed.
	#[error("invalid base URL: {message}")]
	InvalidBaseUrl { message: String },

	/// Base URL scheme is not http or https.
	#[error("base URL scheme must be http or https (got {scheme:?})")]
	UnsupportedScheme { scheme: String },
}

/// Parameters for a search request.
///
/// The query is trimmed at construction; optional fields are only sent
/// when set. Validation happens in [`SearchRequest::validate`] and
/// reports every violation at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
	pub query: String,
	pub page: Option<u32>,
	#[serde(rename = "type")]
	pub kind: Option<SearchKind>,
	pub safesearch: Option<u8>,
	pub lang: Option<String>,
}

impl SearchRequest {
	/// Creates a new request for the given query. Surrounding whitespace
	/// is trimmed.
	pub fn new(query: impl Into<String>) -> Self {
		Self {
			query: query.into().trim().to_string(),
			page: None,
			kind: None,
			safesearch: None,
			lang: None,
		}
	}

	/// Sets the result page (valid range 1-10).
	pub fn page(mut self, page: u32) -> Self {
		self.page = Some(page);
		self
	}

	/// Sets the search kind.
	pub fn kind(mut self, kind: SearchKind) -> Self {
		self.kind = Some(kind);
		self
	}

	/// Sets the safe-search level (0=off, 1=moderate, 2=strict).
	pub fn safesearch(mut self, level: u8) -> Self {
		self.safesearch = Some(level);
		self
	}

	/// Sets the language code.
	pub fn lang(mut self, lang: impl Into<String>) -> Self {
		self.lang = Some(lang.into());
		self
	}

	/// Checks every field and returns all violations, not just the first.
	pub fn validate(&self) -> Result<(), Vec<ValidationIssue>> {
		let mut issues = Vec::new();

		if self.query.is_empty() {
			issues.push(ValidationIssue::EmptyQuery);
		} else {
			let len = self.query.chars().count();
			if len > MAX_QUERY_LEN {
				issues.push(ValidationIssue::QueryTooLong { len });
			}
		}

		if let Some(page) = self.page {
			if !PAGE_RANGE.contains(&page) {
				issues.push(ValidationIssue::PageOutOfRange { page });
			}
		}

		if let Some(level) = self.safesearch {
			if level > MAX_SAFESEARCH_LEVEL {
				issues.push(ValidationIssue::SafeSearchOutOfRange { level });
			}
		}

		if let Some(lang) = &self.lang {
			if !ALLOWED_LANGUAGES.contains(&lang.as_str()) {
				issues.push(ValidationIssue::UnsupportedLanguage { lang: lang.clone() });
			}
		}

		if issues.is_empty() {
			Ok(())
		} else {
			Err(issues)
		}
	}
}
