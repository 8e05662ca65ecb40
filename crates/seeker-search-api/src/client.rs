// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Search API client implementation.

use std::time::Duration;

use reqwest::{header, Client, Url};
use seeker_common_http::{retry, RetryConfig};
use serde_json::Value;
use tracing::{debug, error, instrument, trace};

use crate::config::ClientConfig;
use crate::error::{ErrorDetail, ErrorKind, SearchError};
use crate::types::{SearchKind, SearchRequest};

const SEARCH_PATH: &str = "search";

/// Client for the Seeker search service.
///
/// Holds an immutable [`ClientConfig`] and a shared connection pool;
/// cloning is cheap and concurrent calls need no synchronization. Each
/// call is stateless: validate, build the URL, GET with a per-request
/// timeout, retry transient failures, surface a [`SearchError`].
#[derive(Debug, Clone)]
pub struct SearchClient {
	http_client: Client,
	config: ClientConfig,
}

impl SearchClient {
	/// Creates a client for the given base URL with default config.
	/// Fails with a validation error when the scheme is not http/https.
	pub fn new(base_url: impl AsRef<str>) -> Result<Self, SearchError> {
		Ok(Self::with_config(ClientConfig::new(base_url)?))
	}

	/// Creates a client from a pre-built config.
	pub fn with_config(config: ClientConfig) -> Self {
		Self {
			http_client: seeker_common_http::new_client(),
			config,
		}
	}

	/// Overrides the per-request timeout.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.config.timeout = timeout;
		self
	}

	/// Overrides the retry configuration.
	pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
		self.config.retry = retry;
		self
	}

	/// The client's configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Performs a search and returns the service's JSON payload verbatim.
	///
	/// Validation failures are reported before any network call, with
	/// every violation listed. Transient failures (timeouts, connection
	/// errors, 408/429/5xx statuses) are retried per the configured
	/// [`RetryConfig`]; the last error is surfaced on exhaustion.
	#[instrument(skip(self), fields(query = %request.query, kind = ?request.kind))]
	pub async fn search(&self, request: SearchRequest) -> Result<Value, SearchError> {
		if let Err(issues) = request.validate() {
			return Err(ErrorKind::Validation(issues).into());
		}

		retry(&self.config.retry, || self.search_inner(&request)).await
	}

	/// Web search: [`search`](Self::search) with the type pinned to `web`.
	pub async fn search_web(&self, request: SearchRequest) -> Result<Value, SearchError> {
		self.search(request.kind(SearchKind::Web)).await
	}

	/// Image search: [`search`](Self::search) with the type pinned to `images`.
	pub async fn search_images(&self, request: SearchRequest) -> Result<Value, SearchError> {
		self.search(request.kind(SearchKind::Images)).await
	}

	/// Video search: [`search`](Self::search) with the type pinned to `videos`.
	pub async fn search_videos(&self, request: SearchRequest) -> Result<Value, SearchError> {
		self.search(request.kind(SearchKind::Videos)).await
	}

	/// News search: [`search`](Self::search) with the type pinned to `news`.
	pub async fn search_news(&self, request: SearchRequest) -> Result<Value, SearchError> {
		self.search(request.kind(SearchKind::News)).await
	}

	/// Query suggestions: [`search`](Self::search) with the type pinned to
	/// `suggestions`.
	pub async fn suggestions(&self, request: SearchRequest) -> Result<Value, SearchError> {
		self.search(request.kind(SearchKind::Suggestions)).await
	}

	/// Knowledge panel: [`search`](Self::search) with the type pinned to
	/// `panel`.
	pub async fn panel(&self, request: SearchRequest) -> Result<Value, SearchError> {
		self.search(request.kind(SearchKind::Panel)).await
	}

	async fn search_inner(&self, request: &SearchRequest) -> Result<Value, SearchError> {
		let url = self.build_url(request);

		debug!(url = %url, "sending search request");

		// The timeout is applied per request rather than on the client so
		// inter-retry sleeps do not count against it; it aborts only its
		// own in-flight call.
		let response = self
			.http_client
			.get(url)
			.header(header::ACCEPT, "application/json")
			.timeout(self.config.timeout)
			.send()
			.await
			.map_err(|e| {
				if e.is_timeout() {
					error!("request timed out");
					return ErrorKind::Timeout.into();
				}
				error!(error = %e, "network error during search request");
				SearchError::from(ErrorKind::Network(e))
			})?;

		let status = response.status();
		let content_type = response
			.headers()
			.get(header::CONTENT_TYPE)
			.and_then(|v| v.to_str().ok())
			.unwrap_or_default()
			.to_string();

		debug!(status = %status, content_type = %content_type, "received response");

		if !status.is_success() {
			let status_code = status.as_u16();
			let body = response.text().await.unwrap_or_default();

			let detail = if indicates_json(&content_type) {
				serde_json::from_str(&body)
					.map(ErrorDetail::Json)
					.unwrap_or(ErrorDetail::Text(body))
			} else {
				ErrorDetail::Text(body)
			};

			error!(status = status_code, "search API error");
			return Err(ErrorKind::Status {
				status: status_code,
				detail,
			}
			.into());
		}

		if !indicates_json(&content_type) {
			error!(content_type = %content_type, "non-JSON response to successful request");
			return Err(ErrorKind::InvalidContentType {
				reason: format!("got content type {content_type:?}"),
				content_type,
			}
			.into());
		}

		let body = response.text().await.map_err(|e| {
			if e.is_timeout() {
				error!("request timed out while reading response body");
				return ErrorKind::Timeout.into();
			}
			error!(error = %e, "failed to read response body");
			SearchError::from(ErrorKind::Network(e))
		})?;

		trace!(body = %body, "response body");

		let value: Value = serde_json::from_str(&body).map_err(|e| {
			error!(error = %e, "response declared JSON but failed to parse");
			SearchError::from(ErrorKind::InvalidContentType {
				content_type,
				reason: format!("body failed to parse as JSON: {e}"),
			})
		})?;

		debug!("search completed successfully");

		Ok(value)
	}

	/// Builds `{base_url}/search` with query pairs for the set fields
	/// only. `Url::query_pairs_mut` percent-encodes keys and values.
	fn build_url(&self, request: &SearchRequest) -> Url {
		let mut url = self.config.base_url.clone();

		if let Ok(mut segments) = url.path_segments_mut() {
			segments.pop_if_empty().push(SEARCH_PATH);
		}

		{
			let mut pairs = url.query_pairs_mut();
			pairs.append_pair("q", &request.query);
			if let Some(page) = request.page {
				pairs.append_pair("page", &page.to_string());
			}
			if let Some(kind) = request.kind {
				pairs.append_pair("type", kind.as_str());
			}
			if let Some(level) = request.safesearch {
				pairs.append_pair("safesearch", &level.to_string());
			}
			if let Some(lang) = &request.lang {
				pairs.append_pair("lang", lang);
			}
		}

		url
	}
}

/// Returns true when the content type names a JSON payload, including
/// `+json` suffixed media types.
fn indicates_json(content_type: &str) -> bool {
	let mime = content_type
		.split(';')
		.next()
		.unwrap_or_default()
		.trim()
		.to_ascii_lowercase();
	mime == "application/json" || mime.ends_with("+json")
}
