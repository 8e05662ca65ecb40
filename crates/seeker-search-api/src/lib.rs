// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Search API client for Seeker.
//!
//! This crate provides a typed Rust client for the Seeker search service,
//! encapsulating request validation, HTTP communication, and retry with
//! exponential backoff. Successful responses are returned as raw JSON;
//! the client does not interpret result shape.

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::SearchClient;
pub use config::ClientConfig;
pub use error::{ErrorDetail, ErrorKind, SearchError};
pub use seeker_common_http::{RetryConfig, RetryableError};
pub use types::{SearchKind, SearchRequest, ValidationIssue};
