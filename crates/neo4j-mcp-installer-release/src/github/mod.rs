//! Shared GitHub interaction utilities
//!
//! This module provides common functionality for interacting with GitHub:
//! - HTTP client construction with appropriate user-agent and timeouts
//! - Release metadata types returned by the REST API
//! - Safe URL construction helpers

pub mod client;
pub mod release;
pub mod url;

// Re-exports for convenient access
pub use client::{ApiError, DEFAULT_TIMEOUT, DOWNLOAD_TIMEOUT, GithubClient, USER_AGENT};
pub use release::{Asset, Release};
pub use url::{UrlError, join_segments, parse_base};
