//! Client configuration.
//!
//! Every field has a default, so an empty document is a valid config.
//! Loaded configs go through the same validation engine as operation
//! inputs.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{DecodeError, Error};
use crate::validation::{validate_input, Checks, Validate, ValidationErrors};

/// Header consulted for the request id when none is configured.
pub const DEFAULT_REQUEST_ID_HEADER: &str = "x-amzn-requestid";

/// Header consulted when the configured request-id header is absent.
pub const FALLBACK_REQUEST_ID_HEADER: &str = "x-request-id";

/// Settings shared by every call made through a client.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use typed_ops::ClientConfig;
///
/// let config = ClientConfig::from_json_str(
///     r#"{ "default_timeout_ms": 2500, "pagination": { "max_pages": 10 } }"#,
/// )
/// .unwrap();
///
/// assert_eq!(config.default_timeout(), Some(Duration::from_millis(2500)));
/// assert_eq!(config.pagination.max_pages, Some(10));
/// assert_eq!(config.pagination.stall_limit, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Response header carrying the server-assigned request id
    pub request_id_header: String,
    /// Upper bound applied to every send, in milliseconds
    pub default_timeout_ms: Option<u64>,
    /// Sent as the `user-agent` header when set
    pub user_agent: Option<String>,
    /// Pagination guards
    pub pagination: PaginationConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_id_header: DEFAULT_REQUEST_ID_HEADER.to_string(),
            default_timeout_ms: None,
            user_agent: None,
            pagination: PaginationConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Parses and validates a JSON config document.
    ///
    /// # Errors
    ///
    /// Returns `Error::Decode` for malformed documents and
    /// `Error::Validation` for out-of-range values.
    pub fn from_json_str(document: &str) -> Result<Self, Error> {
        let config: ClientConfig = serde_json::from_str(document)
            .map_err(|e| DecodeError::new("ClientConfig", e.to_string()))?;
        Ok(validate_input(config)?.into_inner())
    }

    /// Returns the per-send timeout, if configured.
    pub fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout_ms.map(Duration::from_millis)
    }

    /// Sets the per-send timeout.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Sets the request-id header.
    pub fn with_request_id_header(mut self, header: impl Into<String>) -> Self {
        self.request_id_header = header.into();
        self
    }

    /// Sets the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Replaces the pagination guards.
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> ValidationErrors {
        Checks::new("ClientConfig")
            .min_len("request_id_header", Some(self.request_id_header.as_str()), 1)
            .min_value(
                "pagination.stall_limit",
                Some(i64::from(self.pagination.stall_limit)),
                1,
            )
            .min_value(
                "pagination.max_pages",
                self.pagination.max_pages.map(i64::from),
                1,
            )
            .finish()
    }
}

/// Guards applied to every pagination sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaginationConfig {
    /// Consecutive non-advancing cursors tolerated before the sequence
    /// fails with `Error::CursorStalled`
    pub stall_limit: u32,
    /// Stop cleanly after this many pages
    pub max_pages: Option<u32>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            stall_limit: 1,
            max_pages: None,
        }
    }
}
