//! Error types for window maintenance and upstream fetches.

use thiserror::Error;

/// Failure reported by a [`crate::Fetcher`].
///
/// Only [`FetchError::Timeout`] and [`FetchError::Upstream`] are recoverable:
/// the registry answers those with the unchanged window. Everything else is
/// surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("upstream fetch timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("upstream responded with status {status}")]
    Upstream { status: u16 },

    #[error("upstream transport failure: {0}")]
    Transport(String),

    #[error("malformed upstream response: {0}")]
    Malformed(String),
}

impl FetchError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FetchError::Timeout { .. } | FetchError::Upstream { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    #[error("Invalid number type '{0}'. Use p, f, e, or r.")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("window capacity must be a positive integer")]
    ZeroCapacity,

    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type WindowResult<T> = Result<T, WindowError>;
