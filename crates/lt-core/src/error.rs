//! Error taxonomy for resource acquisition.
//!
//! Only [`AcquireError::ResourceUnavailable`] ever reaches a caller. Per-mirror
//! failures ([`FetchError`], [`NormalizeError`]) are recorded and failover moves
//! on to the next mirror.

use thiserror::Error;

use crate::ids::ResourceId;

/// Failure of a single mirror attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Mirror unreachable, timed out, or answered with a non-success status.
    #[error("transport error for {url}: {reason}")]
    Transport { url: String, reason: String },

    /// Payload is not structured data, even after the lenient repair pass.
    #[error("parse error for {url}: {reason}")]
    Parse { url: String, reason: String },
}

impl FetchError {
    pub fn transport(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Transport {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Parse {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

/// Normalization produced nothing usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("schema error: {0}")]
    Schema(String),
}

/// Why one tier or mirror was skipped, kept for the final error report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptFailure {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("{url}: {source}")]
    Normalize {
        url: String,
        #[source]
        source: NormalizeError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcquireError {
    /// Every tier exhausted and no bundled fallback exists.
    #[error("resource unavailable: {resource_id} ({} mirror attempts failed)", attempts.len())]
    ResourceUnavailable {
        resource_id: ResourceId,
        attempts: Vec<AttemptFailure>,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue { key: String, reason: String },
}
