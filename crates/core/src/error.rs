//! Domain error model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, per-item failures. Both variants are
/// fatal to a single evaluation only: callers skip the offending SKU and carry
/// on with the rest of the batch. Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Missing or invalid static configuration (no eligible vendor offer,
    /// non-positive cost parameters).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Malformed or insufficient per-item data (negative quantities, missing
    /// demand forecast when one is required).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Coarse classification, suitable for reporting skipped items.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Configuration(_) => ErrorKind::Configuration,
            DomainError::Validation(_) => ErrorKind::Validation,
        }
    }

    /// The human-readable detail without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            DomainError::Configuration(m) | DomainError::Validation(m) => m,
        }
    }
}

/// Kind of failure attached to a skipped item.
///
/// `Source` is not produced by the domain layer; it marks items whose inputs
/// could not be fetched from an upstream collaborator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Validation,
    Source,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Validation => "validation",
            ErrorKind::Source => "source",
        };
        f.write_str(s)
    }
}
