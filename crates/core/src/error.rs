//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures the caller can act on
/// (bad requests, unknown resources, expired waits). Handler failures inside
/// the event bus are deliberately *not* represented here: the bus logs them
/// and isolates them from siblings instead of surfacing them to the emitter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A request failed validation (e.g. inverted stay dates).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested resource was not found (e.g. unknown property).
    #[error("not found: {0}")]
    NotFound(String),

    /// A bounded wait expired before the expected event arrived.
    #[error("timed out: {0}")]
    Timeout(String),

    /// An external collaborator (PMS, delivery channel) failed.
    ///
    /// Pricing cannot produce a trustworthy quote without availability data,
    /// so these propagate to the caller rather than degrade silently.
    #[error("integration failure: {0}")]
    Integration(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    pub fn integration(msg: impl Into<String>) -> Self {
        Self::Integration(msg.into())
    }
}
