//! Error types for jotter.
//!
//! Three layers of failure exist:
//!
//! - [`Error`] is the crate-wide error. Storage failures (`NoteNotFound`,
//!   `Unauthorized`) travel through it unmodified to the caller.
//! - [`GenerationError`] names why a call to the generation service produced
//!   nothing usable. Query resolution and enrichment match on it and pick a
//!   fallback; it is never shown to an end user.
//! - [`RankError`] is raised by similarity ranking and aborts the semantic
//!   tier only.
//!
//! Both of the latter map to a [`FallbackReason`], which callers log and
//! report alongside the fallback result.

use serde::Serialize;
use thiserror::Error;

/// Result type alias using jotter's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for jotter operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Note not found
    #[error("Note not found: {0}")]
    NoteNotFound(uuid::Uuid),

    /// Caller does not own the resource
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Why a generation call produced no usable output.
///
/// Timeouts are reported as `ServiceUnavailable`, same as refused
/// connections and non-success statuses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Probe failed, or the call errored or timed out.
    #[error("generation service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The service answered but the body had the wrong shape.
    #[error("malformed generation response: {0}")]
    MalformedResponse(String),
}

impl GenerationError {
    /// The failure reason a caller routes its fallback on.
    pub fn reason(&self) -> FallbackReason {
        match self {
            Self::ServiceUnavailable(_) => FallbackReason::ServiceUnavailable,
            Self::MalformedResponse(_) => FallbackReason::MalformedResponse,
        }
    }
}

/// Failures raised while ranking notes by vector similarity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RankError {
    /// A note vector's length differs from the query vector's length.
    #[error("dimension mismatch at candidate {index}: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: usize,
        actual: usize,
        index: usize,
    },
}

impl RankError {
    pub fn reason(&self) -> FallbackReason {
        match self {
            Self::DimensionMismatch { .. } => FallbackReason::DimensionMismatch,
        }
    }
}

/// Why a caller replaced a generated result with its local fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// Probe failed, or the call errored or timed out.
    ServiceUnavailable,
    /// The service answered with the wrong shape.
    MalformedResponse,
    /// Note and query vectors had different lengths.
    DimensionMismatch,
}

impl FallbackReason {
    /// Short machine-readable form, used as a log field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ServiceUnavailable => "service_unavailable",
            Self::MalformedResponse => "malformed_response",
            Self::DimensionMismatch => "dimension_mismatch",
        }
    }
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
