//! # AppError
//!
//! Centralized error handling for the Patrika ecosystem.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all pk-core operations.
///
/// `NotFound` and `AuthorMismatch` are expected outcomes of a lookup, not
/// bugs; callers must render the same "article not found" response for both
/// so that a slug's existence under a different author is never revealed.
#[derive(Error, Debug)]
pub enum AppError {
    /// No article's slug (persisted or recomputed) matches the request
    #[error("article not found")]
    NotFound,

    /// A slug matched, but the author token does not denote its author
    #[error("author mismatch")]
    AuthorMismatch,

    /// Validation failure (e.g., empty title on creation)
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource already exists (e.g., duplicate (author_id, slug) pair)
    #[error("conflict: {0}")]
    Conflict(String),

    /// The article corpus could not be read or written; retryable
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

/// A specialized Result type for Patrika logic.
pub type Result<T> = std::result::Result<T, AppError>;
