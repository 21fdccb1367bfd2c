//! Shared primitives for all Rust crates in Taskhub.

#![forbid(unsafe_code)]

/// Typed access-control failures.
pub mod access;
/// Offset pagination primitives.
pub mod page;
/// Organization and team scope identifiers.
pub mod scope;

use thiserror::Error;

pub use access::AccessError;
pub use page::{Page, PageRequest};
pub use scope::{Scope, ScopeKind};

/// Result type used across Taskhub crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// User is not authenticated.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// User is authenticated but blocked by policy outside the role graph.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Role, permission or membership failure raised by the access-control core.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the typed access failure, if this error carries one.
    #[must_use]
    pub fn as_access(&self) -> Option<&AccessError> {
        match self {
            Self::Access(error) => Some(error),
            _ => None,
        }
    }
}
