//! Error types for Casedesk.
//!
//! All failures are local and recoverable: an operation returns an error
//! result and leaves the store untouched, so the caller can keep issuing
//! operations against other cases in the same session.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaseError {
    #[error("Case {0} not found")]
    CaseNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl CaseError {
    /// Stable machine-readable code for structured output
    pub fn code(&self) -> &'static str {
        match self {
            CaseError::CaseNotFound(_) => "not_found",
            CaseError::InvalidArgument(_) => "invalid_argument",
            CaseError::Validation(_) => "validation_error",
        }
    }
}

pub type CaseResult<T> = Result<T, CaseError>;
