//! Error types for the eligibility pipeline

use thiserror::Error;

use crate::db::DbError;

/// Failure modes surfaced by `EligibilityService::assess`
///
/// Generation and parse failures never appear here: they degrade to the
/// fallback verdict inside the pipeline.
#[derive(Debug, Error)]
pub enum EligibilityError {
    /// The profile is missing a required field; raised before any
    /// external call
    #[error("Invalid profile: {0}")]
    Validation(String),

    /// The eligibility log could not be written; this is the system of
    /// record, so the failure is surfaced
    #[error("Failed to persist eligibility check: {0}")]
    Persistence(#[from] DbError),
}
