use thiserror::Error;

use crate::gate::Role;

/// Violations of record-level invariants, caught before any network call.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown {field} value `{value}`")]
    UnknownStatus { field: &'static str, value: String },
    #[error("a rejection reason is required")]
    MissingRejectionReason,
    #[error("a reversal reason is required")]
    MissingReversalReason,
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

/// Mutation blocked by approval state. Resolved entirely client-side;
/// the backend re-enforces the same rule authoritatively.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GuardError {
    #[error("{reason}")]
    Protected { reason: String },
}

/// Failure taxonomy for approval transitions.
///
/// `Validation`, `Guard`, and `Unauthorized` never reach the backend.
/// `Backend` carries the backend-supplied message verbatim; `Network` is a
/// transport-level failure with no response received. No automatic retry in
/// either case.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApprovalError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("role `{role}` is not permitted to perform approval transitions")]
    Unauthorized { role: Role },
    #[error(transparent)]
    Guard(#[from] GuardError),
    #[error("backend rejected the call: {0}")]
    Backend(String),
    #[error("network failure: {0}")]
    Network(String),
}

impl From<DomainError> for ApprovalError {
    fn from(value: DomainError) -> Self {
        Self::Validation(value.to_string())
    }
}
