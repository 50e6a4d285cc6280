// models/src/errors.rs

use chrono::{NaiveDate, NaiveTime};
pub use thiserror::Error;
use uuid::Uuid;

/// A scheduling or uniqueness rule was violated. These are terminal for the
/// request: the write is rejected and nothing is mutated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("doctor already has an appointment at {date} {time}")]
    DoctorSlotConflict { date: NaiveDate, time: NaiveTime },
    #[error("patient {0} already has a pending appointment")]
    PatientPendingConflict(Uuid),
    #[error("appointments must be scheduled in the future")]
    PastScheduling,
    #[error("national id {0} is already registered")]
    DuplicateNationalId(String),
    #[error("invalid date format: {0}")]
    InvalidDateFormat(String),
}

/// A conflict the caller may override with an explicit force flag,
/// as opposed to a hard validation failure.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SoftConflict {
    #[error("room is already assigned to doctor {occupant}")]
    RoomOccupied { occupant: Uuid },
}

/// Authentication failures. Deliberately coarse: unknown identifier and
/// wrong password both surface as `InvalidCredentials` so callers cannot
/// enumerate accounts.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid or expired token")]
    InvalidOrExpiredToken,
    #[error("password hashing error: {0}")]
    PasswordHash(String),
    #[error("token error: {0}")]
    Token(String),
    #[error("internal auth error: {0}")]
    Internal(String),
}

/// Authorization failures produced by the access policy gate, before any
/// handler logic runs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AccessError {
    #[error("unknown resource '{0}'")]
    UnknownResource(String),
    #[error("verb {verb} is not defined for resource '{resource}'")]
    UnknownVerb { resource: String, verb: String },
    #[error("role '{role}' may not {verb} on '{resource}'")]
    RoleNotAllowed {
        role: String,
        verb: String,
        resource: String,
    },
}

/// Top-level error for the clinic core.
#[derive(Debug, Error)]
pub enum ClinicError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Soft(#[from] SoftConflict),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("internal error: {0}")]
    Internal(String),
}

pub type ClinicResult<T> = Result<T, ClinicError>;
