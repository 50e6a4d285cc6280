// rest_api/src/error.rs

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use models::errors::{AccessError, AuthError, SoftConflict, ValidationError};
use models::ClinicError;

/// HTTP-facing wrapper for the core error taxonomy. Each variant maps to
/// a status code and a machine-readable reason tag.
#[derive(Debug)]
pub struct ApiError(pub ClinicError);

impl From<ClinicError> for ApiError {
    fn from(e: ClinicError) -> Self {
        ApiError(e)
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        ApiError(ClinicError::Auth(e))
    }
}

impl From<AccessError> for ApiError {
    fn from(e: AccessError) -> Self {
        ApiError(ClinicError::Access(e))
    }
}

fn reason(e: &ClinicError) -> &'static str {
    match e {
        ClinicError::Validation(v) => match v {
            ValidationError::DoctorSlotConflict { .. } => "doctor_slot_conflict",
            ValidationError::PatientPendingConflict(_) => "patient_pending_conflict",
            ValidationError::PastScheduling => "past_scheduling",
            ValidationError::DuplicateNationalId(_) => "duplicate_national_id",
            ValidationError::InvalidDateFormat(_) => "invalid_date_format",
        },
        ClinicError::Soft(SoftConflict::RoomOccupied { .. }) => "room_occupied",
        ClinicError::Auth(AuthError::InvalidCredentials) => "invalid_credentials",
        ClinicError::Auth(AuthError::InvalidOrExpiredToken) => "invalid_or_expired_token",
        ClinicError::Auth(_) => "auth_error",
        ClinicError::Access(AccessError::UnknownResource(_)) => "unknown_resource",
        ClinicError::Access(AccessError::UnknownVerb { .. }) => "unknown_verb",
        ClinicError::Access(AccessError::RoleNotAllowed { .. }) => "role_not_allowed",
        ClinicError::NotFound(_) => "not_found",
        ClinicError::Serialization(_) | ClinicError::InvalidInput(_) => "invalid_input",
        ClinicError::Storage(_) | ClinicError::Internal(_) => "internal_error",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ClinicError::Validation(v) => match v {
                ValidationError::PastScheduling | ValidationError::InvalidDateFormat(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                _ => StatusCode::CONFLICT,
            },
            ClinicError::Soft(_) => StatusCode::CONFLICT,
            ClinicError::Auth(AuthError::InvalidCredentials)
            | ClinicError::Auth(AuthError::InvalidOrExpiredToken) => StatusCode::UNAUTHORIZED,
            ClinicError::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ClinicError::Access(_) => StatusCode::FORBIDDEN,
            ClinicError::NotFound(_) => StatusCode::NOT_FOUND,
            ClinicError::Serialization(_) | ClinicError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ClinicError::Storage(_) | ClinicError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let mut body = json!({
            "status": "error",
            "reason": reason(&self.0),
            "message": self.0.to_string(),
        });

        // The soft conflict carries the occupant so the caller can decide
        // whether to resubmit with force=true.
        if let ClinicError::Soft(SoftConflict::RoomOccupied { occupant }) = &self.0 {
            body["occupant"] = json!(occupant);
            body["hint"] = json!("resubmit with force=true to override");
        }

        (status, Json(body)).into_response()
    }
}
