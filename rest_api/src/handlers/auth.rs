// rest_api/src/handlers/auth.rs

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use audit::RecordDetails;
use models::{Actor, AuditAction, AuditEntity};
use security::LoginRequest;

use crate::error::ApiError;
use crate::AppState;

/// POST /api/v1/auth/login. Public; the only route that issues tokens.
/// Successful logins are recorded directly because no actor exists on
/// the request for the capture layer to attribute.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let outcome = security::login(&state.store, &state.issuer, &payload)?;

    let actor = Actor {
        id: outcome.user.id,
        name: outcome.user.full_name(),
        role: outcome.user.role,
    };
    state.recorder.record(
        &actor,
        AuditAction::Login,
        AuditEntity::Session,
        format!("{} logged in", actor.name),
        RecordDetails {
            entity_id: Some(actor.id),
            ..Default::default()
        },
    );

    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "token": outcome.token,
            "user": outcome.user.redacted(),
        })),
    )
        .into_response())
}
