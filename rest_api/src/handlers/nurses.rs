// rest_api/src/handlers/nurses.rs
//
// Nurse catalog CRUD. Create/update/delete rely on the capture layer's
// synthesized audit descriptions; there are no snapshots worth carrying
// beyond what the route already says.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use uuid::Uuid;

use models::{ClinicError, NewNurse, UpdateNurse};

use crate::error::ApiError;
use crate::handlers::ok;
use crate::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Response, ApiError> {
    let nurses = state.store.list_nurses()?;
    ok(&nurses)
}

pub async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let nurse = state
        .store
        .get_nurse(id)?
        .ok_or(ClinicError::NotFound("nurse"))?;
    ok(&nurse)
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewNurse>,
) -> Result<Response, ApiError> {
    let nurse = state.store.create_nurse(payload)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "data": nurse })),
    )
        .into_response())
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateNurse>,
) -> Result<Response, ApiError> {
    let nurse = state.store.update_nurse(id, payload)?;
    ok(&nurse)
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let nurse = state.store.delete_nurse(id)?;
    ok(&nurse)
}
