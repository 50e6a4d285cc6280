// rest_api/src/handlers/users.rs
//
// Staff account management, administrator only (enforced by the gate).
// Passwords are hashed before anything reaches the store; responses and
// audit snapshots carry the redacted view.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;

use audit::AuditContext;
use models::{AuditAction, AuditEntity, ClinicError, NewUser, UpdateUser, User};
use security::password;

use crate::error::ApiError;
use crate::handlers::{created_audited, ok, ok_audited};
use crate::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Response, ApiError> {
    let users: Vec<serde_json::Value> = state
        .store
        .list_users()?
        .iter()
        .map(User::redacted)
        .collect();
    ok(&users)
}

pub async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let user = state
        .store
        .get_user(id)?
        .ok_or(ClinicError::NotFound("user"))?;
    ok(&user.redacted())
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> Result<Response, ApiError> {
    let hash = password::hash_password(&payload.password)?;
    let user = state.store.create_user(User::from_new_user(payload, hash))?;
    let ctx = AuditContext {
        action: AuditAction::Create,
        entity: AuditEntity::User,
        entity_id: Some(user.id),
        description: format!("created {} account for {}", user.role, user.full_name()),
        before: None,
        after: Some(user.redacted()),
    };
    created_audited(&user.redacted(), ctx)
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut payload): Json<UpdateUser>,
) -> Result<Response, ApiError> {
    let before = state
        .store
        .get_user(id)?
        .ok_or(ClinicError::NotFound("user"))?;

    // The store expects a hash in the password slot, never plaintext.
    if let Some(plain) = payload.password.take() {
        payload.password = Some(password::hash_password(&plain)?);
    }

    let updated = state.store.update_user(id, payload)?;
    let ctx = AuditContext {
        action: AuditAction::Update,
        entity: AuditEntity::User,
        entity_id: Some(id),
        description: format!("updated account for {}", updated.full_name()),
        before: Some(before.redacted()),
        after: Some(updated.redacted()),
    };
    ok_audited(&updated.redacted(), ctx)
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let deleted = state.store.delete_user(id)?;
    let ctx = AuditContext {
        action: AuditAction::Delete,
        entity: AuditEntity::User,
        entity_id: Some(id),
        description: format!("deleted account for {}", deleted.full_name()),
        before: Some(deleted.redacted()),
        after: None,
    };
    ok_audited(&deleted.redacted(), ctx)
}
