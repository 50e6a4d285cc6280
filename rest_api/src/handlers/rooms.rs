// rest_api/src/handlers/rooms.rs

use axum::extract::{Path, State};
use axum::response::Response;
use axum::{Extension, Json};
use uuid::Uuid;

use audit::AuditContext;
use models::{Actor, AuditAction, AuditEntity, ClinicError, NewRoom, Room, UpdateRoom};

use crate::error::ApiError;
use crate::handlers::{created_audited, ok, ok_audited};
use crate::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Response, ApiError> {
    let rooms = state.store.list_rooms()?;
    ok(&rooms)
}

pub async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let room = state
        .store
        .get_room(id)?
        .ok_or(ClinicError::NotFound("room"))?;
    ok(&room)
}

pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<NewRoom>,
) -> Result<Response, ApiError> {
    let room = state
        .store
        .create_room(Room::from_new(payload, Some(actor.id)))?;
    let ctx = AuditContext {
        action: AuditAction::Create,
        entity: AuditEntity::Room,
        entity_id: Some(room.id),
        description: format!("created room {}", room.name),
        before: None,
        after: Some(serde_json::to_value(&room).map_err(ClinicError::from)?),
    };
    created_audited(&room, ctx)
}

pub async fn update(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoom>,
) -> Result<Response, ApiError> {
    let before = state
        .store
        .get_room(id)?
        .ok_or(ClinicError::NotFound("room"))?;
    let updated = state.store.update_room(id, payload, Some(actor.id))?;
    let ctx = AuditContext {
        action: AuditAction::Update,
        entity: AuditEntity::Room,
        entity_id: Some(id),
        description: format!("updated room {}", updated.name),
        before: Some(serde_json::to_value(&before).map_err(ClinicError::from)?),
        after: Some(serde_json::to_value(&updated).map_err(ClinicError::from)?),
    };
    ok_audited(&updated, ctx)
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let deleted = state.store.delete_room(id)?;
    let ctx = AuditContext {
        action: AuditAction::Delete,
        entity: AuditEntity::Room,
        entity_id: Some(id),
        description: format!("deleted room {}", deleted.name),
        before: Some(serde_json::to_value(&deleted).map_err(ClinicError::from)?),
        after: None,
    };
    ok_audited(&deleted, ctx)
}
