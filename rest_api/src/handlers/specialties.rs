// rest_api/src/handlers/specialties.rs

use axum::extract::{Path, State};
use axum::response::Response;
use axum::{Extension, Json};
use uuid::Uuid;

use audit::AuditContext;
use models::{Actor, AuditAction, AuditEntity, ClinicError, NewSpecialty, Specialty, UpdateSpecialty};

use crate::error::ApiError;
use crate::handlers::{created_audited, ok, ok_audited};
use crate::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Response, ApiError> {
    let specialties = state.store.list_specialties()?;
    ok(&specialties)
}

pub async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let specialty = state
        .store
        .get_specialty(id)?
        .ok_or(ClinicError::NotFound("specialty"))?;
    ok(&specialty)
}

pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<NewSpecialty>,
) -> Result<Response, ApiError> {
    let specialty = state
        .store
        .create_specialty(Specialty::from_new(payload, Some(actor.id)))?;
    let ctx = AuditContext {
        action: AuditAction::Create,
        entity: AuditEntity::Specialty,
        entity_id: Some(specialty.id),
        description: format!("created specialty {}", specialty.name),
        before: None,
        after: Some(serde_json::to_value(&specialty).map_err(ClinicError::from)?),
    };
    created_audited(&specialty, ctx)
}

pub async fn update(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSpecialty>,
) -> Result<Response, ApiError> {
    let before = state
        .store
        .get_specialty(id)?
        .ok_or(ClinicError::NotFound("specialty"))?;
    let updated = state.store.update_specialty(id, payload, Some(actor.id))?;
    let ctx = AuditContext {
        action: AuditAction::Update,
        entity: AuditEntity::Specialty,
        entity_id: Some(id),
        description: format!("updated specialty {}", updated.name),
        before: Some(serde_json::to_value(&before).map_err(ClinicError::from)?),
        after: Some(serde_json::to_value(&updated).map_err(ClinicError::from)?),
    };
    ok_audited(&updated, ctx)
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let deleted = state.store.delete_specialty(id)?;
    let ctx = AuditContext {
        action: AuditAction::Delete,
        entity: AuditEntity::Specialty,
        entity_id: Some(id),
        description: format!("deleted specialty {}", deleted.name),
        before: Some(serde_json::to_value(&deleted).map_err(ClinicError::from)?),
        after: None,
    };
    ok_audited(&deleted, ctx)
}
