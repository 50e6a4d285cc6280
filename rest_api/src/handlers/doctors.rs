// rest_api/src/handlers/doctors.rs

use axum::extract::{Path, State};
use axum::response::Response;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use audit::{AuditContext, RecordDetails};
use models::{
    Actor, AuditAction, AuditEntity, Availability, ClinicError, Doctor, NewDoctor, UpdateDoctor,
};

use crate::error::ApiError;
use crate::handlers::{created_audited, ok, ok_audited};
use crate::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Response, ApiError> {
    let doctors = state.store.list_doctors()?;
    ok(&doctors)
}

pub async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let doctor = state
        .store
        .get_doctor(id)?
        .ok_or(ClinicError::NotFound("doctor"))?;
    ok(&doctor)
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewDoctor>,
) -> Result<Response, ApiError> {
    let doctor = state.store.create_doctor(Doctor::from_new(payload))?;
    let ctx = AuditContext {
        action: AuditAction::Create,
        entity: AuditEntity::Doctor,
        entity_id: Some(doctor.id),
        description: format!("created doctor record {}", doctor.id),
        before: None,
        after: Some(serde_json::to_value(&doctor).map_err(ClinicError::from)?),
    };
    created_audited(&doctor, ctx)
}

pub async fn update(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDoctor>,
) -> Result<Response, ApiError> {
    let before = state
        .store
        .get_doctor(id)?
        .ok_or(ClinicError::NotFound("doctor"))?;
    match state.store.update_doctor(id, payload) {
        Ok(updated) => {
            let ctx = AuditContext {
                action: AuditAction::Update,
                entity: AuditEntity::Doctor,
                entity_id: Some(id),
                description: format!("updated doctor record {}", id),
                before: Some(serde_json::to_value(&before).map_err(ClinicError::from)?),
                after: Some(serde_json::to_value(&updated).map_err(ClinicError::from)?),
            };
            ok_audited(&updated, ctx)
        }
        Err(e @ ClinicError::Soft(_)) => {
            state.recorder.record_failure(
                &actor,
                AuditAction::Update,
                AuditEntity::Doctor,
                format!("room change for doctor {} refused", id),
                e.to_string(),
                RecordDetails {
                    entity_id: Some(id),
                    ..Default::default()
                },
            );
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let deleted = state.store.delete_doctor(id)?;
    let ctx = AuditContext {
        action: AuditAction::Delete,
        entity: AuditEntity::Doctor,
        entity_id: Some(id),
        description: format!("deleted doctor record {}", id),
        before: Some(serde_json::to_value(&deleted).map_err(ClinicError::from)?),
        after: None,
    };
    ok_audited(&deleted, ctx)
}

#[derive(Debug, Deserialize)]
pub struct RoomAssignment {
    pub room_id: Uuid,
    pub availability: Option<Availability>,
    #[serde(default)]
    pub force: bool,
}

/// PUT /api/v1/doctors/:id/room. An occupied room comes back as a 409
/// the caller may override by resubmitting with force=true. The refused
/// attempt is recorded here with succeeded=false (it never reaches the
/// capture layer); the forced override is recorded as its own action.
pub async fn assign_room(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RoomAssignment>,
) -> Result<Response, ApiError> {
    let before = state
        .store
        .get_doctor(id)?
        .ok_or(ClinicError::NotFound("doctor"))?;

    match state
        .store
        .assign_room(id, payload.room_id, payload.availability, payload.force)
    {
        Ok(doctor) => {
            let (action, description) = if payload.force {
                (
                    AuditAction::ForcedAssign,
                    format!(
                        "forced room {} assignment to doctor {}",
                        payload.room_id, id
                    ),
                )
            } else {
                (
                    AuditAction::Update,
                    format!("assigned room {} to doctor {}", payload.room_id, id),
                )
            };
            let ctx = AuditContext {
                action,
                entity: AuditEntity::Doctor,
                entity_id: Some(id),
                description,
                before: Some(serde_json::to_value(&before).map_err(ClinicError::from)?),
                after: Some(serde_json::to_value(&doctor).map_err(ClinicError::from)?),
            };
            ok_audited(&doctor, ctx)
        }
        Err(e @ ClinicError::Soft(_)) => {
            state.recorder.record_failure(
                &actor,
                AuditAction::Update,
                AuditEntity::Doctor,
                format!(
                    "room {} assignment to doctor {} refused",
                    payload.room_id, id
                ),
                e.to_string(),
                RecordDetails {
                    entity_id: Some(id),
                    ..Default::default()
                },
            );
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}
