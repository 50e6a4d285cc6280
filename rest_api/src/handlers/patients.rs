// rest_api/src/handlers/patients.rs

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use audit::AuditContext;
use models::{AuditAction, AuditEntity, ClinicError, NewPatient, Patient, PatientStatus, UpdatePatient};

use crate::error::ApiError;
use crate::handlers::{created_audited, ok, ok_audited};
use crate::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Response, ApiError> {
    let patients = state.store.list_patients()?;
    ok(&patients)
}

pub async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let patient = state
        .store
        .get_patient(id)?
        .ok_or(ClinicError::NotFound("patient"))?;
    ok(&patient)
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewPatient>,
) -> Result<Response, ApiError> {
    let patient = state.store.create_patient(Patient::from_new(payload))?;
    let ctx = AuditContext {
        action: AuditAction::Create,
        entity: AuditEntity::Patient,
        entity_id: Some(patient.id),
        description: format!("created patient {}", patient.full_name()),
        before: None,
        after: Some(serde_json::to_value(&patient).map_err(ClinicError::from)?),
    };
    created_audited(&patient, ctx)
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePatient>,
) -> Result<Response, ApiError> {
    let before = state
        .store
        .get_patient(id)?
        .ok_or(ClinicError::NotFound("patient"))?;
    let updated = state.store.update_patient(id, payload)?;
    let ctx = AuditContext {
        action: AuditAction::Update,
        entity: AuditEntity::Patient,
        entity_id: Some(id),
        description: format!("updated patient {}", updated.full_name()),
        before: Some(serde_json::to_value(&before).map_err(ClinicError::from)?),
        after: Some(serde_json::to_value(&updated).map_err(ClinicError::from)?),
    };
    ok_audited(&updated, ctx)
}

#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    pub status: PatientStatus,
}

/// PUT /api/v1/patients/:id/status — the idempotent activate/deactivate
/// toggle that replaces deletion in the normal lifecycle.
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusPayload>,
) -> Result<Response, ApiError> {
    let before = state
        .store
        .get_patient(id)?
        .ok_or(ClinicError::NotFound("patient"))?;
    let updated = state.store.set_patient_status(id, payload.status)?;
    let ctx = AuditContext {
        action: AuditAction::StatusChange,
        entity: AuditEntity::Patient,
        entity_id: Some(id),
        description: format!(
            "set patient {} status to {:?}",
            updated.full_name(),
            updated.status
        ),
        before: Some(serde_json::to_value(&before).map_err(ClinicError::from)?),
        after: Some(serde_json::to_value(&updated).map_err(ClinicError::from)?),
    };
    ok_audited(&updated, ctx)
}

/// DELETE /api/v1/patients/:id — explicit administrator delete, outside
/// the normal soft-deactivation flow.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let deleted = state.store.delete_patient(id)?;
    let ctx = AuditContext {
        action: AuditAction::Delete,
        entity: AuditEntity::Patient,
        entity_id: Some(id),
        description: format!("deleted patient {}", deleted.full_name()),
        before: Some(serde_json::to_value(&deleted).map_err(ClinicError::from)?),
        after: None,
    };
    ok_audited(&deleted, ctx)
}
