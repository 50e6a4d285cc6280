// rest_api/src/handlers/appointments.rs

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use audit::AuditContext;
use models::{
    AppointmentStatus, AuditAction, AuditEntity, ClinicError, NewAppointment, UpdateAppointment,
};

use crate::error::ApiError;
use crate::handlers::{created_audited, ok, ok_audited};
use crate::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Response, ApiError> {
    let appointments = state.store.list_appointments()?;
    ok(&appointments)
}

pub async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let appointment = state
        .store
        .get_appointment(id)?
        .ok_or(ClinicError::NotFound("appointment"))?;
    ok(&appointment)
}

/// POST /api/v1/appointments. Runs the full validation pass (doctor
/// slot, patient pending, future date) before the conditional insert.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewAppointment>,
) -> Result<Response, ApiError> {
    let appointment = state.store.create_appointment(payload)?;
    let ctx = AuditContext {
        action: AuditAction::Create,
        entity: AuditEntity::Appointment,
        entity_id: Some(appointment.id),
        description: format!(
            "scheduled appointment on {} {} for patient {}",
            appointment.date, appointment.time, appointment.patient_id
        ),
        before: None,
        after: Some(serde_json::to_value(&appointment).map_err(ClinicError::from)?),
    };
    created_audited(&appointment, ctx)
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAppointment>,
) -> Result<Response, ApiError> {
    let before = state
        .store
        .get_appointment(id)?
        .ok_or(ClinicError::NotFound("appointment"))?;
    let updated = state.store.update_appointment(id, payload)?;
    let ctx = AuditContext {
        action: AuditAction::Update,
        entity: AuditEntity::Appointment,
        entity_id: Some(id),
        description: format!("updated appointment {}", id),
        before: Some(serde_json::to_value(&before).map_err(ClinicError::from)?),
        after: Some(serde_json::to_value(&updated).map_err(ClinicError::from)?),
    };
    ok_audited(&updated, ctx)
}

#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    pub status: AppointmentStatus,
}

pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusPayload>,
) -> Result<Response, ApiError> {
    let before = state
        .store
        .get_appointment(id)?
        .ok_or(ClinicError::NotFound("appointment"))?;
    let update = UpdateAppointment {
        status: Some(payload.status),
        ..Default::default()
    };
    let updated = state.store.update_appointment(id, update)?;
    let ctx = AuditContext {
        action: AuditAction::StatusChange,
        entity: AuditEntity::Appointment,
        entity_id: Some(id),
        description: format!(
            "set appointment {} status to {:?}",
            id,
            updated.status
        ),
        before: Some(serde_json::to_value(&before).map_err(ClinicError::from)?),
        after: Some(serde_json::to_value(&updated).map_err(ClinicError::from)?),
    };
    ok_audited(&updated, ctx)
}

/// DELETE /api/v1/appointments/:id — explicit administrator delete;
/// appointments are never removed by the normal flow.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let deleted = state.store.delete_appointment(id)?;
    let ctx = AuditContext {
        action: AuditAction::Delete,
        entity: AuditEntity::Appointment,
        entity_id: Some(id),
        description: format!("deleted appointment {}", id),
        before: Some(serde_json::to_value(&deleted).map_err(ClinicError::from)?),
        after: None,
    };
    ok_audited(&deleted, ctx)
}
