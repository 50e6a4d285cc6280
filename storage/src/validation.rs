// storage/src/validation.rs
//
// Scheduling policy checks, run before any appointment mutation. These
// are pure decisions over a point-in-time read of the store; the write
// path re-enforces the uniqueness rules with conditional index writes.

use chrono::Utc;
use uuid::Uuid;

use models::errors::ValidationError;
use models::{combine, Appointment, AppointmentStatus, ClinicResult, NewAppointment, UpdateAppointment};

use crate::store::ClinicStore;

/// Checks a proposed appointment, short-circuiting on the first failure:
/// doctor slot, then patient pending, then future date.
pub fn validate_create(store: &ClinicStore, candidate: &NewAppointment) -> ClinicResult<()> {
    if store
        .slot_holder(candidate.doctor_id, candidate.date, candidate.time)?
        .is_some()
    {
        return Err(ValidationError::DoctorSlotConflict {
            date: candidate.date,
            time: candidate.time,
        }
        .into());
    }

    if store.pending_holder(candidate.patient_id)?.is_some() {
        return Err(ValidationError::PatientPendingConflict(candidate.patient_id).into());
    }

    if combine(candidate.date, candidate.time) <= Utc::now() {
        return Err(ValidationError::PastScheduling.into());
    }

    Ok(())
}

/// Same checks for an update, excluding the appointment being updated
/// from the conflict queries. The future-date check applies only when
/// the payload reschedules.
pub fn validate_update(
    store: &ClinicStore,
    id: Uuid,
    current: &Appointment,
    update: &UpdateAppointment,
) -> ClinicResult<()> {
    let date = update.date.unwrap_or(current.date);
    let time = update.time.unwrap_or(current.time);
    let status = update.status.unwrap_or(current.status);

    match store.slot_holder(current.doctor_id, date, time)? {
        Some(holder) if holder != id => {
            return Err(ValidationError::DoctorSlotConflict { date, time }.into());
        }
        _ => {}
    }

    if status == AppointmentStatus::Pending {
        match store.pending_holder(current.patient_id)? {
            Some(holder) if holder != id => {
                return Err(ValidationError::PatientPendingConflict(current.patient_id).into());
            }
            _ => {}
        }
    }

    if update.reschedules() && combine(date, time) <= Utc::now() {
        return Err(ValidationError::PastScheduling.into());
    }

    Ok(())
}
