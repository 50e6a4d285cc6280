// storage/src/appointments.rs

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use models::errors::ValidationError;
use models::{
    Appointment, AppointmentStatus, ClinicError, ClinicResult, NewAppointment, UpdateAppointment,
};

use crate::store::{sled_err, ClinicStore};
use crate::validation;

pub(crate) fn slot_key(doctor_id: Uuid, date: NaiveDate, time: NaiveTime) -> Vec<u8> {
    format!("{}|{}|{}", doctor_id, date, time.format("%H:%M:%S")).into_bytes()
}

fn decode_id(bytes: &[u8]) -> ClinicResult<Uuid> {
    Uuid::from_slice(bytes).map_err(|e| ClinicError::Storage(format!("corrupt index value: {}", e)))
}

impl ClinicStore {
    /// Which appointment, if any, holds the doctor's (date, time) slot.
    pub fn slot_holder(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
    ) -> ClinicResult<Option<Uuid>> {
        match self
            .appointment_slots
            .get(slot_key(doctor_id, date, time))
            .map_err(sled_err)?
        {
            Some(bytes) => Ok(Some(decode_id(&bytes)?)),
            None => Ok(None),
        }
    }

    /// The patient's single pending appointment, if one exists.
    pub fn pending_holder(&self, patient_id: Uuid) -> ClinicResult<Option<Uuid>> {
        match self
            .pending_appointments
            .get(patient_id.as_bytes())
            .map_err(sled_err)?
        {
            Some(bytes) => Ok(Some(decode_id(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Validates and inserts a new appointment. The invariants checked by
    /// the validation pass are re-enforced here with compare_and_swap on
    /// the slot and pending indexes, so a concurrent writer racing past
    /// validation still loses with the same tagged error.
    pub fn create_appointment(&self, candidate: NewAppointment) -> ClinicResult<Appointment> {
        validation::validate_create(self, &candidate)?;

        let appointment = Appointment::from_new(candidate);
        let slot = slot_key(appointment.doctor_id, appointment.date, appointment.time);

        let slot_claim = self
            .appointment_slots
            .compare_and_swap(
                slot.clone(),
                None::<&[u8]>,
                Some(appointment.id.as_bytes().to_vec()),
            )
            .map_err(sled_err)?;
        if slot_claim.is_err() {
            return Err(ValidationError::DoctorSlotConflict {
                date: appointment.date,
                time: appointment.time,
            }
            .into());
        }

        let pending_claim = self
            .pending_appointments
            .compare_and_swap(
                appointment.patient_id.as_bytes(),
                None::<&[u8]>,
                Some(appointment.id.as_bytes().to_vec()),
            )
            .map_err(sled_err)?;
        if pending_claim.is_err() {
            // Release the slot we just took before reporting the conflict.
            self.appointment_slots.remove(slot).map_err(sled_err)?;
            return Err(ValidationError::PatientPendingConflict(appointment.patient_id).into());
        }

        self.put_doc(&self.appointments, appointment.id, &appointment)?;
        Ok(appointment)
    }

    pub fn get_appointment(&self, id: Uuid) -> ClinicResult<Option<Appointment>> {
        self.get_doc(&self.appointments, id)
    }

    pub fn list_appointments(&self) -> ClinicResult<Vec<Appointment>> {
        self.list_docs(&self.appointments)
    }

    /// Applies an update, moving the slot and pending index entries as
    /// needed. The appointment's own index entries never count as
    /// conflicts against itself.
    pub fn update_appointment(
        &self,
        id: Uuid,
        update: UpdateAppointment,
    ) -> ClinicResult<Appointment> {
        let current: Appointment = self
            .get_appointment(id)?
            .ok_or(ClinicError::NotFound("appointment"))?;

        validation::validate_update(self, id, &current, &update)?;

        let mut updated = current.clone();
        updated.apply(update);

        let old_slot = slot_key(current.doctor_id, current.date, current.time);
        let new_slot = slot_key(updated.doctor_id, updated.date, updated.time);
        let slot_moved = new_slot != old_slot;

        // Cancelled appointments hold no slot: cancellation releases it
        // and re-activation has to win it back.
        let was_active = current.status != AppointmentStatus::Cancelled;
        let is_active = updated.status != AppointmentStatus::Cancelled;

        let claims_slot = is_active && (slot_moved || !was_active);
        if claims_slot {
            let claim = self
                .appointment_slots
                .compare_and_swap(new_slot.clone(), None::<&[u8]>, Some(id.as_bytes().to_vec()))
                .map_err(sled_err)?;
            if claim.is_err() {
                return Err(ValidationError::DoctorSlotConflict {
                    date: updated.date,
                    time: updated.time,
                }
                .into());
            }
        }

        let was_pending = current.status == AppointmentStatus::Pending;
        let is_pending = updated.status == AppointmentStatus::Pending;
        if is_pending && !was_pending {
            let claim = self
                .pending_appointments
                .compare_and_swap(
                    updated.patient_id.as_bytes(),
                    None::<&[u8]>,
                    Some(id.as_bytes().to_vec()),
                )
                .map_err(sled_err)?;
            if claim.is_err() {
                if claims_slot {
                    self.appointment_slots.remove(new_slot).map_err(sled_err)?;
                }
                return Err(ValidationError::PatientPendingConflict(updated.patient_id).into());
            }
        }

        if was_active && (slot_moved || !is_active) {
            self.release_slot(old_slot, id)?;
        }
        if was_pending && !is_pending {
            self.release_pending(current.patient_id, id)?;
        }

        self.put_doc(&self.appointments, id, &updated)?;
        Ok(updated)
    }

    /// Explicit administrator delete.
    pub fn delete_appointment(&self, id: Uuid) -> ClinicResult<Appointment> {
        let appointment: Appointment = self
            .get_appointment(id)?
            .ok_or(ClinicError::NotFound("appointment"))?;

        let slot = slot_key(appointment.doctor_id, appointment.date, appointment.time);
        self.release_slot(slot, id)?;
        self.release_pending(appointment.patient_id, id)?;
        self.remove_doc(&self.appointments, id)?;
        Ok(appointment)
    }

    /// Removes the slot entry only if this appointment holds it.
    fn release_slot(&self, slot: Vec<u8>, id: Uuid) -> ClinicResult<()> {
        let _ = self
            .appointment_slots
            .compare_and_swap(slot, Some(id.as_bytes().to_vec()), None::<&[u8]>)
            .map_err(sled_err)?;
        Ok(())
    }

    /// Removes the pending marker only if this appointment holds it.
    fn release_pending(&self, patient_id: Uuid, id: Uuid) -> ClinicResult<()> {
        let _ = self
            .pending_appointments
            .compare_and_swap(
                patient_id.as_bytes(),
                Some(id.as_bytes().to_vec()),
                None::<&[u8]>,
            )
            .map_err(sled_err)?;
        Ok(())
    }
}
