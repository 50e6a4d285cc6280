// storage/src/doctors.rs

use uuid::Uuid;

use models::errors::SoftConflict;
use models::{Availability, ClinicError, ClinicResult, Doctor, UpdateDoctor};

use crate::store::ClinicStore;

impl ClinicStore {
    pub fn create_doctor(&self, doctor: Doctor) -> ClinicResult<Doctor> {
        self.put_doc(&self.doctors, doctor.id, &doctor)?;
        Ok(doctor)
    }

    pub fn get_doctor(&self, id: Uuid) -> ClinicResult<Option<Doctor>> {
        self.get_doc(&self.doctors, id)
    }

    pub fn list_doctors(&self) -> ClinicResult<Vec<Doctor>> {
        self.list_docs(&self.doctors)
    }

    /// Generic update. Room changes go through the same occupancy check
    /// as `assign_room`; overriding an occupied room requires the
    /// dedicated room-assignment operation with its force flag.
    pub fn update_doctor(&self, id: Uuid, update: UpdateDoctor) -> ClinicResult<Doctor> {
        let mut doctor: Doctor = self
            .get_doctor(id)?
            .ok_or(ClinicError::NotFound("doctor"))?;
        if let Some(v) = update.specialty_id {
            doctor.specialty_id = v;
        }
        if let Some(v) = update.room_id {
            if doctor.room_id != Some(v) {
                if let Some(occupant) = self.room_occupant(v, id)? {
                    return Err(SoftConflict::RoomOccupied {
                        occupant: occupant.id,
                    }
                    .into());
                }
            }
            doctor.room_id = Some(v);
        }
        if let Some(v) = update.availability {
            doctor.availability = v;
        }
        doctor.updated_at = chrono::Utc::now();
        self.put_doc(&self.doctors, id, &doctor)?;
        Ok(doctor)
    }

    pub fn delete_doctor(&self, id: Uuid) -> ClinicResult<Doctor> {
        let doctor: Doctor = self
            .get_doctor(id)?
            .ok_or(ClinicError::NotFound("doctor"))?;
        self.remove_doc(&self.doctors, id)?;
        Ok(doctor)
    }

    /// Another doctor already referencing `room_id`, if any. Advisory
    /// only; room assignment has no hard uniqueness.
    pub fn room_occupant(&self, room_id: Uuid, exclude: Uuid) -> ClinicResult<Option<Doctor>> {
        for doctor in self.list_doctors()? {
            if doctor.id != exclude && doctor.room_id == Some(room_id) {
                return Ok(Some(doctor));
            }
        }
        Ok(None)
    }

    /// Room/availability assignment under the soft-conflict policy.
    /// Without `force`, an occupied room is reported back with the
    /// occupant's identity and nothing is written; with `force` the
    /// assignment proceeds anyway.
    pub fn assign_room(
        &self,
        id: Uuid,
        room_id: Uuid,
        availability: Option<Availability>,
        force: bool,
    ) -> ClinicResult<Doctor> {
        let mut doctor: Doctor = self
            .get_doctor(id)?
            .ok_or(ClinicError::NotFound("doctor"))?;

        if !force {
            if let Some(occupant) = self.room_occupant(room_id, id)? {
                return Err(SoftConflict::RoomOccupied {
                    occupant: occupant.id,
                }
                .into());
            }
        }

        doctor.room_id = Some(room_id);
        if let Some(v) = availability {
            doctor.availability = v;
        }
        doctor.updated_at = chrono::Utc::now();
        self.put_doc(&self.doctors, id, &doctor)?;
        Ok(doctor)
    }
}
