// storage/src/catalog.rs
//
// Reference catalogs: rooms, specialties, nurses. Plain CRUD with the
// soft-delete `active` flag on the catalogs.

use uuid::Uuid;

use models::{
    ClinicError, ClinicResult, NewNurse, Nurse, Room, Specialty, UpdateNurse, UpdateRoom,
    UpdateSpecialty,
};

use crate::store::ClinicStore;

impl ClinicStore {
    // --- rooms ---

    pub fn create_room(&self, room: Room) -> ClinicResult<Room> {
        self.put_doc(&self.rooms, room.id, &room)?;
        Ok(room)
    }

    pub fn get_room(&self, id: Uuid) -> ClinicResult<Option<Room>> {
        self.get_doc(&self.rooms, id)
    }

    pub fn list_rooms(&self) -> ClinicResult<Vec<Room>> {
        self.list_docs(&self.rooms)
    }

    pub fn update_room(
        &self,
        id: Uuid,
        update: UpdateRoom,
        updated_by: Option<Uuid>,
    ) -> ClinicResult<Room> {
        let mut room: Room = self.get_room(id)?.ok_or(ClinicError::NotFound("room"))?;
        if let Some(v) = update.name {
            room.name = v;
        }
        if update.floor.is_some() {
            room.floor = update.floor;
        }
        if let Some(v) = update.active {
            room.active = v;
        }
        room.updated_by = updated_by;
        room.updated_at = chrono::Utc::now();
        self.put_doc(&self.rooms, id, &room)?;
        Ok(room)
    }

    pub fn delete_room(&self, id: Uuid) -> ClinicResult<Room> {
        let room: Room = self.get_room(id)?.ok_or(ClinicError::NotFound("room"))?;
        self.remove_doc(&self.rooms, id)?;
        Ok(room)
    }

    // --- specialties ---

    pub fn create_specialty(&self, specialty: Specialty) -> ClinicResult<Specialty> {
        self.put_doc(&self.specialties, specialty.id, &specialty)?;
        Ok(specialty)
    }

    pub fn get_specialty(&self, id: Uuid) -> ClinicResult<Option<Specialty>> {
        self.get_doc(&self.specialties, id)
    }

    pub fn list_specialties(&self) -> ClinicResult<Vec<Specialty>> {
        self.list_docs(&self.specialties)
    }

    pub fn update_specialty(
        &self,
        id: Uuid,
        update: UpdateSpecialty,
        updated_by: Option<Uuid>,
    ) -> ClinicResult<Specialty> {
        let mut specialty: Specialty = self
            .get_specialty(id)?
            .ok_or(ClinicError::NotFound("specialty"))?;
        if let Some(v) = update.name {
            specialty.name = v;
        }
        if update.description.is_some() {
            specialty.description = update.description;
        }
        if let Some(v) = update.active {
            specialty.active = v;
        }
        specialty.updated_by = updated_by;
        specialty.updated_at = chrono::Utc::now();
        self.put_doc(&self.specialties, id, &specialty)?;
        Ok(specialty)
    }

    pub fn delete_specialty(&self, id: Uuid) -> ClinicResult<Specialty> {
        let specialty: Specialty = self
            .get_specialty(id)?
            .ok_or(ClinicError::NotFound("specialty"))?;
        self.remove_doc(&self.specialties, id)?;
        Ok(specialty)
    }

    // --- nurses ---

    pub fn create_nurse(&self, new: NewNurse) -> ClinicResult<Nurse> {
        let nurse = Nurse::from_new(new);
        self.put_doc(&self.nurses, nurse.id, &nurse)?;
        Ok(nurse)
    }

    pub fn get_nurse(&self, id: Uuid) -> ClinicResult<Option<Nurse>> {
        self.get_doc(&self.nurses, id)
    }

    pub fn list_nurses(&self) -> ClinicResult<Vec<Nurse>> {
        self.list_docs(&self.nurses)
    }

    pub fn update_nurse(&self, id: Uuid, update: UpdateNurse) -> ClinicResult<Nurse> {
        let mut nurse: Nurse = self.get_nurse(id)?.ok_or(ClinicError::NotFound("nurse"))?;
        if let Some(v) = update.license_number {
            nurse.license_number = v;
        }
        if update.specialty.is_some() {
            nurse.specialty = update.specialty;
        }
        nurse.updated_at = chrono::Utc::now();
        self.put_doc(&self.nurses, id, &nurse)?;
        Ok(nurse)
    }

    pub fn delete_nurse(&self, id: Uuid) -> ClinicResult<Nurse> {
        let nurse: Nurse = self.get_nurse(id)?.ok_or(ClinicError::NotFound("nurse"))?;
        self.remove_doc(&self.nurses, id)?;
        Ok(nurse)
    }
}
