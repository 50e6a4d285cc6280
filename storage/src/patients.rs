// storage/src/patients.rs

use uuid::Uuid;

use models::errors::ValidationError;
use models::{ClinicError, ClinicResult, Patient, PatientStatus, UpdatePatient};

use crate::store::{sled_err, ClinicStore};

impl ClinicStore {
    pub fn create_patient(&self, patient: Patient) -> ClinicResult<Patient> {
        let claimed = self
            .patients_by_national_id
            .compare_and_swap(
                patient.national_id.as_bytes(),
                None::<&[u8]>,
                Some(patient.id.as_bytes().to_vec()),
            )
            .map_err(sled_err)?;
        if claimed.is_err() {
            return Err(ValidationError::DuplicateNationalId(patient.national_id).into());
        }
        self.put_doc(&self.patients, patient.id, &patient)?;
        Ok(patient)
    }

    pub fn get_patient(&self, id: Uuid) -> ClinicResult<Option<Patient>> {
        self.get_doc(&self.patients, id)
    }

    pub fn list_patients(&self) -> ClinicResult<Vec<Patient>> {
        self.list_docs(&self.patients)
    }

    pub fn update_patient(&self, id: Uuid, update: UpdatePatient) -> ClinicResult<Patient> {
        let mut patient: Patient = self
            .get_patient(id)?
            .ok_or(ClinicError::NotFound("patient"))?;

        if let Some(new_national_id) = &update.national_id {
            if *new_national_id != patient.national_id {
                let claimed = self
                    .patients_by_national_id
                    .compare_and_swap(
                        new_national_id.as_bytes(),
                        None::<&[u8]>,
                        Some(id.as_bytes().to_vec()),
                    )
                    .map_err(sled_err)?;
                if claimed.is_err() {
                    return Err(
                        ValidationError::DuplicateNationalId(new_national_id.clone()).into()
                    );
                }
                self.patients_by_national_id
                    .remove(patient.national_id.as_bytes())
                    .map_err(sled_err)?;
            }
        }

        patient.apply(update);
        self.put_doc(&self.patients, id, &patient)?;
        Ok(patient)
    }

    /// Idempotent status toggle; the normal lifecycle never deletes a
    /// patient record.
    pub fn set_patient_status(&self, id: Uuid, status: PatientStatus) -> ClinicResult<Patient> {
        let mut patient: Patient = self
            .get_patient(id)?
            .ok_or(ClinicError::NotFound("patient"))?;
        if patient.status != status {
            patient.status = status;
            patient.updated_at = chrono::Utc::now();
            self.put_doc(&self.patients, id, &patient)?;
        }
        Ok(patient)
    }

    /// Explicit administrator delete, outside the normal flow.
    pub fn delete_patient(&self, id: Uuid) -> ClinicResult<Patient> {
        let patient: Patient = self
            .get_patient(id)?
            .ok_or(ClinicError::NotFound("patient"))?;
        self.patients_by_national_id
            .remove(patient.national_id.as_bytes())
            .map_err(sled_err)?;
        self.remove_doc(&self.patients, id)?;
        Ok(patient)
    }
}
