// models/src/patient.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Patients are deactivated, never deleted, so appointment history stays
/// attached to a real record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatientStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub birth_date: NaiveDate,
    pub sex: String,
    pub address: String,
    pub phone: String,
    pub blood_type: Option<String>,
    pub allergies: Option<String>,
    pub prior_conditions: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePatient {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub national_id: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub sex: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub blood_type: Option<String>,
    pub allergies: Option<String>,
    pub prior_conditions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub birth_date: NaiveDate,
    pub sex: String,
    pub address: String,
    pub phone: String,
    pub blood_type: Option<String>,
    pub allergies: Option<String>,
    pub prior_conditions: Option<String>,
    pub status: PatientStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    pub fn from_new(new: NewPatient) -> Self {
        let now = Utc::now();
        Patient {
            id: Uuid::new_v4(),
            first_name: new.first_name,
            last_name: new.last_name,
            national_id: new.national_id,
            birth_date: new.birth_date,
            sex: new.sex,
            address: new.address,
            phone: new.phone,
            blood_type: new.blood_type,
            allergies: new.allergies,
            prior_conditions: new.prior_conditions,
            status: PatientStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Applies a partial update in place and bumps `updated_at`.
    pub fn apply(&mut self, update: UpdatePatient) {
        if let Some(v) = update.first_name {
            self.first_name = v;
        }
        if let Some(v) = update.last_name {
            self.last_name = v;
        }
        if let Some(v) = update.national_id {
            self.national_id = v;
        }
        if let Some(v) = update.birth_date {
            self.birth_date = v;
        }
        if let Some(v) = update.sex {
            self.sex = v;
        }
        if let Some(v) = update.address {
            self.address = v;
        }
        if let Some(v) = update.phone {
            self.phone = v;
        }
        if update.blood_type.is_some() {
            self.blood_type = update.blood_type;
        }
        if update.allergies.is_some() {
            self.allergies = update.allergies;
        }
        if update.prior_conditions.is_some() {
            self.prior_conditions = update.prior_conditions;
        }
        self.updated_at = Utc::now();
    }
}
