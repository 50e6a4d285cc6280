// models/src/nurse.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNurse {
    pub user_id: Uuid,
    pub license_number: String,
    pub specialty: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNurse {
    pub license_number: Option<String>,
    pub specialty: Option<String>,
}

/// One-to-one with a `User` of role `nurse`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nurse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub license_number: String,
    pub specialty: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Nurse {
    pub fn from_new(new: NewNurse) -> Self {
        let now = Utc::now();
        Nurse {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            license_number: new.license_number,
            specialty: new.specialty,
            created_at: now,
            updated_at: now,
        }
    }
}
