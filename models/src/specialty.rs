// models/src/specialty.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSpecialty {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSpecialty {
    pub name: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specialty {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Specialty {
    pub fn from_new(new: NewSpecialty, created_by: Option<Uuid>) -> Self {
        let now = Utc::now();
        Specialty {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            active: true,
            created_by,
            updated_by: created_by,
            created_at: now,
            updated_at: now,
        }
    }
}
