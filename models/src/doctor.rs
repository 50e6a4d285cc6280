// models/src/doctor.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Available,
    Unavailable,
    Absent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDoctor {
    pub user_id: Uuid,
    pub specialty_id: Uuid,
    pub room_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDoctor {
    pub specialty_id: Option<Uuid>,
    pub room_id: Option<Uuid>,
    pub availability: Option<Availability>,
}

/// One-to-one with a `User` of role `doctor`. Room assignment is subject
/// to the soft-conflict policy; `room_id` is not unique at the store level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub specialty_id: Uuid,
    pub room_id: Option<Uuid>,
    pub availability: Availability,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Doctor {
    pub fn from_new(new: NewDoctor) -> Self {
        let now = Utc::now();
        Doctor {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            specialty_id: new.specialty_id,
            room_id: new.room_id,
            availability: Availability::Available,
            created_at: now,
            updated_at: now,
        }
    }
}
