// models/src/room.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoom {
    pub name: String,
    pub floor: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRoom {
    pub name: Option<String>,
    pub floor: Option<String>,
    pub active: Option<bool>,
}

/// Reference catalog entry. Soft-deleted by clearing `active`; the
/// creator/modifier fields are audit metadata, not ownership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub floor: Option<String>,
    pub active: bool,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    pub fn from_new(new: NewRoom, created_by: Option<Uuid>) -> Self {
        let now = Utc::now();
        Room {
            id: Uuid::new_v4(),
            name: new.name,
            floor: new.floor,
            active: true,
            created_by,
            updated_by: created_by,
            created_at: now,
            updated_at: now,
        }
    }
}
