// models/src/audit.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::role::Role;

/// The authenticated identity attributed to a request. Resolved once by
/// the auth middleware and carried through to the audit trail so the
/// recorder never has to read other entities back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Login,
    StatusChange,
    ForcedAssign,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::Login => "login",
            AuditAction::StatusChange => "status_change",
            AuditAction::ForcedAssign => "forced_assign",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(AuditAction::Create),
            "update" => Ok(AuditAction::Update),
            "delete" => Ok(AuditAction::Delete),
            "login" => Ok(AuditAction::Login),
            "status_change" => Ok(AuditAction::StatusChange),
            "forced_assign" => Ok(AuditAction::ForcedAssign),
            other => Err(format!("unknown audit action: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEntity {
    Patient,
    Appointment,
    User,
    Doctor,
    Nurse,
    Room,
    Specialty,
    Session,
}

impl AuditEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEntity::Patient => "patient",
            AuditEntity::Appointment => "appointment",
            AuditEntity::User => "user",
            AuditEntity::Doctor => "doctor",
            AuditEntity::Nurse => "nurse",
            AuditEntity::Room => "room",
            AuditEntity::Specialty => "specialty",
            AuditEntity::Session => "session",
        }
    }
}

impl fmt::Display for AuditEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditEntity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patient" => Ok(AuditEntity::Patient),
            "appointment" => Ok(AuditEntity::Appointment),
            "user" => Ok(AuditEntity::User),
            "doctor" => Ok(AuditEntity::Doctor),
            "nurse" => Ok(AuditEntity::Nurse),
            "room" => Ok(AuditEntity::Room),
            "specialty" => Ok(AuditEntity::Specialty),
            "session" => Ok(AuditEntity::Session),
            other => Err(format!("unknown audit entity: {}", other)),
        }
    }
}

/// Append-only trail record. Never mutated or deleted through normal
/// flow; queries return most-recent-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub actor_name: String,
    pub actor_role: Role,
    pub action: AuditAction,
    pub entity: AuditEntity,
    pub entity_id: Option<Uuid>,
    pub description: String,
    pub before: Option<serde_json::Value>,
    pub after: Option<serde_json::Value>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub succeeded: bool,
    pub error_message: Option<String>,
    pub timestamp: DateTime<Utc>,
}
