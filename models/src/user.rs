// models/src/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::Role;

// --- DTO for staff account creation ---
// Holds the plaintext password only until the identity issuer hashes it;
// the stored `User` never sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub password: String,
    pub role: Role,
}

/// Partial update payload for a staff account. Password changes go through
/// the identity issuer so only the resulting hash lands here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub national_id: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

// --- Stored staff account ---
// Contains the password hash, never the plaintext.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub password_hash: String,
    pub role: Role,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Builds a stored account from the registration DTO and an
    /// already-computed password hash.
    pub fn from_new_user(new_user: NewUser, password_hash: String) -> Self {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            national_id: new_user.national_id,
            password_hash,
            role: new_user.role,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// JSON snapshot safe for audit trails and API responses: everything
    /// except the password hash.
    pub fn redacted(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "first_name": self.first_name,
            "last_name": self.last_name,
            "national_id": self.national_id,
            "role": self.role,
            "last_login": self.last_login,
            "created_at": self.created_at,
            "updated_at": self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user() -> NewUser {
        NewUser {
            first_name: "Alice".into(),
            last_name: "Smith".into(),
            national_id: "30111222".into(),
            password: "supersecret".into(),
            role: Role::Nurse,
        }
    }

    #[test]
    fn should_not_store_plaintext_password() {
        let user = User::from_new_user(new_user(), "$argon2$hash".into());
        assert_eq!(user.password_hash, "$argon2$hash");
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("supersecret"));
    }

    #[test]
    fn should_redact_password_hash() {
        let user = User::from_new_user(new_user(), "$argon2$hash".into());
        let snapshot = user.redacted();
        assert!(snapshot.get("password_hash").is_none());
        assert_eq!(snapshot["national_id"], "30111222");
    }
}
