// storage/src/users.rs

use uuid::Uuid;

use models::errors::ValidationError;
use models::{ClinicError, ClinicResult, UpdateUser, User};

use crate::store::{sled_err, ClinicStore};

impl ClinicStore {
    /// Inserts a staff account. The national-id index is claimed with a
    /// compare_and_swap so two concurrent registrations for the same id
    /// cannot both succeed.
    pub fn create_user(&self, user: User) -> ClinicResult<User> {
        let claimed = self
            .users_by_national_id
            .compare_and_swap(
                user.national_id.as_bytes(),
                None::<&[u8]>,
                Some(user.id.as_bytes().to_vec()),
            )
            .map_err(sled_err)?;
        if claimed.is_err() {
            return Err(ValidationError::DuplicateNationalId(user.national_id).into());
        }
        self.put_doc(&self.users, user.id, &user)?;
        Ok(user)
    }

    pub fn get_user(&self, id: Uuid) -> ClinicResult<Option<User>> {
        self.get_doc(&self.users, id)
    }

    pub fn get_user_by_national_id(&self, national_id: &str) -> ClinicResult<Option<User>> {
        match self
            .users_by_national_id
            .get(national_id.as_bytes())
            .map_err(sled_err)?
        {
            Some(bytes) => {
                let id = Uuid::from_slice(&bytes)
                    .map_err(|e| ClinicError::Storage(format!("corrupt user index: {}", e)))?;
                self.get_user(id)
            }
            None => Ok(None),
        }
    }

    pub fn list_users(&self) -> ClinicResult<Vec<User>> {
        self.list_docs(&self.users)
    }

    pub fn update_user(&self, id: Uuid, update: UpdateUser) -> ClinicResult<User> {
        let mut user: User = self
            .get_user(id)?
            .ok_or(ClinicError::NotFound("user"))?;

        if let Some(new_national_id) = &update.national_id {
            if *new_national_id != user.national_id {
                let claimed = self
                    .users_by_national_id
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
                self.users_by_national_id
                    .remove(user.national_id.as_bytes())
                    .map_err(sled_err)?;
                user.national_id = new_national_id.clone();
            }
        }

        if let Some(v) = update.first_name {
            user.first_name = v;
        }
        if let Some(v) = update.last_name {
            user.last_name = v;
        }
        if let Some(v) = update.password {
            // Callers hash before handing the value down; a raw password
            // never reaches this method.
            user.password_hash = v;
        }
        if let Some(v) = update.role {
            user.role = v;
        }
        user.updated_at = chrono::Utc::now();

        self.put_doc(&self.users, id, &user)?;
        Ok(user)
    }

    pub fn delete_user(&self, id: Uuid) -> ClinicResult<User> {
        let user: User = self
            .get_user(id)?
            .ok_or(ClinicError::NotFound("user"))?;
        self.users_by_national_id
            .remove(user.national_id.as_bytes())
            .map_err(sled_err)?;
        self.remove_doc(&self.users, id)?;
        Ok(user)
    }

    pub fn touch_last_login(&self, id: Uuid) -> ClinicResult<()> {
        if let Some(mut user) = self.get_user(id)? {
            let now = chrono::Utc::now();
            user.last_login = Some(now);
            user.updated_at = now;
            self.put_doc(&self.users, id, &user)?;
        }
        Ok(())
    }
}
