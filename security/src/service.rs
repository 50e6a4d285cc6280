// security/src/service.rs

use serde::{Deserialize, Serialize};

use models::errors::AuthError;
use models::User;
use storage::ClinicStore;

use crate::password;
use crate::token::TokenIssuer;

/// Login data transfer object.
#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub national_id: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutcome {
    pub token: String,
    pub user: User,
}

/// Verifies the submitted credentials and issues a session token.
/// Unknown identifier and wrong password both come back as
/// `InvalidCredentials`; the caller learns nothing about which it was.
pub fn login(
    store: &ClinicStore,
    issuer: &TokenIssuer,
    request: &LoginRequest,
) -> Result<LoginOutcome, AuthError> {
    let user = store
        .get_user_by_national_id(&request.national_id)
        .map_err(|e| AuthError::Internal(format!("user lookup failed: {}", e)))?
        .ok_or(AuthError::InvalidCredentials)?;

    if !password::verify_password(&request.password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials);
    }

    let token = issuer.issue(user.id, user.role)?;

    store
        .touch_last_login(user.id)
        .map_err(|e| AuthError::Internal(format!("failed to stamp last login: {}", e)))?;

    Ok(LoginOutcome { token, user })
}
