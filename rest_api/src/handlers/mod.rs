// rest_api/src/handlers/mod.rs

pub mod auth;
pub mod patients;
pub mod appointments;
pub mod users;
pub mod doctors;
pub mod nurses;
pub mod rooms;
pub mod specialties;
pub mod audit_log;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use audit::AuditContext;

use crate::error::ApiError;

fn envelope<T: Serialize>(
    status: StatusCode,
    data: &T,
    ctx: Option<AuditContext>,
) -> Result<Response, ApiError> {
    let value = serde_json::to_value(data).map_err(models::ClinicError::from)?;
    let mut response =
        (status, Json(json!({ "status": "success", "data": value }))).into_response();
    if let Some(ctx) = ctx {
        response.extensions_mut().insert(ctx);
    }
    Ok(response)
}

pub(crate) fn ok<T: Serialize>(data: &T) -> Result<Response, ApiError> {
    envelope(StatusCode::OK, data, None)
}

/// 200 response carrying the handler's audit context for the capture
/// layer to record.
pub(crate) fn ok_audited<T: Serialize>(data: &T, ctx: AuditContext) -> Result<Response, ApiError> {
    envelope(StatusCode::OK, data, Some(ctx))
}

pub(crate) fn created_audited<T: Serialize>(
    data: &T,
    ctx: AuditContext,
) -> Result<Response, ApiError> {
    envelope(StatusCode::CREATED, data, Some(ctx))
}
