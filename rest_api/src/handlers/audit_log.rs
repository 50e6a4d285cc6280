// rest_api/src/handlers/audit_log.rs
//
// Read-only trail endpoints, administrator only (enforced by the gate).

use axum::extract::{Query, State};
use axum::response::Response;
use chrono::Utc;
use serde::Deserialize;

use audit::{AuditFilter, DEFAULT_STATS_WINDOW_DAYS};

use crate::error::ApiError;
use crate::handlers::ok;
use crate::AppState;

/// GET /api/v1/audit with filter and pagination query parameters.
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<AuditFilter>,
) -> Result<Response, ApiError> {
    let page = audit::query(&state.store, &filter)?;
    ok(&page)
}

#[derive(Debug, Deserialize)]
pub struct StatsParams {
    pub days: Option<i64>,
}

/// GET /api/v1/audit/stats, defaulting to the trailing 30-day window.
pub async fn stats(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> Result<Response, ApiError> {
    let window = params.days.unwrap_or(DEFAULT_STATS_WINDOW_DAYS).max(1);
    let stats = audit::stats(&state.store, Utc::now(), window)?;
    ok(&stats)
}
