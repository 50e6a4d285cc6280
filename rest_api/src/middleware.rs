// rest_api/src/middleware.rs
//
// Request pipeline, outermost first: authenticate (verify the bearer
// token, attach the Actor), authorize (access policy gate), then the
// audit capture layer that records successful mutations on the way out.

use axum::extract::{Request, State};
use axum::http::{header, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use audit::{AuditContext, RecordDetails};
use models::errors::AuthError;
use models::{Actor, AuditAction, AuditEntity};
use security::check_access;

use crate::error::ApiError;
use crate::AppState;

fn is_public(path: &str) -> bool {
    matches!(
        path,
        "/api/v1/health" | "/api/v1/version" | "/api/v1/auth/login"
    )
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|hv| hv.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
}

/// Verifies the session token and resolves it to a stored user.
/// The role carried forward is the stored account's role, so an
/// administrator role change takes effect before the token expires.
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    if is_public(req.uri().path()) {
        return next.run(req).await;
    }

    let token = match bearer_token(&req) {
        Some(t) => t.to_string(),
        None => return ApiError::from(AuthError::InvalidOrExpiredToken).into_response(),
    };

    let claims = match state.issuer.verify(&token) {
        Ok(c) => c,
        Err(e) => return ApiError::from(e).into_response(),
    };

    let user = match state.store.get_user(claims.sub) {
        Ok(Some(user)) => user,
        Ok(None) => return ApiError::from(AuthError::InvalidOrExpiredToken).into_response(),
        Err(e) => return ApiError::from(e).into_response(),
    };

    req.extensions_mut().insert(Actor {
        id: user.id,
        name: user.full_name(),
        role: user.role,
    });
    next.run(req).await
}

fn resource_segment(path: &str) -> &str {
    path.strip_prefix("/api/v1/")
        .unwrap_or("")
        .split('/')
        .next()
        .unwrap_or("")
}

/// Access policy gate. Runs after authentication; rejects before any
/// handler logic with a tagged 403.
pub async fn authorize(req: Request, next: Next) -> Response {
    let path = req.uri().path();
    if is_public(path) {
        return next.run(req).await;
    }

    let Some(actor) = req.extensions().get::<Actor>() else {
        return ApiError::from(AuthError::InvalidOrExpiredToken).into_response();
    };

    if let Err(e) = check_access(resource_segment(path), req.method().as_str(), actor.role) {
        return ApiError::from(e).into_response();
    }
    next.run(req).await
}

fn entity_for(resource: &str) -> Option<AuditEntity> {
    match resource {
        "patients" => Some(AuditEntity::Patient),
        "appointments" => Some(AuditEntity::Appointment),
        "users" => Some(AuditEntity::User),
        "doctors" => Some(AuditEntity::Doctor),
        "nurses" => Some(AuditEntity::Nurse),
        "rooms" => Some(AuditEntity::Room),
        "specialties" => Some(AuditEntity::Specialty),
        _ => None,
    }
}

/// Fallback description built from method and route when a handler did
/// not attach its own audit context.
fn synthesize(method: &Method, path: &str) -> Option<AuditContext> {
    let resource = resource_segment(path);
    let entity = entity_for(resource)?;
    let (action, verb) = match *method {
        Method::POST => (AuditAction::Create, "created"),
        Method::PUT => (AuditAction::Update, "updated"),
        Method::DELETE => (AuditAction::Delete, "deleted"),
        _ => return None,
    };
    let entity_id = path
        .strip_prefix("/api/v1/")
        .and_then(|rest| rest.split('/').nth(1))
        .and_then(|seg| Uuid::parse_str(seg).ok());
    Some(AuditContext {
        action,
        entity,
        entity_id,
        description: format!("{} {} via {}", verb, entity, path),
        before: None,
        after: None,
    })
}

/// Captures the outgoing response of mutating requests. A 2xx response
/// with an authenticated actor produces exactly one audit entry: the
/// handler's own context when present, a synthesized one otherwise.
/// Failures produce nothing here; refused soft conflicts are recorded
/// by their handler with succeeded=false.
pub async fn capture_audit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let actor = req.extensions().get::<Actor>().cloned();
    let ip = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|hv| hv.to_str().ok())
        .map(String::from);
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|hv| hv.to_str().ok())
        .map(String::from);

    let mutating = matches!(method, Method::POST | Method::PUT | Method::DELETE);
    let response = next.run(req).await;

    if mutating && response.status().is_success() {
        if let Some(actor) = actor {
            let ctx = response
                .extensions()
                .get::<AuditContext>()
                .cloned()
                .or_else(|| synthesize(&method, &path));
            if let Some(ctx) = ctx {
                let details = RecordDetails {
                    entity_id: ctx.entity_id,
                    before: ctx.before,
                    after: ctx.after,
                    ip,
                    user_agent,
                };
                state
                    .recorder
                    .record(&actor, ctx.action, ctx.entity, ctx.description, details);
            }
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_extract_resource_segment() {
        assert_eq!(resource_segment("/api/v1/patients"), "patients");
        assert_eq!(
            resource_segment("/api/v1/appointments/123/status"),
            "appointments"
        );
        assert_eq!(resource_segment("/other"), "");
    }

    #[test]
    fn should_synthesize_description_for_known_resource() {
        let id = Uuid::new_v4();
        let path = format!("/api/v1/rooms/{}", id);
        let ctx = synthesize(&Method::DELETE, &path).unwrap();
        assert_eq!(ctx.action, AuditAction::Delete);
        assert_eq!(ctx.entity, AuditEntity::Room);
        assert_eq!(ctx.entity_id, Some(id));
        assert!(!ctx.description.is_empty());
    }

    #[test]
    fn should_not_synthesize_for_unknown_resource() {
        assert!(synthesize(&Method::POST, "/api/v1/invoices").is_none());
    }
}
