// rest_api/src/lib.rs

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{Method, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use anyhow::Context;

use audit::AuditRecorder;
use security::TokenIssuer;
use storage::ClinicStore;

pub mod config;
pub mod error;
pub mod middleware;
mod handlers;

pub use crate::config::{load_config, ApiConfig};

/// Shared state for the axum application. Everything injected at
/// startup; no ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ClinicStore>,
    pub recorder: AuditRecorder,
    pub issuer: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new(store: Arc<ClinicStore>, issuer: TokenIssuer) -> Self {
        AppState {
            recorder: AuditRecorder::new(store.clone()),
            store,
            issuer: Arc::new(issuer),
        }
    }
}

// Handler for the /api/v1/health endpoint
async fn health_handler() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "message": "clinic API is healthy" })),
    )
}

// Handler for the /api/v1/version endpoint
async fn version_handler() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "version": env!("CARGO_PKG_VERSION"), "api_level": 1 })),
    )
}

/// Builds the full router: routes, then the capture/gate/auth layers.
/// Layers added last run first, so authentication is outermost.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(Any);

    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/version", get(version_handler))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .route(
            "/api/v1/patients",
            get(handlers::patients::list).post(handlers::patients::create),
        )
        .route(
            "/api/v1/patients/:id",
            get(handlers::patients::fetch)
                .put(handlers::patients::update)
                .delete(handlers::patients::remove),
        )
        .route(
            "/api/v1/patients/:id/status",
            put(handlers::patients::set_status),
        )
        .route(
            "/api/v1/appointments",
            get(handlers::appointments::list).post(handlers::appointments::create),
        )
        .route(
            "/api/v1/appointments/:id",
            get(handlers::appointments::fetch)
                .put(handlers::appointments::update)
                .delete(handlers::appointments::remove),
        )
        .route(
            "/api/v1/appointments/:id/status",
            put(handlers::appointments::set_status),
        )
        .route(
            "/api/v1/users",
            get(handlers::users::list).post(handlers::users::create),
        )
        .route(
            "/api/v1/users/:id",
            get(handlers::users::fetch)
                .put(handlers::users::update)
                .delete(handlers::users::remove),
        )
        .route(
            "/api/v1/doctors",
            get(handlers::doctors::list).post(handlers::doctors::create),
        )
        .route(
            "/api/v1/doctors/:id",
            get(handlers::doctors::fetch)
                .put(handlers::doctors::update)
                .delete(handlers::doctors::remove),
        )
        .route(
            "/api/v1/doctors/:id/room",
            put(handlers::doctors::assign_room),
        )
        .route(
            "/api/v1/nurses",
            get(handlers::nurses::list).post(handlers::nurses::create),
        )
        .route(
            "/api/v1/nurses/:id",
            get(handlers::nurses::fetch)
                .put(handlers::nurses::update)
                .delete(handlers::nurses::remove),
        )
        .route(
            "/api/v1/rooms",
            get(handlers::rooms::list).post(handlers::rooms::create),
        )
        .route(
            "/api/v1/rooms/:id",
            get(handlers::rooms::fetch)
                .put(handlers::rooms::update)
                .delete(handlers::rooms::remove),
        )
        .route(
            "/api/v1/specialties",
            get(handlers::specialties::list).post(handlers::specialties::create),
        )
        .route(
            "/api/v1/specialties/:id",
            get(handlers::specialties::fetch)
                .put(handlers::specialties::update)
                .delete(handlers::specialties::remove),
        )
        .route("/api/v1/audit", get(handlers::audit_log::list))
        .route("/api/v1/audit/stats", get(handlers::audit_log::stats))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::capture_audit,
        ))
        .layer(axum::middleware::from_fn(middleware::authorize))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::authenticate,
        ))
        .layer(cors)
        .with_state(state)
}

/// Starts the HTTP server and runs until the shutdown signal fires.
pub async fn start_server(
    config: &ApiConfig,
    state: AppState,
    shutdown_rx: oneshot::Receiver<()>,
) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", config.host, config.port))?;

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    info!("clinic API listening on {}", addr);

    axum::serve(listener, app(state).into_make_service())
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
            info!("shutdown signal received");
        })
        .await
        .context("server failed")?;

    info!("clinic API stopped");
    Ok(())
}
