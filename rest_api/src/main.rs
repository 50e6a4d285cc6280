// rest_api/src/main.rs

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Duration;
use tokio::sync::oneshot;
use tracing::{info, warn};

use models::{NewUser, Role, User};
use rest_api::{load_config, AppState};
use security::{password, TokenIssuer};
use storage::ClinicStore;

/// Creates a default administrator on first run so the API is usable;
/// the password comes from CLINIC_ADMIN_PASSWORD and must be rotated.
fn bootstrap_admin(store: &ClinicStore) -> Result<()> {
    if !store.list_users()?.is_empty() {
        return Ok(());
    }
    let initial_password =
        std::env::var("CLINIC_ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());
    let hash = password::hash_password(&initial_password)?;
    let admin = User::from_new_user(
        NewUser {
            first_name: "System".into(),
            last_name: "Administrator".into(),
            national_id: "00000000".into(),
            password: String::new(),
            role: Role::Administrator,
        },
        hash,
    );
    store.create_user(admin)?;
    warn!("created bootstrap administrator (national_id 00000000); change its password");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = load_config().context("failed to load configuration")?;
    info!("starting clinic API on {}:{}", config.host, config.port);

    let store = Arc::new(
        ClinicStore::open(&config.data_directory)
            .with_context(|| format!("failed to open store at {}", config.data_directory))?,
    );
    bootstrap_admin(&store).context("failed to bootstrap administrator account")?;

    let issuer = TokenIssuer::new(
        config.jwt_secret.as_bytes(),
        Duration::hours(config.token_ttl_hours),
    );
    let state = AppState::new(store.clone(), issuer);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(());
        }
    });

    rest_api::start_server(&config, state, shutdown_rx).await?;
    store.flush().context("failed to flush store on shutdown")?;
    Ok(())
}
