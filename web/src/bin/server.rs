//! Production server: Postgres-backed API over the booking stores.

use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use turfbook_postgres::PostgresStore;
use turfbook_web::{AppState, Config, StaticTokenVerifier, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let store = PostgresStore::connect(&config.database_url).await?;
    store.migrate().await?;

    let verifier = Arc::new(StaticTokenVerifier::with_admin_token(&config.admin_token));
    let state = AppState::from_backend(store, verifier);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
