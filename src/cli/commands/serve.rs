use anyhow::Context;
use std::sync::Arc;

use crate::app::{router, AppState};
use crate::auth::Argon2Hasher;
use crate::config::AppConfig;
use crate::database::{connect, ensure_schema, PgNoteStore, PgUserStore};

pub async fn handle(config: AppConfig, port: Option<u16>, memory: bool) -> anyhow::Result<()> {
    // Refuse to start without a signing secret
    config
        .security
        .require_secret()
        .context("cannot start server")?;

    let port = port.unwrap_or(config.api.port);
    tracing::info!("Starting Notes API in {:?} mode", config.environment);

    let passwords = Arc::new(Argon2Hasher::new());
    let state = if memory {
        tracing::warn!("Using in-memory store; data is lost on exit");
        AppState::in_memory(config, passwords)
    } else {
        let pool = connect(&config.database).await?;
        ensure_schema(&pool).await?;
        AppState::new(
            config,
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgNoteStore::new(pool)),
            passwords,
        )
    };

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Notes API listening on http://{}", bind_addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}
