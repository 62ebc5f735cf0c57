use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use sheetquery::{build_router, AppConfig, AppContext};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cfg = AppConfig::from_env()?;

    let ctx = AppContext::from_config(&cfg).await?;

    // --- Startup checks (fail fast) ---
    startup_checks(&cfg, &ctx).await?;

    sheetquery::preload::preload(&ctx, &cfg.preload).await?;

    let app = build_router(Arc::new(ctx.clone()), cfg.max_upload_bytes);

    let addr = &cfg.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("sheetquery listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    ctx.store.close().await;
    Ok(())
}

async fn startup_checks(cfg: &AppConfig, ctx: &AppContext) -> Result<()> {
    ctx.store.ping().await.context("SQLite ping failed")?;
    info!(path = %cfg.database_path.display(), "sqlite: ok");

    if cfg.groq_api_key.is_none() {
        warn!("GROQ_API_KEY is not set; natural-language queries will fail");
    }
    info!(
        base_url = %cfg.completion_base_url,
        model = %cfg.completion_model,
        read_only = cfg.sql_read_only,
        "completion provider configured"
    );

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
