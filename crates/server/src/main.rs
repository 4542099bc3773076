use anyhow::Context;
use marquee_server::config::Config;
use marquee_server::state::{AppState, build_session, open_db};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env();
    info!(db_path = %config.db_path, "connecting to database");

    let pool = open_db(&config.db_path)
        .await
        .context("failed to open database")?;
    info!("migrations complete");

    let session = build_session(&pool, &config);
    if let Some(key) = &config.tmdb_key {
        session
            .set_credential(key)
            .await
            .context("failed to store API key")?;
        info!("API key seeded from environment");
    }

    let app = marquee_server::routes::build_router(AppState::new(pool, session));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .context("failed to bind")?;
    info!(addr = %config.bind_addr, language = %config.language, "server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
