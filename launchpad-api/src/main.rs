use anyhow::{Context, Result};
use launchpad_api::{create_router, db};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DATABASE_URL: &str = "sqlite://tasks.db?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "launchpad_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let addr = std::env::var("API_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    tracing::info!("Opening task database at {}", database_url);
    let pool = db::create_pool(&database_url)
        .await
        .with_context(|| format!("cannot open task database {}", database_url))?;

    db::run_migrations(&pool)
        .await
        .context("task database migrations failed")?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot bind {}", addr))?;
    tracing::info!("Task Manager API listening on {}", addr);

    axum::serve(listener, create_router(pool.clone()))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown requested, draining connections");
        })
        .await
        .context("server error")?;

    pool.close().await;
    Ok(())
}
