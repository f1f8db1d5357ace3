//! Gatehouse HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # Start PostgreSQL, then:
//! cargo run --bin server
//! ```

use gatehouse_postgres::PostgresStore;
use gatehouse_web::{AppState, Config, build_router};
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,gatehouse=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Gatehouse server");

    // Load configuration
    let config = Config::from_env();
    info!(database = %config.database.url, "Configuration loaded");

    // Connect and migrate
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout))
        .connect(&config.database.url)
        .await?;
    let store = PostgresStore::new(pool);
    store.migrate().await?;
    info!("Database connected, migrations applied");

    // Serve
    let app = build_router(AppState::postgres(store));
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    // Serve until Ctrl+C; a failed signal hook would keep the server up,
    // which is the safer direction.
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
