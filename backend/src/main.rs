//! Glass Rental Management Platform - Backend Server

use std::{net::SocketAddr, sync::Arc};

use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use glass_rental_backend::{
    config::Config,
    create_app,
    store::{MemoryStore, PgStore, Store},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "glass_rental_server=debug,glass_rental_backend=debug,tower_http=debug,sqlx=warn"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Glass Rental Management Server");
    tracing::info!("Environment: {}", config.environment);

    let store: Arc<dyn Store> = if config.database.in_memory {
        tracing::warn!("Using the in-memory store; data is lost on shutdown");
        Arc::new(MemoryStore::new())
    } else {
        tracing::info!("Connecting to database...");
        let pg = PgStore::connect(&config.database).await?;
        tracing::info!("Database connection established");

        if config.database.run_migrations {
            tracing::info!("Running database migrations...");
            sqlx::migrate!("./migrations").run(pg.pool()).await?;
            tracing::info!("Migrations completed");
        }
        Arc::new(pg)
    };

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let state = AppState::new(store, config);

    // Log session changes
    let mut session_events = state.session_events.subscribe();
    tokio::spawn(async move {
        loop {
            match session_events.recv().await {
                Ok(event) => tracing::debug!(?event, "Session event"),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Session event log fell behind")
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
