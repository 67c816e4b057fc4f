use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use inkwell_api::config::{LogFormat, ServerConfig};
use inkwell_api::router::build_app_router;
use inkwell_api::state::AppState;
use inkwell_db::{DraftStore, MemoryStore, PgStore};
use inkwell_events::{EventBus, EventPersistence};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "inkwell_api=debug,inkwell_workflow=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env();
    init_tracing(config.log_format);
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());

    // --- Store ---
    let (store, persistence_handle): (Arc<dyn DraftStore>, _) = match &config.database_url {
        Some(database_url) => {
            let pool = inkwell_db::create_pool(database_url, config.database_max_connections)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            inkwell_db::health_check(&pool)
                .await
                .expect("Database health check failed");

            inkwell_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            let handle = tokio::spawn(EventPersistence::run(pool.clone(), event_bus.subscribe()));
            (Arc::new(PgStore::new(pool)) as Arc<dyn DraftStore>, handle)
        }
        None => {
            tracing::warn!(
                "DATABASE_URL is not set; using the in-memory store (data is lost on restart)"
            );
            let handle = tokio::spawn(EventPersistence::run_log_only(event_bus.subscribe()));
            (Arc::new(MemoryStore::new()) as Arc<dyn DraftStore>, handle)
        }
    };

    // --- App ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let state = AppState::new(store, config, Arc::clone(&event_bus));
    let app = build_app_router(state);

    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // Router state is gone; dropping the last bus handle closes the channel
    // and lets the persistence task drain and exit.
    drop(event_bus);
    let _ = tokio::time::timeout(Duration::from_secs(5), persistence_handle).await;

    tracing::info!("Graceful shutdown complete");
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl-C, starting graceful shutdown"),
        () = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
