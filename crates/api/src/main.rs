use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vistoria_api::bootstrap::ensure_admin;
use vistoria_api::config::ServerConfig;
use vistoria_api::export::ExportTracker;
use vistoria_api::router::build_app_router;
use vistoria_api::state::AppState;
use vistoria_db::store::{AccountStore, InspectionStore, MemoryStore, PgStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vistoria_api=debug,vistoria_db=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Stores ---
    let (inspections, accounts): (Arc<dyn InspectionStore>, Arc<dyn AccountStore>) =
        match &config.database_url {
            Some(database_url) => {
                let pool = vistoria_db::create_pool(database_url)
                    .await
                    .expect("Failed to connect to database");
                tracing::info!("Database connection pool created");

                vistoria_db::health_check(&pool)
                    .await
                    .expect("Database health check failed");

                vistoria_db::run_migrations(&pool)
                    .await
                    .expect("Failed to run database migrations");
                tracing::info!("Database migrations applied");

                let store = Arc::new(PgStore::new(pool));
                (
                    store.clone() as Arc<dyn InspectionStore>,
                    store as Arc<dyn AccountStore>,
                )
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using the in-memory store with sample data");
                let store = Arc::new(MemoryStore::seeded());
                (
                    store.clone() as Arc<dyn InspectionStore>,
                    store as Arc<dyn AccountStore>,
                )
            }
        };

    if let Some(admin) = &config.bootstrap_admin {
        ensure_admin(accounts.as_ref(), admin)
            .await
            .expect("Failed to create the bootstrap administrator");
    }

    // --- App state ---
    let state = AppState {
        inspections,
        accounts,
        config: Arc::new(config.clone()),
        exports: ExportTracker::new(),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    // In-flight requests get SHUTDOWN_TIMEOUT_SECS to finish after the signal.
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let (signal_tx, signal_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signal_tx.send(());
        })
        .into_future();
    let drain_deadline = async move {
        match signal_rx.await {
            Ok(()) => tokio::time::sleep(shutdown_timeout).await,
            Err(_) => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        result = server => result.expect("Server error"),
        () = drain_deadline => {
            tracing::warn!(
                timeout_secs = config.shutdown_timeout_secs,
                "In-flight requests did not finish in time"
            );
        }
    }

    tracing::info!("Graceful shutdown complete");
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
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
