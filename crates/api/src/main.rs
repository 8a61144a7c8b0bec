use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use argus_analyzer::{DefectAnalyzer, HttpAnalyzer};
use argus_db::repositories::SessionRepo;
use argus_events::{EventBus, EventJournal};
use argus_session::source::{CameraGateway, SnapshotGateway};
use argus_session::store::SessionStore;
use argus_session::SessionManager;

use argus_api::config::ServerConfig;
use argus_api::router::build_app_router;
use argus_api::state::AppState;
use argus_api::store::PgSessionStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "argus_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(addr = %config.bind_addr, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = argus_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    argus_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    argus_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // Rows still marked running belong to a previous process that died
    // without finalizing them.
    let reaped = SessionRepo::abort_stale_running(&pool, "engine restarted")
        .await
        .expect("Failed to reap stale sessions");
    if reaped > 0 {
        tracing::warn!(reaped, "Aborted sessions left running by a previous process");
    }

    // --- Event bus + journal ---
    let bus = Arc::new(EventBus::default());
    let journal_handle = tokio::spawn(EventJournal::run(pool.clone(), bus.subscribe()));
    tracing::info!("Event bus created, journal writer started");

    // --- Session engine ---
    let camera: Arc<dyn CameraGateway> = Arc::new(SnapshotGateway::new(Duration::from_secs(
        config.camera_timeout_secs,
    )));
    let analyzer: Arc<dyn DefectAnalyzer> = Arc::new(HttpAnalyzer::new(
        config.analyzer_base_url.clone(),
        Duration::from_secs(config.analyzer_timeout_secs),
    ));
    let store: Arc<dyn SessionStore> = Arc::new(PgSessionStore::new(pool.clone()));
    let manager = SessionManager::new(camera, analyzer, store, Arc::clone(&bus));
    tracing::info!(analyzer = %config.analyzer_base_url, "Session engine ready");

    // --- App state + router ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        manager: Arc::clone(&manager),
        bus: Arc::clone(&bus),
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    tracing::info!(addr = %config.bind_addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // Live sessions first: they hold camera handles and have writes in
    // flight. Each is aborted with a reason and its loop joined.
    manager.shutdown().await;
    tracing::info!("Session manager shut down");

    // The journal exits when the last bus sender drops; the manager holds
    // one, so drop it before waiting.
    drop(manager);
    drop(bus);
    let _ = tokio::time::timeout(Duration::from_secs(5), journal_handle).await;
    tracing::info!("Event journal stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
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
