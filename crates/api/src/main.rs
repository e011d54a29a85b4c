use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use launchpad_api::config::ServerConfig;
use launchpad_api::router::build_app_router;
use launchpad_api::state::AppState;
use launchpad_core::roles::Role;
use launchpad_db::repositories::UserRepo;
use launchpad_events::{EventBus, EventPersistence};

const DEFAULT_LOG_FILTER: &str = "launchpad_api=debug,launchpad_events=info,tower_http=debug";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env()?;
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;

    let pool = launchpad_db::create_pool(&database_url).await?;
    launchpad_db::health_check(&pool).await?;
    tracing::info!("Database connection pool created");

    launchpad_db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    if let Some(admin) = &config.bootstrap_admin {
        launchpad_api::bootstrap::ensure_admin(&pool, admin).await?;
    } else if !UserRepo::exists_with_role(&pool, Role::Admin).await? {
        tracing::warn!("No admin account exists; set BOOTSTRAP_ADMIN_EMAIL to create one");
    }

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    let persistence_handle = tokio::spawn(EventPersistence::run(
        pool.clone(),
        event_bus.subscribe(),
    ));
    tracing::info!("Event persistence started");

    // --- App ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
    };
    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(config.host.parse()?, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // --- Post-shutdown cleanup ---
    // The router (and its state clone of the bus) is gone; dropping the last
    // sender closes the channel so persistence drains and exits.
    tracing::info!("Server stopped accepting connections, cleaning up");
    drop(event_bus);
    if tokio::time::timeout(Duration::from_secs(5), persistence_handle)
        .await
        .is_err()
    {
        tracing::warn!("Event persistence did not finish within 5s");
    }

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Console output by default; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
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
