use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use lemon_api::{build_router, throttle::Throttle, AppState};
use lemon_core::query::PageLimits;
use lemon_core::services::Services;
use lemon_infrastructure::{create_pool, postgres_repositories, run_migrations};
use lemon_security::JwtService;
use lemon_shared::config::AppConfig;
use lemon_shared::constants::THROTTLE_PRUNE_INTERVAL_SECS;
use lemon_shared::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("failed to load configuration")?;

    // Initialize telemetry; the guard flushes the file writer on exit
    let _log_guard = init_telemetry(&config.logging)?;
    info!("{} starting ({})", config.app.name, config.app.env);

    // Connect to Database
    let pool = create_pool(&config.database)
        .await
        .context("failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("failed to apply migrations")?;

    let jwt = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry);
    let limits = PageLimits {
        default_per_page: config.pagination.default_per_page,
        max_per_page: config.pagination.max_per_page,
    };
    let services = Services::new(postgres_repositories(pool.clone()), jwt, limits);

    if let Some(bootstrap) = &config.bootstrap {
        services
            .auth
            .ensure_superuser(&bootstrap.superuser_username, &bootstrap.superuser_password)
            .await
            .context("failed to create bootstrap superuser")?;
    }

    let state = AppState::new(services, Throttle::new(&config.throttle));
    spawn_throttle_pruner(state.throttle.clone());
    let app = build_router(
        state,
        Duration::from_secs(config.app.request_timeout_seconds),
    );

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}

/// Periodically forget callers whose buckets have refilled.
fn spawn_throttle_pruner(throttle: Arc<Throttle>) {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(THROTTLE_PRUNE_INTERVAL_SECS));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let tracked = throttle.prune();
            debug!("Throttle pruned, {} callers tracked", tracked);
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
