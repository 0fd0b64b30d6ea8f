//! Roomshare server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use roomshare_api::middleware::AppState;
use roomshare_common::Config;
use roomshare_core::{
    ListingGuard, ListingService, NotificationService, RosterService, TenantRequestService,
    UserService,
};
use roomshare_db::repositories::{
    ListingRepository, ListingTenantRepository, NotificationRepository, StudentProfileRepository,
    TenantRequestRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// If a handler cannot be installed the failure is logged and that branch
/// never completes, so the other signal still shuts the server down.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// Wire repositories and services over one shared connection.
fn build_state(db: Arc<sea_orm::DatabaseConnection>, config: &Config) -> AppState {
    let user_repo = UserRepository::new(Arc::clone(&db));
    let profile_repo = StudentProfileRepository::new(Arc::clone(&db));
    let listing_repo = ListingRepository::new(Arc::clone(&db));
    let request_repo = TenantRequestRepository::new(Arc::clone(&db));
    let tenant_repo = ListingTenantRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(db);

    let guard = ListingGuard::new(listing_repo.clone());

    let notification_service = NotificationService::new(notification_repo)
        .with_page_limit(config.notifications.effective_limit());
    let roster_service = RosterService::new(tenant_repo, guard.clone());
    let tenant_request_service = TenantRequestService::new(
        request_repo,
        listing_repo.clone(),
        profile_repo.clone(),
        roster_service.clone(),
        notification_service.clone(),
    );

    AppState {
        user_service: UserService::new(user_repo, profile_repo),
        tenant_request_service,
        roster_service,
        listing_service: ListingService::new(listing_repo, guard),
        notification_service,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roomshare=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting roomshare server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = roomshare_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    roomshare_db::migrate(&db).await?;
    info!("Migrations completed");

    let state = build_state(Arc::new(db), &config);

    let app = Router::new()
        .nest("/api", roomshare_api::app(state))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server with graceful shutdown
    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::new(host, config.server.port);
    info!(url = %config.server.url, "Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
