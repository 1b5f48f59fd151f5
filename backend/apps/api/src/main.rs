//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use auth::PgAuthRepository;
use axum::{
    Router, http,
    http::{Method, header},
};
use shows::PgShowRepository;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,shows=info,notify=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: remove expired auth data
    // Errors here should not prevent server startup
    let auth_store_for_cleanup = PgAuthRepository::new(pool.clone());
    match auth_store_for_cleanup.cleanup_expired().await {
        Ok(report) => {
            tracing::info!(
                sessions_deleted = report.sessions,
                login_tokens_deleted = report.login_tokens,
                challenges_deleted = report.challenges,
                oauth_states_deleted = report.oauth_states,
                rate_windows_deleted = report.rate_windows,
                "Auth cleanup completed"
            );
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Auth cleanup failed, continuing anyway"
            );
        }
    }

    // Per-crate configuration
    let auth_config = config::auth_config()?;
    let shows_config = config::shows_config();
    let mailer = config::mailer()?;

    // Notification fan-out worker
    let notify_handle = notify::spawn_worker(config::notifier());

    // Repositories
    let auth_repo = PgAuthRepository::new(pool.clone());
    let show_repo = PgShowRepository::new(pool.clone());

    let auth_config_shared = Arc::new(auth_config.clone());
    let auth_middleware_state = auth::middleware::AuthMiddlewareState {
        config: auth_config_shared.clone(),
    };

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest(
            "/api/auth",
            auth::auth_router(auth_repo, mailer, auth_config)
                .map_err(|e| anyhow::anyhow!("Failed to build auth router: {e}"))?,
        )
        .nest(
            "/api/shows",
            shows::shows_router(
                show_repo.clone(),
                shows_config.clone(),
                auth_config_shared.clone(),
                notify_handle.clone(),
            ),
        )
        .nest(
            "/api/artists",
            shows::artists_router(
                show_repo.clone(),
                shows_config.clone(),
                auth_config_shared.clone(),
                notify_handle.clone(),
            ),
        )
        .nest(
            "/api/venues",
            shows::venues_router(
                show_repo.clone(),
                shows_config.clone(),
                auth_config_shared.clone(),
                notify_handle.clone(),
            ),
        )
        .nest(
            "/api/me",
            shows::me_router(
                show_repo.clone(),
                shows_config.clone(),
                auth_config_shared.clone(),
                notify_handle.clone(),
            )
            .layer(axum::middleware::from_fn({
                let state = auth_middleware_state.clone();
                move |req, next| auth::middleware::require_auth(state.clone(), req, next)
            })),
        )
        .nest(
            "/api/admin",
            shows::admin_router(
                show_repo,
                shows_config,
                auth_config_shared,
                notify_handle,
            )
            .layer(axum::middleware::from_fn({
                let state = auth_middleware_state;
                move |req, next| auth::middleware::require_staff(state.clone(), req, next)
            })),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config::port()));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
