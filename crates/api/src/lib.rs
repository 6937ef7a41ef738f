//! # Hospital API
//!
//! The API crate provides the web server for the hospital management backend.
//! It exposes RESTful endpoints for accounts, doctors and their working hours,
//! patients, appointment booking, and the medicine inventory.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Session authentication, role checks and error mapping
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework and SQLx for database interactions.

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for authentication and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    error_handling::HandleErrorLayer,
    http::{header, HeaderValue, Method, StatusCode},
    BoxError, Json, Router,
};
use eyre::Result;
use serde_json::json;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// How often expired login sessions are purged.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use hospital_api::{build_router, ApiState};
///
/// # fn example(db_pool: sqlx::PgPool) {
/// let state = Arc::new(ApiState::new(db_pool, 30, chrono::Duration::hours(12)));
/// let app = build_router(state);
/// # }
/// ```
pub struct ApiState {
    /// PostgreSQL connection pool for database operations
    pub db_pool: PgPool,

    /// Length of the slots offered by the availability endpoint
    pub slot_length_minutes: u32,

    /// Lifetime of sessions issued at login
    pub session_ttl: chrono::Duration,
}

impl ApiState {
    pub fn new(db_pool: PgPool, slot_length_minutes: u32, session_ttl: chrono::Duration) -> Self {
        Self {
            db_pool,
            slot_length_minutes,
            session_ttl,
        }
    }

    pub fn from_config(config: &config::ApiConfig, db_pool: PgPool) -> Self {
        Self::new(
            db_pool,
            config.slot_length_minutes,
            chrono::Duration::hours(config.session_ttl_hours),
        )
    }
}

/// Builds the application router with every route group and request tracing.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Login, logout and account management
        .merge(routes::auth::routes())
        // Doctors, working hours and free slots
        .merge(routes::doctor::routes())
        .merge(routes::patient::routes())
        .merge(routes::appointment::routes())
        .merge(routes::medicine::routes())
        // Attach shared state to all routes
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(allowed)
        .allow_credentials(true)
}

async fn handle_timeout_error(err: BoxError) -> (StatusCode, Json<serde_json::Value>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({ "error": "Request timed out" })),
        )
    } else {
        tracing::error!("Unhandled middleware error: {}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal server error" })),
        )
    }
}

/// Starts the API server with the provided configuration and database connection
///
/// This function initializes logging, creates the bootstrap administrator
/// when one is configured, builds the router and serves it until shutdown.
///
/// # Example
///
/// ```no_run
/// use hospital_api::{config::ApiConfig, start_server};
///
/// # async fn example() -> eyre::Result<()> {
/// let config = ApiConfig::from_env()?;
/// let db_pool = hospital_db::create_pool(&config.database_url, config.database_max_connections).await?;
/// start_server(config, db_pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Some(admin) = &config.bootstrap_admin {
        middleware::auth::ensure_bootstrap_admin(&db_pool, admin).await?;
    }

    // Purge expired sessions in the background
    let sweep_pool = db_pool.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            match hospital_db::repositories::user::delete_expired_sessions(&sweep_pool).await {
                Ok(0) => {}
                Ok(removed) => info!("Removed {} expired sessions", removed),
                Err(e) => warn!("Failed to purge expired sessions: {}", e),
            }
        }
    });

    let state = Arc::new(ApiState::from_config(&config, db_pool));
    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    // Add request timeout middleware
    let app = app.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_timeout_error))
            .timeout(Duration::from_secs(config.request_timeout)),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
