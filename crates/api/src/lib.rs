//! # Konsul API
//!
//! The web server for the Konsul consultation service. It exposes account
//! endpoints and lets psychologists publish their weekly availability.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Turn requests into service calls
//! - **Middleware**: Authentication and error mapping
//! - **Config**: Environment configuration
//!
//! Storage is reached only through the repository traits of `konsul-core`,
//! so the router can be built over Postgres or over in-memory stores.

/// Configuration module for API settings
pub mod config;
/// Request extractors shared by handlers
pub mod extractors;
/// Request handlers
pub mod handlers;
/// Middleware for authentication and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    error_handling::HandleErrorLayer,
    extract::FromRef,
    http::{header, HeaderValue, Method},
    Router,
};
use eyre::{Result, WrapErr};
use konsul_core::{repositories::UserRepository, services::AvailabilityService};
use konsul_db::{
    repositories::{PgAvailabilityRepository, PgUserRepository},
    DbPool,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use middleware::{auth::TokenKeys, error_handling::handle_layer_error};

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub users: Arc<dyn UserRepository>,
    pub availability: AvailabilityService,
    pub tokens: TokenKeys,
}

impl ApiState {
    /// Wires the Postgres repositories over one shared pool.
    pub fn from_pool(pool: DbPool, config: &config::ApiConfig) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            availability: AvailabilityService::new(Arc::new(PgAvailabilityRepository::new(pool))),
            tokens: TokenKeys::new(&config.jwt_secret, config.jwt_expiration_hours),
        }
    }
}

impl FromRef<Arc<ApiState>> for TokenKeys {
    fn from_ref(state: &Arc<ApiState>) -> Self {
        state.tokens.clone()
    }
}

/// Builds the router with every endpoint and request tracing.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Registration, login and profile
        .merge(routes::auth::routes())
        // Availability management endpoints
        .merge(routes::availability::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the API server with the provided configuration and database pool
///
/// Installs the global tracing subscriber, so it must be called once per
/// process.
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState::from_pool(db_pool, &config));
    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .wrap_err("Invalid API_CORS_ORIGINS value")?;

        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_layer_error))
            .timeout(Duration::from_secs(config.request_timeout)),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
