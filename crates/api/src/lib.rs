//! # Studio API
//!
//! HTTP server of the studio: JSON query endpoints, urlencoded form actions
//! answered with a `FormState`, and multipart uploads.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Parse requests, check roles and call the services
//! - **Middleware**: Authentication extractors and error mapping
//! - **Storage**: Uploaded files on disk
//! - **Config**: Environment configuration
//!
//! Handlers never touch the database; they go through the [`Services`]
//! container, which tests fill with mocks.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Middleware for authentication and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;
/// Upload storage
pub mod storage;

use std::sync::Arc;
use std::time::Duration;

use axum::{error_handling::HandleErrorLayer, http::StatusCode, BoxError, Router};
use eyre::{Result, WrapErr};
use studio_core::services::Services;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::storage::{FileStore, UPLOAD_ROUTE};

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub services: Services,
    pub files: FileStore,
    /// Largest accepted upload body
    pub max_upload_bytes: usize,
}

impl ApiState {
    pub fn new(services: Services, config: &config::ApiConfig) -> Self {
        Self {
            services,
            files: FileStore::new(&config.upload_dir, config.public_base_url.clone()),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

/// Builds the router with every route and the uploads directory.
pub fn app(state: Arc<ApiState>) -> Router {
    let uploads = ServeDir::new(state.files.dir());

    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        .merge(routes::users::routes())
        .merge(routes::coaches::routes())
        .merge(routes::locations::routes())
        .merge(routes::classes::routes())
        .merge(routes::agendas::routes())
        .merge(routes::packages::routes())
        .merge(routes::vouchers::routes())
        .merge(routes::loyalty::routes())
        .merge(routes::settings::routes())
        .merge(routes::files::routes(state.max_upload_bytes))
        .nest_service(UPLOAD_ROUTE, uploads)
        .layer(TraceLayer::new_for_http())
        // Attach shared state to all routes
        .with_state(state)
}

async fn handle_timeout(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Unhandled internal error: {}", err),
        )
    }
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<axum::http::HeaderValue>()
                .wrap_err_with(|| format!("Invalid CORS origin {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .allow_origin(origins)
        .allow_credentials(true))
}

/// Starts the API server with the provided configuration and services
pub async fn start_server(config: config::ApiConfig, services: Services) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState::new(services, &config));
    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)?),
        None => app,
    };

    // Add request timeout middleware
    let app = app.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_timeout))
            .timeout(Duration::from_secs(config.request_timeout)),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
