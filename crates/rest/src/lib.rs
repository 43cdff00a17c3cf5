//! # ldp-rest - LDP HTTP front end
//!
//! This crate exposes the containment/membership engine of
//! `ldp-persistence` over HTTP, following the
//! [Linked Data Platform 1.0](https://www.w3.org/TR/ldp/) interaction
//! patterns.
//!
//! ## Features
//!
//! - **Containers**: Basic, Direct and Indirect containers with
//!   synthesized containment and membership triples
//! - **Interaction models**: chosen from `Link: <..>; rel="type"` at creation
//! - **Binaries**: NonRDF sources with an `fcr:metadata` description
//! - **Content negotiation**: Turtle, N-Triples, JSON-LD and RDF/XML
//! - **SPARQL Update**: `PATCH` with `application/sparql-update`
//! - **Conditional requests**: ETags, `If-Match`, `If-None-Match`,
//!   `If-Modified-Since`
//! - **Authentication**: optional HTTP Basic with reader/writer/admin roles
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ldp_persistence::backends::memory::MemoryBackend;
//! use ldp_rest::{AppState, ServerConfig, create_app_with_state};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::default();
//!     let state = AppState::new(Arc::new(MemoryBackend::new()), config);
//!     state.repository().init_root().await?;
//!
//!     let app = create_app_with_state(state);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! Resources live below the path of the base URL (`/rest` by default):
//!
//! | Interaction | HTTP Method | Response |
//! |------------|-------------|----------|
//! | read | GET, HEAD | 200, 304 |
//! | create member | POST | 201 + `Location` |
//! | create or replace | PUT | 201 or 204 |
//! | SPARQL Update | PATCH | 204 |
//! | delete | DELETE | 204 |
//! | options | OPTIONS | 200 |
//!
//! The server also answers `GET /health`, `/_liveness`, `/_readiness` and
//! `/constraints`.
//!
//! ## Error Handling
//!
//! Errors are returned as JSON `{"status", "error", "message"}`. Client
//! errors other than 401 carry
//! `Link: </constraints>; rel="http://www.w3.org/ns/ldp#constrainedBy"`.
//! See [`error`] for the status mapping.
//!
//! ## Configuration
//!
//! The server is configured via command-line flags or environment
//! variables; see [`ServerConfig`].
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LDP_SERVER_PORT` | 8080 | Server port |
//! | `LDP_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `LDP_LOG_LEVEL` | info | Log level (error, warn, info, debug, trace) |
//! | `LDP_BASE_URL` | `http://localhost:8080/rest` | Root container IRI |
//! | `LDP_STORAGE_BACKEND` | sqlite | `sqlite` or `memory` |
//! | `LDP_AUTH_ENABLED` | false | Require HTTP Basic credentials |
//!
//! ## Architecture
//!
//! - [`error`] - Error types and status mapping
//! - [`config`] - Server configuration
//! - [`state`] - Application state (engine, configuration, authentication)
//! - [`auth`] - Credentials and authentication providers
//! - [`handlers`] - HTTP request handlers for each interaction
//! - [`middleware`] - Content negotiation, conditional and Prefer headers
//! - [`extractors`] - Axum extractors for the target path and `Link` headers
//! - [`responses`] - Response formatting and header generation
//! - [`routing`] - Route configuration

#![warn(rustdoc::missing_crate_level_docs)]

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod responses;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::{ServerConfig, StorageBackendMode};
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use ldp_persistence::core::ResourceStorage;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application over `storage` with custom configuration.
///
/// The root container must exist before requests are served; call
/// [`Repository::init_root`](ldp_persistence::engine::Repository::init_root)
/// first, or use [`create_app_with_state`] with a prepared state.
///
/// # Example
///
/// ```rust
/// use ldp_persistence::backends::memory::MemoryBackend;
/// use ldp_rest::{ServerConfig, create_app_with_config};
///
/// let config = ServerConfig {
///     port: 3000,
///     enable_cors: true,
///     ..Default::default()
/// };
/// let app = create_app_with_config(MemoryBackend::new(), config);
/// ```
pub fn create_app_with_config<S>(storage: S, config: ServerConfig) -> Router
where
    S: ResourceStorage + 'static,
{
    create_app_with_state(AppState::new(Arc::new(storage), config))
}

/// Creates the Axum application from an existing state.
///
/// This sets up every LDP route with the tracing, timeout and CORS
/// middleware described by the state's configuration.
pub fn create_app_with_state<S>(state: AppState<S>) -> Router
where
    S: ResourceStorage + 'static,
{
    let config = state.config().clone();
    info!(
        backend = state.storage().backend_name(),
        base_url = %config.base_url,
        auth = config.auth_enabled,
        "Creating LDP server"
    );

    // Build the router with all LDP routes
    let router = routing::create_routes(state);

    // Build middleware stack
    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    // Add CORS if enabled
    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    // Apply remaining middleware
    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    // Configure origins
    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    // Configure methods
    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    // Configure headers
    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    // LDP clients read these from cross-origin responses
    cors.expose_headers([
        axum::http::header::LINK,
        axum::http::header::LOCATION,
        axum::http::header::ETAG,
        axum::http::header::ALLOW,
        responses::headers::ACCEPT_POST,
        responses::headers::ACCEPT_PATCH,
        responses::headers::PREFERENCE_APPLIED,
    ])
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` overrides
/// the default filter.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "ldp_rest={level},ldp_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
