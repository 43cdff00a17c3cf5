//! LDP route configuration.
//!
//! Defines all routes of the LDP HTTP API.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{MethodRouter, get},
};
use ldp_persistence::core::ResourceStorage;

use crate::error::CONSTRAINTS_PATH;
use crate::handlers;
use crate::state::AppState;

/// The method router shared by every resource path.
fn resource_methods<S>() -> MethodRouter<AppState<S>>
where
    S: ResourceStorage + 'static,
{
    get(handlers::read_handler::<S>)
        .post(handlers::create_handler::<S>)
        .put(handlers::update_handler::<S>)
        .patch(handlers::patch_handler::<S>)
        .delete(handlers::delete_handler::<S>)
        .options(handlers::options_handler::<S>)
}

/// Creates all LDP routes.
///
/// # Routes
///
/// ## Server-level
/// - `GET /health` - Health check
/// - `GET /_liveness` - Liveness probe
/// - `GET /_readiness` - Readiness probe
/// - `GET /constraints` - Constraints document
///
/// ## Resources
///
/// Every path below the mount path of the base URL (`/rest` for
/// `http://localhost:8080/rest`):
///
/// - `GET`/`HEAD` - Read
/// - `POST` - Create a member
/// - `PUT` - Create or replace
/// - `PATCH` - SPARQL Update
/// - `DELETE` - Delete
/// - `OPTIONS` - Allowed methods
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: ResourceStorage + 'static,
{
    let mount = state.config().mount_path();
    let body_limit = state.config().max_body_size;

    let mut router = Router::new()
        // Server-level routes
        .route("/health", get(handlers::health_handler::<S>))
        .route("/_liveness", get(handlers::health::liveness_handler))
        .route("/_readiness", get(handlers::health::readiness_handler::<S>))
        .route(CONSTRAINTS_PATH, get(handlers::constraints_handler));

    // Resource routes
    if mount.is_empty() {
        router = router
            .route("/", resource_methods::<S>())
            .route("/{*path}", resource_methods::<S>());
    } else {
        router = router
            .route(&mount, resource_methods::<S>())
            .route(&format!("{}/", mount), resource_methods::<S>())
            .route(&format!("{}/{{*path}}", mount), resource_methods::<S>());
    }

    router
        .layer(DefaultBodyLimit::max(body_limit))
        // State
        .with_state(state)
}
