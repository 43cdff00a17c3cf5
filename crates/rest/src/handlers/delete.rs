//! Delete handler.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ldp_persistence::core::ResourceStorage;
use tracing::debug;

use crate::auth::Authenticated;
use crate::error::RestResult;
use crate::extractors::LdpTarget;
use crate::middleware::conditional::ConditionalHeaders;
use crate::state::AppState;

/// Handler for deleting a resource.
///
/// Deletes the resource and every resource below it. Containment and
/// membership triples naming them disappear with them.
///
/// # HTTP Request
///
/// `DELETE [base]/[path]`
///
/// # Headers
///
/// - `If-Match` - Optimistic locking (ETag)
///
/// # Response
///
/// - `204 No Content` - Resource deleted
/// - `404 Not Found` - Resource does not exist
/// - `405 Method Not Allowed` - The root container, or a binary description
/// - `412 Precondition Failed` - If-Match condition not met
pub async fn delete_handler<S>(
    State(state): State<AppState<S>>,
    Authenticated(principal): Authenticated,
    LdpTarget(target): LdpTarget,
    conditional: ConditionalHeaders,
) -> RestResult<Response>
where
    S: ResourceStorage,
{
    debug!(
        path = %target.path,
        description = target.description,
        principal = %principal,
        "Processing delete request"
    );

    let removed = state
        .repository()
        .delete(&principal, &target, &conditional.preconditions())
        .await?;

    debug!(path = %target.path, removed, "Resource deleted");

    Ok(StatusCode::NO_CONTENT.into_response())
}
