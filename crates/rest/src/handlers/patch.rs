//! Patch handler.
//!
//! Implements `PATCH` with a SPARQL Update body
//! (`application/sparql-update`).

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use ldp_model::SPARQL_UPDATE_MEDIA_TYPE;
use ldp_persistence::core::ResourceStorage;
use tracing::debug;

use crate::auth::Authenticated;
use crate::error::{RestError, RestResult};
use crate::extractors::LdpTarget;
use crate::middleware::conditional::ConditionalHeaders;
use crate::middleware::content_type::request_media_type;
use crate::responses::headers::LdpHeaders;
use crate::state::AppState;

/// Handler for patching an RDF resource or a binary's description.
///
/// # HTTP Request
///
/// `PATCH [base]/[path]`, `PATCH [base]/[path]/fcr:metadata`
///
/// # Headers
///
/// - `Content-Type` - Must be `application/sparql-update`
/// - `If-Match` - Optimistic locking (ETag)
///
/// # Response
///
/// - `204 No Content` - Update applied; `ETag` is the new entity tag
/// - `400 Bad Request` - Malformed SPARQL, or invalid membership triples
/// - `404 Not Found` - Resource does not exist
/// - `405 Method Not Allowed` - The target is a binary
/// - `409 Conflict` - The update touches a server-managed triple
/// - `412 Precondition Failed` - If-Match condition not met
/// - `415 Unsupported Media Type` - Not a SPARQL Update
///
/// # Example
///
/// ```http
/// PATCH /rest/thing HTTP/1.1
/// Content-Type: application/sparql-update
///
/// INSERT DATA { <> <http://purl.org/dc/terms/title> "Thing" . }
/// ```
pub async fn patch_handler<S>(
    State(state): State<AppState<S>>,
    Authenticated(principal): Authenticated,
    LdpTarget(target): LdpTarget,
    conditional: ConditionalHeaders,
    headers: HeaderMap,
    body: Bytes,
) -> RestResult<Response>
where
    S: ResourceStorage,
{
    let content_type = request_media_type(&headers)?;

    debug!(
        path = %target.path,
        description = target.description,
        content_type = ?content_type,
        if_match = ?conditional.if_match(),
        "Processing patch request"
    );

    if content_type.as_deref() != Some(SPARQL_UPDATE_MEDIA_TYPE) {
        return Err(RestError::UnsupportedMediaType {
            content_type: content_type.unwrap_or_default(),
        });
    }

    let update = std::str::from_utf8(&body).map_err(|_| RestError::BadRequest {
        message: "SPARQL Update body is not valid UTF-8".to_string(),
    })?;

    let view = state
        .repository()
        .patch(&principal, &target, update, &conditional.preconditions())
        .await?;

    debug!(iri = %view.iri(), etag = %view.etag(), "Resource patched");

    Ok((
        StatusCode::NO_CONTENT,
        LdpHeaders::for_view(&view).to_header_map(),
    )
        .into_response())
}
