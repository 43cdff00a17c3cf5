//! Update handler.
//!
//! Implements `PUT`: creates a resource at a client-chosen path, or replaces
//! an existing one.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use ldp_persistence::core::ResourceStorage;
use ldp_persistence::engine::{PutOutcome, ResourceRequest};
use tracing::debug;

use crate::auth::Authenticated;
use crate::error::RestResult;
use crate::extractors::{LdpTarget, RequestLinks};
use crate::middleware::conditional::ConditionalHeaders;
use crate::middleware::content_type::request_media_type;
use crate::responses::created_response;
use crate::responses::headers::LdpHeaders;
use crate::state::AppState;

/// Handler for creating or replacing a resource.
///
/// # HTTP Request
///
/// `PUT [base]/[path]`, `PUT [base]/[path]/fcr:metadata`
///
/// # Headers
///
/// - `Content-Type` - An RDF media type, or any media type for a binary
/// - `Link` - `rel="type"` selects the interaction model on creation; on
///   replacement it must name the existing model
/// - `If-Match` - Optimistic locking (ETag of the current state)
/// - `If-None-Match: *` - Only create, never replace
///
/// # Response
///
/// - `201 Created` - Resource created
/// - `204 No Content` - Resource replaced
/// - `400 Bad Request` - Invalid path, Link, RDF body or membership triples
/// - `409 Conflict` - Missing parent, interaction model change, or a changed
///   server-managed triple
/// - `412 Precondition Failed` - If-Match or If-None-Match not met
///
/// # Example
///
/// ```http
/// PUT /rest/ldp-test-basic-1 HTTP/1.1
/// Content-Type: text/turtle
/// Link: <http://www.w3.org/ns/ldp#IndirectContainer>; rel="type"
///
/// <> a <http://example.com/ContainerInteraction> .
/// ```
pub async fn update_handler<S>(
    State(state): State<AppState<S>>,
    Authenticated(principal): Authenticated,
    LdpTarget(target): LdpTarget,
    RequestLinks(links): RequestLinks,
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
        "Processing update request"
    );

    let request = ResourceRequest::new(content_type.as_deref(), body.to_vec()).with_links(links);
    let outcome = state
        .repository()
        .put(&principal, &target, request, &conditional.preconditions())
        .await?;

    match outcome {
        PutOutcome::Created(view) => {
            debug!(iri = %view.iri(), "Resource created");
            let ldp_headers = LdpHeaders::for_view(&view).with_location(view.iri());
            Ok(created_response(ldp_headers.to_header_map(), view.iri()))
        }
        PutOutcome::Replaced(view) => {
            debug!(iri = %view.iri(), etag = %view.etag(), "Resource replaced");
            Ok((
                StatusCode::NO_CONTENT,
                LdpHeaders::for_view(&view).to_header_map(),
            )
                .into_response())
        }
    }
}
