//! Create handler.
//!
//! Implements `POST` to a container: the server creates a child resource and
//! chooses its path segment.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderName},
    response::Response,
};
use ldp_model::InteractionModel;
use ldp_persistence::core::ResourceStorage;
use ldp_persistence::engine::ResourceRequest;
use tracing::debug;

use crate::auth::Authenticated;
use crate::error::{RestError, RestResult};
use crate::extractors::{LdpTarget, RequestLinks};
use crate::middleware::content_type::request_media_type;
use crate::responses::created_response;
use crate::responses::headers::{LdpHeaders, allowed_methods};
use crate::state::AppState;

/// `Slug` request header.
pub const SLUG: HeaderName = HeaderName::from_static("slug");

/// Handler for creating a member of a container.
///
/// # HTTP Request
///
/// `POST [base]/[container]`
///
/// # Headers
///
/// - `Content-Type` - An RDF media type, or any media type for a binary
/// - `Link` - `rel="type"` selects the interaction model of the new resource
/// - `Slug` - Suggested path segment; sanitized, and replaced by a UUID if
///   empty or taken
///
/// # Response
///
/// - `201 Created` - `Location` is the new resource; the body is its IRI
/// - `400 Bad Request` - Invalid Link, RDF body or membership triples, or a
///   member of an Indirect container without its inserted content relation
/// - `404 Not Found` - The container does not exist
/// - `405 Method Not Allowed` - The target is not a container
/// - `409 Conflict` - Server-managed triples in the body
///
/// # Example
///
/// ```http
/// POST /rest/container HTTP/1.1
/// Content-Type: text/turtle
/// Link: <http://www.w3.org/ns/ldp#Resource>; rel="type"
/// Slug: member
///
/// <> a <http://example.com/ResourceInteraction> .
/// ```
pub async fn create_handler<S>(
    State(state): State<AppState<S>>,
    Authenticated(principal): Authenticated,
    LdpTarget(target): LdpTarget,
    RequestLinks(links): RequestLinks,
    headers: HeaderMap,
    body: Bytes,
) -> RestResult<Response>
where
    S: ResourceStorage,
{
    let content_type = request_media_type(&headers)?;
    let slug = headers.get(SLUG).and_then(|v| v.to_str().ok());

    debug!(
        container = %target.path,
        content_type = ?content_type,
        slug = ?slug,
        links = links.len(),
        "Processing create request"
    );

    if target.description {
        return Err(RestError::MethodNotAllowed {
            method: "POST".to_string(),
            path: target.path.to_string(),
            allow: allowed_methods(InteractionModel::NonRdfSource, true, false),
        });
    }

    let request = ResourceRequest::new(content_type.as_deref(), body.to_vec()).with_links(links);
    let view = state
        .repository()
        .create_child(&principal, &target.path, slug, request)
        .await?;

    debug!(iri = %view.iri(), model = %view.interaction_model(), "Resource created");

    let ldp_headers = LdpHeaders::for_view(&view).with_location(view.iri());
    Ok(created_response(ldp_headers.to_header_map(), view.iri()))
}
