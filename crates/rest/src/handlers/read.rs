//! Read handler.
//!
//! Implements `GET` and `HEAD` on any LDP resource. Axum answers `HEAD`
//! with this handler and discards the body.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use ldp_persistence::core::ResourceStorage;
use tracing::debug;

use crate::auth::Authenticated;
use crate::error::RestResult;
use crate::extractors::LdpTarget;
use crate::middleware::conditional::ConditionalHeaders;
use crate::middleware::content_type::negotiate_rdf_format;
use crate::middleware::prefer::PreferHeader;
use crate::responses::headers::LdpHeaders;
use crate::responses::{binary_response, format_rdf_response};
use crate::state::AppState;

/// Handler for reading a resource.
///
/// # HTTP Request
///
/// `GET [base]/[path]`, `GET [base]/[path]/fcr:metadata`
///
/// # Headers
///
/// - `Accept` - Content negotiation over Turtle (default), N-Triples,
///   JSON-LD and RDF/XML
/// - `Prefer` - `return=representation; include=".."; omit=".."` selects
///   whether containment and membership triples are included
/// - `If-None-Match` - Return 304 Not Modified if ETag matches
/// - `If-Modified-Since` - Return 304 Not Modified if not modified since date
///
/// # Response
///
/// - `200 OK` - The RDF representation, or the bytes of a binary
/// - `304 Not Modified` - Resource unchanged (conditional read)
/// - `404 Not Found` - Resource does not exist
/// - `406 Not Acceptable` - No supported RDF serialization is acceptable
///
/// # Example
///
/// ```http
/// GET /rest/container HTTP/1.1
/// Accept: text/turtle
/// Prefer: return=representation; omit="http://www.w3.org/ns/ldp#PreferContainment"
/// ```
pub async fn read_handler<S>(
    State(state): State<AppState<S>>,
    Authenticated(principal): Authenticated,
    LdpTarget(target): LdpTarget,
    conditional: ConditionalHeaders,
    prefer: PreferHeader,
    headers: HeaderMap,
) -> RestResult<Response>
where
    S: ResourceStorage,
{
    debug!(
        path = %target.path,
        description = target.description,
        principal = %principal,
        "Processing read request"
    );

    let view = state.repository().get(&principal, &target).await?;
    let ldp_headers = LdpHeaders::for_view(&view);

    if conditional.is_not_modified(&view) {
        debug!(etag = %view.etag(), "Returning 304 Not Modified");
        return Ok((StatusCode::NOT_MODIFIED, ldp_headers.to_header_map()).into_response());
    }

    if let Some(binary) = view.binary() {
        debug!(iri = %view.iri(), size = binary.size(), "Returning binary content");
        return Ok(binary_response(ldp_headers.to_header_map(), binary));
    }

    let format = negotiate_rdf_format(&headers)?;
    let graph = view.representation(prefer.representation_options());

    debug!(
        iri = %view.iri(),
        format = %format,
        triples = graph.len(),
        "Returning resource"
    );

    let ldp_headers = ldp_headers.with_preference_applied(prefer.applied());
    format_rdf_response(StatusCode::OK, ldp_headers.to_header_map(), &graph, format)
}
