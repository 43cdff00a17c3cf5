//! Format-aware response building.
//!
//! Serializes RDF representations in the negotiated format and returns
//! binary content as stored.

use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use ldp_model::{Graph, RdfSerialization};
use ldp_persistence::BinaryContent;

use crate::error::{RestError, RestResult};

/// Builds an HTTP response whose body is `graph` in `format`.
pub fn format_rdf_response(
    status: StatusCode,
    mut headers: HeaderMap,
    graph: &Graph,
    format: RdfSerialization,
) -> RestResult<Response> {
    let body = format
        .serialize(graph)
        .map_err(|e| RestError::InternalError {
            message: format!("Failed to serialize {}: {}", format, e),
        })?;

    if let Ok(value) = HeaderValue::from_str(&format.content_type()) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    Ok((status, headers, body).into_response())
}

/// Builds an HTTP response carrying a binary's bytes and media type.
pub fn binary_response(mut headers: HeaderMap, binary: &BinaryContent) -> Response {
    let content_type = HeaderValue::from_str(binary.mime_type())
        .unwrap_or(HeaderValue::from_static("application/octet-stream"));
    headers.insert(header::CONTENT_TYPE, content_type);
    (StatusCode::OK, headers, binary.data().to_vec()).into_response()
}

/// Builds the response of a successful creation: the new resource's IRI as
/// `text/plain`.
pub fn created_response(headers: HeaderMap, iri: &str) -> Response {
    (
        StatusCode::CREATED,
        headers,
        [(header::CONTENT_TYPE, "text/plain")],
        iri.to_string(),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldp_model::rdf::{Literal, NamedNode, Triple};

    #[test]
    fn test_format_rdf_response() {
        let mut graph = Graph::new();
        graph.insert(Triple::new(
            NamedNode::new_unchecked("http://localhost/rest/a"),
            NamedNode::new_unchecked("http://purl.org/dc/terms/title"),
            Literal::new_simple_literal("A"),
        ));

        let response = format_rdf_response(
            StatusCode::OK,
            HeaderMap::new(),
            &graph,
            RdfSerialization::NTriples,
        )
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
        assert!(content_type.to_str().unwrap().starts_with("application/n-triples"));
    }

    #[test]
    fn test_binary_response() {
        let binary = BinaryContent::new(b"hello".to_vec(), "text/plain");
        let response = binary_response(HeaderMap::new(), &binary);
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "text/plain");
    }
}
