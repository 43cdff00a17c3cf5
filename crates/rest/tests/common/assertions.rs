//! HTTP response assertions.
//!
//! Provides assertion utilities for LDP responses.

use axum_test::TestResponse;
use ldp_model::rdf::{NamedNode, Term, Triple};
use ldp_model::{Graph, RdfSerialization};

/// Asserts that the response has an ETag header.
pub fn assert_has_etag(response: &TestResponse) {
    assert!(
        response.headers().contains_key("etag"),
        "Expected ETag header"
    );
}

/// Asserts that the response has a Location header.
pub fn assert_has_location(response: &TestResponse) {
    assert!(
        response.headers().contains_key("location"),
        "Expected Location header"
    );
}

/// Returns the ETag of a response.
pub fn etag(response: &TestResponse) -> String {
    response
        .headers()
        .get("etag")
        .expect("Expected ETag header")
        .to_str()
        .unwrap()
        .to_string()
}

/// Returns every `Link` value of a response.
pub fn links(response: &TestResponse) -> Vec<String> {
    response
        .headers()
        .get_all("link")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

/// Asserts that the response advertises `iri` as a `rel="type"` link.
pub fn assert_link_type(response: &TestResponse, iri: &str) {
    let expected = format!("<{}>; rel=\"type\"", iri);
    let links = links(response);
    assert!(
        links.contains(&expected),
        "Expected Link {}, got {:?}",
        expected,
        links
    );
}

/// Asserts that the response links to the constraints document.
pub fn assert_constrained_by(response: &TestResponse) {
    let links = links(response);
    assert!(
        links
            .iter()
            .any(|l| l.contains("rel=\"http://www.w3.org/ns/ldp#constrainedBy\"")),
        "Expected constrainedBy Link, got {:?}",
        links
    );
}

/// Parses a Turtle response body against `base`.
pub fn turtle_graph(response: &TestResponse, base: &str) -> Graph {
    RdfSerialization::Turtle
        .parse(response.as_bytes(), base)
        .expect("Response is not valid Turtle")
}

/// Returns `true` if `graph` has the triple `<s> <p> <o>`.
pub fn has_iri_triple(graph: &Graph, subject: &str, predicate: &str, object: &str) -> bool {
    graph.contains(&Triple::new(
        NamedNode::new_unchecked(subject),
        NamedNode::new_unchecked(predicate),
        Term::from(NamedNode::new_unchecked(object)),
    ))
}

/// Returns the number of triples of `graph` with predicate `predicate`.
pub fn count_predicate(graph: &Graph, predicate: &str) -> usize {
    graph
        .iter()
        .filter(|t| t.predicate.as_str() == predicate)
        .count()
}
