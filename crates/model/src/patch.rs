//! SPARQL Update application against a single resource graph.

use oxigraph::model::{GraphNameRef, Triple};
use oxigraph::sparql::Update;
use oxigraph::store::Store;
use tracing::trace;

use crate::error::{ModelError, ModelResult};
use crate::graph::Graph;

/// Media type of SPARQL Update request bodies.
pub const SPARQL_UPDATE_MEDIA_TYPE: &str = "application/sparql-update";

/// Parses a SPARQL Update request, resolving relative IRIs against `base_iri`.
pub fn parse_update(update: &str, base_iri: &str) -> ModelResult<Update> {
    Update::parse(update, Some(base_iri)).map_err(|e| ModelError::SparqlSyntax {
        message: e.to_string(),
    })
}

/// Applies `update` to a copy of `graph` and returns the resulting graph.
///
/// The graph is loaded into a scratch in-memory store as its default graph.
/// Quads written to named graphs are discarded.
///
/// # Errors
///
/// * [`ModelError::SparqlSyntax`] if the update does not parse.
/// * [`ModelError::SparqlEvaluation`] if evaluation fails.
pub fn apply_update(graph: &Graph, update: &str, base_iri: &str) -> ModelResult<Graph> {
    let update = parse_update(update, base_iri)?;

    let store = Store::new().map_err(evaluation)?;
    for triple in graph {
        store
            .insert(triple.as_ref().in_graph(GraphNameRef::DefaultGraph))
            .map_err(evaluation)?;
    }

    store.update(update).map_err(evaluation)?;

    let mut result = Graph::new();
    for quad in store.quads_for_pattern(None, None, None, Some(GraphNameRef::DefaultGraph)) {
        let quad = quad.map_err(evaluation)?;
        result.insert(Triple::new(quad.subject, quad.predicate, quad.object));
    }

    trace!(before = graph.len(), after = result.len(), "Applied SPARQL Update");
    Ok(result)
}

fn evaluation(err: impl ToString) -> ModelError {
    ModelError::SparqlEvaluation {
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::RdfSerialization;
    use oxigraph::model::{Literal, NamedNode};

    const BASE: &str = "http://localhost:8080/rest/r1";

    fn graph(body: &str) -> Graph {
        RdfSerialization::Turtle.parse(body.as_bytes(), BASE).unwrap()
    }

    #[test]
    fn test_insert_data_with_relative_subject() {
        let before = graph("<> a <http://example.com/ResourceInteraction> .");
        let after = apply_update(
            &before,
            "INSERT DATA { <> <http://purl.org/dc/terms/title> \"hello\" . }",
            BASE,
        )
        .unwrap();
        assert_eq!(after.len(), 2);
        assert!(after.contains(&Triple::new(
            NamedNode::new_unchecked(BASE),
            NamedNode::new_unchecked("http://purl.org/dc/terms/title"),
            Literal::new_simple_literal("hello"),
        )));
    }

    #[test]
    fn test_delete_insert_where() {
        let before = graph("<> <http://purl.org/dc/terms/title> \"old\" .");
        let after = apply_update(
            &before,
            "PREFIX dc: <http://purl.org/dc/terms/>
             DELETE { <> dc:title ?t } INSERT { <> dc:title \"new\" } WHERE { <> dc:title ?t }",
            BASE,
        )
        .unwrap();
        assert_eq!(after.len(), 1);
        assert!(after.contains(&Triple::new(
            NamedNode::new_unchecked(BASE),
            NamedNode::new_unchecked("http://purl.org/dc/terms/title"),
            Literal::new_simple_literal("new"),
        )));
    }

    #[test]
    fn test_repeated_insert_is_idempotent() {
        let update = "INSERT DATA { <> <http://example.com/p> \"v\" . }";
        let once = apply_update(&Graph::new(), update, BASE).unwrap();
        let twice = apply_update(&once, update, BASE).unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice.len(), 1);
    }

    #[test]
    fn test_invalid_update_is_syntax_error() {
        assert!(matches!(
            apply_update(&Graph::new(), "INSERT NONSENSE", BASE),
            Err(ModelError::SparqlSyntax { .. })
        ));
    }
}
