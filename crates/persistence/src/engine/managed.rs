//! The server-managed partition.
//!
//! Builds the triples the server asserts about a resource, and separates
//! client input from anything only the server may assert.

use chrono::{DateTime, SecondsFormat, Utc};
use ldp_model::rdf::{Literal, NamedNode, NamedNodeRef, Term, Triple};
use ldp_model::vocab::{self, ebucore, fedora, premis, rdf, xsd};
use ldp_model::{Graph, InteractionModel};

use crate::error::{StorageError, StorageResult};
use crate::types::StoredResource;

fn date_time(at: DateTime<Utc>) -> Literal {
    Literal::new_typed_literal(at.to_rfc3339_opts(SecondsFormat::Millis, true), xsd::DATE_TIME)
}

/// Returns the server-managed triples about `resource`, whose IRI is
/// `subject`. Containment and membership are computed separately.
pub(crate) fn server_managed_triples(
    resource: &StoredResource,
    subject: NamedNodeRef<'_>,
    parent: Option<NamedNodeRef<'_>>,
) -> Graph {
    let mut graph = Graph::new();
    let mut add = |predicate: NamedNodeRef<'_>, object: Term| {
        graph.insert(Triple::new(subject.into_owned(), predicate.into_owned(), object));
    };

    for ty in resource.interaction_model().ldp_types() {
        add(rdf::TYPE, ty.into_owned().into());
    }
    add(
        fedora::UUID,
        Literal::new_simple_literal(resource.uuid().to_string()).into(),
    );
    add(fedora::CREATED, date_time(resource.created_at()).into());
    add(
        fedora::CREATED_BY,
        Literal::new_simple_literal(resource.created_by()).into(),
    );
    add(fedora::LAST_MODIFIED, date_time(resource.last_modified()).into());
    add(
        fedora::LAST_MODIFIED_BY,
        Literal::new_simple_literal(resource.last_modified_by()).into(),
    );
    if let Some(parent) = parent {
        add(fedora::HAS_PARENT, parent.into_owned().into());
    }

    if let Some(binary) = resource.binary() {
        add(
            ebucore::HAS_MIME_TYPE,
            Literal::new_simple_literal(binary.mime_type()).into(),
        );
        add(
            premis::HAS_SIZE,
            Literal::new_typed_literal(binary.size().to_string(), xsd::LONG).into(),
        );
        add(
            premis::HAS_MESSAGE_DIGEST,
            NamedNode::new_unchecked(format!("urn:sha256:{}", binary.digest())).into(),
        );
    }

    graph
}

/// Decides whether a triple outside the protected set may be asserted by a
/// client of a resource with interaction model `model`.
///
/// Returns `Ok(false)` for an LDP type the resource already has.
fn check_assertable(triple: &Triple, model: InteractionModel) -> StorageResult<bool> {
    let predicate = triple.predicate.as_ref();
    if vocab::is_server_managed_predicate(predicate) {
        return Err(StorageError::server_managed(predicate.as_str()));
    }
    if predicate == rdf::TYPE {
        if let Term::NamedNode(ty) = &triple.object {
            if vocab::is_ldp_term(ty.as_str()) {
                if model.ldp_types().iter().any(|t| *t == ty.as_ref()) {
                    return Ok(false);
                }
                return Err(StorageError::server_managed(format!(
                    "{} {}",
                    predicate.as_str(),
                    ty.as_str()
                )));
            }
        }
    }
    Ok(true)
}

/// Separates client triples from a request body.
///
/// Triples equal to a member of `protected` (the current server-managed,
/// containment and membership triples) are dropped. Any other server-managed
/// assertion is a conflict.
pub(crate) fn client_triples(
    input: Graph,
    model: InteractionModel,
    protected: &Graph,
) -> StorageResult<Graph> {
    let mut client = Graph::new();
    for triple in input {
        if protected.contains(&triple) {
            continue;
        }
        if check_assertable(&triple, model)? {
            client.insert(triple);
        }
    }
    Ok(client)
}

/// Checks the result of a SPARQL Update.
///
/// `before` is the client graph plus `protected`; `after` is what the update
/// produced. Returns the new client graph.
pub(crate) fn patched_client_triples(
    before: &Graph,
    after: Graph,
    model: InteractionModel,
    protected: &Graph,
) -> StorageResult<Graph> {
    if let Some(removed) = protected.difference(&after).sorted().first() {
        return Err(StorageError::server_managed(removed.predicate.as_str()));
    }
    for added in after.difference(before).sorted() {
        check_assertable(added, model)?;
    }
    Ok(after.difference(protected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConstraintError;
    use crate::types::BinaryContent;
    use ldp_model::ResourcePath;
    use ldp_model::vocab::ldp;

    const IRI: &str = "http://localhost/rest/r";

    fn subject() -> NamedNode {
        NamedNode::new_unchecked(IRI)
    }

    fn triple(p: NamedNodeRef<'_>, o: impl Into<Term>) -> Triple {
        Triple::new(subject(), p.into_owned(), o)
    }

    fn title(value: &str) -> Triple {
        triple(
            NamedNodeRef::new_unchecked("http://purl.org/dc/terms/title"),
            Literal::new_simple_literal(value),
        )
    }

    fn resource(model: InteractionModel) -> StoredResource {
        StoredResource::new(ResourcePath::parse("r").unwrap(), model, Graph::new(), "alice")
    }

    fn is_conflict(result: StorageResult<Graph>) -> bool {
        matches!(
            result,
            Err(StorageError::Constraint(ConstraintError::ServerManagedTriple { .. }))
        )
    }

    #[test]
    fn test_managed_triples_for_container() {
        let r = resource(InteractionModel::IndirectContainer);
        let parent = NamedNode::new_unchecked("http://localhost/rest/");
        let graph = server_managed_triples(&r, subject().as_ref(), Some(parent.as_ref()));

        assert!(graph.contains(&triple(rdf::TYPE, ldp::INDIRECT_CONTAINER.into_owned())));
        assert!(graph.contains(&triple(rdf::TYPE, ldp::CONTAINER.into_owned())));
        assert!(graph.contains(&triple(fedora::HAS_PARENT, parent)));
        assert!(graph.contains(&triple(
            fedora::UUID,
            Literal::new_simple_literal(r.uuid().to_string())
        )));
        assert_eq!(graph.objects(subject().as_ref().into(), fedora::CREATED).count(), 1);
    }

    #[test]
    fn test_managed_triples_for_binary() {
        let r = resource(InteractionModel::NonRdfSource)
            .with_binary(BinaryContent::new(b"hello".to_vec(), "text/plain"));
        let graph = server_managed_triples(&r, subject().as_ref(), None);

        assert!(graph.contains(&triple(
            premis::HAS_SIZE,
            Literal::new_typed_literal("5", xsd::LONG)
        )));
        assert!(graph.contains(&triple(
            ebucore::HAS_MIME_TYPE,
            Literal::new_simple_literal("text/plain")
        )));
        assert!(!graph.contains(&triple(rdf::TYPE, ldp::RDF_SOURCE.into_owned())));
    }

    #[test]
    fn test_client_triples_drop_equal_managed_values() {
        let r = resource(InteractionModel::BasicContainer);
        let protected = server_managed_triples(&r, subject().as_ref(), None);
        let mut input: Graph = protected.clone();
        input.insert(title("hello"));

        let client = client_triples(input, r.interaction_model(), &protected).unwrap();
        assert_eq!(client.len(), 1);
        assert!(client.contains(&title("hello")));
    }

    #[test]
    fn test_client_triples_reject_changed_managed_value() {
        let input: Graph = [triple(fedora::UUID, Literal::new_simple_literal("not-mine"))]
            .into_iter()
            .collect();
        assert!(is_conflict(client_triples(
            input,
            InteractionModel::RdfSource,
            &Graph::new()
        )));
    }

    #[test]
    fn test_ldp_types() {
        let consistent: Graph = [triple(rdf::TYPE, ldp::CONTAINER.into_owned())]
            .into_iter()
            .collect();
        let client =
            client_triples(consistent.clone(), InteractionModel::BasicContainer, &Graph::new())
                .unwrap();
        assert!(client.is_empty());

        assert!(is_conflict(client_triples(
            consistent,
            InteractionModel::RdfSource,
            &Graph::new()
        )));
    }

    #[test]
    fn test_patch_cannot_remove_protected_triples() {
        let r = resource(InteractionModel::RdfSource);
        let protected = server_managed_triples(&r, subject().as_ref(), None);
        let before = protected.clone();
        let mut after = protected.clone();
        after.retain(|t| t.predicate != fedora::UUID);

        assert!(is_conflict(patched_client_triples(
            &before,
            after,
            InteractionModel::RdfSource,
            &protected
        )));
    }

    #[test]
    fn test_patch_adds_client_triples() {
        let protected: Graph = [triple(rdf::TYPE, ldp::RESOURCE.into_owned())]
            .into_iter()
            .collect();
        let before = protected.clone();
        let mut after = protected.clone();
        after.insert(title("new"));

        let client =
            patched_client_triples(&before, after, InteractionModel::RdfSource, &protected)
                .unwrap();
        assert_eq!(client.len(), 1);
    }
}
