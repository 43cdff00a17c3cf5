//! Read model of a resource.

use chrono::{DateTime, Utc};
use ldp_model::{Graph, InteractionModel};
use sha2::{Digest, Sha256};

use crate::types::{BinaryContent, StoredResource};

/// Which computed triples a representation includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepresentationOptions {
    /// Include `ldp:contains` triples.
    pub containment: bool,
    /// Include synthesized membership triples.
    pub membership: bool,
}

impl Default for RepresentationOptions {
    fn default() -> Self {
        Self {
            containment: true,
            membership: true,
        }
    }
}

/// A resource as seen by a reader: the stored resource plus every triple the
/// server computes for it.
///
/// Client triples and the server-managed partition are kept in separate
/// graphs and only merged when a representation is produced.
#[derive(Debug, Clone)]
pub struct ResourceView {
    resource: StoredResource,
    iri: String,
    description: bool,
    managed: Graph,
    containment: Graph,
    membership: Graph,
    etag: String,
}

impl ResourceView {
    pub(crate) fn new(
        resource: StoredResource,
        iri: String,
        description: bool,
        managed: Graph,
        containment: Graph,
        membership: Graph,
    ) -> Self {
        let mut view = Self {
            resource,
            iri,
            description,
            managed,
            containment,
            membership,
            etag: String::new(),
        };
        view.etag = view.compute_etag();
        view
    }

    /// Binary content has a strong tag over its digest. RDF views have a
    /// weak tag over the canonical N-Triples of the full graph.
    fn compute_etag(&self) -> String {
        match self.binary() {
            Some(binary) => format!("\"{}\"", binary.digest()),
            None => {
                let digest = Sha256::digest(self.full_graph().to_ntriples().as_bytes());
                format!("W/\"{}\"", &hex::encode(digest)[..32])
            }
        }
    }

    pub fn resource(&self) -> &StoredResource {
        &self.resource
    }

    pub fn interaction_model(&self) -> InteractionModel {
        self.resource.interaction_model()
    }

    /// The resource IRI; for a description this is the binary's IRI.
    pub fn iri(&self) -> &str {
        &self.iri
    }

    /// `true` if this is the RDF description of a binary.
    pub fn is_description(&self) -> bool {
        self.description
    }

    /// Returns the binary content when the view addresses the binary itself.
    pub fn binary(&self) -> Option<&BinaryContent> {
        if self.description {
            None
        } else {
            self.resource.binary()
        }
    }

    pub fn client_graph(&self) -> &Graph {
        self.resource.graph()
    }

    pub fn managed_graph(&self) -> &Graph {
        &self.managed
    }

    pub fn containment(&self) -> &Graph {
        &self.containment
    }

    pub fn membership(&self) -> &Graph {
        &self.membership
    }

    pub fn etag(&self) -> &str {
        &self.etag
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.resource.last_modified()
    }

    /// The triples a client may not change: server-managed, containment and
    /// membership.
    pub fn protected(&self) -> Graph {
        let mut graph = self.managed.clone();
        graph.extend(self.containment.iter().cloned());
        graph.extend(self.membership.iter().cloned());
        graph
    }

    /// Every triple of the resource.
    pub fn full_graph(&self) -> Graph {
        self.representation(RepresentationOptions::default())
    }

    /// The RDF representation honoring `options`.
    pub fn representation(&self, options: RepresentationOptions) -> Graph {
        let mut graph = self.resource.graph().clone();
        graph.extend(self.managed.iter().cloned());
        if options.containment {
            graph.extend(self.containment.iter().cloned());
        }
        if options.membership {
            graph.extend(self.membership.iter().cloned());
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldp_model::ResourcePath;
    use ldp_model::rdf::{NamedNode, Triple};
    use ldp_model::vocab::ldp;

    fn contains_triple() -> Triple {
        Triple::new(
            NamedNode::new_unchecked("http://localhost/rest/c"),
            ldp::CONTAINS.into_owned(),
            NamedNode::new_unchecked("http://localhost/rest/c/m"),
        )
    }

    fn view(containment: Graph) -> ResourceView {
        let resource = StoredResource::new(
            ResourcePath::parse("c").unwrap(),
            InteractionModel::BasicContainer,
            Graph::new(),
            "alice",
        );
        ResourceView::new(
            resource,
            "http://localhost/rest/c".to_string(),
            false,
            Graph::new(),
            containment,
            Graph::new(),
        )
    }

    #[test]
    fn test_representation_options() {
        let v = view([contains_triple()].into_iter().collect());
        assert_eq!(v.full_graph().len(), 1);
        let omitted = v.representation(RepresentationOptions {
            containment: false,
            membership: true,
        });
        assert!(omitted.is_empty());
    }

    #[test]
    fn test_etag_tracks_content() {
        let empty = view(Graph::new());
        let with_child = view([contains_triple()].into_iter().collect());
        assert!(empty.etag().starts_with("W/\""));
        assert_ne!(empty.etag(), with_child.etag());
        assert_eq!(empty.etag(), view(Graph::new()).etag());
    }
}
