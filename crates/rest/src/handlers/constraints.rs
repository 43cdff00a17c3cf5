//! Constraints document.
//!
//! Every 4xx response links here with
//! `rel="http://www.w3.org/ns/ldp#constrainedBy"`.

use axum::{http::header, response::IntoResponse};

const CONSTRAINTS: &str = "\
Constraints of this LDP server

1. Interaction models
   A resource's interaction model is chosen at creation from a Link header
   with rel=\"type\" naming ldp:BasicContainer, ldp:DirectContainer,
   ldp:IndirectContainer, ldp:RDFSource (or ldp:Resource) or
   ldp:NonRDFSource. Without one, RDF bodies create a basic container and
   other bodies create a binary. Any other LDP type is rejected with 400.
   The model cannot change afterwards (409).

2. Membership
   Direct and Indirect containers name an ldp:membershipResource and an
   ldp:hasMemberRelation. Indirect containers also name an
   ldp:insertedContentRelation; for Direct containers it can only be
   ldp:MemberSubject. Missing values default to the container itself and
   ldp:member unless the server requires them. ldp:isMemberOfRelation is
   not supported. A member of an Indirect container must assert its
   inserted content relation.

3. Server-managed triples
   ldp:contains, fedora:uuid, fedora:created, fedora:createdBy,
   fedora:lastModified, fedora:lastModifiedBy, fedora:hasParent, the LDP
   rdf:type triples and synthesized membership triples are computed by the
   server. Requests that change them are rejected with 409.

4. Paths
   Path segments may not be empty, \".\", \"..\" or start with \"fcr:\".
   POST to a non-container and DELETE of the root are not allowed (405).

5. Media types
   RDF is accepted and produced as text/turtle, application/n-triples,
   application/ld+json and application/rdf+xml. PATCH accepts only
   application/sparql-update.
";

/// Handler for the constraints document.
///
/// # HTTP Request
///
/// `GET /constraints`
pub async fn constraints_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], CONSTRAINTS)
}
