//! Constant `NamedNodeRef`s for the vocabularies the server speaks.
//!
//! Terms are grouped by namespace. Only the terms actually used by the
//! resolver, the membership engine and the server-managed partition are
//! declared here.

use oxigraph::model::NamedNodeRef;

/// Linked Data Platform namespace.
pub const LDP_NS: &str = "http://www.w3.org/ns/ldp#";
/// Repository (server-managed properties) namespace.
pub const FEDORA_NS: &str = "http://fedora.info/definitions/v4/repository#";
/// RDF namespace.
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// XML Schema datatypes namespace.
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";
/// EBUCore namespace (binary media type).
pub const EBUCORE_NS: &str = "http://www.ebu.ch/metadata/ontologies/ebucore/ebucore#";
/// PREMIS namespace (binary size and fixity).
pub const PREMIS_NS: &str = "http://www.loc.gov/premis/rdf/v1#";

/// Prefixes used when serializing Turtle and RDF/XML.
pub const PREFIXES: [(&str, &str); 6] = [
    ("ldp", LDP_NS),
    ("fedora", FEDORA_NS),
    ("rdf", RDF_NS),
    ("xsd", XSD_NS),
    ("ebucore", EBUCORE_NS),
    ("premis", PREMIS_NS),
];

pub mod rdf {
    //! RDF terms.
    use super::NamedNodeRef;

    pub const TYPE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
}

pub mod xsd {
    //! XML Schema datatypes.
    use super::NamedNodeRef;

    pub const STRING: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#string");
    pub const DATE_TIME: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#dateTime");
    pub const LONG: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#long");
}

pub mod ldp {
    //! Linked Data Platform terms.
    use super::NamedNodeRef;

    // interaction models
    pub const RESOURCE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#Resource");
    pub const RDF_SOURCE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#RDFSource");
    pub const NON_RDF_SOURCE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#NonRDFSource");
    pub const CONTAINER: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#Container");
    pub const BASIC_CONTAINER: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#BasicContainer");
    pub const DIRECT_CONTAINER: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#DirectContainer");
    pub const INDIRECT_CONTAINER: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#IndirectContainer");

    // containment and membership
    pub const CONTAINS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#contains");
    pub const MEMBER: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#member");
    pub const MEMBERSHIP_RESOURCE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#membershipResource");
    pub const HAS_MEMBER_RELATION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#hasMemberRelation");
    pub const IS_MEMBER_OF_RELATION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#isMemberOfRelation");
    pub const INSERTED_CONTENT_RELATION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#insertedContentRelation");
    pub const MEMBER_SUBJECT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#MemberSubject");

    // link relations and Prefer tokens
    pub const CONSTRAINED_BY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#constrainedBy");
    pub const PREFER_CONTAINMENT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#PreferContainment");
    pub const PREFER_MEMBERSHIP: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#PreferMembership");
    pub const PREFER_MINIMAL_CONTAINER: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#PreferMinimalContainer");
}

pub mod fedora {
    //! Server-managed repository properties.
    use super::NamedNodeRef;

    pub const UUID: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://fedora.info/definitions/v4/repository#uuid");
    pub const CREATED: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://fedora.info/definitions/v4/repository#created");
    pub const CREATED_BY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://fedora.info/definitions/v4/repository#createdBy");
    pub const LAST_MODIFIED: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://fedora.info/definitions/v4/repository#lastModified");
    pub const LAST_MODIFIED_BY: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
        "http://fedora.info/definitions/v4/repository#lastModifiedBy",
    );
    pub const HAS_PARENT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://fedora.info/definitions/v4/repository#hasParent");
}

pub mod ebucore {
    //! EBUCore terms.
    use super::NamedNodeRef;

    pub const HAS_MIME_TYPE: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
        "http://www.ebu.ch/metadata/ontologies/ebucore/ebucore#hasMimeType",
    );
    pub const FILENAME: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
        "http://www.ebu.ch/metadata/ontologies/ebucore/ebucore#filename",
    );
}

pub mod premis {
    //! PREMIS terms.
    use super::NamedNodeRef;

    pub const HAS_SIZE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.loc.gov/premis/rdf/v1#hasSize");
    pub const HAS_MESSAGE_DIGEST: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.loc.gov/premis/rdf/v1#hasMessageDigest");
}

/// Predicates whose values only the server may assert.
pub const SERVER_MANAGED_PREDICATES: [NamedNodeRef<'_>; 10] = [
    ldp::CONTAINS,
    fedora::UUID,
    fedora::CREATED,
    fedora::CREATED_BY,
    fedora::LAST_MODIFIED,
    fedora::LAST_MODIFIED_BY,
    fedora::HAS_PARENT,
    ebucore::HAS_MIME_TYPE,
    premis::HAS_SIZE,
    premis::HAS_MESSAGE_DIGEST,
];

/// Returns `true` if `iri` lies in the LDP namespace.
pub fn is_ldp_term(iri: &str) -> bool {
    iri.starts_with(LDP_NS)
}

/// Returns `true` if `predicate` is one only the server may assert.
pub fn is_server_managed_predicate(predicate: NamedNodeRef<'_>) -> bool {
    SERVER_MANAGED_PREDICATES.contains(&predicate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ldp_namespace_detection() {
        assert!(is_ldp_term(ldp::BASIC_CONTAINER.as_str()));
        assert!(!is_ldp_term("http://example.com/ContainerInteraction"));
    }

    #[test]
    fn test_server_managed_predicates() {
        assert!(is_server_managed_predicate(ldp::CONTAINS));
        assert!(is_server_managed_predicate(fedora::UUID));
        assert!(!is_server_managed_predicate(ldp::MEMBERSHIP_RESOURCE));
        assert!(!is_server_managed_predicate(rdf::TYPE));
    }
}
