//! Test fixtures for REST API testing.
//!
//! Turtle bodies and interaction-model IRIs used across the tests.

pub const BASIC_CONTAINER: &str = "http://www.w3.org/ns/ldp#BasicContainer";
pub const DIRECT_CONTAINER: &str = "http://www.w3.org/ns/ldp#DirectContainer";
pub const INDIRECT_CONTAINER: &str = "http://www.w3.org/ns/ldp#IndirectContainer";
pub const RDF_SOURCE: &str = "http://www.w3.org/ns/ldp#RDFSource";
pub const LDP_RESOURCE: &str = "http://www.w3.org/ns/ldp#Resource";
pub const NON_RDF_SOURCE: &str = "http://www.w3.org/ns/ldp#NonRDFSource";

pub const CONTAINS: &str = "http://www.w3.org/ns/ldp#contains";
pub const PREFER_CONTAINMENT: &str = "http://www.w3.org/ns/ldp#PreferContainment";
pub const FEDORA_UUID: &str = "http://fedora.info/definitions/v4/repository#uuid";

pub const EX: &str = "http://example.com/";

/// A plain RDF body.
pub fn thing(title: &str) -> String {
    format!(
        "@prefix dc: <http://purl.org/dc/terms/> .
         <> a <http://example.com/Thing> ; dc:title \"{}\" .",
        title
    )
}

/// An Indirect container whose members contribute their `ex:target` value
/// to `membership_resource` under `ex:hasPart`.
pub fn indirect_container(membership_resource: &str) -> String {
    format!(
        "@prefix ldp: <http://www.w3.org/ns/ldp#> .
         @prefix ex: <http://example.com/> .
         <> ldp:membershipResource <{}> ;
            ldp:hasMemberRelation ex:hasPart ;
            ldp:insertedContentRelation ex:target .",
        membership_resource
    )
}

/// A Direct container adding members to `membership_resource` under
/// `ex:member`.
pub fn direct_container(membership_resource: &str) -> String {
    format!(
        "@prefix ldp: <http://www.w3.org/ns/ldp#> .
         @prefix ex: <http://example.com/> .
         <> ldp:membershipResource <{}> ;
            ldp:hasMemberRelation ex:member .",
        membership_resource
    )
}

/// A member of an Indirect container pointing at `target`.
pub fn indirect_member(target: &str) -> String {
    format!("<> <http://example.com/target> <{}> .", target)
}
