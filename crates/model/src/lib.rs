//! # ldp-model - RDF model for the LDP server
//!
//! This crate holds everything about a Linked Data Platform request that can
//! be decided without touching storage:
//!
//! - [`vocab`] - constant IRIs for LDP, the repository namespace and friends
//! - [`interaction`] - the closed [`InteractionModel`] enum
//! - [`link`] - `Link` header parsing
//! - [`resolver`] - choosing an interaction model for a creation request
//! - [`graph`] - a set-semantics RDF [`Graph`]
//! - [`format`] - Turtle, N-Triples, JSON-LD and RDF/XML codecs
//! - [`membership`] - Direct/Indirect container descriptors and membership
//!   triple synthesis
//! - [`patch`] - SPARQL Update application
//! - [`path`] - repository paths and their IRIs
//!
//! ## Example
//!
//! ```
//! use ldp_model::{InteractionModel, LinkValue, RdfSerialization, resolve_interaction_model};
//!
//! let links = vec![LinkValue::with_rel("http://www.w3.org/ns/ldp#IndirectContainer", "type")];
//! let resolution = resolve_interaction_model(&links, Some("text/turtle")).unwrap();
//! assert_eq!(resolution.model, InteractionModel::IndirectContainer);
//!
//! let graph = RdfSerialization::Turtle
//!     .parse(b"<> a <http://example.com/ContainerInteraction> .", "http://localhost:8080/rest/c")
//!     .unwrap();
//! assert_eq!(graph.len(), 1);
//! ```

pub mod error;
pub mod format;
pub mod graph;
pub mod interaction;
pub mod jsonld;
pub mod link;
pub mod membership;
pub mod patch;
pub mod path;
pub mod resolver;
pub mod vocab;

pub use error::{ModelError, ModelResult};
pub use format::{RdfSerialization, is_rdf_media_type};
pub use graph::Graph;
pub use interaction::InteractionModel;
pub use link::{LinkValue, parse_link_header, parse_link_headers};
pub use membership::MembershipDescriptor;
pub use patch::{SPARQL_UPDATE_MEDIA_TYPE, apply_update};
pub use path::{METADATA_SEGMENT, ResourcePath, sanitize_slug};
pub use resolver::{Resolution, resolve_interaction_model};

/// Re-export of the RDF term types used throughout the public API.
pub use oxigraph::model as rdf;
