//! Response formatting for the LDP front end.
//!
//! - [`headers`] - Response header generation (Link, Allow, ETag, etc.)
//! - [`format`] - RDF serialization and binary bodies

pub mod format;
pub mod headers;

pub use format::{binary_response, created_response, format_rdf_response};
pub use headers::LdpHeaders;
