//! Axum extractors for LDP request data.
//!
//! - [`LdpTarget`] - The resource (or binary description) a request addresses
//! - [`RequestLinks`] - All `Link` header values of a request

mod links;
mod target;

pub use links::RequestLinks;
pub use target::LdpTarget;
