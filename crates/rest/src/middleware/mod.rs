//! HTTP request header handling for the LDP front end.
//!
//! - [`content_type`] - Content negotiation
//! - [`conditional`] - Conditional request headers (If-Match, etc.)
//! - [`prefer`] - Prefer header handling

pub mod conditional;
pub mod content_type;
pub mod prefer;

pub use conditional::ConditionalHeaders;
pub use content_type::{negotiate_rdf_format, request_media_type};
pub use prefer::{PreferHeader, ReturnPreference};
