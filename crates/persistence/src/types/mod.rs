//! Core types for the persistence layer.
//!
//! - [`StoredResource`] - A resource with persistence metadata
//! - [`BinaryContent`] - The bytes of a NonRDFSource

mod stored_resource;

pub use stored_resource::{BinaryContent, StoredResource};

pub(crate) use stored_resource::now;
