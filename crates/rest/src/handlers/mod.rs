//! HTTP request handlers for LDP interactions.
//!
//! - [`read`] - GET/HEAD a resource or a binary description
//! - [`create`] - POST a new member to a container
//! - [`update`] - PUT (create at a path, or replace)
//! - [`patch`] - PATCH with SPARQL Update
//! - [`delete`] - DELETE a resource and its descendants
//! - [`options`] - OPTIONS
//! - [`constraints`] - The constraints document
//! - [`health`] - Health check endpoints

pub mod constraints;
pub mod create;
pub mod delete;
pub mod health;
pub mod options;
pub mod patch;
pub mod read;
pub mod update;

// Re-export handlers for convenience
pub use constraints::constraints_handler;
pub use create::create_handler;
pub use delete::delete_handler;
pub use health::health_handler;
pub use options::options_handler;
pub use patch::patch_handler;
pub use read::read_handler;
pub use update::update_handler;
