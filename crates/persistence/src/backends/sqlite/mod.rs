//! SQLite backend implementation.
//!
//! It supports both in-memory databases (great for testing) and file-based
//! databases (for development and small deployments).
//!
//! # Features
//!
//! - In-memory and file-based modes
//! - One transaction per mutating call, covering the parent bump
//! - Descendant deletion by path prefix
//! - Indexed lookup of containers by membership resource
//!
//! # Example
//!
//! ```no_run
//! use ldp_persistence::backends::sqlite::SqliteBackend;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Create an in-memory database
//! let backend = SqliteBackend::in_memory()?;
//!
//! // Initialize the schema
//! backend.init_schema()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE resources (
//!     path TEXT PRIMARY KEY NOT NULL,     -- '' for the root container
//!     parent TEXT,                        -- containment edge, NULL for the root
//!     interaction_model TEXT NOT NULL,
//!     uuid TEXT NOT NULL,
//!     graph TEXT NOT NULL,                -- client triples as sorted N-Triples
//!     binary_content BLOB,
//!     binary_mime_type TEXT,
//!     binary_digest TEXT,                 -- hex SHA-256
//!     membership_resource TEXT,
//!     has_member_relation TEXT,
//!     inserted_content_relation TEXT,
//!     version INTEGER NOT NULL,
//!     created_at TEXT NOT NULL,
//!     created_by TEXT NOT NULL,
//!     last_modified TEXT NOT NULL,
//!     last_modified_by TEXT NOT NULL
//! );
//!
//! CREATE TABLE schema_version (version INTEGER NOT NULL);
//! ```

mod backend;
mod schema;
mod storage;

pub use backend::{SqliteBackend, SqliteBackendConfig};
pub use schema::SCHEMA_VERSION;
