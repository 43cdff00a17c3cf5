//! # ldp-persistence
//!
//! Resource storage and the containment/membership engine for the LDP
//! server.
//!
//! ## Overview
//!
//! The crate is organised in three layers:
//!
//! - [`core::ResourceStorage`]: the primitive, atomic storage operations a
//!   backend implements
//! - [`backends`]: an in-memory backend and a SQLite backend
//! - [`engine::Repository`]: LDP semantics (interaction models, the
//!   server-managed partition, containment, membership synthesis, locking)
//!   on top of any backend
//!
//! ## Principals
//!
//! Every engine operation takes a [`Principal`](principal::Principal). The
//! engine checks the principal's role before reading or writing and records
//! its identifier as `createdBy`/`lastModifiedBy`.
//!
//! ```
//! use ldp_persistence::principal::{Operation, Principal, Role};
//!
//! let admin = Principal::new("admin", Role::Admin);
//! let reader = Principal::new("guest", Role::Reader);
//!
//! assert!(admin.check_permission(Operation::Delete).is_ok());
//! assert!(reader.check_permission(Operation::Delete).is_err());
//! ```
//!
//! ## Concurrency
//!
//! Mutations take per-path locks from [`lock::LockManager`] before
//! validating, and commit with a single storage call. Concurrent creations in
//! one container therefore always receive distinct paths, and a reader never
//! observes a half-applied change.

#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod engine;
pub mod error;
pub mod lock;
pub mod principal;
pub mod types;

// Re-export commonly used types at crate root
pub use core::ResourceStorage;
pub use engine::{
    Preconditions, PutOutcome, RepresentationOptions, Repository, RepositoryConfig,
    ResourceRequest, ResourceTarget, ResourceView,
};
pub use error::{StorageError, StorageResult};
pub use principal::{Operation, Principal, Role};
pub use types::{BinaryContent, StoredResource};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
