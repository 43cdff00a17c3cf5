//! Error types for the persistence layer.
//!
//! Errors are grouped by category: resource state, LDP constraints,
//! concurrency, access control and the storage backend. Model errors raised
//! while parsing or validating request content pass through unchanged.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use ldp_model::{InteractionModel, ModelError, ResourcePath};
use thiserror::Error;

use crate::principal::Operation;

/// The primary error type for all storage and engine operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Resource state errors
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// LDP constraint violations
    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    /// Concurrency and precondition errors
    #[error(transparent)]
    Concurrency(#[from] ConcurrencyError),

    /// Access control errors
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Invalid request content
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors related to resource state.
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("resource not found: {path}")]
    NotFound { path: ResourcePath },

    #[error("resource already exists: {path}")]
    AlreadyExists { path: ResourcePath },

    /// The parent of a resource being created does not exist.
    #[error("parent container does not exist: {path}")]
    ParentNotFound { path: ResourcePath },

    /// The parent of a resource being created is not a container.
    #[error("resource is not a container: {path}")]
    NotAContainer { path: ResourcePath },

    /// The method is not supported for the resource's interaction model.
    #[error("{operation} not allowed on {model} {path}")]
    OperationNotAllowed {
        path: ResourcePath,
        operation: String,
        model: InteractionModel,
        /// `true` when the request addressed a binary's description.
        description: bool,
    },
}

/// Violations of LDP server constraints.
#[derive(Error, Debug)]
pub enum ConstraintError {
    /// A request tried to assert, change or remove a server-managed triple.
    #[error("server-managed triple cannot be modified: {predicate}")]
    ServerManagedTriple { predicate: String },

    /// A replacement tried to change the interaction model.
    #[error("cannot change interaction model of {path} from {existing} to {requested}")]
    InteractionModelMismatch {
        path: ResourcePath,
        existing: InteractionModel,
        requested: InteractionModel,
    },
}

/// Errors related to concurrency control.
#[derive(Error, Debug)]
pub enum ConcurrencyError {
    /// An `If-Match` or `If-None-Match` precondition did not hold.
    #[error("precondition failed for {path}: {message}")]
    PreconditionFailed { path: ResourcePath, message: String },

    /// Version conflict detected during optimistic locking.
    #[error("version conflict on {path}: expected {expected}, found {actual}")]
    VersionConflict {
        path: ResourcePath,
        expected: u64,
        actual: u64,
    },
}

/// Errors related to access control.
#[derive(Error, Debug)]
pub enum AccessError {
    #[error("principal {principal} may not perform {operation}")]
    Forbidden {
        principal: String,
        operation: Operation,
    },
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is currently unavailable.
    #[error("backend unavailable: {backend_name}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Schema migration error.
    #[error("schema migration failed: {message}")]
    MigrationError { message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Query execution error.
    #[error("query execution failed: {message}")]
    QueryError { message: String },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Shorthand for [`ResourceError::NotFound`].
    pub fn not_found(path: &ResourcePath) -> Self {
        ResourceError::NotFound { path: path.clone() }.into()
    }

    /// Shorthand for [`ConstraintError::ServerManagedTriple`].
    pub fn server_managed(predicate: impl Into<String>) -> Self {
        ConstraintError::ServerManagedTriple {
            predicate: predicate.into(),
        }
        .into()
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Backend(BackendError::Internal {
            backend_name: "sqlite".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        })
    }
}

#[cfg(feature = "sqlite")]
impl From<r2d2::Error> for StorageError {
    fn from(err: r2d2::Error) -> Self {
        StorageError::Backend(BackendError::Unavailable {
            backend_name: "sqlite".to_string(),
            message: err.to_string(),
        })
    }
}
