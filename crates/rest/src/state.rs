//! Application state for the LDP HTTP front end.
//!
//! This module defines the shared application state that is available to all
//! request handlers: the engine, the configuration and the authentication
//! provider.

use std::sync::Arc;

use ldp_persistence::core::ResourceStorage;
use ldp_persistence::engine::{Repository, RepositoryConfig};
use tracing::warn;

use crate::auth::{AnonymousAccess, AuthProvider, StaticUserProvider};
use crate::config::ServerConfig;

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `S` - The storage backend type (must implement [`ResourceStorage`])
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use ldp_persistence::backends::memory::MemoryBackend;
/// use ldp_rest::{AppState, ServerConfig};
///
/// let state = AppState::new(Arc::new(MemoryBackend::new()), ServerConfig::default());
/// assert_eq!(state.repository().base_iri(), "http://localhost:8080/rest");
/// ```
pub struct AppState<S> {
    /// The containment/membership engine over the storage backend.
    repository: Arc<Repository<S>>,

    /// Server configuration.
    config: Arc<ServerConfig>,

    /// Credential checking.
    auth: Arc<dyn AuthProvider>,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            config: Arc::clone(&self.config),
            auth: Arc::clone(&self.auth),
        }
    }
}

impl<S> AppState<S> {
    /// Returns the engine.
    pub fn repository(&self) -> &Repository<S> {
        &self.repository
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the authentication provider.
    pub fn auth(&self) -> &dyn AuthProvider {
        self.auth.as_ref()
    }

    /// Returns the root container IRI.
    pub fn base_iri(&self) -> &str {
        self.config.base_iri()
    }
}

impl<S: ResourceStorage> AppState<S> {
    /// Creates a new AppState with the given storage and configuration.
    ///
    /// The authentication provider follows `config.auth_enabled`: a
    /// [`StaticUserProvider`] built from `config.users`, or
    /// [`AnonymousAccess`].
    pub fn new(storage: Arc<S>, config: ServerConfig) -> Self {
        let auth: Arc<dyn AuthProvider> = if config.auth_enabled {
            match StaticUserProvider::parse(&config.users) {
                Ok(provider) => Arc::new(provider),
                Err(e) => {
                    warn!(error = %e, "Invalid user table, all requests will be rejected");
                    Arc::new(StaticUserProvider::new())
                }
            }
        } else {
            Arc::new(AnonymousAccess)
        };

        let repository_config = RepositoryConfig::new(config.base_iri())
            .with_require_membership_triples(config.require_membership_triples);

        Self {
            repository: Arc::new(Repository::new(storage, repository_config)),
            config: Arc::new(config),
            auth,
        }
    }

    /// Replaces the authentication provider.
    pub fn with_auth_provider(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = auth;
        self
    }

    /// Returns a reference to the storage backend.
    pub fn storage(&self) -> &S {
        self.repository.storage()
    }
}
