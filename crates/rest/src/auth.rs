//! Authentication.
//!
//! Handlers never see credentials. An [`AuthProvider`] turns the request's
//! [`Credentials`] into a [`Principal`], and the engine checks the
//! principal's role for each operation.
//!
//! Two providers are shipped:
//!
//! - [`AnonymousAccess`]: authentication disabled, every request runs as the
//!   anonymous administrator
//! - [`StaticUserProvider`]: preemptive HTTP Basic against a user table from
//!   configuration (`LDP_USERS`)

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use base64::{Engine, engine::general_purpose::STANDARD};
use ldp_persistence::principal::{Principal, Role};
use tracing::{debug, warn};

use crate::error::{RestError, RestResult};
use crate::state::AppState;

/// Credentials presented with a request.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// `Authorization: Basic ...`
    Basic { username: String, password: String },
    /// No `Authorization` header.
    Anonymous,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Credentials::Anonymous => write!(f, "Anonymous"),
        }
    }
}

impl Credentials {
    /// Reads the credentials from the `Authorization` header.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Unauthorized`] for an unsupported scheme or a
    /// malformed Basic token.
    pub fn from_headers(headers: &HeaderMap) -> RestResult<Self> {
        let Some(value) = headers.get(header::AUTHORIZATION) else {
            return Ok(Credentials::Anonymous);
        };
        let value = value.to_str().map_err(|_| unauthorized("malformed Authorization header"))?;

        let (scheme, token) = value
            .split_once(' ')
            .ok_or_else(|| unauthorized("malformed Authorization header"))?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return Err(unauthorized(format!(
                "unsupported authentication scheme '{}'",
                scheme
            )));
        }

        let decoded = STANDARD
            .decode(token.trim())
            .map_err(|_| unauthorized("malformed Basic credentials"))?;
        let decoded =
            String::from_utf8(decoded).map_err(|_| unauthorized("malformed Basic credentials"))?;
        let (username, password) = decoded
            .split_once(':')
            .ok_or_else(|| unauthorized("malformed Basic credentials"))?;

        Ok(Credentials::Basic {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

fn unauthorized(message: impl Into<String>) -> RestError {
    RestError::Unauthorized {
        message: message.into(),
    }
}

/// Resolves credentials to a principal.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Returns the principal for `credentials`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Unauthorized`] when the credentials are missing
    /// or invalid.
    async fn authenticate(&self, credentials: &Credentials) -> RestResult<Principal>;
}

/// Authentication disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnonymousAccess;

#[async_trait]
impl AuthProvider for AnonymousAccess {
    async fn authenticate(&self, _credentials: &Credentials) -> RestResult<Principal> {
        Ok(Principal::anonymous())
    }
}

#[derive(Clone)]
struct UserEntry {
    password: String,
    role: Role,
}

/// A fixed user table.
#[derive(Clone, Default)]
pub struct StaticUserProvider {
    users: HashMap<String, UserEntry>,
}

impl fmt::Debug for StaticUserProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.users.keys().collect();
        names.sort();
        f.debug_struct("StaticUserProvider")
            .field("users", &names)
            .finish()
    }
}

impl StaticUserProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user.
    pub fn with_user(mut self, name: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        self.users.insert(
            name.into(),
            UserEntry {
                password: password.into(),
                role,
            },
        );
        self
    }

    /// Parses a comma-separated list of `name:password:role` entries.
    ///
    /// ```
    /// use ldp_rest::auth::StaticUserProvider;
    ///
    /// let provider = StaticUserProvider::parse("alice:secret:writer, bob:pw:reader").unwrap();
    /// assert_eq!(provider.len(), 2);
    /// assert!(StaticUserProvider::parse("carol:pw:owner").is_err());
    /// ```
    pub fn parse(users: &str) -> Result<Self, String> {
        let mut provider = Self::new();
        for entry in users.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let mut parts = entry.splitn(3, ':');
            let (Some(name), Some(password), Some(role)) = (parts.next(), parts.next(), parts.next())
            else {
                return Err(format!(
                    "Invalid user entry '{}': expected name:password:role",
                    entry
                ));
            };
            if name.is_empty() {
                return Err(format!("Invalid user entry '{}': empty user name", entry));
            }
            let role: Role = role
                .parse()
                .map_err(|e| format!("Invalid user entry '{}': {}", entry, e))?;
            provider = provider.with_user(name, password, role);
        }
        Ok(provider)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl AuthProvider for StaticUserProvider {
    async fn authenticate(&self, credentials: &Credentials) -> RestResult<Principal> {
        match credentials {
            Credentials::Anonymous => Err(unauthorized("authentication required")),
            Credentials::Basic { username, password } => match self.users.get(username) {
                Some(entry) if entry.password == *password => {
                    Ok(Principal::new(username.clone(), entry.role))
                }
                _ => {
                    warn!(user = %username, "Rejected credentials");
                    Err(unauthorized("invalid credentials"))
                }
            },
        }
    }
}

/// Axum extractor for the authenticated principal.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let credentials = Credentials::from_headers(&parts.headers)?;
        let principal = state.auth().authenticate(&credentials).await?;
        debug!(principal = %principal, "Authenticated request");
        Ok(Authenticated(principal))
    }
}
