//! Request target extractor.
//!
//! Maps the request URI path to a [`ResourceTarget`] by removing the mount
//! path taken from the configured base URL.

use axum::{extract::FromRequestParts, http::request::Parts};
use ldp_persistence::engine::ResourceTarget;

use crate::error::RestError;
use crate::state::AppState;

/// Axum extractor for the addressed resource.
///
/// `GET /rest/a/b` with base URL `http://host/rest` addresses path `a/b`;
/// `GET /rest/a/b/fcr:metadata` addresses the description of binary `a/b`.
#[derive(Debug, Clone)]
pub struct LdpTarget(pub ResourceTarget);

impl LdpTarget {
    /// Parses `request_path` below `mount_path`.
    pub fn from_request_path(request_path: &str, mount_path: &str) -> Result<Self, RestError> {
        let relative = request_path
            .strip_prefix(mount_path)
            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
            .ok_or_else(|| RestError::NotFound {
                path: request_path.to_string(),
            })?;
        Ok(LdpTarget(ResourceTarget::parse(relative)?))
    }

    pub fn into_inner(self) -> ResourceTarget {
        self.0
    }
}

impl<S> FromRequestParts<AppState<S>> for LdpTarget
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        LdpTarget::from_request_path(parts.uri.path(), &state.config().mount_path())
    }
}
