//! Response header generation.
//!
//! Provides utilities for building the LDP response headers: `Link` types,
//! `Allow`, `Accept-Post`, `Accept-Patch`, entity validators and `Location`.

use axum::http::{HeaderMap, HeaderName, HeaderValue, header};
use chrono::{DateTime, Utc};
use ldp_model::vocab::ldp;
use ldp_model::{InteractionModel, METADATA_SEGMENT, RdfSerialization, SPARQL_UPDATE_MEDIA_TYPE};
use ldp_persistence::engine::ResourceView;

use crate::error::constrained_by_link;

/// `Accept-Post` response header.
pub const ACCEPT_POST: HeaderName = HeaderName::from_static("accept-post");

/// `Accept-Patch` response header.
pub const ACCEPT_PATCH: HeaderName = HeaderName::from_static("accept-patch");

/// `Preference-Applied` response header.
pub const PREFERENCE_APPLIED: HeaderName = HeaderName::from_static("preference-applied");

/// Returns the `Allow` header value for a resource.
///
/// `description` is `true` for the `fcr:metadata` description of a binary.
pub fn allowed_methods(model: InteractionModel, description: bool, is_root: bool) -> &'static str {
    if description {
        return "GET, HEAD, OPTIONS, PUT, PATCH";
    }
    match model {
        InteractionModel::BasicContainer
        | InteractionModel::DirectContainer
        | InteractionModel::IndirectContainer => {
            if is_root {
                "GET, HEAD, OPTIONS, POST, PUT, PATCH"
            } else {
                "GET, HEAD, OPTIONS, POST, PUT, PATCH, DELETE"
            }
        }
        InteractionModel::RdfSource => "GET, HEAD, OPTIONS, PUT, PATCH, DELETE",
        InteractionModel::NonRdfSource => "GET, HEAD, OPTIONS, PUT, DELETE",
    }
}

/// Formats a timestamp as an HTTP date.
pub fn http_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Builder for resource response headers.
#[derive(Debug, Default)]
pub struct LdpHeaders {
    links: Vec<String>,
    allow: Option<&'static str>,
    accept_post: bool,
    accept_patch: bool,
    etag: Option<String>,
    last_modified: Option<String>,
    location: Option<String>,
    preference_applied: Option<String>,
    vary_accept: bool,
}

impl LdpHeaders {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the headers every response about `view` carries.
    pub fn for_view(view: &ResourceView) -> Self {
        let model = view.interaction_model();
        let description = view.is_description();
        let is_root = view.resource().path().is_root();

        let mut headers = Self::new();
        headers.links.push(type_link(ldp::RESOURCE.as_str()));
        if description {
            headers.links.push(type_link(ldp::RDF_SOURCE.as_str()));
            headers
                .links
                .push(format!("<{}>; rel=\"describes\"", view.iri()));
        } else {
            headers.links.push(type_link(model.type_iri().as_str()));
            if model == InteractionModel::NonRdfSource {
                headers.links.push(format!(
                    "<{}/{}>; rel=\"describedby\"",
                    view.iri(),
                    METADATA_SEGMENT
                ));
            }
        }
        headers.links.push(constrained_by_link());

        headers.allow = Some(allowed_methods(model, description, is_root));
        headers.accept_post = !description && model.is_container();
        headers.accept_patch = description || model.is_rdf();
        headers.etag = Some(view.etag().to_string());
        headers.last_modified = Some(http_date(view.last_modified()));
        headers.vary_accept = description || model.is_rdf();
        headers
    }

    /// Sets the ETag value.
    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }

    /// Sets the Location URL.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the Preference-Applied value.
    pub fn with_preference_applied(mut self, applied: Option<String>) -> Self {
        self.preference_applied = applied;
        self
    }

    /// Converts to an Axum HeaderMap.
    pub fn to_header_map(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        for link in &self.links {
            if let Ok(value) = HeaderValue::from_str(link) {
                headers.append(header::LINK, value);
            }
        }

        if let Some(allow) = self.allow {
            headers.insert(header::ALLOW, HeaderValue::from_static(allow));
        }

        if self.accept_post {
            let accept_post = format!("{}, */*", RdfSerialization::accept_list());
            if let Ok(value) = HeaderValue::from_str(&accept_post) {
                headers.insert(ACCEPT_POST, value);
            }
        }

        if self.accept_patch {
            headers.insert(
                ACCEPT_PATCH,
                HeaderValue::from_static(SPARQL_UPDATE_MEDIA_TYPE),
            );
        }

        let values = [
            (header::ETAG, &self.etag),
            (header::LAST_MODIFIED, &self.last_modified),
            (header::LOCATION, &self.location),
            (PREFERENCE_APPLIED, &self.preference_applied),
        ];
        for (name, value) in values {
            if let Some(value) = value.as_deref().and_then(|v| HeaderValue::from_str(v).ok()) {
                headers.insert(name, value);
            }
        }

        if self.vary_accept {
            headers.insert(header::VARY, HeaderValue::from_static("Accept"));
        }

        headers
    }

    /// Returns the ETag value.
    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    /// Returns the Location value.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

fn type_link(iri: &str) -> String {
    format!("<{}>; rel=\"type\"", iri)
}
