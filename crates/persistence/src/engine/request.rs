//! Inputs to engine operations.

use ldp_model::{LinkValue, METADATA_SEGMENT, ModelResult, ResourcePath};

use crate::error::ConcurrencyError;

/// The resource an operation addresses.
///
/// A path ending in `fcr:metadata` addresses the RDF description of the
/// binary at the remaining path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTarget {
    pub path: ResourcePath,
    pub description: bool,
}

impl ResourceTarget {
    /// Parses a raw request path.
    pub fn parse(raw: &str) -> ModelResult<Self> {
        let trimmed = raw.trim_matches('/');
        let (path, description) = match trimmed.strip_suffix(METADATA_SEGMENT) {
            Some(rest) if rest.is_empty() || rest.ends_with('/') => (rest, true),
            _ => (trimmed, false),
        };
        Ok(Self {
            path: ResourcePath::parse(path)?,
            description,
        })
    }

    /// Addresses the resource itself.
    pub fn resource(path: ResourcePath) -> Self {
        Self {
            path,
            description: false,
        }
    }

    /// Addresses the description of the binary at `path`.
    pub fn description(path: ResourcePath) -> Self {
        Self {
            path,
            description: true,
        }
    }
}

/// Content of a creation or replacement request.
#[derive(Debug, Clone, Default)]
pub struct ResourceRequest {
    /// All values of the request's `Link` headers.
    pub links: Vec<LinkValue>,
    /// The request media type, without parameters.
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl ResourceRequest {
    pub fn new(content_type: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            links: Vec::new(),
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    pub fn with_links(mut self, links: Vec<LinkValue>) -> Self {
        self.links = links;
        self
    }
}

/// `If-Match` / `If-None-Match` values of a mutating request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preconditions {
    pub if_match: Option<String>,
    pub if_none_match: Option<String>,
}

impl Preconditions {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn if_match(etag: impl Into<String>) -> Self {
        Self {
            if_match: Some(etag.into()),
            if_none_match: None,
        }
    }

    pub fn if_none_match(etag: impl Into<String>) -> Self {
        Self {
            if_match: None,
            if_none_match: Some(etag.into()),
        }
    }

    /// Evaluates the preconditions against the current entity tag, or
    /// `None` if the resource does not exist.
    pub fn check(&self, path: &ResourcePath, current: Option<&str>) -> Result<(), ConcurrencyError> {
        let failed = |message: &str| ConcurrencyError::PreconditionFailed {
            path: path.clone(),
            message: message.to_string(),
        };

        if let Some(if_match) = &self.if_match {
            match current {
                None => return Err(failed("If-Match on a resource that does not exist")),
                Some(etag) if !etag_matches(if_match, etag) => {
                    return Err(failed("If-Match does not match the current ETag"));
                }
                Some(_) => {}
            }
        }

        if let (Some(if_none_match), Some(etag)) = (&self.if_none_match, current) {
            if etag_matches(if_none_match, etag) {
                return Err(failed("If-None-Match matches the current ETag"));
            }
        }

        Ok(())
    }
}

/// Returns `true` if an `If-Match`/`If-None-Match` list matches `etag`.
///
/// `*` matches any entity tag. Tags are compared weakly.
pub fn etag_matches(header: &str, etag: &str) -> bool {
    let current = opaque_tag(etag);
    header
        .split(',')
        .map(str::trim)
        .any(|candidate| candidate == "*" || opaque_tag(candidate) == current)
}

fn opaque_tag(tag: &str) -> &str {
    tag.trim().trim_start_matches("W/").trim_matches('"')
}
