//! Repository paths and their IRIs.
//!
//! A path is the `/`-separated part of a resource IRI below the repository
//! base. The root container has the empty path.

use std::fmt;

use crate::error::{ModelError, ModelResult};

/// Segment suffix addressing a binary's RDF description.
pub const METADATA_SEGMENT: &str = "fcr:metadata";

/// Reserved prefix for repository-defined segments.
const RESERVED_PREFIX: &str = "fcr:";

/// A validated resource path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourcePath(String);

impl ResourcePath {
    /// The root container.
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Parses a raw path, ignoring leading and trailing slashes.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidPath`] for empty, `.`/`..` or reserved
    /// (`fcr:`) segments and for characters not allowed in an IRI path.
    pub fn parse(raw: &str) -> ModelResult<Self> {
        let trimmed = raw.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        for segment in trimmed.split('/') {
            validate_segment(raw, segment)?;
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the parent path, or `None` for the root.
    pub fn parent(&self) -> Option<ResourcePath> {
        if self.is_root() {
            return None;
        }
        Some(match self.0.rfind('/') {
            Some(i) => Self(self.0[..i].to_string()),
            None => Self::root(),
        })
    }

    /// Returns the path of a child named `segment`.
    pub fn child(&self, segment: &str) -> ModelResult<ResourcePath> {
        validate_segment(segment, segment)?;
        Ok(if self.is_root() {
            Self(segment.to_string())
        } else {
            Self(format!("{}/{}", self.0, segment))
        })
    }

    /// Returns the final segment (empty for the root).
    pub fn last_segment(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or("")
    }

    /// Returns `true` if `self` is a strict descendant of `ancestor`.
    pub fn is_descendant_of(&self, ancestor: &ResourcePath) -> bool {
        if ancestor.is_root() {
            return !self.is_root();
        }
        self.0.len() > ancestor.0.len()
            && self.0.starts_with(&ancestor.0)
            && self.0.as_bytes()[ancestor.0.len()] == b'/'
    }

    /// Returns the resource IRI under `base`.
    ///
    /// The root maps to `base` followed by a single `/`.
    pub fn to_iri(&self, base: &str) -> String {
        let base = base.trim_end_matches('/');
        format!("{}/{}", base, self.0)
    }

    /// Maps an IRI back to a path if it lies under `base`.
    pub fn from_iri(iri: &str, base: &str) -> Option<ResourcePath> {
        let base = base.trim_end_matches('/');
        let rest = iri.strip_prefix(base)?;
        if !(rest.is_empty() || rest.starts_with('/')) {
            return None;
        }
        ResourcePath::parse(rest).ok()
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0)
    }
}

/// Reduces a client `Slug` to characters that are safe in a path segment.
///
/// Returns `None` if nothing usable remains.
pub fn sanitize_slug(slug: &str) -> Option<String> {
    let cleaned: String = slug
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '~' | '-'))
        .collect();
    match cleaned.as_str() {
        "" | "." | ".." => None,
        _ => Some(cleaned),
    }
}

fn validate_segment(raw: &str, segment: &str) -> ModelResult<()> {
    let invalid = |message: &str| ModelError::InvalidPath {
        path: raw.to_string(),
        message: message.to_string(),
    };

    if segment.is_empty() {
        return Err(invalid("empty path segment"));
    }
    if segment == "." || segment == ".." {
        return Err(invalid("relative path segments are not allowed"));
    }
    if segment.starts_with(RESERVED_PREFIX) {
        return Err(invalid("segments starting with 'fcr:' are reserved"));
    }
    if segment
        .chars()
        .any(|c| c.is_control() || c.is_whitespace() || matches!(c, '?' | '#' | '<' | '>' | '"' | '\\'))
    {
        return Err(invalid("segment contains a character not allowed in an IRI path"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://localhost:8080/rest";

    #[test]
    fn test_parse_and_parent() {
        let path = ResourcePath::parse("/a/b/c/").unwrap();
        assert_eq!(path.as_str(), "a/b/c");
        assert_eq!(path.parent().unwrap().as_str(), "a/b");
        assert_eq!(path.last_segment(), "c");
        assert_eq!(ResourcePath::parse("a").unwrap().parent(), Some(ResourcePath::root()));
        assert_eq!(ResourcePath::root().parent(), None);
    }

    #[test]
    fn test_invalid_segments() {
        assert!(ResourcePath::parse("a//b").is_err());
        assert!(ResourcePath::parse("a/../b").is_err());
        assert!(ResourcePath::parse("a/fcr:versions").is_err());
        assert!(ResourcePath::parse("a b").is_err());
    }

    #[test]
    fn test_iri_mapping() {
        let path = ResourcePath::parse("ldp-test-basic-1/child").unwrap();
        let iri = path.to_iri(BASE);
        assert_eq!(iri, "http://localhost:8080/rest/ldp-test-basic-1/child");
        assert_eq!(ResourcePath::from_iri(&iri, BASE), Some(path));
        assert_eq!(ResourcePath::root().to_iri(BASE), "http://localhost:8080/rest/");
        assert_eq!(
            ResourcePath::from_iri("http://localhost:8080/rest/", BASE),
            Some(ResourcePath::root())
        );
        assert_eq!(ResourcePath::from_iri("http://localhost:8080/restless", BASE), None);
    }

    #[test]
    fn test_descendants() {
        let parent = ResourcePath::parse("a").unwrap();
        assert!(ResourcePath::parse("a/b").unwrap().is_descendant_of(&parent));
        assert!(!ResourcePath::parse("ab").unwrap().is_descendant_of(&parent));
        assert!(parent.is_descendant_of(&ResourcePath::root()));
    }

    #[test]
    fn test_sanitize_slug() {
        assert_eq!(sanitize_slug("my item"), Some("my-item".to_string()));
        assert_eq!(sanitize_slug("fcr:metadata"), Some("fcrmetadata".to_string()));
        assert_eq!(sanitize_slug("../"), None);
        assert_eq!(sanitize_slug("  "), None);
    }
}
