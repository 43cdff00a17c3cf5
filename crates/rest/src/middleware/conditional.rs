//! Conditional request header handling.
//!
//! Handles HTTP conditional headers for LDP requests:
//! - If-Match: Optimistic locking for PUT, PATCH and DELETE
//! - If-None-Match: Conditional GET, and `*` for create-only PUT
//! - If-Modified-Since: Conditional GET by date

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header, request::Parts},
};
use chrono::{DateTime, Utc};
use ldp_persistence::engine::{Preconditions, ResourceView, etag_matches};

/// Extracted conditional headers from a request.
#[derive(Debug, Default)]
pub struct ConditionalHeaders {
    /// If-Match header value (for optimistic locking).
    if_match: Option<String>,

    /// If-None-Match header value.
    if_none_match: Option<String>,

    /// If-Modified-Since header value.
    if_modified_since: Option<DateTime<Utc>>,
}

impl ConditionalHeaders {
    /// Creates a new ConditionalHeaders from a HeaderMap.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let if_match = headers
            .get(header::IF_MATCH)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let if_none_match = headers
            .get(header::IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let if_modified_since = headers
            .get(header::IF_MODIFIED_SINCE)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| DateTime::parse_from_rfc2822(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Self {
            if_match,
            if_none_match,
            if_modified_since,
        }
    }

    /// Returns the If-Match header value.
    pub fn if_match(&self) -> Option<&str> {
        self.if_match.as_deref()
    }

    /// Returns the If-None-Match header value.
    pub fn if_none_match(&self) -> Option<&str> {
        self.if_none_match.as_deref()
    }

    /// Returns the If-Modified-Since header value.
    pub fn if_modified_since(&self) -> Option<DateTime<Utc>> {
        self.if_modified_since
    }

    /// Returns the preconditions the engine checks for a mutation.
    pub fn preconditions(&self) -> Preconditions {
        Preconditions {
            if_match: self.if_match.clone(),
            if_none_match: self.if_none_match.clone(),
        }
    }

    /// Returns `true` if a GET or HEAD of `view` should be answered with
    /// 304 Not Modified.
    ///
    /// If-None-Match takes precedence; If-Modified-Since is only consulted
    /// without it. HTTP dates have second precision.
    pub fn is_not_modified(&self, view: &ResourceView) -> bool {
        if let Some(tags) = self.if_none_match() {
            return etag_matches(tags, view.etag());
        }
        if let Some(since) = self.if_modified_since {
            return view.last_modified().timestamp() <= since.timestamp();
        }
        false
    }
}

/// Axum extractor for conditional headers.
impl<S> FromRequestParts<S> for ConditionalHeaders
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ConditionalHeaders::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_from_headers_if_match() {
        let mut headers = HeaderMap::new();
        headers.insert(header::IF_MATCH, HeaderValue::from_static("W/\"abc\""));

        let conditional = ConditionalHeaders::from_headers(&headers);
        assert_eq!(conditional.if_match(), Some("W/\"abc\""));
        assert_eq!(
            conditional.preconditions().if_match.as_deref(),
            Some("W/\"abc\"")
        );
    }

    #[test]
    fn test_from_headers_if_none_match() {
        let mut headers = HeaderMap::new();
        headers.insert(header::IF_NONE_MATCH, HeaderValue::from_static("*"));

        let conditional = ConditionalHeaders::from_headers(&headers);
        assert_eq!(conditional.if_none_match(), Some("*"));
        assert!(conditional.preconditions().if_match.is_none());
    }

    #[test]
    fn test_from_headers_if_modified_since() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::IF_MODIFIED_SINCE,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );

        let conditional = ConditionalHeaders::from_headers(&headers);
        let since = conditional.if_modified_since().unwrap();
        assert_eq!(since.timestamp(), 1445412480);
    }
}
