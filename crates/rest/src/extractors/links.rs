//! `Link` header extractor.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use ldp_model::{LinkValue, parse_link_headers};

use crate::error::{RestError, RestResult};

/// Every `Link` value of a request, across all `Link` header lines.
#[derive(Debug, Clone, Default)]
pub struct RequestLinks(pub Vec<LinkValue>);

impl RequestLinks {
    /// Parses the `Link` headers.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::BadRequest`] for a header that is not valid
    /// UTF-8 or not a valid `Link` value.
    pub fn from_headers(headers: &HeaderMap) -> RestResult<Self> {
        let lines = headers
            .get_all(header::LINK)
            .iter()
            .map(|v| v.to_str())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| RestError::BadRequest {
                message: "Link header is not valid UTF-8".to_string(),
            })?;
        Ok(RequestLinks(parse_link_headers(lines)?))
    }

    pub fn into_inner(self) -> Vec<LinkValue> {
        self.0
    }
}

impl<S> FromRequestParts<S> for RequestLinks
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        RequestLinks::from_headers(&parts.headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_multiple_link_lines() {
        let mut headers = HeaderMap::new();
        headers.append(
            header::LINK,
            HeaderValue::from_static("<http://www.w3.org/ns/ldp#Resource>; rel=\"type\""),
        );
        headers.append(
            header::LINK,
            HeaderValue::from_static("<http://example.com/profile>; rel=\"describedby\""),
        );

        let links = RequestLinks::from_headers(&headers).unwrap().into_inner();
        assert_eq!(links.len(), 2);
        assert!(links[0].has_rel("type"));
    }

    #[test]
    fn test_malformed_link() {
        let mut headers = HeaderMap::new();
        headers.insert(header::LINK, HeaderValue::from_static("no angle brackets"));
        assert!(RequestLinks::from_headers(&headers).is_err());
    }
}
