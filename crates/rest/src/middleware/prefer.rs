//! Prefer header handling.
//!
//! Handles the LDP representation preferences of the HTTP Prefer header
//! (RFC 7240):
//!
//! ```text
//! Prefer: return=representation; include="http://www.w3.org/ns/ldp#PreferMinimalContainer"
//! Prefer: return=representation; omit="http://www.w3.org/ns/ldp#PreferContainment"
//! Prefer: return=minimal
//! ```

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, request::Parts},
};
use ldp_model::vocab::ldp;
use ldp_persistence::engine::RepresentationOptions;

/// The `return` preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnPreference {
    Representation,
    Minimal,
}

impl ReturnPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnPreference::Representation => "representation",
            ReturnPreference::Minimal => "minimal",
        }
    }
}

/// Extracted Prefer header values from a request.
#[derive(Debug, Default)]
pub struct PreferHeader {
    /// Return preference.
    return_preference: Option<ReturnPreference>,

    /// IRIs of the `include` parameter.
    include: Vec<String>,

    /// IRIs of the `omit` parameter.
    omit: Vec<String>,
}

impl PreferHeader {
    /// Creates a new PreferHeader from a HeaderMap.
    ///
    /// Unknown preferences and parameters are ignored.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut result = Self::default();

        for value in headers
            .get_all("prefer")
            .iter()
            .filter_map(|v| v.to_str().ok())
        {
            for preference in value.split(',') {
                result.parse_preference(preference);
            }
        }

        result
    }

    fn parse_preference(&mut self, preference: &str) {
        let mut parts = preference.split(';').map(str::trim);
        let Some((name, value)) = parts.next().and_then(|p| p.split_once('=')) else {
            return;
        };
        if !name.trim().eq_ignore_ascii_case("return") {
            return;
        }

        self.return_preference = match unquote(value).to_ascii_lowercase().as_str() {
            "representation" => Some(ReturnPreference::Representation),
            "minimal" => Some(ReturnPreference::Minimal),
            _ => return,
        };

        for parameter in parts {
            let Some((key, iris)) = parameter.split_once('=') else {
                continue;
            };
            let iris = unquote(iris).split_whitespace().map(String::from);
            match key.trim().to_ascii_lowercase().as_str() {
                "include" => self.include.extend(iris),
                "omit" => self.omit.extend(iris),
                _ => {}
            }
        }
    }

    /// Returns the return preference.
    pub fn return_preference(&self) -> Option<ReturnPreference> {
        self.return_preference
    }

    /// Checks if minimal return is requested.
    pub fn is_minimal(&self) -> bool {
        self.return_preference == Some(ReturnPreference::Minimal)
    }

    fn includes(&self, iri: &str) -> bool {
        self.include.iter().any(|i| i == iri)
    }

    fn omits(&self, iri: &str) -> bool {
        self.omit.iter().any(|i| i == iri)
    }

    /// Returns the computed triples a GET representation should carry.
    ///
    /// `return=minimal` and an included `ldp:PreferMinimalContainer` drop
    /// both containment and membership unless they are explicitly included.
    /// An omitted preference always wins over an included one.
    pub fn representation_options(&self) -> RepresentationOptions {
        let mut options = RepresentationOptions::default();
        if self.return_preference.is_none() {
            return options;
        }

        let containment = ldp::PREFER_CONTAINMENT.as_str();
        let membership = ldp::PREFER_MEMBERSHIP.as_str();

        if self.is_minimal() || self.includes(ldp::PREFER_MINIMAL_CONTAINER.as_str()) {
            options.containment = self.includes(containment);
            options.membership = self.includes(membership);
        }
        if self.omits(containment) {
            options.containment = false;
        }
        if self.omits(membership) {
            options.membership = false;
        }
        options
    }

    /// Returns the `Preference-Applied` header value, if a preference was
    /// honored.
    pub fn applied(&self) -> Option<String> {
        self.return_preference
            .map(|preference| format!("return={}", preference.as_str()))
    }
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Axum extractor for Prefer header.
impl<S> FromRequestParts<S> for PreferHeader
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(PreferHeader::from_headers(&parts.headers))
    }
}
