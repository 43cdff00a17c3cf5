//! Content negotiation.
//!
//! Chooses the RDF serialization of a response from the `Accept` header
//! (with q-values) and reads the request media type.

use axum::http::{HeaderMap, header};
use ldp_model::RdfSerialization;
use mime::Mime;

use crate::error::{RestError, RestResult};

/// One media range of an `Accept` header.
#[derive(Debug, Clone)]
struct MediaRange {
    mime: Mime,
    quality: f32,
}

impl MediaRange {
    fn parse(raw: &str) -> Option<Self> {
        let mime: Mime = raw.trim().parse().ok()?;
        let quality = mime
            .get_param("q")
            .and_then(|q| q.as_str().parse::<f32>().ok())
            .unwrap_or(1.0)
            .clamp(0.0, 1.0);
        Some(Self { mime, quality })
    }

    /// Returns the specificity of the match with `media_type`, if any:
    /// 2 for an exact match, 1 for `type/*`, 0 for `*/*`.
    fn matches(&self, media_type: &Mime) -> Option<u8> {
        if self.mime.type_() == mime::STAR {
            Some(0)
        } else if self.mime.type_() != media_type.type_() {
            None
        } else if self.mime.subtype() == mime::STAR {
            Some(1)
        } else if self.mime.essence_str().eq_ignore_ascii_case(media_type.essence_str()) {
            Some(2)
        } else {
            None
        }
    }
}

/// Quality the client assigns to `media_type`: the q-value of the most
/// specific matching range.
fn quality(ranges: &[MediaRange], media_type: &Mime) -> f32 {
    ranges
        .iter()
        .filter_map(|range| range.matches(media_type).map(|s| (s, range.quality)))
        .max_by_key(|(specificity, _)| *specificity)
        .map(|(_, q)| q)
        .unwrap_or(0.0)
}

/// Determines the response serialization from the `Accept` header.
///
/// A missing or empty `Accept` header selects Turtle. Among acceptable
/// serializations the highest q-value wins, ties going to the server order
/// (Turtle, N-Triples, JSON-LD, RDF/XML).
///
/// # Errors
///
/// Returns [`RestError::NotAcceptable`] when no supported serialization is
/// acceptable.
pub fn negotiate_rdf_format(headers: &HeaderMap) -> RestResult<RdfSerialization> {
    let accept = headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join(",");
    if accept.trim().is_empty() {
        return Ok(RdfSerialization::Turtle);
    }

    let ranges: Vec<MediaRange> = accept.split(',').filter_map(MediaRange::parse).collect();

    let mut best: Option<(RdfSerialization, f32)> = None;
    for format in RdfSerialization::ALL {
        let Ok(media_type) = format.media_type().parse::<Mime>() else {
            continue;
        };
        let q = quality(&ranges, &media_type);
        if q > 0.0 && best.is_none_or(|(_, best_q)| q > best_q) {
            best = Some((format, q));
        }
    }

    best.map(|(format, _)| format)
        .ok_or_else(|| RestError::NotAcceptable {
            message: format!(
                "none of the supported media types is acceptable: {}",
                RdfSerialization::accept_list()
            ),
        })
}

/// Returns the request media type without parameters, lowercased.
///
/// # Errors
///
/// Returns [`RestError::UnsupportedMediaType`] for a `Content-Type` that is
/// not a valid media type.
pub fn request_media_type(headers: &HeaderMap) -> RestResult<Option<String>> {
    let Some(value) = headers.get(header::CONTENT_TYPE) else {
        return Ok(None);
    };
    let raw = value.to_str().unwrap_or_default();
    let mime: Mime = raw.parse().map_err(|_| RestError::UnsupportedMediaType {
        content_type: raw.to_string(),
    })?;
    Ok(Some(mime.essence_str().to_ascii_lowercase()))
}
