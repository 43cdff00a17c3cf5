//! RDF serializations the server reads and writes.
//!
//! Turtle, N-Triples and RDF/XML go through the oxigraph parsers and
//! serializers. JSON-LD is handled by [`crate::jsonld`] in expanded form.

use std::fmt;

use oxigraph::io::{RdfFormat, RdfParser, RdfSerializer};
use oxigraph::model::Triple;

use crate::error::{ModelError, ModelResult};
use crate::graph::Graph;
use crate::jsonld;
use crate::vocab::PREFIXES;

/// An RDF serialization supported for request and response bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RdfSerialization {
    /// `text/turtle` (the default representation).
    Turtle,
    /// `application/n-triples`
    NTriples,
    /// `application/ld+json` (expanded form)
    JsonLd,
    /// `application/rdf+xml`
    RdfXml,
}

impl RdfSerialization {
    /// All serializations, in server preference order.
    pub const ALL: [RdfSerialization; 4] = [
        RdfSerialization::Turtle,
        RdfSerialization::NTriples,
        RdfSerialization::JsonLd,
        RdfSerialization::RdfXml,
    ];

    /// Returns the canonical media type.
    pub fn media_type(self) -> &'static str {
        match self {
            RdfSerialization::Turtle => "text/turtle",
            RdfSerialization::NTriples => "application/n-triples",
            RdfSerialization::JsonLd => "application/ld+json",
            RdfSerialization::RdfXml => "application/rdf+xml",
        }
    }

    /// Returns the `Content-Type` header value for responses.
    pub fn content_type(self) -> String {
        match self {
            RdfSerialization::JsonLd | RdfSerialization::RdfXml => self.media_type().to_string(),
            _ => format!("{}; charset=utf-8", self.media_type()),
        }
    }

    /// Looks up a serialization by media type.
    ///
    /// Parameters such as `charset` are ignored. `application/x-turtle` is
    /// accepted as an alias for Turtle.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let mime: mime::Mime = media_type.trim().parse().ok()?;
        match mime.essence_str().to_ascii_lowercase().as_str() {
            "text/turtle" | "application/x-turtle" => Some(RdfSerialization::Turtle),
            "application/n-triples" => Some(RdfSerialization::NTriples),
            "application/ld+json" => Some(RdfSerialization::JsonLd),
            "application/rdf+xml" => Some(RdfSerialization::RdfXml),
            _ => None,
        }
    }

    /// Comma-separated list of the supported media types, for `Accept-Post`.
    pub fn accept_list() -> String {
        Self::ALL
            .iter()
            .map(|f| f.media_type())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn oxigraph_format(self) -> Option<RdfFormat> {
        match self {
            RdfSerialization::Turtle => Some(RdfFormat::Turtle),
            RdfSerialization::NTriples => Some(RdfFormat::NTriples),
            RdfSerialization::RdfXml => Some(RdfFormat::RdfXml),
            RdfSerialization::JsonLd => None,
        }
    }

    /// Parses `body`, resolving relative IRIs against `base_iri`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::RdfSyntax`] or [`ModelError::JsonLd`] if the body
    /// is not valid in this serialization.
    pub fn parse(self, body: &[u8], base_iri: &str) -> ModelResult<Graph> {
        let Some(format) = self.oxigraph_format() else {
            return jsonld::parse(body, base_iri);
        };

        let parser = RdfParser::from_format(format)
            .with_base_iri(base_iri)
            .map_err(|e| ModelError::InvalidIri {
                iri: base_iri.to_string(),
                message: e.to_string(),
            })?;

        let mut graph = Graph::new();
        for quad in parser.for_reader(body) {
            let quad = quad.map_err(|e| ModelError::rdf_syntax(self.to_string(), e))?;
            graph.insert(Triple::new(quad.subject, quad.predicate, quad.object));
        }
        Ok(graph)
    }

    /// Serializes `graph`. Triples are written in sorted order.
    pub fn serialize(self, graph: &Graph) -> ModelResult<Vec<u8>> {
        let Some(format) = self.oxigraph_format() else {
            return jsonld::serialize(graph);
        };

        let mut serializer = RdfSerializer::from_format(format);
        if matches!(self, RdfSerialization::Turtle | RdfSerialization::RdfXml) {
            for (prefix, namespace) in PREFIXES {
                serializer = serializer.with_prefix(prefix, namespace).map_err(|e| {
                    ModelError::InvalidIri {
                        iri: namespace.to_string(),
                        message: e.to_string(),
                    }
                })?;
            }
        }

        let mut writer = serializer.for_writer(Vec::new());
        for triple in graph.sorted() {
            writer
                .serialize_triple(triple.as_ref())
                .map_err(|e| ModelError::rdf_syntax(self.to_string(), e))?;
        }
        writer
            .finish()
            .map_err(|e| ModelError::rdf_syntax(self.to_string(), e))
    }
}

impl fmt::Display for RdfSerialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RdfSerialization::Turtle => "Turtle",
            RdfSerialization::NTriples => "N-Triples",
            RdfSerialization::JsonLd => "JSON-LD",
            RdfSerialization::RdfXml => "RDF/XML",
        };
        f.write_str(name)
    }
}

/// Returns `true` if `media_type` names a supported RDF serialization.
pub fn is_rdf_media_type(media_type: &str) -> bool {
    RdfSerialization::from_media_type(media_type).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::rdf;
    use oxigraph::model::NamedNode;

    const BASE: &str = "http://localhost:8080/rest/c1";

    #[test]
    fn test_media_type_lookup_ignores_parameters() {
        assert_eq!(
            RdfSerialization::from_media_type("text/turtle; charset=utf-8"),
            Some(RdfSerialization::Turtle)
        );
        assert_eq!(
            RdfSerialization::from_media_type("application/n-triples"),
            Some(RdfSerialization::NTriples)
        );
        assert_eq!(RdfSerialization::from_media_type("image/png"), None);
        assert!(!is_rdf_media_type("application/octet-stream"));
    }

    #[test]
    fn test_turtle_relative_subject_resolves_to_base() {
        let graph = RdfSerialization::Turtle
            .parse(b"<> a <http://example.com/ContainerInteraction> .", BASE)
            .unwrap();
        let expected = Triple::new(
            NamedNode::new_unchecked(BASE),
            rdf::TYPE.into_owned(),
            NamedNode::new_unchecked("http://example.com/ContainerInteraction"),
        );
        assert!(graph.contains(&expected));
    }

    #[test]
    fn test_invalid_turtle_is_syntax_error() {
        let err = RdfSerialization::Turtle
            .parse(b"<> a <unterminated", BASE)
            .unwrap_err();
        assert!(matches!(err, ModelError::RdfSyntax { .. }));
    }

    #[test]
    fn test_turtle_output_parses_to_same_graph() {
        let graph = RdfSerialization::Turtle
            .parse(
                b"@prefix ex: <http://example.com/> . <> ex:title \"hello\"@en ; ex:size 3 ; ex:rel <other> .",
                BASE,
            )
            .unwrap();
        for format in RdfSerialization::ALL {
            let bytes = format.serialize(&graph).unwrap();
            let reparsed = format.parse(&bytes, BASE).unwrap();
            assert_eq!(reparsed, graph, "{format} did not preserve the graph");
        }
    }
}
