//! Error types for RDF handling and interaction-model resolution.

use thiserror::Error;

/// Errors raised while interpreting a request against the LDP model.
///
/// Every variant describes a problem with client input; none of them
/// indicate a server fault.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The `Link` header could not be parsed.
    #[error("malformed Link header: {message}")]
    InvalidLinkHeader { message: String },

    /// A `rel="type"` link named an LDP type the server does not implement.
    #[error("unsupported interaction model: {iri}")]
    UnsupportedInteractionModel { iri: String },

    /// Two `rel="type"` links requested incompatible interaction models.
    #[error("conflicting interaction models requested: {first} and {second}")]
    ConflictingInteractionModels { first: String, second: String },

    /// A Direct or Indirect container body lacks a required predicate.
    #[error("missing required membership triple: {predicate}")]
    MissingMembershipTriple { predicate: String },

    /// A membership predicate is present but its value is unusable.
    #[error("invalid membership triple {predicate}: {message}")]
    InvalidMembershipTriple { predicate: String, message: String },

    /// A member of an Indirect container lacks the inserted content value.
    #[error("member does not assert inserted content relation {predicate}")]
    MissingInsertedContentValue { predicate: String },

    /// The request body is not valid in the declared RDF syntax.
    #[error("invalid {format} syntax: {message}")]
    RdfSyntax { format: String, message: String },

    /// The request body was not valid JSON-LD in expanded form.
    #[error("invalid JSON-LD: {message}")]
    JsonLd { message: String },

    /// The SPARQL Update request could not be parsed.
    #[error("invalid SPARQL Update: {message}")]
    SparqlSyntax { message: String },

    /// The SPARQL Update request failed while being applied.
    #[error("SPARQL Update evaluation failed: {message}")]
    SparqlEvaluation { message: String },

    /// An IRI could not be parsed.
    #[error("invalid IRI '{iri}': {message}")]
    InvalidIri { iri: String, message: String },

    /// A resource path contained a forbidden segment.
    #[error("invalid resource path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    /// No RDF serialization is registered for the media type.
    #[error("unsupported RDF media type: {media_type}")]
    UnsupportedMediaType { media_type: String },
}

impl ModelError {
    pub(crate) fn rdf_syntax(format: impl Into<String>, message: impl ToString) -> Self {
        ModelError::RdfSyntax {
            format: format.into(),
            message: message.to_string(),
        }
    }
}

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_membership_display_names_predicate() {
        let err = ModelError::MissingMembershipTriple {
            predicate: "http://www.w3.org/ns/ldp#hasMemberRelation".to_string(),
        };
        assert!(err.to_string().contains("ldp#hasMemberRelation"));
    }

    #[test]
    fn test_unsupported_model_display() {
        let err = ModelError::UnsupportedInteractionModel {
            iri: "http://www.w3.org/ns/ldp#Foo".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unsupported interaction model: http://www.w3.org/ns/ldp#Foo"
        );
    }
}
