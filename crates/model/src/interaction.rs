//! The closed set of LDP interaction models.

use std::fmt;
use std::str::FromStr;

use oxigraph::model::NamedNodeRef;

use crate::error::ModelError;
use crate::vocab::ldp;

/// The interaction model a resource was created with.
///
/// The model is fixed at creation time. Every engine operation matches on it
/// exhaustively, so adding a variant forces each operation to decide how to
/// treat it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionModel {
    /// `ldp:BasicContainer`
    BasicContainer,
    /// `ldp:DirectContainer`
    DirectContainer,
    /// `ldp:IndirectContainer`
    IndirectContainer,
    /// `ldp:RDFSource`
    RdfSource,
    /// `ldp:NonRDFSource`
    NonRdfSource,
}

impl InteractionModel {
    /// Returns the LDP type IRI naming this model.
    pub fn type_iri(self) -> NamedNodeRef<'static> {
        match self {
            InteractionModel::BasicContainer => ldp::BASIC_CONTAINER,
            InteractionModel::DirectContainer => ldp::DIRECT_CONTAINER,
            InteractionModel::IndirectContainer => ldp::INDIRECT_CONTAINER,
            InteractionModel::RdfSource => ldp::RDF_SOURCE,
            InteractionModel::NonRdfSource => ldp::NON_RDF_SOURCE,
        }
    }

    /// Maps an LDP type IRI to a model.
    ///
    /// `ldp:Container` is treated as a basic container and `ldp:Resource` as
    /// an RDF source. Returns `None` for any IRI that is not an interaction
    /// model.
    pub fn from_type_iri(iri: &str) -> Option<Self> {
        let model = if iri == ldp::BASIC_CONTAINER.as_str() || iri == ldp::CONTAINER.as_str() {
            InteractionModel::BasicContainer
        } else if iri == ldp::DIRECT_CONTAINER.as_str() {
            InteractionModel::DirectContainer
        } else if iri == ldp::INDIRECT_CONTAINER.as_str() {
            InteractionModel::IndirectContainer
        } else if iri == ldp::RDF_SOURCE.as_str() || iri == ldp::RESOURCE.as_str() {
            InteractionModel::RdfSource
        } else if iri == ldp::NON_RDF_SOURCE.as_str() {
            InteractionModel::NonRdfSource
        } else {
            return None;
        };
        Some(model)
    }

    /// Returns `true` for the three container models.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            InteractionModel::BasicContainer
                | InteractionModel::DirectContainer
                | InteractionModel::IndirectContainer
        )
    }

    /// Returns `true` for containers that maintain membership triples.
    pub fn has_membership(self) -> bool {
        matches!(
            self,
            InteractionModel::DirectContainer | InteractionModel::IndirectContainer
        )
    }

    /// Returns `true` if the resource is described by RDF (everything except
    /// binaries).
    pub fn is_rdf(self) -> bool {
        !matches!(self, InteractionModel::NonRdfSource)
    }

    /// Returns every LDP type the resource is an instance of, most general
    /// first.
    pub fn ldp_types(self) -> Vec<NamedNodeRef<'static>> {
        match self {
            InteractionModel::BasicContainer
            | InteractionModel::DirectContainer
            | InteractionModel::IndirectContainer => vec![
                ldp::RESOURCE,
                ldp::RDF_SOURCE,
                ldp::CONTAINER,
                self.type_iri(),
            ],
            InteractionModel::RdfSource => vec![ldp::RESOURCE, ldp::RDF_SOURCE],
            InteractionModel::NonRdfSource => vec![ldp::RESOURCE, ldp::NON_RDF_SOURCE],
        }
    }

    /// Short name used for persistence.
    pub fn as_str(self) -> &'static str {
        match self {
            InteractionModel::BasicContainer => "BasicContainer",
            InteractionModel::DirectContainer => "DirectContainer",
            InteractionModel::IndirectContainer => "IndirectContainer",
            InteractionModel::RdfSource => "RDFSource",
            InteractionModel::NonRdfSource => "NonRDFSource",
        }
    }

    /// Specificity used to pick among compatible `rel="type"` links.
    pub(crate) fn specificity(self) -> u8 {
        match self {
            InteractionModel::RdfSource => 0,
            InteractionModel::BasicContainer => 1,
            InteractionModel::DirectContainer | InteractionModel::IndirectContainer => 2,
            InteractionModel::NonRdfSource => 3,
        }
    }
}

impl fmt::Display for InteractionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionModel {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BasicContainer" => Ok(InteractionModel::BasicContainer),
            "DirectContainer" => Ok(InteractionModel::DirectContainer),
            "IndirectContainer" => Ok(InteractionModel::IndirectContainer),
            "RDFSource" => Ok(InteractionModel::RdfSource),
            "NonRDFSource" => Ok(InteractionModel::NonRdfSource),
            other => Err(ModelError::UnsupportedInteractionModel {
                iri: other.to_string(),
            }),
        }
    }
}
