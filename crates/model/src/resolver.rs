//! Interaction-model resolution for creation requests.
//!
//! Inputs are the request's `rel="type"` links and its media type. Links
//! outside the LDP namespace are ignored. The rules, in order:
//!
//! 1. an unknown LDP type, or two incompatible LDP types, is an error;
//! 2. `ldp:NonRDFSource` wins;
//! 3. a media type that is not an RDF serialization selects `NonRDFSource`;
//! 4. otherwise the declared type wins;
//! 5. with no declaration, the resource becomes a basic container.

use crate::error::{ModelError, ModelResult};
use crate::format::is_rdf_media_type;
use crate::interaction::InteractionModel;
use crate::link::LinkValue;
use crate::vocab::{self, ldp};

/// The outcome of resolving a creation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// The chosen interaction model.
    pub model: InteractionModel,
    /// `true` if the model was declared by a `Link` header rather than
    /// defaulted.
    pub explicit: bool,
}

/// Resolves the interaction model for a creation or replacement request.
///
/// # Errors
///
/// * [`ModelError::UnsupportedInteractionModel`] for an unknown LDP type.
/// * [`ModelError::ConflictingInteractionModels`] for incompatible types.
pub fn resolve_interaction_model(
    links: &[LinkValue],
    media_type: Option<&str>,
) -> ModelResult<Resolution> {
    let declared = declared_model(links)?;

    if let Some(InteractionModel::NonRdfSource) = declared {
        return Ok(Resolution {
            model: InteractionModel::NonRdfSource,
            explicit: true,
        });
    }

    if media_type.is_some_and(|mt| !is_rdf_media_type(mt)) {
        return Ok(Resolution {
            model: InteractionModel::NonRdfSource,
            explicit: false,
        });
    }

    Ok(match declared {
        Some(model) => Resolution {
            model,
            explicit: true,
        },
        None => Resolution {
            model: InteractionModel::BasicContainer,
            explicit: false,
        },
    })
}

/// Returns the most specific model declared by the `rel="type"` links.
fn declared_model(links: &[LinkValue]) -> ModelResult<Option<InteractionModel>> {
    let mut chosen: Option<(InteractionModel, &str)> = None;
    let mut generic_resource = false;
    let mut generic_container = false;

    for link in links.iter().filter(|l| l.has_rel("type")) {
        let iri = link.target();
        if !vocab::is_ldp_term(iri) {
            continue;
        }
        if iri == ldp::RESOURCE.as_str() {
            // supertype of every model
            generic_resource = true;
            continue;
        }
        if iri == ldp::CONTAINER.as_str() {
            generic_container = true;
            continue;
        }

        let model = InteractionModel::from_type_iri(iri).ok_or_else(|| {
            ModelError::UnsupportedInteractionModel {
                iri: iri.to_string(),
            }
        })?;

        chosen = match chosen {
            None => Some((model, iri)),
            Some((current, _)) if current == model => chosen,
            Some((current, current_iri)) => {
                if !compatible(current, model) {
                    return Err(ModelError::ConflictingInteractionModels {
                        first: current_iri.to_string(),
                        second: iri.to_string(),
                    });
                }
                if model.specificity() > current.specificity() {
                    Some((model, iri))
                } else {
                    chosen
                }
            }
        };
    }

    match chosen {
        Some((InteractionModel::NonRdfSource, iri)) if generic_container => {
            Err(ModelError::ConflictingInteractionModels {
                first: ldp::CONTAINER.as_str().to_string(),
                second: iri.to_string(),
            })
        }
        Some((InteractionModel::RdfSource, _)) if generic_container => {
            Ok(Some(InteractionModel::BasicContainer))
        }
        Some((model, _)) => Ok(Some(model)),
        None if generic_container => Ok(Some(InteractionModel::BasicContainer)),
        None if generic_resource => Ok(Some(InteractionModel::RdfSource)),
        None => Ok(None),
    }
}

/// `RDFSource` is compatible with every RDF model; container models are
/// mutually exclusive, and `NonRDFSource` excludes all RDF models.
fn compatible(a: InteractionModel, b: InteractionModel) -> bool {
    use InteractionModel::*;
    match (a, b) {
        (NonRdfSource, _) | (_, NonRdfSource) => false,
        (RdfSource, _) | (_, RdfSource) => true,
        _ => false,
    }
}
