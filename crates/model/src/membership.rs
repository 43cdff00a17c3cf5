//! Membership descriptors for Direct and Indirect containers.
//!
//! A descriptor names the membership resource, the member relation and
//! (for Indirect containers) the inserted content relation. Membership
//! triples are never stored; [`MembershipDescriptor::membership_triples`]
//! synthesizes them from a member's graph when the membership resource is
//! read.

use oxigraph::model::{NamedNode, NamedNodeRef, Term, Triple};

use crate::error::{ModelError, ModelResult};
use crate::graph::Graph;
use crate::interaction::InteractionModel;
use crate::vocab::ldp;

/// Configuration of a Direct or Indirect container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipDescriptor {
    membership_resource: NamedNode,
    has_member_relation: NamedNode,
    inserted_content_relation: NamedNode,
}

impl MembershipDescriptor {
    /// Creates a descriptor from its three parts.
    pub fn new(
        membership_resource: NamedNode,
        has_member_relation: NamedNode,
        inserted_content_relation: NamedNode,
    ) -> Self {
        Self {
            membership_resource,
            has_member_relation,
            inserted_content_relation,
        }
    }

    /// The LDP defaults: the container is its own membership resource,
    /// members are related by `ldp:member` and identified by their own IRI.
    pub fn defaults(container: NamedNodeRef<'_>) -> Self {
        Self::new(
            container.into_owned(),
            ldp::MEMBER.into_owned(),
            ldp::MEMBER_SUBJECT.into_owned(),
        )
    }

    pub fn membership_resource(&self) -> NamedNodeRef<'_> {
        self.membership_resource.as_ref()
    }

    pub fn has_member_relation(&self) -> NamedNodeRef<'_> {
        self.has_member_relation.as_ref()
    }

    pub fn inserted_content_relation(&self) -> NamedNodeRef<'_> {
        self.inserted_content_relation.as_ref()
    }

    /// Returns `true` when members contribute their own IRI.
    pub fn uses_member_subject(&self) -> bool {
        self.inserted_content_relation.as_ref() == ldp::MEMBER_SUBJECT
    }

    /// Extracts and validates the descriptor a container asserts about itself.
    ///
    /// Returns `Ok(None)` for models without membership. When `strict` is
    /// `false` and the graph asserts none of the membership predicates, the
    /// LDP defaults are used.
    ///
    /// # Errors
    ///
    /// * [`ModelError::MissingMembershipTriple`] names the first absent
    ///   required predicate.
    /// * [`ModelError::InvalidMembershipTriple`] for duplicated or non-IRI
    ///   values, for `ldp:isMemberOfRelation`, and for a Direct container
    ///   whose inserted content relation is not `ldp:MemberSubject`.
    pub fn from_graph(
        model: InteractionModel,
        container: NamedNodeRef<'_>,
        graph: &Graph,
        strict: bool,
    ) -> ModelResult<Option<Self>> {
        if !model.has_membership() {
            return Ok(None);
        }

        if single_iri(graph, container, ldp::IS_MEMBER_OF_RELATION)?.is_some() {
            return Err(ModelError::InvalidMembershipTriple {
                predicate: ldp::IS_MEMBER_OF_RELATION.as_str().to_string(),
                message: "inverse membership is not supported".to_string(),
            });
        }

        let membership_resource = single_iri(graph, container, ldp::MEMBERSHIP_RESOURCE)?;
        let has_member_relation = single_iri(graph, container, ldp::HAS_MEMBER_RELATION)?;
        let inserted_content_relation =
            single_iri(graph, container, ldp::INSERTED_CONTENT_RELATION)?;

        let nothing_asserted = membership_resource.is_none()
            && has_member_relation.is_none()
            && inserted_content_relation.is_none();
        if nothing_asserted && !strict {
            return Ok(Some(Self::defaults(container)));
        }

        let membership_resource = require(membership_resource, ldp::MEMBERSHIP_RESOURCE)?;
        let has_member_relation = require(has_member_relation, ldp::HAS_MEMBER_RELATION)?;

        let inserted_content_relation = match model {
            InteractionModel::IndirectContainer => {
                require(inserted_content_relation, ldp::INSERTED_CONTENT_RELATION)?
            }
            _ => match inserted_content_relation {
                Some(icr) if icr.as_ref() != ldp::MEMBER_SUBJECT => {
                    return Err(ModelError::InvalidMembershipTriple {
                        predicate: ldp::INSERTED_CONTENT_RELATION.as_str().to_string(),
                        message: "a DirectContainer must use ldp:MemberSubject".to_string(),
                    });
                }
                _ => ldp::MEMBER_SUBJECT.into_owned(),
            },
        };

        Ok(Some(Self::new(
            membership_resource,
            has_member_relation,
            inserted_content_relation,
        )))
    }

    /// Returns `true` if `graph` asserts any membership predicate about
    /// `container`.
    pub fn is_asserted(container: NamedNodeRef<'_>, graph: &Graph) -> bool {
        [
            ldp::MEMBERSHIP_RESOURCE,
            ldp::HAS_MEMBER_RELATION,
            ldp::INSERTED_CONTENT_RELATION,
            ldp::IS_MEMBER_OF_RELATION,
        ]
        .into_iter()
        .any(|predicate| graph.objects(container.into(), predicate).next().is_some())
    }

    /// Returns the descriptor as triples about `container`.
    ///
    /// The inserted content relation is only emitted for Indirect containers.
    pub fn to_triples(&self, container: NamedNodeRef<'_>, model: InteractionModel) -> Vec<Triple> {
        let mut triples = vec![
            Triple::new(
                container.into_owned(),
                ldp::MEMBERSHIP_RESOURCE.into_owned(),
                self.membership_resource.clone(),
            ),
            Triple::new(
                container.into_owned(),
                ldp::HAS_MEMBER_RELATION.into_owned(),
                self.has_member_relation.clone(),
            ),
        ];
        if model == InteractionModel::IndirectContainer {
            triples.push(Triple::new(
                container.into_owned(),
                ldp::INSERTED_CONTENT_RELATION.into_owned(),
                self.inserted_content_relation.clone(),
            ));
        }
        triples
    }

    /// Returns the values a member contributes to the membership resource.
    pub fn inserted_content(&self, member: NamedNodeRef<'_>, member_graph: &Graph) -> Vec<Term> {
        if self.uses_member_subject() {
            return vec![member.into_owned().into()];
        }
        let mut values: Vec<Term> = member_graph
            .objects(member.into(), self.inserted_content_relation.as_ref())
            .cloned()
            .collect();
        values.sort_by_cached_key(|t| t.to_string());
        values
    }

    /// Checks that a new member of this container can contribute membership.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingInsertedContentValue`] when the container
    /// uses an inserted content relation and the member does not assert it.
    pub fn check_member(&self, member: NamedNodeRef<'_>, member_graph: &Graph) -> ModelResult<()> {
        if self.inserted_content(member, member_graph).is_empty() {
            return Err(ModelError::MissingInsertedContentValue {
                predicate: self.inserted_content_relation.as_str().to_string(),
            });
        }
        Ok(())
    }

    /// Synthesizes the membership triples contributed by one member.
    pub fn membership_triples(&self, member: NamedNodeRef<'_>, member_graph: &Graph) -> Vec<Triple> {
        self.inserted_content(member, member_graph)
            .into_iter()
            .map(|value| {
                Triple::new(
                    self.membership_resource.clone(),
                    self.has_member_relation.clone(),
                    value,
                )
            })
            .collect()
    }
}

/// Returns the single IRI object of `(subject, predicate, ?)`, if any.
fn single_iri(
    graph: &Graph,
    subject: NamedNodeRef<'_>,
    predicate: NamedNodeRef<'_>,
) -> ModelResult<Option<NamedNode>> {
    let mut objects = graph.objects(subject.into(), predicate);
    let Some(first) = objects.next() else {
        return Ok(None);
    };
    if objects.next().is_some() {
        return Err(ModelError::InvalidMembershipTriple {
            predicate: predicate.as_str().to_string(),
            message: "more than one value asserted".to_string(),
        });
    }
    match first {
        Term::NamedNode(node) => Ok(Some(node.clone())),
        _ => Err(ModelError::InvalidMembershipTriple {
            predicate: predicate.as_str().to_string(),
            message: "value must be an IRI".to_string(),
        }),
    }
}

fn require(value: Option<NamedNode>, predicate: NamedNodeRef<'_>) -> ModelResult<NamedNode> {
    value.ok_or_else(|| ModelError::MissingMembershipTriple {
        predicate: predicate.as_str().to_string(),
    })
}
