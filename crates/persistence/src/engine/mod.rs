//! The containment/membership engine.
//!
//! [`Repository`] implements LDP semantics on top of any
//! [`ResourceStorage`]: interaction-model resolution for new resources,
//! membership descriptor validation, the server-managed partition,
//! containment and membership synthesis on read, and the locking that keeps
//! concurrent mutations consistent.
//!
//! All validation happens before the single storage call that commits an
//! operation, so a rejected request leaves storage untouched.
//!
//! ```
//! use std::sync::Arc;
//! use ldp_persistence::backends::memory::MemoryBackend;
//! use ldp_persistence::engine::{Repository, RepositoryConfig, ResourceRequest};
//! use ldp_persistence::principal::Principal;
//! use ldp_model::ResourcePath;
//!
//! # async fn example() -> ldp_persistence::StorageResult<()> {
//! let repo = Repository::new(
//!     Arc::new(MemoryBackend::new()),
//!     RepositoryConfig::new("http://localhost:8080/rest"),
//! );
//! repo.init_root().await?;
//!
//! let request = ResourceRequest::new(Some("text/turtle"), "<> a <http://example.com/Thing> .");
//! let created = repo
//!     .create_child(&Principal::anonymous(), &ResourcePath::root(), Some("thing"), request)
//!     .await?;
//! assert_eq!(created.iri(), "http://localhost:8080/rest/thing");
//! # Ok(())
//! # }
//! ```

mod managed;
mod request;
mod view;

use std::sync::Arc;

use ldp_model::rdf::{NamedNode, NamedNodeRef, Triple};
use ldp_model::vocab::ldp;
use ldp_model::{
    Graph, InteractionModel, MembershipDescriptor, ModelError, RdfSerialization, ResourcePath,
    apply_update, resolve_interaction_model, sanitize_slug,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::ResourceStorage;
use crate::error::{ConstraintError, ResourceError, StorageError, StorageResult};
use crate::lock::LockManager;
use crate::principal::{Operation, Principal};
use crate::types::{self, BinaryContent, StoredResource};

pub use request::{Preconditions, ResourceRequest, ResourceTarget, etag_matches};
pub use view::{RepresentationOptions, ResourceView};

/// Media type recorded for binaries uploaded without a `Content-Type`.
pub const DEFAULT_BINARY_MEDIA_TYPE: &str = "application/octet-stream";

/// Engine settings.
#[derive(Debug, Clone)]
pub struct RepositoryConfig {
    /// IRI of the root container, without a trailing slash.
    pub base_iri: String,
    /// Require Direct and Indirect containers to assert their membership
    /// triples instead of falling back to the LDP defaults.
    pub require_membership_triples: bool,
}

impl RepositoryConfig {
    pub fn new(base_iri: impl Into<String>) -> Self {
        Self {
            base_iri: base_iri.into().trim_end_matches('/').to_string(),
            require_membership_triples: false,
        }
    }

    pub fn with_require_membership_triples(mut self, required: bool) -> Self {
        self.require_membership_triples = required;
        self
    }
}

/// Result of a PUT.
#[derive(Debug, Clone)]
pub enum PutOutcome {
    Created(ResourceView),
    Replaced(ResourceView),
}

impl PutOutcome {
    pub fn view(&self) -> &ResourceView {
        match self {
            PutOutcome::Created(view) | PutOutcome::Replaced(view) => view,
        }
    }
}

/// LDP operations over a storage backend.
#[derive(Debug)]
pub struct Repository<S> {
    storage: Arc<S>,
    config: RepositoryConfig,
    locks: LockManager,
}

fn not_allowed(
    path: &ResourcePath,
    operation: &str,
    model: InteractionModel,
    description: bool,
) -> StorageError {
    ResourceError::OperationNotAllowed {
        path: path.clone(),
        operation: operation.to_string(),
        model,
        description,
    }
    .into()
}

impl<S: ResourceStorage> Repository<S> {
    pub fn new(storage: Arc<S>, config: RepositoryConfig) -> Self {
        Self {
            storage,
            config,
            locks: LockManager::new(),
        }
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn base_iri(&self) -> &str {
        &self.config.base_iri
    }

    /// Returns the IRI of `path`.
    pub fn iri(&self, path: &ResourcePath) -> String {
        path.to_iri(&self.config.base_iri)
    }

    /// Creates the root container if it does not exist yet.
    ///
    /// Returns `true` if the root was created.
    pub async fn init_root(&self) -> StorageResult<bool> {
        let root = ResourcePath::root();
        let _locks = self.locks.lock_paths(&[&root]).await;
        if self.storage.exists(&root).await? {
            return Ok(false);
        }

        let resource = StoredResource::new(
            root,
            InteractionModel::BasicContainer,
            Graph::new(),
            Principal::SYSTEM,
        );
        self.storage.insert(&resource).await?;
        info!(iri = %self.iri(resource.path()), "Created root container");
        Ok(true)
    }

    /// Reads a resource or a binary's description.
    pub async fn get(
        &self,
        principal: &Principal,
        target: &ResourceTarget,
    ) -> StorageResult<ResourceView> {
        principal.check_permission(Operation::Read)?;
        let resource = self.read_target(target).await?;
        self.view(resource, target.description).await
    }

    /// Creates a child of `container` (POST).
    ///
    /// The child's path segment is the sanitized `slug` if one is given and
    /// free, and a fresh UUID otherwise.
    pub async fn create_child(
        &self,
        principal: &Principal,
        container: &ResourcePath,
        slug: Option<&str>,
        request: ResourceRequest,
    ) -> StorageResult<ResourceView> {
        principal.check_permission(Operation::Create)?;
        let resolution =
            resolve_interaction_model(&request.links, request.content_type.as_deref())?;

        // path allocation happens under the container's lock
        let _locks = self.locks.lock_paths(&[container]).await;

        let parent = self
            .storage
            .read(container)
            .await?
            .ok_or_else(|| StorageError::not_found(container))?;
        if !parent.interaction_model().is_container() {
            return Err(not_allowed(container, "POST", parent.interaction_model(), false));
        }

        let path = self.allocate_child_path(container, slug).await?;
        let resource = self.new_resource(principal, path, resolution.model, &request)?;
        self.check_member(&parent, &resource)?;

        self.storage.insert(&resource).await?;
        info!(
            iri = %self.iri(resource.path()),
            model = %resource.interaction_model(),
            principal = principal.id(),
            "Created resource"
        );
        self.view(resource, false).await
    }

    /// Creates or replaces the resource at `target` (PUT).
    pub async fn put(
        &self,
        principal: &Principal,
        target: &ResourceTarget,
        request: ResourceRequest,
        preconditions: &Preconditions,
    ) -> StorageResult<PutOutcome> {
        let path = &target.path;
        let parent_path = path.parent();
        let lock_set: Vec<&ResourcePath> =
            parent_path.iter().chain(std::iter::once(path)).collect();
        let _locks = self.locks.lock_paths(&lock_set).await;

        match self.storage.read(path).await? {
            Some(existing) => {
                principal.check_permission(Operation::Update)?;
                if target.description && existing.binary().is_none() {
                    return Err(StorageError::not_found(path));
                }
                let current = self.view(existing, target.description).await?;
                preconditions.check(path, Some(current.etag()))?;

                let replacement = self.replacement(principal, &current, &request)?;
                self.check_existing_member(&replacement).await?;
                self.storage
                    .replace(&replacement, current.resource().version())
                    .await?;
                debug!(iri = %current.iri(), version = replacement.version(), "Replaced resource");
                Ok(PutOutcome::Replaced(
                    self.view(replacement, target.description).await?,
                ))
            }
            None => {
                principal.check_permission(Operation::Create)?;
                if target.description {
                    return Err(StorageError::not_found(path));
                }
                preconditions.check(path, None)?;

                let Some(parent_path) = parent_path.clone() else {
                    // the root is created at startup
                    return Err(StorageError::not_found(path));
                };
                let parent = self
                    .storage
                    .read(&parent_path)
                    .await?
                    .ok_or(ResourceError::ParentNotFound {
                        path: parent_path.clone(),
                    })?;
                if !parent.interaction_model().is_container() {
                    return Err(ResourceError::NotAContainer { path: parent_path }.into());
                }

                let resolution =
                    resolve_interaction_model(&request.links, request.content_type.as_deref())?;
                let resource =
                    self.new_resource(principal, path.clone(), resolution.model, &request)?;
                self.check_member(&parent, &resource)?;

                self.storage.insert(&resource).await?;
                info!(
                    iri = %self.iri(path),
                    model = %resource.interaction_model(),
                    principal = principal.id(),
                    "Created resource"
                );
                Ok(PutOutcome::Created(self.view(resource, false).await?))
            }
        }
    }

    /// Applies a SPARQL Update to an RDF resource or a binary's description
    /// (PATCH).
    pub async fn patch(
        &self,
        principal: &Principal,
        target: &ResourceTarget,
        update: &str,
        preconditions: &Preconditions,
    ) -> StorageResult<ResourceView> {
        principal.check_permission(Operation::Update)?;
        let path = &target.path;
        let parent_path = path.parent();
        let lock_set: Vec<&ResourcePath> =
            parent_path.iter().chain(std::iter::once(path)).collect();
        let _locks = self.locks.lock_paths(&lock_set).await;

        let existing = self.read_target(target).await?;
        let model = existing.interaction_model();
        if existing.binary().is_some() && !target.description {
            return Err(not_allowed(path, "PATCH", model, false));
        }

        let current = self.view(existing, target.description).await?;
        preconditions.check(path, Some(current.etag()))?;

        let protected = current.protected();
        let mut before = current.client_graph().clone();
        before.extend(protected.iter().cloned());

        let after = apply_update(&before, update, current.iri())?;
        let client = managed::patched_client_triples(&before, after, model, &protected)?;

        let subject = NamedNode::new_unchecked(current.iri());
        let membership = MembershipDescriptor::from_graph(model, subject.as_ref(), &client, true)?;

        let resource = current.resource();
        let patched = resource.new_version(
            client,
            resource.binary().cloned(),
            membership,
            principal.id(),
        );
        self.check_existing_member(&patched).await?;
        self.storage.replace(&patched, resource.version()).await?;
        debug!(iri = %current.iri(), version = patched.version(), "Patched resource");

        self.view(patched, target.description).await
    }

    /// Deletes a resource and everything below it.
    ///
    /// Returns the number of resources removed.
    pub async fn delete(
        &self,
        principal: &Principal,
        target: &ResourceTarget,
        preconditions: &Preconditions,
    ) -> StorageResult<u64> {
        principal.check_permission(Operation::Delete)?;
        let path = &target.path;

        let _lock = self.locks.lock_all().await;

        let existing = self.read_target(target).await?;
        if path.is_root() || target.description {
            return Err(not_allowed(
                path,
                "DELETE",
                existing.interaction_model(),
                target.description,
            ));
        }

        let current = self.view(existing, false).await?;
        preconditions.check(path, Some(current.etag()))?;

        let removed = self
            .storage
            .delete_tree(path, principal.id(), types::now())
            .await?;
        info!(iri = %current.iri(), removed, principal = principal.id(), "Deleted resource");
        Ok(removed)
    }

    async fn read_target(&self, target: &ResourceTarget) -> StorageResult<StoredResource> {
        let resource = self
            .storage
            .read(&target.path)
            .await?
            .ok_or_else(|| StorageError::not_found(&target.path))?;
        if target.description && resource.binary().is_none() {
            return Err(StorageError::not_found(&target.path));
        }
        Ok(resource)
    }

    async fn allocate_child_path(
        &self,
        container: &ResourcePath,
        slug: Option<&str>,
    ) -> StorageResult<ResourcePath> {
        if let Some(segment) = slug.and_then(sanitize_slug) {
            let candidate = container.child(&segment)?;
            if !self.storage.exists(&candidate).await? {
                return Ok(candidate);
            }
            debug!(slug = %segment, "Slug already taken, using a generated segment");
        }

        loop {
            let candidate = container.child(&Uuid::new_v4().to_string())?;
            if !self.storage.exists(&candidate).await? {
                return Ok(candidate);
            }
        }
    }

    /// Builds a new resource from a creation request.
    fn new_resource(
        &self,
        principal: &Principal,
        path: ResourcePath,
        model: InteractionModel,
        request: &ResourceRequest,
    ) -> StorageResult<StoredResource> {
        if model == InteractionModel::NonRdfSource {
            let binary = BinaryContent::new(request.body.clone(), binary_media_type(request));
            return Ok(
                StoredResource::new(path, model, Graph::new(), principal.id()).with_binary(binary),
            );
        }

        let iri = self.iri(&path);
        let subject = NamedNode::new_unchecked(iri.as_str());
        let body = parse_body(request, &iri)?;
        let mut client = managed::client_triples(body, model, &Graph::new())?;
        let membership = self.membership(
            model,
            subject.as_ref(),
            &mut client,
            self.config.require_membership_triples,
        )?;

        Ok(StoredResource::new(path, model, client, principal.id()).with_membership(membership))
    }

    /// Builds the next version of `current` from a PUT body.
    fn replacement(
        &self,
        principal: &Principal,
        current: &ResourceView,
        request: &ResourceRequest,
    ) -> StorageResult<StoredResource> {
        let resource = current.resource();
        let existing = resource.interaction_model();

        if current.is_description() {
            let body = parse_body(request, current.iri())?;
            let client = managed::client_triples(body, existing, &current.protected())?;
            return Ok(resource.new_version(
                client,
                resource.binary().cloned(),
                None,
                principal.id(),
            ));
        }

        let resolution =
            resolve_interaction_model(&request.links, request.content_type.as_deref())?;
        let requested = resolution.model;
        let compatible = if resolution.explicit {
            requested == existing || (requested == InteractionModel::RdfSource && existing.is_rdf())
        } else {
            requested.is_rdf() == existing.is_rdf()
        };
        if !compatible {
            warn!(iri = %current.iri(), %existing, %requested, "Rejected interaction model change");
            return Err(ConstraintError::InteractionModelMismatch {
                path: resource.path().clone(),
                existing,
                requested,
            }
            .into());
        }

        if existing == InteractionModel::NonRdfSource {
            let binary = BinaryContent::new(request.body.clone(), binary_media_type(request));
            return Ok(resource.new_version(
                resource.graph().clone(),
                Some(binary),
                None,
                principal.id(),
            ));
        }

        let subject = NamedNode::new_unchecked(current.iri());
        let body = parse_body(request, current.iri())?;
        let mut client = managed::client_triples(body, existing, &current.protected())?;
        let membership = match resource.membership() {
            // a body without membership triples keeps the configured descriptor
            Some(descriptor) if !MembershipDescriptor::is_asserted(subject.as_ref(), &client) => {
                client.extend(descriptor.to_triples(subject.as_ref(), existing));
                Some(descriptor.clone())
            }
            _ => self.membership(existing, subject.as_ref(), &mut client, true)?,
        };

        Ok(resource.new_version(client, None, membership, principal.id()))
    }

    /// Validates the membership descriptor of a container body. Defaulted
    /// descriptors are written into `client`.
    fn membership(
        &self,
        model: InteractionModel,
        subject: NamedNodeRef<'_>,
        client: &mut Graph,
        strict: bool,
    ) -> StorageResult<Option<MembershipDescriptor>> {
        let descriptor = MembershipDescriptor::from_graph(model, subject, client, strict)?;
        if let Some(descriptor) = &descriptor {
            client.extend(descriptor.to_triples(subject, model));
        }
        Ok(descriptor)
    }

    /// A new member of an Indirect container must carry its inserted content.
    fn check_member(&self, parent: &StoredResource, member: &StoredResource) -> StorageResult<()> {
        if let Some(descriptor) = parent.membership() {
            let iri = NamedNode::new_unchecked(self.iri(member.path()));
            descriptor.check_member(iri.as_ref(), member.graph())?;
        }
        Ok(())
    }

    /// A replaced member of an Indirect container must keep its inserted
    /// content. The caller holds the parent's lock.
    async fn check_existing_member(&self, member: &StoredResource) -> StorageResult<()> {
        let Some(parent_path) = member.parent() else {
            return Ok(());
        };
        match self.storage.read(&parent_path).await? {
            Some(parent) => self.check_member(&parent, member),
            None => Ok(()),
        }
    }

    /// Computes the read model of `resource`.
    async fn view(
        &self,
        resource: StoredResource,
        description: bool,
    ) -> StorageResult<ResourceView> {
        let iri = self.iri(resource.path());
        let subject = NamedNode::new_unchecked(iri.as_str());
        let parent = resource.parent().map(|p| NamedNode::new_unchecked(self.iri(&p)));

        let managed = managed::server_managed_triples(
            &resource,
            subject.as_ref(),
            parent.as_ref().map(|p| p.as_ref()),
        );

        let mut containment = Graph::new();
        if resource.interaction_model().is_container() {
            for child in self.storage.children(resource.path()).await? {
                containment.insert(Triple::new(
                    subject.clone(),
                    ldp::CONTAINS.into_owned(),
                    NamedNode::new_unchecked(self.iri(&child)),
                ));
            }
        }

        let membership = self.membership_triples(&iri).await?;

        Ok(ResourceView::new(
            resource,
            iri,
            description,
            managed,
            containment,
            membership,
        ))
    }

    /// Synthesizes the membership triples whose subject is `iri`.
    async fn membership_triples(&self, iri: &str) -> StorageResult<Graph> {
        let mut graph = Graph::new();
        for container in self.storage.find_by_membership_resource(iri).await? {
            let Some(descriptor) = container.membership() else {
                continue;
            };
            for child in self.storage.children(container.path()).await? {
                if let Some(member) = self.storage.read(&child).await? {
                    let member_iri = NamedNode::new_unchecked(self.iri(&child));
                    graph.extend(descriptor.membership_triples(member_iri.as_ref(), member.graph()));
                }
            }
        }
        Ok(graph)
    }
}

fn binary_media_type(request: &ResourceRequest) -> String {
    request
        .content_type
        .clone()
        .unwrap_or_else(|| DEFAULT_BINARY_MEDIA_TYPE.to_string())
}

/// Parses an RDF request body. A missing media type means Turtle.
fn parse_body(request: &ResourceRequest, base_iri: &str) -> StorageResult<Graph> {
    let format = match request.content_type.as_deref() {
        None => RdfSerialization::Turtle,
        Some(media_type) => RdfSerialization::from_media_type(media_type).ok_or_else(|| {
            ModelError::UnsupportedMediaType {
                media_type: media_type.to_string(),
            }
        })?,
    };
    Ok(format.parse(&request.body, base_iri)?)
}
