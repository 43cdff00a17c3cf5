//! Stored resource types.
//!
//! This module defines the [`StoredResource`] type, which holds a resource's
//! client-asserted content together with the persistence metadata the server
//! manages for it.

use chrono::{DateTime, SubsecRound, Utc};
use ldp_model::{Graph, InteractionModel, MembershipDescriptor, ResourcePath};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A resource with persistence metadata.
///
/// The client partition ([`graph`](Self::graph)) only ever holds triples the
/// client asserted. Server-managed triples are derived from the metadata
/// fields when the resource is read.
///
/// # Examples
///
/// ```
/// use ldp_model::{Graph, InteractionModel, ResourcePath};
/// use ldp_persistence::types::StoredResource;
///
/// let resource = StoredResource::new(
///     ResourcePath::parse("photos").unwrap(),
///     InteractionModel::BasicContainer,
///     Graph::new(),
///     "alice",
/// );
///
/// assert_eq!(resource.version(), 1);
/// assert_eq!(resource.created_by(), "alice");
/// assert!(resource.binary().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StoredResource {
    /// Location below the repository root.
    path: ResourcePath,

    /// Interaction model fixed at creation.
    interaction_model: InteractionModel,

    /// Repository-assigned identifier (`fedora:uuid`).
    uuid: Uuid,

    /// Client-asserted triples.
    graph: Graph,

    /// Content of a NonRDFSource.
    binary: Option<BinaryContent>,

    /// Membership configuration of a Direct or Indirect container.
    membership: Option<MembershipDescriptor>,

    /// Monotonically increasing version, used for optimistic locking.
    version: u64,

    created_at: DateTime<Utc>,
    created_by: String,
    last_modified: DateTime<Utc>,
    last_modified_by: String,
}

impl StoredResource {
    /// Creates a new resource at version 1.
    ///
    /// Timestamps are truncated to milliseconds, the precision every backend
    /// stores.
    pub fn new(
        path: ResourcePath,
        interaction_model: InteractionModel,
        graph: Graph,
        created_by: impl Into<String>,
    ) -> Self {
        let now = now();
        let created_by = created_by.into();

        Self {
            path,
            interaction_model,
            uuid: Uuid::new_v4(),
            graph,
            binary: None,
            membership: None,
            version: 1,
            created_at: now,
            last_modified: now,
            last_modified_by: created_by.clone(),
            created_by,
        }
    }

    /// Attaches binary content.
    pub fn with_binary(mut self, binary: BinaryContent) -> Self {
        self.binary = Some(binary);
        self
    }

    /// Attaches a membership descriptor.
    pub fn with_membership(mut self, membership: Option<MembershipDescriptor>) -> Self {
        self.membership = membership;
        self
    }

    /// Creates a stored resource from existing data (e.g., loaded from database).
    #[allow(clippy::too_many_arguments)]
    pub fn from_storage(
        path: ResourcePath,
        interaction_model: InteractionModel,
        uuid: Uuid,
        graph: Graph,
        binary: Option<BinaryContent>,
        membership: Option<MembershipDescriptor>,
        version: u64,
        created_at: DateTime<Utc>,
        created_by: String,
        last_modified: DateTime<Utc>,
        last_modified_by: String,
    ) -> Self {
        Self {
            path,
            interaction_model,
            uuid,
            graph,
            binary,
            membership,
            version,
            created_at,
            created_by,
            last_modified,
            last_modified_by,
        }
    }

    pub fn path(&self) -> &ResourcePath {
        &self.path
    }

    /// Returns the parent container's path, or `None` for the root.
    pub fn parent(&self) -> Option<ResourcePath> {
        self.path.parent()
    }

    pub fn interaction_model(&self) -> InteractionModel {
        self.interaction_model
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Returns the client-asserted triples.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn binary(&self) -> Option<&BinaryContent> {
        self.binary.as_ref()
    }

    pub fn membership(&self) -> Option<&MembershipDescriptor> {
        self.membership.as_ref()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    pub fn last_modified_by(&self) -> &str {
        &self.last_modified_by
    }

    /// Returns the resource IRI under `base`.
    pub fn iri(&self, base: &str) -> String {
        self.path.to_iri(base)
    }

    /// Creates the next version of this resource with new content.
    ///
    /// Identity, interaction model and creation metadata are kept.
    pub fn new_version(
        &self,
        graph: Graph,
        binary: Option<BinaryContent>,
        membership: Option<MembershipDescriptor>,
        modified_by: impl Into<String>,
    ) -> Self {
        Self {
            path: self.path.clone(),
            interaction_model: self.interaction_model,
            uuid: self.uuid,
            graph,
            binary,
            membership,
            version: self.version + 1,
            created_at: self.created_at,
            created_by: self.created_by.clone(),
            last_modified: now(),
            last_modified_by: modified_by.into(),
        }
    }

    /// Records a change to the resource's containment without touching its
    /// content. Used when a child is added or removed.
    pub fn touch(&mut self, modified_by: &str, at: DateTime<Utc>) {
        self.version += 1;
        self.last_modified = at;
        self.last_modified_by = modified_by.to_string();
    }
}

/// Bytes and metadata of a NonRDFSource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryContent {
    data: Vec<u8>,
    mime_type: String,
    /// Lowercase hex SHA-256 of `data`.
    digest: String,
}

impl BinaryContent {
    /// Wraps `data`, computing its SHA-256 digest.
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        let digest = hex::encode(Sha256::digest(&data));
        Self {
            data,
            mime_type: mime_type.into(),
            digest,
        }
    }

    /// Rebuilds content loaded from storage without rehashing.
    pub fn from_storage(data: Vec<u8>, mime_type: String, digest: String) -> Self {
        Self {
            data,
            mime_type,
            digest,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// The current time at storage precision.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource() -> StoredResource {
        StoredResource::new(
            ResourcePath::parse("a/b").unwrap(),
            InteractionModel::RdfSource,
            Graph::new(),
            "alice",
        )
    }

    #[test]
    fn test_new_resource() {
        let r = resource();
        assert_eq!(r.version(), 1);
        assert_eq!(r.created_at(), r.last_modified());
        assert_eq!(r.last_modified_by(), "alice");
        assert_eq!(r.parent(), Some(ResourcePath::parse("a").unwrap()));
        assert_eq!(r.iri("http://localhost/rest"), "http://localhost/rest/a/b");
    }

    #[test]
    fn test_new_version_keeps_identity() {
        let r = resource();
        let next = r.new_version(Graph::new(), None, None, "bob");
        assert_eq!(next.version(), 2);
        assert_eq!(next.uuid(), r.uuid());
        assert_eq!(next.created_by(), "alice");
        assert_eq!(next.last_modified_by(), "bob");
        assert!(next.last_modified() >= r.last_modified());
    }

    #[test]
    fn test_touch() {
        let mut r = resource();
        let at = now();
        r.touch("carol", at);
        assert_eq!(r.version(), 2);
        assert_eq!(r.last_modified(), at);
        assert_eq!(r.last_modified_by(), "carol");
    }

    #[test]
    fn test_binary_digest() {
        let binary = BinaryContent::new(b"hello".to_vec(), "text/plain");
        assert_eq!(
            binary.digest(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_eq!(binary.size(), 5);
    }
}
