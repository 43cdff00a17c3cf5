//! ResourceStorage implementation for SQLite.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use ldp_model::rdf::NamedNode;
use ldp_model::{Graph, InteractionModel, MembershipDescriptor, ResourcePath};
use rusqlite::{OptionalExtension, Row, Transaction, params};
use uuid::Uuid;

use crate::core::ResourceStorage;
use crate::error::{BackendError, ConcurrencyError, ResourceError, StorageError, StorageResult};
use crate::types::{BinaryContent, StoredResource};

use super::SqliteBackend;

const COLUMNS: &str = "path, interaction_model, uuid, graph, binary_content, binary_mime_type, \
     binary_digest, membership_resource, has_member_relation, inserted_content_relation, \
     version, created_at, created_by, last_modified, last_modified_by";

fn internal_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: "sqlite".to_string(),
        message,
        source: None,
    })
}

fn serialization_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::SerializationError { message })
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(value: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| serialization_error(format!("Failed to parse timestamp '{}': {}", value, e)))
}

fn parse_iri(value: String) -> StorageResult<NamedNode> {
    NamedNode::new(value)
        .map_err(|e| serialization_error(format!("Failed to parse stored IRI: {}", e)))
}

/// Escapes `LIKE` wildcards, using `\` as the escape character.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// A `resources` row before its columns are parsed.
struct ResourceRow {
    path: String,
    interaction_model: String,
    uuid: String,
    graph: String,
    binary_content: Option<Vec<u8>>,
    binary_mime_type: Option<String>,
    binary_digest: Option<String>,
    membership_resource: Option<String>,
    has_member_relation: Option<String>,
    inserted_content_relation: Option<String>,
    version: i64,
    created_at: String,
    created_by: String,
    last_modified: String,
    last_modified_by: String,
}

impl ResourceRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            path: row.get(0)?,
            interaction_model: row.get(1)?,
            uuid: row.get(2)?,
            graph: row.get(3)?,
            binary_content: row.get(4)?,
            binary_mime_type: row.get(5)?,
            binary_digest: row.get(6)?,
            membership_resource: row.get(7)?,
            has_member_relation: row.get(8)?,
            inserted_content_relation: row.get(9)?,
            version: row.get(10)?,
            created_at: row.get(11)?,
            created_by: row.get(12)?,
            last_modified: row.get(13)?,
            last_modified_by: row.get(14)?,
        })
    }

    fn into_resource(self) -> StorageResult<StoredResource> {
        let path = ResourcePath::parse(&self.path)
            .map_err(|e| serialization_error(format!("Failed to parse stored path: {}", e)))?;
        let interaction_model: InteractionModel = self
            .interaction_model
            .parse()
            .map_err(|e| serialization_error(format!("Failed to parse interaction model: {}", e)))?;
        let uuid = Uuid::parse_str(&self.uuid)
            .map_err(|e| serialization_error(format!("Failed to parse uuid: {}", e)))?;
        let graph = Graph::from_ntriples(&self.graph)
            .map_err(|e| serialization_error(format!("Failed to parse stored graph: {}", e)))?;

        let binary = match (self.binary_content, self.binary_mime_type, self.binary_digest) {
            (Some(data), Some(mime_type), Some(digest)) => {
                Some(BinaryContent::from_storage(data, mime_type, digest))
            }
            _ => None,
        };

        let membership = match (
            self.membership_resource,
            self.has_member_relation,
            self.inserted_content_relation,
        ) {
            (Some(mr), Some(hmr), Some(icr)) => Some(MembershipDescriptor::new(
                parse_iri(mr)?,
                parse_iri(hmr)?,
                parse_iri(icr)?,
            )),
            _ => None,
        };

        Ok(StoredResource::from_storage(
            path,
            interaction_model,
            uuid,
            graph,
            binary,
            membership,
            self.version as u64,
            parse_timestamp(&self.created_at)?,
            self.created_by,
            parse_timestamp(&self.last_modified)?,
            self.last_modified_by,
        ))
    }
}

/// Bumps a container's modification metadata after a child changed.
fn touch_parent(
    tx: &Transaction<'_>,
    parent: &ResourcePath,
    modified_by: &str,
    at: DateTime<Utc>,
) -> StorageResult<()> {
    tx.execute(
        "UPDATE resources SET version = version + 1, last_modified = ?1, last_modified_by = ?2
         WHERE path = ?3",
        params![format_timestamp(at), modified_by, parent.as_str()],
    )
    .map_err(|e| internal_error(format!("Failed to update parent: {}", e)))?;
    Ok(())
}

fn current_version(tx: &Transaction<'_>, path: &ResourcePath) -> StorageResult<Option<u64>> {
    tx.query_row(
        "SELECT version FROM resources WHERE path = ?1",
        params![path.as_str()],
        |row| row.get::<_, i64>(0),
    )
    .optional()
    .map(|v| v.map(|v| v as u64))
    .map_err(|e| internal_error(format!("Failed to read version: {}", e)))
}

#[async_trait]
impl ResourceStorage for SqliteBackend {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn read(&self, path: &ResourcePath) -> StorageResult<Option<StoredResource>> {
        let conn = self.get_connection()?;

        let row = conn
            .query_row(
                &format!("SELECT {} FROM resources WHERE path = ?1", COLUMNS),
                params![path.as_str()],
                ResourceRow::from_row,
            )
            .optional()
            .map_err(|e| internal_error(format!("Failed to read resource: {}", e)))?;

        row.map(ResourceRow::into_resource).transpose()
    }

    async fn exists(&self, path: &ResourcePath) -> StorageResult<bool> {
        let conn = self.get_connection()?;
        conn.query_row(
            "SELECT 1 FROM resources WHERE path = ?1",
            params![path.as_str()],
            |_| Ok(()),
        )
        .optional()
        .map(|found| found.is_some())
        .map_err(|e| internal_error(format!("Failed to check resource: {}", e)))
    }

    async fn children(&self, path: &ResourcePath) -> StorageResult<Vec<ResourcePath>> {
        let conn = self.get_connection()?;
        let mut stmt = conn
            .prepare("SELECT path FROM resources WHERE parent = ?1 ORDER BY path")
            .map_err(|e| internal_error(format!("Failed to prepare children query: {}", e)))?;

        let paths = stmt
            .query_map(params![path.as_str()], |row| row.get::<_, String>(0))
            .map_err(|e| internal_error(format!("Failed to query children: {}", e)))?;

        let mut children = Vec::new();
        for p in paths {
            let p = p.map_err(|e| internal_error(format!("Failed to read child: {}", e)))?;
            children.push(
                ResourcePath::parse(&p)
                    .map_err(|e| serialization_error(format!("Invalid stored path: {}", e)))?,
            );
        }
        Ok(children)
    }

    async fn insert(&self, resource: &StoredResource) -> StorageResult<()> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;
        let path = resource.path();

        if current_version(&tx, path)?.is_some() {
            return Err(ResourceError::AlreadyExists { path: path.clone() }.into());
        }

        let parent = resource.parent();
        if let Some(parent_path) = &parent {
            if current_version(&tx, parent_path)?.is_none() {
                return Err(ResourceError::ParentNotFound {
                    path: parent_path.clone(),
                }
                .into());
            }
        }

        let binary = resource.binary();
        let membership = resource.membership();
        tx.execute(
            &format!(
                "INSERT INTO resources (parent, {}) VALUES \
                 (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
                COLUMNS
            ),
            params![
                parent.as_ref().map(|p| p.as_str()),
                path.as_str(),
                resource.interaction_model().as_str(),
                resource.uuid().to_string(),
                resource.graph().to_ntriples(),
                binary.map(|b| b.data()),
                binary.map(|b| b.mime_type()),
                binary.map(|b| b.digest()),
                membership.map(|m| m.membership_resource().as_str()),
                membership.map(|m| m.has_member_relation().as_str()),
                membership.map(|m| m.inserted_content_relation().as_str()),
                resource.version() as i64,
                format_timestamp(resource.created_at()),
                resource.created_by(),
                format_timestamp(resource.last_modified()),
                resource.last_modified_by(),
            ],
        )
        .map_err(|e| internal_error(format!("Failed to insert resource: {}", e)))?;

        if let Some(parent_path) = &parent {
            touch_parent(&tx, parent_path, resource.created_by(), resource.created_at())?;
        }

        tx.commit()?;
        Ok(())
    }

    async fn replace(
        &self,
        resource: &StoredResource,
        expected_version: u64,
    ) -> StorageResult<()> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;
        let path = resource.path();

        let actual = current_version(&tx, path)?.ok_or_else(|| StorageError::not_found(path))?;
        if actual != expected_version {
            return Err(ConcurrencyError::VersionConflict {
                path: path.clone(),
                expected: expected_version,
                actual,
            }
            .into());
        }

        let binary = resource.binary();
        let membership = resource.membership();
        tx.execute(
            "UPDATE resources SET graph = ?1, binary_content = ?2, binary_mime_type = ?3,
                 binary_digest = ?4, membership_resource = ?5, has_member_relation = ?6,
                 inserted_content_relation = ?7, version = ?8, last_modified = ?9,
                 last_modified_by = ?10
             WHERE path = ?11",
            params![
                resource.graph().to_ntriples(),
                binary.map(|b| b.data()),
                binary.map(|b| b.mime_type()),
                binary.map(|b| b.digest()),
                membership.map(|m| m.membership_resource().as_str()),
                membership.map(|m| m.has_member_relation().as_str()),
                membership.map(|m| m.inserted_content_relation().as_str()),
                resource.version() as i64,
                format_timestamp(resource.last_modified()),
                resource.last_modified_by(),
                path.as_str(),
            ],
        )
        .map_err(|e| internal_error(format!("Failed to update resource: {}", e)))?;

        tx.commit()?;
        Ok(())
    }

    async fn delete_tree(
        &self,
        path: &ResourcePath,
        modified_by: &str,
        at: DateTime<Utc>,
    ) -> StorageResult<u64> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;

        if current_version(&tx, path)?.is_none() {
            return Err(StorageError::not_found(path));
        }

        let prefix = if path.is_root() {
            String::new()
        } else {
            format!("{}/", path.as_str())
        };
        let removed = tx
            .execute(
                "DELETE FROM resources WHERE path = ?1 OR path LIKE ?2 ESCAPE '\\'",
                params![path.as_str(), format!("{}%", escape_like(&prefix))],
            )
            .map_err(|e| internal_error(format!("Failed to delete resources: {}", e)))?;

        if let Some(parent) = path.parent() {
            touch_parent(&tx, &parent, modified_by, at)?;
        }

        tx.commit()?;
        Ok(removed as u64)
    }

    async fn find_by_membership_resource(&self, iri: &str) -> StorageResult<Vec<StoredResource>> {
        let conn = self.get_connection()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM resources WHERE membership_resource = ?1 ORDER BY path",
                COLUMNS
            ))
            .map_err(|e| internal_error(format!("Failed to prepare membership query: {}", e)))?;

        let rows = stmt
            .query_map(params![iri], ResourceRow::from_row)
            .map_err(|e| internal_error(format!("Failed to query containers: {}", e)))?;

        let mut containers = Vec::new();
        for row in rows {
            let row = row.map_err(|e| internal_error(format!("Failed to read row: {}", e)))?;
            containers.push(row.into_resource()?);
        }
        Ok(containers)
    }

    async fn count(&self) -> StorageResult<u64> {
        let conn = self.get_connection()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM resources", [], |row| row.get(0))
            .map_err(|e| internal_error(format!("Failed to count resources: {}", e)))?;
        Ok(count as u64)
    }
}
