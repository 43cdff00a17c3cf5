//! SQLite schema definitions and migrations.

use rusqlite::Connection;

use crate::error::{BackendError, StorageError, StorageResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema.
pub fn initialize_schema(conn: &Connection) -> StorageResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        create_schema_v1(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version != SCHEMA_VERSION {
        migrate_schema(conn, current_version)?;
    }

    Ok(())
}

fn internal(context: &str, e: rusqlite::Error) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: "sqlite".to_string(),
        message: format!("{}: {}", context, e),
        source: None,
    })
}

/// Get the current schema version.
pub(crate) fn get_schema_version(conn: &Connection) -> StorageResult<i32> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER NOT NULL
        )",
        [],
    )
    .map_err(|e| internal("Failed to create schema_version table", e))?;

    let version: Option<i32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .ok();

    Ok(version.unwrap_or(0))
}

/// Set the schema version.
fn set_schema_version(conn: &Connection, version: i32) -> StorageResult<()> {
    conn.execute("DELETE FROM schema_version", [])
        .map_err(|e| internal("Failed to clear schema_version", e))?;

    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])
        .map_err(|e| internal("Failed to set schema_version", e))?;

    Ok(())
}

/// Create the initial schema (version 1).
///
/// One row per resource. The client graph is stored as sorted N-Triples;
/// membership descriptor columns are only set for Direct and Indirect
/// containers.
fn create_schema_v1(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS resources (
            path TEXT PRIMARY KEY NOT NULL,
            parent TEXT,
            interaction_model TEXT NOT NULL,
            uuid TEXT NOT NULL,
            graph TEXT NOT NULL,
            binary_content BLOB,
            binary_mime_type TEXT,
            binary_digest TEXT,
            membership_resource TEXT,
            has_member_relation TEXT,
            inserted_content_relation TEXT,
            version INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            created_by TEXT NOT NULL,
            last_modified TEXT NOT NULL,
            last_modified_by TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_resources_parent ON resources(parent);
        CREATE INDEX IF NOT EXISTS idx_resources_membership
            ON resources(membership_resource)
            WHERE membership_resource IS NOT NULL;",
    )
    .map_err(|e| internal("Failed to create resources table", e))?;

    Ok(())
}

/// Run migrations from `from_version` to [`SCHEMA_VERSION`].
fn migrate_schema(_conn: &Connection, from_version: i32) -> StorageResult<()> {
    // No migrations exist yet; any other version was written by a newer build.
    Err(StorageError::Backend(BackendError::MigrationError {
        message: format!(
            "database schema version {} is not supported (expected {})",
            from_version, SCHEMA_VERSION
        ),
    }))
}

/// Drop all tables (for testing).
#[cfg(test)]
pub fn drop_all_tables(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        "DROP TABLE IF EXISTS resources;
         DROP TABLE IF EXISTS schema_version;",
    )
    .map_err(|e| internal("Failed to drop tables", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_initialization() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='resources'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_schema_version() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        initialize_schema(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        set_schema_version(&conn, SCHEMA_VERSION + 1).unwrap();
        assert!(matches!(
            initialize_schema(&conn),
            Err(StorageError::Backend(BackendError::MigrationError { .. }))
        ));
    }

    #[test]
    fn test_drop_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        drop_all_tables(&conn).unwrap();
        initialize_schema(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }
}
