//! Database schema definitions and migrations.
//!
//! Provides versioned schema migrations for safe database upgrades.

use chrono::Utc;
use rusqlite::Connection;

use crate::error::StorageError;
use crate::Result;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if migrations fail.
pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )
    .map_err(|e| StorageError::Migration(format!("failed to create migrations table: {e}")))?;

    let current_version = get_current_version(conn)?;
    tracing::info!(
        current = current_version,
        target = SCHEMA_VERSION,
        "Checking database migrations"
    );

    if current_version < 1 {
        migrate_v1(conn)?;
    }

    // Add future migrations here:
    // if current_version < 2 {
    //     migrate_v2(conn)?;
    // }

    Ok(())
}

/// Get the current schema version.
fn get_current_version(conn: &Connection) -> Result<i32> {
    let result = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    );

    match result {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(StorageError::Migration(format!("failed to get version: {e}")).into()),
    }
}

/// Record a migration as applied.
fn record_migration(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT INTO schema_migrations (version, applied_at) VALUES (?, ?)",
        rusqlite::params![version, Utc::now().timestamp()],
    )
    .map_err(|e| StorageError::Migration(format!("failed to record migration: {e}")))?;

    Ok(())
}

/// Migration v1: Initial schema with all tables.
fn migrate_v1(conn: &Connection) -> Result<()> {
    tracing::info!("Applying migration v1: Initial schema");

    conn.execute_batch(
        r"
        -- User-managed keywords; read-only to the engine
        CREATE TABLE IF NOT EXISTS keywords (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            word TEXT NOT NULL,
            is_phrase INTEGER NOT NULL DEFAULT 0,
            category TEXT,
            created_at INTEGER NOT NULL
        );

        -- Posts discovered by the ingestion pipeline; ids are external
        CREATE TABLE IF NOT EXISTS posts (
            id INTEGER PRIMARY KEY,
            owner_id INTEGER NOT NULL,
            vk_post_id INTEGER NOT NULL,
            text TEXT,
            created_at INTEGER NOT NULL,
            UNIQUE(owner_id, vk_post_id)
        );

        -- Comments attached to posts via (owner_id, vk_post_id)
        CREATE TABLE IF NOT EXISTS comments (
            id INTEGER PRIMARY KEY,
            owner_id INTEGER NOT NULL,
            vk_post_id INTEGER NOT NULL,
            text TEXT,
            created_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_comments_post ON comments(owner_id, vk_post_id);

        -- Persisted match rows; deleted and recreated, never updated
        CREATE TABLE IF NOT EXISTS keyword_matches (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            comment_id INTEGER NOT NULL,
            keyword_id INTEGER NOT NULL,
            source TEXT NOT NULL CHECK (source IN ('COMMENT', 'POST')),
            created_at INTEGER NOT NULL,
            UNIQUE(comment_id, keyword_id, source)
        );

        CREATE INDEX IF NOT EXISTS idx_matches_comment_source
            ON keyword_matches(comment_id, source);
        CREATE INDEX IF NOT EXISTS idx_matches_keyword ON keyword_matches(keyword_id);
        ",
    )
    .map_err(|e| StorageError::Migration(format!("v1 migration failed: {e}")))?;

    record_migration(conn, 1)?;
    tracing::info!("Migration v1 complete");

    Ok(())
}

/// Verify all expected tables exist.
///
/// # Errors
///
/// Returns an error if any expected table is missing from the schema.
pub fn verify_schema(conn: &Connection) -> Result<()> {
    let tables = ["keywords", "posts", "comments", "keyword_matches"];

    for table in tables {
        let exists: bool = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type='table' AND name=?",
                [table],
                |_| Ok(true),
            )
            .unwrap_or(false);

        if !exists {
            return Err(StorageError::Migration(format!("table '{table}' not found")).into());
        }
    }

    tracing::debug!("Schema verification passed");
    Ok(())
}
