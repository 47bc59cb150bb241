//! Keyword storage operations.
//!
//! Keywords are user-managed; the engine only reads them through
//! [`list_keyword_sources`] when compiling candidates for a pass.

use rusqlite::{params, Connection};

use super::models::KeywordRecord;
use crate::engine::KeywordSource;
use crate::error::StorageError;
use crate::Result;

/// Insert a keyword. Returns the assigned id.
///
/// # Errors
///
/// Returns an error if the insertion fails.
pub fn insert_keyword(conn: &Connection, keyword: &KeywordRecord) -> Result<i64> {
    conn.execute(
        "INSERT INTO keywords (word, is_phrase, category, created_at) VALUES (?, ?, ?, ?)",
        params![
            keyword.word,
            keyword.is_phrase,
            keyword.category,
            keyword.created_at,
        ],
    )
    .map_err(|e| StorageError::Database(format!("failed to insert keyword: {e}")))?;

    let id = conn.last_insert_rowid();
    tracing::debug!(id, word = %keyword.word, "Inserted keyword");
    Ok(id)
}

/// Get a keyword by id.
///
/// # Errors
///
/// Returns an error if the keyword is not found or the query fails.
pub fn get_keyword(conn: &Connection, id: i64) -> Result<KeywordRecord> {
    conn.query_row(
        "SELECT id, word, is_phrase, category, created_at FROM keywords WHERE id = ?",
        [id],
        |row| {
            Ok(KeywordRecord {
                id: Some(row.get(0)?),
                word: row.get(1)?,
                is_phrase: row.get(2)?,
                category: row.get(3)?,
                created_at: row.get(4)?,
            })
        },
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => {
            StorageError::not_found("keyword", id.to_string()).into()
        }
        e => StorageError::Database(format!("failed to get keyword: {e}")).into(),
    })
}

/// List all keywords, newest last.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_keywords(conn: &Connection) -> Result<Vec<KeywordRecord>> {
    let mut stmt = conn
        .prepare("SELECT id, word, is_phrase, category, created_at FROM keywords ORDER BY id")
        .map_err(|e| StorageError::Database(format!("failed to prepare query: {e}")))?;

    let keywords = stmt
        .query_map([], |row| {
            Ok(KeywordRecord {
                id: Some(row.get(0)?),
                word: row.get(1)?,
                is_phrase: row.get(2)?,
                category: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .map_err(|e| StorageError::Database(format!("failed to list keywords: {e}")))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| StorageError::Database(format!("failed to read keyword row: {e}")))?;

    Ok(keywords)
}

/// List keywords in the shape the candidate compiler consumes.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_keyword_sources(conn: &Connection) -> Result<Vec<KeywordSource>> {
    let mut stmt = conn
        .prepare("SELECT id, word, is_phrase FROM keywords ORDER BY id")
        .map_err(|e| StorageError::Database(format!("failed to prepare query: {e}")))?;

    let keywords = stmt
        .query_map([], |row| {
            Ok(KeywordSource {
                id: row.get(0)?,
                word: row.get(1)?,
                is_phrase: row.get(2)?,
            })
        })
        .map_err(|e| StorageError::Database(format!("failed to list keyword sources: {e}")))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| StorageError::Database(format!("failed to read keyword row: {e}")))?;

    Ok(keywords)
}

/// Delete a keyword. Returns true if a row was removed.
///
/// # Errors
///
/// Returns an error if the deletion fails.
pub fn delete_keyword(conn: &Connection, id: i64) -> Result<bool> {
    let affected = conn
        .execute("DELETE FROM keywords WHERE id = ?", [id])
        .map_err(|e| StorageError::Database(format!("failed to delete keyword: {e}")))?;

    if affected > 0 {
        tracing::debug!(id, "Deleted keyword");
    }
    Ok(affected > 0)
}
