//! Persisted match row operations.
//!
//! Match rows mirror the engine's computed match sets exactly. They are
//! only ever deleted and inserted; nothing updates a row in place.

use rusqlite::{params, params_from_iter, Connection};

use super::models::now_unix;
use crate::engine::{MatchSource, NewMatch};
use crate::error::StorageError;
use crate::Result;

/// Keyword ids of the persisted matches for one comment and source.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn existing_matches(
    conn: &Connection,
    comment_id: i64,
    source: MatchSource,
) -> Result<Vec<i64>> {
    let mut stmt = conn
        .prepare(
            "SELECT keyword_id FROM keyword_matches
             WHERE comment_id = ? AND source = ?
             ORDER BY keyword_id",
        )
        .map_err(|e| StorageError::Database(format!("failed to prepare query: {e}")))?;

    let ids = stmt
        .query_map(params![comment_id, source.as_str()], |row| row.get(0))
        .map_err(|e| StorageError::Database(format!("failed to read matches: {e}")))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| StorageError::Database(format!("failed to read match row: {e}")))?;

    Ok(ids)
}

/// Persisted POST-source `(comment_id, keyword_id)` pairs for a set of
/// comments.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn existing_post_matches(conn: &Connection, comment_ids: &[i64]) -> Result<Vec<(i64, i64)>> {
    if comment_ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; comment_ids.len()].join(", ");
    let sql = format!(
        "SELECT comment_id, keyword_id FROM keyword_matches
         WHERE source = 'POST' AND comment_id IN ({placeholders})
         ORDER BY comment_id, keyword_id"
    );

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| StorageError::Database(format!("failed to prepare query: {e}")))?;

    let pairs = stmt
        .query_map(params_from_iter(comment_ids.iter()), |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .map_err(|e| StorageError::Database(format!("failed to read post matches: {e}")))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| StorageError::Database(format!("failed to read match pair: {e}")))?;

    Ok(pairs)
}

/// Delete matches for one comment and source.
///
/// With `keyword_ids` supplied, only those keywords' rows go; otherwise
/// every row for the `(comment, source)` pair goes. Returns the number
/// deleted.
///
/// # Errors
///
/// Returns an error if the deletion fails.
pub fn delete_matches(
    conn: &Connection,
    comment_id: i64,
    source: MatchSource,
    keyword_ids: Option<&[i64]>,
) -> Result<usize> {
    let deleted = match keyword_ids {
        None => conn
            .execute(
                "DELETE FROM keyword_matches WHERE comment_id = ? AND source = ?",
                params![comment_id, source.as_str()],
            )
            .map_err(|e| StorageError::Database(format!("failed to delete matches: {e}")))?,
        Some([]) => 0,
        Some(ids) => {
            let placeholders = vec!["?"; ids.len()].join(", ");
            let sql = format!(
                "DELETE FROM keyword_matches
                 WHERE comment_id = ? AND source = ? AND keyword_id IN ({placeholders})"
            );

            let mut values: Vec<rusqlite::types::Value> = Vec::with_capacity(ids.len() + 2);
            values.push(comment_id.into());
            values.push(source.as_str().to_string().into());
            values.extend(ids.iter().map(|&id| rusqlite::types::Value::from(id)));

            conn.execute(&sql, params_from_iter(values))
                .map_err(|e| StorageError::Database(format!("failed to delete matches: {e}")))?
        }
    };

    if deleted > 0 {
        tracing::trace!(comment_id, source = source.as_str(), deleted, "Deleted matches");
    }
    Ok(deleted)
}

/// Insert match rows. Returns the number inserted.
///
/// # Errors
///
/// Returns an error if any insertion fails.
pub fn create_matches(conn: &Connection, rows: &[NewMatch]) -> Result<usize> {
    let now = now_unix();
    let mut inserted = 0;

    for row in rows {
        inserted += conn
            .execute(
                "INSERT OR IGNORE INTO keyword_matches
                 (comment_id, keyword_id, source, created_at)
                 VALUES (?, ?, ?, ?)",
                params![row.comment_id, row.keyword_id, row.source.as_str(), now],
            )
            .map_err(|e| StorageError::Database(format!("failed to insert match: {e}")))?;
    }

    if inserted > 0 {
        tracing::trace!(inserted, "Created matches");
    }
    Ok(inserted)
}
