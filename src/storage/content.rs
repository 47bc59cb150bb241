//! Post and comment storage operations.
//!
//! Content rows are owned by the ingestion pipeline; the engine reads
//! them through counts, stable-ordered windows, and the comments-for-post
//! lookup.

use rusqlite::{params, Connection};

use super::models::{CommentRecord, PostRecord};
use crate::engine::{CommentText, PostText};
use crate::error::StorageError;
use crate::Result;

/// Insert or replace a post (ids are externally assigned).
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn upsert_post(conn: &Connection, post: &PostRecord) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO posts (id, owner_id, vk_post_id, text, created_at)
         VALUES (?, ?, ?, ?, ?)",
        params![
            post.id,
            post.owner_id,
            post.vk_post_id,
            post.text,
            post.created_at,
        ],
    )
    .map_err(|e| StorageError::Database(format!("failed to upsert post: {e}")))?;

    tracing::trace!(id = post.id, "Upserted post");
    Ok(())
}

/// Insert or replace a comment (ids are externally assigned).
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn upsert_comment(conn: &Connection, comment: &CommentRecord) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO comments (id, owner_id, vk_post_id, text, created_at)
         VALUES (?, ?, ?, ?, ?)",
        params![
            comment.id,
            comment.owner_id,
            comment.vk_post_id,
            comment.text,
            comment.created_at,
        ],
    )
    .map_err(|e| StorageError::Database(format!("failed to upsert comment: {e}")))?;

    tracing::trace!(id = comment.id, "Upserted comment");
    Ok(())
}

/// Set a comment's text without touching its other columns.
///
/// # Errors
///
/// Returns an error if the write fails or the comment does not exist.
pub fn update_comment_text(conn: &Connection, id: i64, text: Option<&str>) -> Result<()> {
    let affected = conn
        .execute("UPDATE comments SET text = ? WHERE id = ?", params![text, id])
        .map_err(|e| StorageError::Database(format!("failed to update comment text: {e}")))?;

    if affected == 0 {
        return Err(StorageError::not_found("comment", id.to_string()).into());
    }
    Ok(())
}

/// Total number of comments.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_comments(conn: &Connection) -> Result<u64> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM comments", [], |row| row.get(0))
        .map_err(|e| StorageError::Database(format!("failed to count comments: {e}")))?;
    Ok(u64::try_from(count).unwrap_or(0))
}

/// Total number of posts.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_posts(conn: &Connection) -> Result<u64> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))
        .map_err(|e| StorageError::Database(format!("failed to count posts: {e}")))?;
    Ok(u64::try_from(count).unwrap_or(0))
}

/// One window of comments, ordered by id for stable pagination.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn comments_window(conn: &Connection, offset: u64, limit: u64) -> Result<Vec<CommentText>> {
    let mut stmt = conn
        .prepare("SELECT id, text FROM comments ORDER BY id LIMIT ? OFFSET ?")
        .map_err(|e| StorageError::Database(format!("failed to prepare query: {e}")))?;

    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let offset = i64::try_from(offset).unwrap_or(i64::MAX);
    let rows = stmt
        .query_map(params![limit, offset], |row| {
            Ok(CommentText {
                id: row.get(0)?,
                text: row.get(1)?,
            })
        })
        .map_err(|e| StorageError::Database(format!("failed to read comments window: {e}")))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| StorageError::Database(format!("failed to read comment row: {e}")))?;

    Ok(rows)
}

/// One window of posts, ordered by id for stable pagination.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn posts_window(conn: &Connection, offset: u64, limit: u64) -> Result<Vec<PostText>> {
    let mut stmt = conn
        .prepare("SELECT id, owner_id, vk_post_id, text FROM posts ORDER BY id LIMIT ? OFFSET ?")
        .map_err(|e| StorageError::Database(format!("failed to prepare query: {e}")))?;

    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let offset = i64::try_from(offset).unwrap_or(i64::MAX);
    let rows = stmt
        .query_map(params![limit, offset], |row| {
            Ok(PostText {
                id: row.get(0)?,
                owner_id: row.get(1)?,
                vk_post_id: row.get(2)?,
                text: row.get(3)?,
            })
        })
        .map_err(|e| StorageError::Database(format!("failed to read posts window: {e}")))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| StorageError::Database(format!("failed to read post row: {e}")))?;

    Ok(rows)
}

/// Ids of comments currently attached to a post.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn comments_for_post(conn: &Connection, owner_id: i64, vk_post_id: i64) -> Result<Vec<i64>> {
    let mut stmt = conn
        .prepare("SELECT id FROM comments WHERE owner_id = ? AND vk_post_id = ? ORDER BY id")
        .map_err(|e| StorageError::Database(format!("failed to prepare query: {e}")))?;

    let ids = stmt
        .query_map(params![owner_id, vk_post_id], |row| row.get(0))
        .map_err(|e| StorageError::Database(format!("failed to read post comments: {e}")))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| StorageError::Database(format!("failed to read comment id: {e}")))?;

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{migrate, Database};

    fn setup() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(migrate).unwrap();
        db
    }

    #[test]
    fn test_counts_and_windows() {
        let db = setup();
        db.with_conn(|conn| {
            for i in 1..=5 {
                upsert_comment(
                    conn,
                    &CommentRecord::new(i, -1, 1, Some(format!("текст {i}"))),
                )?;
            }
            upsert_post(conn, &PostRecord::new(1, -1, 1, Some("пост".to_string())))?;

            assert_eq!(count_comments(conn)?, 5);
            assert_eq!(count_posts(conn)?, 1);

            let window = comments_window(conn, 0, 2)?;
            assert_eq!(window.len(), 2);
            assert_eq!(window[0].id, 1);

            let window = comments_window(conn, 4, 2)?;
            assert_eq!(window.len(), 1);
            assert_eq!(window[0].id, 5);

            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_window_ordering_is_stable() {
        let db = setup();
        db.with_conn(|conn| {
            // Insert out of order; windows must still walk ids ascending.
            for id in [30, 10, 20] {
                upsert_comment(conn, &CommentRecord::new(id, -1, 1, None))?;
            }

            let first = comments_window(conn, 0, 2)?;
            let second = comments_window(conn, 2, 2)?;
            let ids: Vec<i64> = first.iter().chain(second.iter()).map(|c| c.id).collect();
            assert_eq!(ids, vec![10, 20, 30]);

            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_comments_for_post() {
        let db = setup();
        db.with_conn(|conn| {
            upsert_comment(conn, &CommentRecord::new(1, -1, 7, None))?;
            upsert_comment(conn, &CommentRecord::new(2, -1, 7, None))?;
            upsert_comment(conn, &CommentRecord::new(3, -1, 8, None))?;
            upsert_comment(conn, &CommentRecord::new(4, -2, 7, None))?;

            assert_eq!(comments_for_post(conn, -1, 7)?, vec![1, 2]);
            assert_eq!(comments_for_post(conn, -1, 8)?, vec![3]);
            assert!(comments_for_post(conn, -9, 9)?.is_empty());

            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_upsert_replaces_text() {
        let db = setup();
        db.with_conn(|conn| {
            upsert_comment(conn, &CommentRecord::new(1, -1, 1, Some("старый".into())))?;
            upsert_comment(conn, &CommentRecord::new(1, -1, 1, Some("новый".into())))?;

            let window = comments_window(conn, 0, 10)?;
            assert_eq!(window.len(), 1);
            assert_eq!(window[0].text.as_deref(), Some("новый"));

            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_update_comment_text() {
        let db = setup();
        db.with_conn(|conn| {
            upsert_comment(conn, &CommentRecord::new(1, -1, 1, Some("текст".into())))?;
            update_comment_text(conn, 1, None)?;

            let window = comments_window(conn, 0, 10)?;
            assert!(window[0].text.is_none());

            let err = update_comment_text(conn, 99, Some("x")).unwrap_err();
            assert!(err.to_string().contains("not found"));

            Ok(())
        })
        .unwrap();
    }
}
