//! `SQLite` storage for keywords, content, and persisted match rows.
//!
//! This module provides:
//! - The connection wrapper and versioned migrations
//! - Repository functions over `&Connection`
//! - The [`crate::engine::MatchStore`] implementation the engine runs on

mod connection;
mod content;
mod keywords;
mod matches;
mod models;
mod schema;
mod store_impl;

pub use connection::Database;
pub use content::{
    comments_for_post, comments_window, count_comments, count_posts, posts_window,
    update_comment_text, upsert_comment, upsert_post,
};
pub use keywords::{
    delete_keyword, get_keyword, insert_keyword, list_keyword_sources, list_keywords,
};
pub use matches::{create_matches, delete_matches, existing_matches, existing_post_matches};
pub use models::{CommentRecord, KeywordRecord, PostRecord};
pub use schema::{migrate, verify_schema, SCHEMA_VERSION};

/// Initialize storage with migrations.
///
/// # Errors
///
/// Returns an error if database initialization fails.
pub fn init_storage(db: &Database) -> crate::Result<()> {
    db.with_conn(|conn| {
        schema::migrate(conn)?;
        schema::verify_schema(conn)?;

        tracing::info!("Storage initialized, schema version {SCHEMA_VERSION}");
        Ok(())
    })
}
