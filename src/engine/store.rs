//! Persistence seam consumed by the match engine.
//!
//! The engine never talks to a database directly; it goes through
//! [`MatchStore`], which the `storage` module implements over `SQLite`.
//! Tests may substitute any other implementation.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Where a persisted match came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchSource {
    /// The comment's own text matched the keyword.
    Comment,
    /// The parent post's text matched; the match is recorded against every
    /// comment attached to that post.
    Post,
}

impl MatchSource {
    /// Storage tag for this source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Comment => "COMMENT",
            Self::Post => "POST",
        }
    }
}

/// Keyword row as the candidate compiler consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordSource {
    pub id: i64,
    pub word: String,
    pub is_phrase: bool,
}

/// Comment row slice read during the comment phase.
#[derive(Debug, Clone)]
pub struct CommentText {
    pub id: i64,
    pub text: Option<String>,
}

/// Post row slice read during the post phase.
#[derive(Debug, Clone)]
pub struct PostText {
    pub id: i64,
    pub owner_id: i64,
    pub vk_post_id: i64,
    pub text: Option<String>,
}

/// A match row to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMatch {
    pub comment_id: i64,
    pub keyword_id: i64,
    pub source: MatchSource,
}

/// Operations the engine requires from the persistence layer.
///
/// Windows must use a stable ordering so that sequential pagination
/// visits every row exactly once.
pub trait MatchStore {
    /// All keywords, in the shape the candidate compiler consumes.
    fn keyword_candidates(&self) -> Result<Vec<KeywordSource>>;

    /// Total number of comments.
    fn count_comments(&self) -> Result<u64>;

    /// Total number of posts.
    fn count_posts(&self) -> Result<u64>;

    /// One window of comments in stable order.
    fn comments_window(&self, offset: u64, limit: u64) -> Result<Vec<CommentText>>;

    /// One window of posts in stable order.
    fn posts_window(&self, offset: u64, limit: u64) -> Result<Vec<PostText>>;

    /// Ids of the comments currently attached to a post.
    fn comments_for_post(&self, owner_id: i64, vk_post_id: i64) -> Result<Vec<i64>>;

    /// Keyword ids of the persisted matches for one comment and source.
    fn existing_matches(&self, comment_id: i64, source: MatchSource) -> Result<Vec<i64>>;

    /// Persisted `(comment_id, keyword_id)` POST-source pairs for a set of
    /// comments.
    fn existing_post_matches(&self, comment_ids: &[i64]) -> Result<Vec<(i64, i64)>>;

    /// Delete matches for one comment and source; all of them, or only the
    /// given keyword ids when supplied. Returns the number deleted.
    fn delete_matches(
        &self,
        comment_id: i64,
        source: MatchSource,
        keyword_ids: Option<&[i64]>,
    ) -> Result<usize>;

    /// Insert match rows. Returns the number inserted.
    fn create_matches(&self, rows: &[NewMatch]) -> Result<usize>;
}
