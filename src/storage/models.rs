//! Data models for storage operations.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Get current Unix timestamp.
pub(crate) fn now_unix() -> i64 {
    Utc::now().timestamp()
}

/// A user-managed keyword entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRecord {
    /// Database primary key; `None` before insertion.
    pub id: Option<i64>,

    /// Raw keyword text as entered.
    pub word: String,

    /// Phrase vs single token; drives the end-boundary rule.
    pub is_phrase: bool,

    /// Optional label; not used by matching.
    pub category: Option<String>,

    /// Unix timestamp when the keyword was created.
    pub created_at: i64,
}

impl KeywordRecord {
    /// Create a new keyword record.
    #[must_use]
    pub fn new(word: impl Into<String>, is_phrase: bool) -> Self {
        Self {
            id: None,
            word: word.into(),
            is_phrase,
            category: None,
            created_at: now_unix(),
        }
    }

    /// Set the category label.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// A post as the ingestion pipeline stores it. The id is externally
/// assigned; `(owner_id, vk_post_id)` is the network-side identity that
/// comments reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: i64,
    pub owner_id: i64,
    pub vk_post_id: i64,
    pub text: Option<String>,
    pub created_at: i64,
}

impl PostRecord {
    /// Create a new post record.
    #[must_use]
    pub fn new(id: i64, owner_id: i64, vk_post_id: i64, text: Option<String>) -> Self {
        Self {
            id,
            owner_id,
            vk_post_id,
            text,
            created_at: now_unix(),
        }
    }
}

/// A comment attached to a post via `(owner_id, vk_post_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: i64,
    pub owner_id: i64,
    pub vk_post_id: i64,
    pub text: Option<String>,
    pub created_at: i64,
}

impl CommentRecord {
    /// Create a new comment record.
    #[must_use]
    pub fn new(id: i64, owner_id: i64, vk_post_id: i64, text: Option<String>) -> Self {
        Self {
            id,
            owner_id,
            vk_post_id,
            text,
            created_at: now_unix(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_record_builder() {
        let kw = KeywordRecord::new("чёрный кот", true).with_category("animals");
        assert!(kw.id.is_none());
        assert!(kw.is_phrase);
        assert_eq!(kw.category.as_deref(), Some("animals"));
        assert!(kw.created_at > 0);
    }

    #[test]
    fn test_comment_record_new() {
        let c = CommentRecord::new(10, -200, 5, Some("привет".to_string()));
        assert_eq!(c.id, 10);
        assert_eq!(c.owner_id, -200);
        assert_eq!(c.vk_post_id, 5);
    }
}
