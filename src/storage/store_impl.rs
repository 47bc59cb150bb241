//! [`MatchStore`] implementation over [`Database`].
//!
//! Reads go through `with_conn`; the per-item delete/create writes each
//! run in their own immediate transaction, which is exactly the unit of
//! work the reconciler expects on a crash.

use super::connection::Database;
use super::{content, keywords, matches};
use crate::engine::{CommentText, KeywordSource, MatchSource, MatchStore, NewMatch, PostText};
use crate::Result;

impl MatchStore for Database {
    fn keyword_candidates(&self) -> Result<Vec<KeywordSource>> {
        self.with_conn(keywords::list_keyword_sources)
    }

    fn count_comments(&self) -> Result<u64> {
        self.with_conn(content::count_comments)
    }

    fn count_posts(&self) -> Result<u64> {
        self.with_conn(content::count_posts)
    }

    fn comments_window(&self, offset: u64, limit: u64) -> Result<Vec<CommentText>> {
        self.with_conn(|conn| content::comments_window(conn, offset, limit))
    }

    fn posts_window(&self, offset: u64, limit: u64) -> Result<Vec<PostText>> {
        self.with_conn(|conn| content::posts_window(conn, offset, limit))
    }

    fn comments_for_post(&self, owner_id: i64, vk_post_id: i64) -> Result<Vec<i64>> {
        self.with_conn(|conn| content::comments_for_post(conn, owner_id, vk_post_id))
    }

    fn existing_matches(&self, comment_id: i64, source: MatchSource) -> Result<Vec<i64>> {
        self.with_conn(|conn| matches::existing_matches(conn, comment_id, source))
    }

    fn existing_post_matches(&self, comment_ids: &[i64]) -> Result<Vec<(i64, i64)>> {
        self.with_conn(|conn| matches::existing_post_matches(conn, comment_ids))
    }

    fn delete_matches(
        &self,
        comment_id: i64,
        source: MatchSource,
        keyword_ids: Option<&[i64]>,
    ) -> Result<usize> {
        self.with_transaction(|conn| matches::delete_matches(conn, comment_id, source, keyword_ids))
    }

    fn create_matches(&self, rows: &[NewMatch]) -> Result<usize> {
        self.with_transaction(|conn| matches::create_matches(conn, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{init_storage, CommentRecord, KeywordRecord};

    #[test]
    fn test_trait_round_trip() {
        let db = Database::open_in_memory().unwrap();
        init_storage(&db).unwrap();

        db.with_conn(|conn| {
            keywords::insert_keyword(conn, &KeywordRecord::new("кот", false))?;
            content::upsert_comment(conn, &CommentRecord::new(1, -1, 5, Some("кот".into())))?;
            Ok(())
        })
        .unwrap();

        let store: &dyn MatchStore = &db;
        assert_eq!(store.count_comments().unwrap(), 1);
        assert_eq!(store.count_posts().unwrap(), 0);
        assert_eq!(store.keyword_candidates().unwrap().len(), 1);

        store
            .create_matches(&[NewMatch {
                comment_id: 1,
                keyword_id: 1,
                source: MatchSource::Comment,
            }])
            .unwrap();
        assert_eq!(
            store.existing_matches(1, MatchSource::Comment).unwrap(),
            vec![1]
        );

        let deleted = store.delete_matches(1, MatchSource::Comment, None).unwrap();
        assert_eq!(deleted, 1);
    }
}
