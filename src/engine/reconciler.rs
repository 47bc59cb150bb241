//! Full-corpus batch reconciliation of persisted match rows.
//!
//! Streams comments and then posts in fixed-size windows, recomputes each
//! unit's matched keyword set against a candidate list compiled once per
//! run, and applies minimal create/delete diffs. Strictly sequential:
//! windows in order, items in order, one diff-and-write per item. A
//! storage error aborts the run; everything already written stays
//! consistent and the run is safe to restart because it is idempotent.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::candidate::{compile_all, MatchCandidate};
use super::incremental::{apply_comment_diff, diff};
use super::matcher::matched_in_normalized;
use super::normalizer::normalize;
use super::store::{MatchSource, MatchStore, NewMatch};
use crate::config::DEFAULT_WINDOW_SIZE;
use crate::Result;

/// Counters accumulated across both reconciliation phases.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileStats {
    /// Content units visited (comments + posts, including skipped posts).
    pub processed: u64,
    /// Content units whose match rows changed.
    pub updated: u64,
    /// Match rows inserted.
    pub created: u64,
    /// Match rows deleted.
    pub deleted: u64,
}

/// Windowed two-phase reconciler over a [`MatchStore`].
pub struct Reconciler<'a, S: MatchStore> {
    store: &'a S,
    window_size: u64,
}

impl<'a, S: MatchStore> Reconciler<'a, S> {
    /// Create a reconciler with the reference window size.
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }

    /// Override the window size. Values below 1 are clamped to 1.
    #[must_use]
    pub fn with_window_size(mut self, window_size: u64) -> Self {
        self.window_size = window_size.max(1);
        self
    }

    /// Run a full reconciliation pass: comments first, then posts.
    ///
    /// Candidates are compiled once from the current keyword table and
    /// reused for every content unit.
    ///
    /// # Errors
    ///
    /// Returns the first storage error encountered; prior items remain
    /// correctly reconciled.
    pub fn run(&self) -> Result<ReconcileStats> {
        let keywords = self.store.keyword_candidates()?;
        let candidates = compile_all(&keywords);

        let mut stats = ReconcileStats::default();
        self.reconcile_comments(&candidates, &mut stats)?;
        self.reconcile_posts(&candidates, &mut stats)?;

        tracing::info!(
            processed = stats.processed,
            updated = stats.updated,
            created = stats.created,
            deleted = stats.deleted,
            "Reconciliation complete"
        );

        Ok(stats)
    }

    /// Phase one: each comment's own text against COMMENT-source rows.
    fn reconcile_comments(
        &self,
        candidates: &[MatchCandidate],
        stats: &mut ReconcileStats,
    ) -> Result<()> {
        let total = self.store.count_comments()?;
        tracing::debug!(total, window = self.window_size, "Reconciling comments");

        let mut offset = 0;
        while offset < total {
            let window = self.store.comments_window(offset, self.window_size)?;
            if window.is_empty() {
                break;
            }

            for comment in &window {
                stats.processed += 1;
                let normalized = normalize(comment.text.as_deref());

                if normalized.is_empty() {
                    // Cleared text must not leave stale matches behind.
                    let existing = self
                        .store
                        .existing_matches(comment.id, MatchSource::Comment)?;
                    if !existing.is_empty() {
                        let deleted =
                            self.store
                                .delete_matches(comment.id, MatchSource::Comment, None)?;
                        stats.deleted += deleted as u64;
                        stats.updated += 1;
                    }
                    continue;
                }

                let matched = matched_in_normalized(&normalized, candidates);
                let existing = self
                    .store
                    .existing_matches(comment.id, MatchSource::Comment)?;
                let item_diff = diff(&matched, &existing);

                if !item_diff.is_empty() {
                    apply_comment_diff(self.store, comment.id, &item_diff)?;
                    stats.created += item_diff.to_create.len() as u64;
                    stats.deleted += item_diff.to_delete.len() as u64;
                    stats.updated += 1;
                }
            }

            offset += window.len() as u64;
        }

        Ok(())
    }

    /// Phase two: each post's text fanned out over its attached comments
    /// as POST-source rows.
    fn reconcile_posts(
        &self,
        candidates: &[MatchCandidate],
        stats: &mut ReconcileStats,
    ) -> Result<()> {
        let total = self.store.count_posts()?;
        tracing::debug!(total, window = self.window_size, "Reconciling posts");

        let mut offset = 0;
        while offset < total {
            let window = self.store.posts_window(offset, self.window_size)?;
            if window.is_empty() {
                break;
            }

            for post in &window {
                stats.processed += 1;

                let normalized = normalize(post.text.as_deref());
                if normalized.is_empty() {
                    continue;
                }

                let matched = matched_in_normalized(&normalized, candidates);

                let comment_ids = self.store.comments_for_post(post.owner_id, post.vk_post_id)?;
                if comment_ids.is_empty() {
                    // A match cannot be recorded against zero rows.
                    continue;
                }

                let existing: BTreeSet<(i64, i64)> = self
                    .store
                    .existing_post_matches(&comment_ids)?
                    .into_iter()
                    .collect();

                let mut to_create = Vec::new();
                for &comment_id in &comment_ids {
                    for &keyword_id in &matched {
                        if !existing.contains(&(comment_id, keyword_id)) {
                            to_create.push(NewMatch {
                                comment_id,
                                keyword_id,
                                source: MatchSource::Post,
                            });
                        }
                    }
                }

                let mut stale: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
                for &(comment_id, keyword_id) in &existing {
                    if !matched.contains(&keyword_id) {
                        stale.entry(comment_id).or_default().push(keyword_id);
                    }
                }

                if to_create.is_empty() && stale.is_empty() {
                    continue;
                }

                for (comment_id, keyword_ids) in &stale {
                    let deleted = self.store.delete_matches(
                        *comment_id,
                        MatchSource::Post,
                        Some(keyword_ids),
                    )?;
                    stats.deleted += deleted as u64;
                }

                if !to_create.is_empty() {
                    let created = self.store.create_matches(&to_create)?;
                    stats.created += created as u64;
                }

                stats.updated += 1;
            }

            offset += window.len() as u64;
        }

        Ok(())
    }
}
