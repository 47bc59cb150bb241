//! Write-time match synchronization for a single content unit.
//!
//! The ingestion pipeline calls [`sync_comment_matches`] whenever a
//! comment is created or its text changes. The batch reconciler applies
//! the same [`diff`] rule per item, so the two call paths cannot drift
//! apart.

use std::collections::BTreeSet;

use super::candidate::MatchCandidate;
use super::matcher::matched_keyword_ids;
use super::store::{MatchSource, MatchStore, NewMatch};
use crate::Result;

/// Minimal create/delete sets for one `(comment, source)` pair.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MatchDiff {
    pub to_create: Vec<i64>,
    pub to_delete: Vec<i64>,
}

impl MatchDiff {
    /// True when nothing needs to change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_delete.is_empty()
    }
}

/// Diff a freshly matched keyword set against persisted keyword ids.
///
/// Keywords present on both sides are untouched; rows are never
/// rewritten in place.
#[must_use]
pub fn diff(matched: &BTreeSet<i64>, existing: &[i64]) -> MatchDiff {
    let existing: BTreeSet<i64> = existing.iter().copied().collect();

    MatchDiff {
        to_create: matched.difference(&existing).copied().collect(),
        to_delete: existing.difference(matched).copied().collect(),
    }
}

/// Reconcile the COMMENT-source rows of one comment against its current
/// text.
///
/// Empty normalized text clears every existing COMMENT-source row for the
/// comment. Returns the applied diff.
///
/// # Errors
///
/// Returns an error if a storage operation fails; rows already written
/// stay consistent (deletes precede creates).
pub fn sync_comment_matches<S: MatchStore>(
    store: &S,
    comment_id: i64,
    text: Option<&str>,
    candidates: &[MatchCandidate],
) -> Result<MatchDiff> {
    let matched = matched_keyword_ids(text, candidates);
    let existing = store.existing_matches(comment_id, MatchSource::Comment)?;
    let diff = diff(&matched, &existing);

    apply_comment_diff(store, comment_id, &diff)?;

    if !diff.is_empty() {
        tracing::debug!(
            comment_id,
            created = diff.to_create.len(),
            deleted = diff.to_delete.len(),
            "Synced comment matches"
        );
    }

    Ok(diff)
}

/// Apply a COMMENT-source diff: delete stale rows, then insert new ones.
pub(crate) fn apply_comment_diff<S: MatchStore>(
    store: &S,
    comment_id: i64,
    diff: &MatchDiff,
) -> Result<()> {
    if !diff.to_delete.is_empty() {
        store.delete_matches(comment_id, MatchSource::Comment, Some(&diff.to_delete))?;
    }

    if !diff.to_create.is_empty() {
        let rows: Vec<NewMatch> = diff
            .to_create
            .iter()
            .map(|&keyword_id| NewMatch {
                comment_id,
                keyword_id,
                source: MatchSource::Comment,
            })
            .collect();
        store.create_matches(&rows)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_minimality() {
        let matched: BTreeSet<i64> = [2, 3, 4].into_iter().collect();
        let existing = vec![1, 2, 3];

        let d = diff(&matched, &existing);
        assert_eq!(d.to_create, vec![4]);
        assert_eq!(d.to_delete, vec![1]);
    }

    #[test]
    fn test_diff_no_change() {
        let matched: BTreeSet<i64> = [1, 2].into_iter().collect();
        let d = diff(&matched, &[1, 2]);
        assert!(d.is_empty());
    }

    #[test]
    fn test_diff_all_new() {
        let matched: BTreeSet<i64> = [5, 6].into_iter().collect();
        let d = diff(&matched, &[]);
        assert_eq!(d.to_create, vec![5, 6]);
        assert!(d.to_delete.is_empty());
    }

    #[test]
    fn test_diff_all_stale() {
        let matched = BTreeSet::new();
        let d = diff(&matched, &[7, 8]);
        assert!(d.to_create.is_empty());
        assert_eq!(d.to_delete, vec![7, 8]);
    }
}
