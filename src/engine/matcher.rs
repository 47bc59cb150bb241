//! Boundary-aware matching of normalized text against candidates.
//!
//! Boundaries are checked by inspecting the characters around each literal
//! occurrence instead of regex lookaround, which RE2-family engines lack.
//! Literal scanning also means keyword text can never be misread as
//! pattern syntax.

use std::collections::BTreeSet;

use super::candidate::{is_word_char, MatchCandidate};
use super::normalizer::normalize;

/// Test one candidate against already-normalized text.
///
/// Scans every occurrence of the candidate's normalized word; an
/// occurrence is rejected when a required boundary falls inside another
/// word. One accepted occurrence is enough: this is a predicate, not an
/// enumerator.
#[must_use]
pub fn matches(normalized_text: &str, candidate: &MatchCandidate) -> bool {
    if candidate.normalized.is_empty() {
        return false;
    }

    for (offset, occurrence) in normalized_text.match_indices(candidate.normalized.as_str()) {
        if candidate.needs_start_boundary {
            if let Some(prev) = normalized_text[..offset].chars().next_back() {
                if is_word_char(prev) {
                    continue;
                }
            }
        }

        if candidate.needs_end_boundary {
            if let Some(next) = normalized_text[offset + occurrence.len()..].chars().next() {
                if is_word_char(next) {
                    continue;
                }
            }
        }

        return true;
    }

    false
}

/// Compute the set of keyword ids whose candidates match the given raw
/// text. This is the single matching entry point shared by the write-time
/// path and the batch reconciler.
///
/// Empty normalized text matches nothing; no candidate is even tested.
#[must_use]
pub fn matched_keyword_ids(text: Option<&str>, candidates: &[MatchCandidate]) -> BTreeSet<i64> {
    let normalized = normalize(text);
    matched_in_normalized(&normalized, candidates)
}

/// Same as [`matched_keyword_ids`] for text the caller already normalized.
#[must_use]
pub fn matched_in_normalized(
    normalized_text: &str,
    candidates: &[MatchCandidate],
) -> BTreeSet<i64> {
    if normalized_text.is_empty() {
        return BTreeSet::new();
    }

    candidates
        .iter()
        .filter(|candidate| matches(normalized_text, candidate))
        .map(|candidate| candidate.keyword_id)
        .collect()
}
