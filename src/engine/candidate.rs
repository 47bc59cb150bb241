//! Compilation of keyword rows into matchable candidates.

use super::normalizer::normalize;
use super::store::KeywordSource;

/// Character class that counts as "inside a word" for boundary checks:
/// ASCII letters and digits, underscore, and the Cyrillic block.
#[must_use]
pub const fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || matches!(c, '\u{0400}'..='\u{04ff}')
}

/// The matchable, normalized projection of a keyword for one matching pass.
///
/// Candidates are never persisted; they are recompiled from the keyword
/// table at the start of every pass so keyword edits take effect
/// immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCandidate {
    /// Id of the keyword this candidate was compiled from.
    pub keyword_id: i64,

    /// Keyword text after normalization; never empty.
    pub normalized: String,

    /// Whether the keyword is a phrase rather than a single token.
    pub is_phrase: bool,

    /// The character before an occurrence must not be a word character.
    pub needs_start_boundary: bool,

    /// The character after an occurrence must not be a word character.
    pub needs_end_boundary: bool,
}

/// Compile one keyword into a candidate.
///
/// Returns `None` when the keyword normalizes to the empty string (pure
/// punctuation/whitespace keywords contribute nothing this pass).
///
/// Boundary flags are computed once here and reused for every content
/// test. A non-phrase candidate never requires an end boundary: a single
/// root like "кот" is meant to tolerate Russian case and number suffixes
/// ("кота", "котом") without enumerating inflected forms. The flip side is
/// that it also matches any longer word sharing the prefix ("который");
/// that asymmetry is intentional.
#[must_use]
pub fn compile(keyword: &KeywordSource) -> Option<MatchCandidate> {
    let normalized = normalize(Some(&keyword.word));
    if normalized.is_empty() {
        return None;
    }

    let first = normalized.chars().next()?;
    let last = normalized.chars().next_back()?;

    Some(MatchCandidate {
        keyword_id: keyword.id,
        needs_start_boundary: is_word_char(first),
        needs_end_boundary: keyword.is_phrase && is_word_char(last),
        is_phrase: keyword.is_phrase,
        normalized,
    })
}

/// Compile a full keyword list, dropping empty candidates.
#[must_use]
pub fn compile_all(keywords: &[KeywordSource]) -> Vec<MatchCandidate> {
    let candidates: Vec<MatchCandidate> = keywords.iter().filter_map(compile).collect();

    tracing::debug!(
        keywords = keywords.len(),
        candidates = candidates.len(),
        "Compiled keyword candidates"
    );

    candidates
}
