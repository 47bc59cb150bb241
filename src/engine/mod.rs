//! The keyword match engine.
//!
//! Pure pieces (normalizer, candidate compiler, boundary matcher) feed two
//! call paths that share one diff rule: the write-time per-comment sync
//! and the full-corpus batch reconciler.

mod candidate;
mod incremental;
mod matcher;
mod normalizer;
mod reconciler;
mod store;

pub use candidate::{compile, compile_all, is_word_char, MatchCandidate};
pub use incremental::{diff, sync_comment_matches, MatchDiff};
pub use matcher::{matched_in_normalized, matched_keyword_ids, matches};
pub use normalizer::normalize;
pub use reconciler::{ReconcileStats, Reconciler};
pub use store::{CommentText, KeywordSource, MatchSource, MatchStore, NewMatch, PostText};
