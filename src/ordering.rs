//! Menu ordering for wiki filenames.
//!
//! Files listed in `[rules] order` come first, in the order they are listed.
//! Priority entries are locale-free, so `Help:Start` lifts both
//! `en:Help:Start.md` and `fr_ca:Help:Start.md`. Everything else follows in
//! descending name order (`en:B` before `en:A:B` before `en:A:A`).
//!
//! The sort is stable: files sharing a priority entry keep their input order.

use crate::naming::{FilenameParser, canonical_key};
use std::cmp::Ordering;

/// Position of `name` in the priority list, matching the locale-free name
/// with or without its `.md` extension. Duplicate entries count at their
/// last position.
fn priority_rank(name: &str, priority: &[String], parser: &FilenameParser) -> Option<usize> {
    let stripped = parser.strip_locale(name);
    let key = canonical_key(stripped);
    priority
        .iter()
        .rposition(|entry| entry == key || entry == stripped)
}

/// Compare two filenames under the priority list.
pub fn compare_files(
    a: &str,
    b: &str,
    priority: &[String],
    parser: &FilenameParser,
) -> Ordering {
    match (
        priority_rank(a, priority, parser),
        priority_rank(b, priority, parser),
    ) {
        (Some(rank_a), Some(rank_b)) => rank_a.cmp(&rank_b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.cmp(a),
    }
}

/// Return `files` in menu order.
pub fn order_files(files: &[String], priority: &[String], parser: &FilenameParser) -> Vec<String> {
    let mut ordered = files.to_vec();
    ordered.sort_by(|a, b| compare_files(a, b, priority, parser));
    ordered
}
