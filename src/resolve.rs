//! Match resolution: one reported match per document region.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::types::Match;

/// Deduplicate matches by `(segment_id, start_offset, end_offset)` and sort
/// the survivors.
///
/// When several candidates scored above threshold on the same region, the
/// highest-similarity one wins. The final order is descending similarity
/// with ties broken by ascending start offset, then segment id, so repeated
/// runs produce identical output. Adjacent matches are never merged across
/// segments.
pub fn resolve_matches(matches: Vec<Match>) -> Vec<Match> {
    let mut best: HashMap<(usize, usize, usize), Match> = HashMap::new();
    for candidate in matches {
        let key = (
            candidate.segment_id,
            candidate.start_offset,
            candidate.end_offset,
        );
        match best.get(&key) {
            Some(existing) if existing.similarity >= candidate.similarity => {}
            _ => {
                best.insert(key, candidate);
            }
        }
    }

    let mut resolved: Vec<Match> = best.into_values().collect();
    resolved.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.start_offset.cmp(&b.start_offset))
            .then_with(|| a.segment_id.cmp(&b.segment_id))
    });
    resolved
}
