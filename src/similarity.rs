//! Pairwise text similarity scoring.
//!
//! Scores are a symmetric sequence-alignment ratio over compare-normalized
//! text: `2 * LCS(a, b) / (|a| + |b|)` on chars. Identical inputs score 1,
//! disjoint inputs score 0, and the measure is symmetric, which is all the
//! match tiering relies on.

use crate::types::{Candidate, Match, MatchKind, Segment};

/// Strip a text down to what the scorer compares: lowercase alphanumerics
/// with single spaces between words. Punctuation disappears without leaving
/// a word boundary behind, so contractions collapse ("don't" → "dont").
pub fn normalize_for_compare(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !out.is_empty() {
                pending_space = true;
            }
            continue;
        }
        if !ch.is_alphanumeric() && ch != '_' {
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        for lower in ch.to_lowercase() {
            out.push(lower);
        }
    }
    out
}

/// Symmetric sequence similarity in [0, 1].
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        (false, false) => {}
    }
    let common = lcs_len(&a, &b);
    (2.0 * common as f64) / ((a.len() + b.len()) as f64)
}

/// Longest common subsequence length, rolling single-row DP.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    // Iterate over the shorter sequence in the inner loop to keep the row small.
    let (outer, inner) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut row = vec![0usize; inner.len() + 1];
    for &oc in outer {
        let mut diagonal = 0usize;
        for (j, &ic) in inner.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if oc == ic {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row[inner.len()]
}

/// Score one segment against its candidate pool. Pairs below `threshold`
/// are discarded immediately and never become matches; survivors cover the
/// whole segment span.
pub fn score_candidates(segment: &Segment, candidates: &[Candidate], threshold: f64) -> Vec<Match> {
    let normalized_segment = normalize_for_compare(&segment.normalized_text);
    let mut matches = Vec::new();
    for candidate in candidates {
        let normalized_snippet = normalize_for_compare(&candidate.snippet);
        let similarity = similarity_ratio(&normalized_segment, &normalized_snippet);
        if similarity < threshold {
            continue;
        }
        matches.push(Match {
            segment_id: segment.id,
            original_text: segment.text.clone(),
            matched_text: candidate.snippet.clone(),
            similarity,
            kind: MatchKind::from_similarity(similarity),
            start_offset: segment.start_offset,
            end_offset: segment.end_offset,
            candidate: candidate.clone(),
        });
    }
    matches
}
