//! Coverage-based aggregation into the final analysis result.

use fxhash::hash64;

use crate::types::{AnalysisResult, Match, RiskLevel, SourceRecord};

/// Fold resolved matches into the overall score, risk tier, and source set.
///
/// The overall similarity is character coverage: the union of all matched
/// spans (overlaps counted once) divided by the document length, clamped to
/// [0, 1]. No matches means a 0.0 score and Low risk — a well-formed
/// result, not an error.
pub fn aggregate(
    matches: Vec<Match>,
    document_len: usize,
    segments_analyzed: usize,
) -> AnalysisResult {
    let covered = covered_bytes(&matches, document_len);
    let overall_similarity = if document_len == 0 {
        0.0
    } else {
        (covered as f64 / document_len as f64).clamp(0.0, 1.0)
    };

    AnalysisResult {
        overall_similarity,
        risk_level: RiskLevel::from_similarity(overall_similarity),
        sources: extract_sources(&matches),
        segments_analyzed,
        matches_found: matches.len(),
        matches,
    }
}

/// Size of the union of matched spans, via an interval sweep. Spans are
/// clamped to the document before merging.
fn covered_bytes(matches: &[Match], document_len: usize) -> usize {
    let mut spans: Vec<(usize, usize)> = matches
        .iter()
        .map(|m| (m.start_offset.min(document_len), m.end_offset.min(document_len)))
        .filter(|(start, end)| start < end)
        .collect();
    spans.sort_unstable();

    let mut covered = 0usize;
    let mut current: Option<(usize, usize)> = None;
    for (start, end) in spans {
        match current {
            Some((cur_start, cur_end)) if start <= cur_end => {
                current = Some((cur_start, cur_end.max(end)));
            }
            Some((cur_start, cur_end)) => {
                covered += cur_end - cur_start;
                current = Some((start, end));
            }
            None => current = Some((start, end)),
        }
    }
    if let Some((start, end)) = current {
        covered += end - start;
    }
    covered
}

/// Distinct origins referenced by the surviving matches, keyed by
/// normalized `(title, url)`. Match order is preserved, so with matches
/// sorted by similarity the strongest source comes first.
fn extract_sources(matches: &[Match]) -> Vec<SourceRecord> {
    let mut sources: Vec<SourceRecord> = Vec::new();
    for m in matches {
        let key_title = m.candidate.title.trim().to_lowercase();
        let key_url = m.candidate.url.trim().to_lowercase();
        let already_seen = sources.iter().any(|s| {
            s.title.trim().to_lowercase() == key_title && s.url.trim().to_lowercase() == key_url
        });
        if already_seen {
            continue;
        }
        sources.push(SourceRecord {
            id: format!("src_{:08x}", hash64(&(key_title, key_url)) as u32),
            title: m.candidate.title.clone(),
            url: m.candidate.url.clone(),
            domain: m.candidate.domain.clone(),
            source_type: m.candidate.source_type,
        });
    }
    sources
}
