//! Retrieval coordination: rate-limited fan-out over all configured
//! providers.
//!
//! Segments are processed in batches. Within one batch every (segment ×
//! provider) lookup runs concurrently and is joined before the batch
//! completes; successive batches are separated by a fixed delay to respect
//! external rate limits. Provider failures are absorbed here: a failing
//! adapter contributes an empty list and a warning, nothing else.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::providers::{truncate_chars, SearchProvider};
use crate::segment::normalize_whitespace;
use crate::types::{Candidate, Segment};

const TITLE_PREFIX_CHARS: usize = 50;

/// Candidates retrieved for one segment, merged across providers.
#[derive(Debug, Clone)]
pub struct SegmentCandidates {
    pub segment_id: usize,
    pub candidates: Vec<Candidate>,
}

/// Fan segments out to every provider and collect one candidate pool.
///
/// Futures are joined in input order, so with deterministic providers the
/// merged pool is deterministic as well.
pub async fn retrieve_candidates(
    segments: &[Segment],
    providers: &[Arc<dyn SearchProvider>],
    cfg: &AnalysisConfig,
) -> Vec<SegmentCandidates> {
    if segments.is_empty() || providers.is_empty() {
        return Vec::new();
    }

    let mut pool = Vec::with_capacity(segments.len());
    let batch_count = segments.len().div_ceil(cfg.batch_size);

    for (batch_idx, batch) in segments.chunks(cfg.batch_size).enumerate() {
        let calls: Vec<_> = batch
            .iter()
            .flat_map(|segment| {
                providers.iter().map(move |provider| {
                    let provider = Arc::clone(provider);
                    let query = segment.normalized_text.clone();
                    let segment_id = segment.id;
                    let max_results = cfg.max_results;
                    async move {
                        match provider.search(&query, max_results).await {
                            Ok(found) => (segment_id, found),
                            Err(err) => {
                                warn!(
                                    provider = provider.name(),
                                    segment_id,
                                    error = %err,
                                    "provider_search_failed"
                                );
                                (segment_id, Vec::new())
                            }
                        }
                    }
                })
            })
            .collect();

        // Join point: the batch is done only when every call has returned
        // or timed out.
        let joined = join_all(calls).await;

        for segment in batch {
            let merged: Vec<Candidate> = joined
                .iter()
                .filter(|(id, _)| *id == segment.id)
                .flat_map(|(_, found)| found.iter().cloned())
                .collect();
            let candidates = dedup_candidates(merged, cfg.max_results);
            debug!(
                segment_id = segment.id,
                candidates = candidates.len(),
                "segment_candidates_merged"
            );
            pool.push(SegmentCandidates {
                segment_id: segment.id,
                candidates,
            });
        }

        if batch_idx + 1 < batch_count {
            sleep(cfg.batch_delay()).await;
        }
    }
    pool
}

/// Drop duplicate candidates by normalized `(title prefix, url)`, keeping
/// first occurrences, and cap the merged list.
pub(crate) fn dedup_candidates(candidates: Vec<Candidate>, cap: usize) -> Vec<Candidate> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut unique = Vec::new();
    for candidate in candidates {
        let key = (
            title_prefix(&candidate.title),
            candidate.url.trim().to_ascii_lowercase(),
        );
        if seen.insert(key) {
            unique.push(candidate);
            if unique.len() == cap {
                break;
            }
        }
    }
    unique
}

fn title_prefix(title: &str) -> String {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .filter(|ch| ch.is_alphanumeric() || ch.is_whitespace())
        .collect();
    truncate_chars(&normalize_whitespace(&cleaned), TITLE_PREFIX_CHARS).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::types::SourceType;
    use async_trait::async_trait;

    fn candidate(title: &str, url: &str) -> Candidate {
        Candidate {
            snippet: format!("snippet for {title}"),
            title: title.into(),
            url: url.into(),
            domain: "example.org".into(),
            author: None,
            source_type: SourceType::Web,
            provider_name: "stub".into(),
        }
    }

    fn segment(id: usize, text: &str) -> Segment {
        Segment {
            id,
            text: text.into(),
            normalized_text: text.into(),
            start_offset: id * 100,
            end_offset: id * 100 + text.len(),
            word_count: text.split_whitespace().count(),
        }
    }

    fn fast_config() -> AnalysisConfig {
        AnalysisConfig::default().with_batch_delay(std::time::Duration::ZERO)
    }

    /// Returns the same fixed candidates for every query.
    struct FixedProvider(Vec<Candidate>);

    #[async_trait]
    impl SearchProvider for FixedProvider {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn search(
            &self,
            _query: &str,
            max_results: usize,
        ) -> Result<Vec<Candidate>, ProviderError> {
            Ok(self.0.iter().take(max_results).cloned().collect())
        }
    }

    /// Always fails, exercising the absorb path.
    struct FailingProvider;

    #[async_trait]
    impl SearchProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn search(
            &self,
            _query: &str,
            _max_results: usize,
        ) -> Result<Vec<Candidate>, ProviderError> {
            Err(ProviderError::Status(503))
        }
    }

    #[tokio::test]
    async fn candidates_collected_per_segment() {
        let segments = vec![segment(0, "first sentence"), segment(1, "second sentence")];
        let providers: Vec<Arc<dyn SearchProvider>> = vec![Arc::new(FixedProvider(vec![
            candidate("A", "https://a.example.org"),
            candidate("B", "https://b.example.org"),
        ]))];

        let pool = retrieve_candidates(&segments, &providers, &fast_config()).await;
        assert_eq!(pool.len(), 2);
        assert_eq!(pool[0].segment_id, 0);
        assert_eq!(pool[0].candidates.len(), 2);
        assert_eq!(pool[1].segment_id, 1);
    }

    #[tokio::test]
    async fn duplicates_across_providers_collapse() {
        let segments = vec![segment(0, "only sentence")];
        let shared = candidate("Shared Title", "https://shared.example.org/page");
        let providers: Vec<Arc<dyn SearchProvider>> = vec![
            Arc::new(FixedProvider(vec![shared.clone()])),
            Arc::new(FixedProvider(vec![
                shared,
                candidate("Other", "https://other.example.org"),
            ])),
        ];

        let pool = retrieve_candidates(&segments, &providers, &fast_config()).await;
        assert_eq!(pool[0].candidates.len(), 2);
    }

    #[tokio::test]
    async fn merged_list_is_capped() {
        let segments = vec![segment(0, "only sentence")];
        let many: Vec<Candidate> = (0..10)
            .map(|i| candidate(&format!("Title {i}"), &format!("https://x{i}.example.org")))
            .collect();
        let providers: Vec<Arc<dyn SearchProvider>> = vec![Arc::new(FixedProvider(many))];

        let cfg = fast_config().with_max_results(3);
        let pool = retrieve_candidates(&segments, &providers, &cfg).await;
        assert_eq!(pool[0].candidates.len(), 3);
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_empty() {
        let segments = vec![segment(0, "only sentence")];
        let good = candidate("Good", "https://good.example.org");
        let providers: Vec<Arc<dyn SearchProvider>> = vec![
            Arc::new(FailingProvider),
            Arc::new(FixedProvider(vec![good])),
        ];

        let pool = retrieve_candidates(&segments, &providers, &fast_config()).await;
        assert_eq!(pool[0].candidates.len(), 1);
        assert_eq!(pool[0].candidates[0].title, "Good");
    }

    #[tokio::test]
    async fn no_providers_short_circuits() {
        let segments = vec![segment(0, "only sentence")];
        let pool = retrieve_candidates(&segments, &[], &fast_config()).await;
        assert!(pool.is_empty());
    }

    #[test]
    fn title_prefix_normalizes_and_truncates() {
        assert_eq!(title_prefix("A Title: With Punctuation!"), "a title with punctuation");
        let long = "word ".repeat(30);
        assert!(title_prefix(&long).chars().count() <= TITLE_PREFIX_CHARS);
    }
}
