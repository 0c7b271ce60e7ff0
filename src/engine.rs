//! The analysis engine: wires segmentation, corpus matching, retrieval,
//! scoring, resolution, and aggregation into one entry point.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::future::join_all;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

use crate::aggregate::aggregate;
use crate::config::AnalysisConfig;
use crate::corpus::StaticCorpus;
use crate::error::AnalysisError;
use crate::providers::{
    ArxivProvider, BingProvider, CrossrefProvider, DuckDuckGoProvider, PubMedProvider,
    SearchProvider, SemanticScholarProvider,
};
use crate::resolve::resolve_matches;
use crate::retrieval::{dedup_candidates, retrieve_candidates};
use crate::segment::{segment, NormalizedText};
use crate::similarity::score_candidates;
use crate::types::{AnalysisReport, AnalysisSummary, Candidate, MatchKindCounts};

/// One configured analysis engine.
///
/// The corpus and provider set are fixed at construction and shared
/// read-only by every run; nothing here mutates between calls, so one
/// engine serves unlimited concurrent analyses. Each run's segments,
/// candidates, and matches are local to that run — cancelling an in-flight
/// [`analyze`](Self::analyze) future simply discards them.
pub struct AnalysisEngine {
    cfg: AnalysisConfig,
    corpus: Arc<StaticCorpus>,
    providers: Vec<Arc<dyn SearchProvider>>,
}

impl AnalysisEngine {
    /// Build an engine with the built-in corpus and no external providers.
    pub fn new(cfg: AnalysisConfig) -> Result<Self, AnalysisError> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            corpus: Arc::new(StaticCorpus::builtin()),
            providers: Vec::new(),
        })
    }

    /// Replace the static corpus.
    pub fn with_corpus(mut self, corpus: StaticCorpus) -> Self {
        self.corpus = Arc::new(corpus);
        self
    }

    /// Add one provider to the retrieval fan-out.
    pub fn with_provider(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Replace the provider set.
    pub fn with_providers(mut self, providers: Vec<Arc<dyn SearchProvider>>) -> Self {
        self.providers = providers;
        self
    }

    /// Wire up every bundled adapter: both web-search scrapers and the four
    /// academic APIs.
    pub fn with_default_providers(self) -> Self {
        self.with_providers(vec![
            Arc::new(BingProvider::new()),
            Arc::new(DuckDuckGoProvider::new()),
            Arc::new(ArxivProvider::new()),
            Arc::new(CrossrefProvider::new()),
            Arc::new(SemanticScholarProvider::new()),
            Arc::new(PubMedProvider::new()),
        ])
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.cfg
    }

    /// Analyze one document and produce the full report.
    ///
    /// Fails only on validation (nothing analyzable) or an internal logic
    /// error; provider failures degrade to fewer candidates and are never
    /// visible here. The future is cancel-safe: callers may race it against
    /// their own deadline.
    pub async fn analyze(
        &self,
        text: &str,
        filename: &str,
    ) -> Result<AnalysisReport, AnalysisError> {
        let span = tracing::info_span!("engine.analyze", filename = %filename);
        self.analyze_inner(text, filename).instrument(span).await
    }

    async fn analyze_inner(
        &self,
        text: &str,
        filename: &str,
    ) -> Result<AnalysisReport, AnalysisError> {
        let started = Instant::now();

        let doc = NormalizedText::new(text);
        let segments = match segment(text, &self.cfg) {
            Ok(segments) => segments,
            Err(err) => {
                warn!(error = %err, "analysis_rejected");
                return Err(err);
            }
        };
        info!(segments = segments.len(), "segmentation_complete");

        let mut matches = self.corpus.find_matches(text, &doc, &segments);

        if !self.providers.is_empty() {
            let pool = retrieve_candidates(&segments, &self.providers, &self.cfg).await;
            for segment_candidates in &pool {
                let Some(seg) = segments.get(segment_candidates.segment_id) else {
                    return Err(AnalysisError::Internal(format!(
                        "candidate pool references unknown segment {}",
                        segment_candidates.segment_id
                    )));
                };
                matches.extend(score_candidates(
                    seg,
                    &segment_candidates.candidates,
                    self.cfg.similarity_threshold,
                ));
            }
        }

        let resolved = resolve_matches(matches);
        let result = aggregate(resolved, text.len(), segments.len());

        let elapsed_micros = started.elapsed().as_micros();
        info!(
            matches_found = result.matches_found,
            sources = result.sources.len(),
            overall_similarity = result.overall_similarity,
            elapsed_micros,
            "analysis_complete"
        );

        Ok(AnalysisReport {
            document_id: Uuid::new_v4().to_string(),
            overall_similarity: result.overall_similarity,
            risk_level: result.risk_level,
            status: "completed".into(),
            analyzed_at: Utc::now(),
            filename: filename.to_string(),
            word_count: text.split_whitespace().count(),
            character_count: text.chars().count(),
            segments_analyzed: result.segments_analyzed,
            matches_found: result.matches_found,
            analysis_summary: AnalysisSummary {
                total_matches: result.matches.len(),
                sources_found: result.sources.len(),
                highest_similarity: result
                    .matches
                    .first()
                    .map(|m| m.similarity)
                    .unwrap_or(0.0),
                match_kinds: MatchKindCounts::tally(&result.matches),
            },
            matches: result.matches,
            sources: result.sources,
        })
    }

    /// Run one ad-hoc query through every configured provider and return
    /// the deduplicated candidates. Meant for provider smoke checks, not
    /// for analysis.
    pub async fn search_text(&self, query: &str) -> Vec<Candidate> {
        let calls = self.providers.iter().map(|provider| {
            let provider = Arc::clone(provider);
            let query = query.to_string();
            let max_results = self.cfg.max_results;
            async move {
                match provider.search(&query, max_results).await {
                    Ok(found) => found,
                    Err(err) => {
                        warn!(provider = provider.name(), error = %err, "provider_search_failed");
                        Vec::new()
                    }
                }
            }
        });
        let merged: Vec<Candidate> = join_all(calls).await.into_iter().flatten().collect();
        dedup_candidates(merged, self.cfg.max_results)
    }
}
