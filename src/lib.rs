//! # crosscheck
//!
//! Document similarity analysis: how much of a document resembles text the
//! system can already see, either in a static corpus of known phrases or in
//! snippets retrieved live from search and academic providers.
//!
//! ## Pipeline
//!
//! Raw text is segmented into sentences with original-text offsets, then
//! candidates are gathered from two directions: a case-insensitive phrase
//! scan over the whole normalized document, and a rate-limited concurrent
//! fan-out of per-segment queries to every configured [`SearchProvider`].
//! Candidate/segment pairs are scored with a symmetric sequence-similarity
//! ratio, thresholded, deduplicated per document region, and folded into a
//! character-coverage score with a Low/Medium/High risk tier.
//!
//! Provider failures never fail a run — a broken or timed-out source just
//! contributes fewer candidates. Only an unanalyzable document (validation)
//! or an internal logic error reaches the caller.
//!
//! ## Example
//!
//! ```no_run
//! use crosscheck::{AnalysisConfig, AnalysisEngine};
//!
//! # async fn run() -> Result<(), crosscheck::AnalysisError> {
//! let engine = AnalysisEngine::new(AnalysisConfig::default())?
//!     .with_default_providers();
//!
//! let report = engine
//!     .analyze("Document text to check against known sources.", "essay.txt")
//!     .await?;
//! println!("{:?} {:.1}%", report.risk_level, report.overall_similarity * 100.0);
//! # Ok(())
//! # }
//! ```
//!
//! This crate is a library: no CLI, no HTTP surface, no persisted state.
//! Text extraction from binary formats and report rendering live in the
//! layers around it.

pub mod aggregate;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod providers;
pub mod resolve;
pub mod retrieval;
pub mod segment;
pub mod similarity;
pub mod types;

pub use crate::config::AnalysisConfig;
pub use crate::corpus::{CorpusEntry, CorpusSource, StaticCorpus};
pub use crate::engine::AnalysisEngine;
pub use crate::error::{AnalysisError, ProviderError};
pub use crate::providers::{
    ArxivProvider, BingProvider, CrossrefProvider, DuckDuckGoProvider, PubMedProvider,
    SearchProvider, SemanticScholarProvider,
};
pub use crate::types::{
    AnalysisReport, AnalysisResult, AnalysisSummary, Candidate, Match, MatchKind, MatchKindCounts,
    RiskLevel, Segment, SourceRecord, SourceType,
};
