//! Static corpus of known phrases and their sources.
//!
//! The corpus is an immutable value, built once at startup and shared
//! read-only across analysis runs. Matching is a case-insensitive substring
//! search over the whole normalized document — not per segment — so phrases
//! spanning a segment boundary are still caught. This matcher never touches
//! the network and, past construction, never fails.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::segment::{normalize_whitespace, NormalizedText};
use crate::types::{Candidate, Match, MatchKind, Segment, SourceType};

/// Fixed similarity assigned to a verbatim known-phrase hit.
pub const KNOWN_PHRASE_SIMILARITY: f64 = 0.95;
/// Fixed similarity assigned to a generic academic filler phrase.
pub const COMMON_PHRASE_SIMILARITY: f64 = 0.70;

/// Provider name recorded on corpus-produced candidates.
pub const CORPUS_PROVIDER_NAME: &str = "static_corpus";

/// Source metadata attached to every phrase of one corpus entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CorpusSource {
    pub id: String,
    pub title: String,
    pub url: String,
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub source_type: SourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
}

/// One topic's worth of known phrases.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CorpusEntry {
    pub topic: String,
    pub source: CorpusSource,
    pub phrases: Vec<String>,
}

/// Immutable phrase corpus plus the common-phrase filler list.
#[derive(Debug, Clone)]
pub struct StaticCorpus {
    entries: Vec<CorpusEntry>,
    common_phrases: Vec<String>,
    common_source: CorpusSource,
}

impl StaticCorpus {
    /// Build a corpus from caller-supplied entries. Malformed data is a
    /// startup error, never a runtime one.
    pub fn new(
        entries: Vec<CorpusEntry>,
        common_phrases: Vec<String>,
    ) -> Result<Self, AnalysisError> {
        for entry in &entries {
            if entry.topic.trim().is_empty() {
                return Err(AnalysisError::InvalidCorpus(
                    "corpus entry with empty topic".into(),
                ));
            }
            if entry.source.title.trim().is_empty() || entry.source.url.trim().is_empty() {
                return Err(AnalysisError::InvalidCorpus(format!(
                    "corpus entry '{}' is missing source title or url",
                    entry.topic
                )));
            }
            if entry.phrases.is_empty() {
                return Err(AnalysisError::InvalidCorpus(format!(
                    "corpus entry '{}' has no phrases",
                    entry.topic
                )));
            }
            if entry.phrases.iter().any(|p| p.trim().is_empty()) {
                return Err(AnalysisError::InvalidCorpus(format!(
                    "corpus entry '{}' contains a blank phrase",
                    entry.topic
                )));
            }
        }
        if common_phrases.iter().any(|p| p.trim().is_empty()) {
            return Err(AnalysisError::InvalidCorpus(
                "common phrase list contains a blank phrase".into(),
            ));
        }

        Ok(Self {
            entries,
            common_phrases,
            common_source: common_phrase_source(),
        })
    }

    /// The bundled demo corpus: four topical sources and the usual academic
    /// filler phrases.
    pub fn builtin() -> Self {
        Self::new(builtin_entries(), builtin_common_phrases())
            .expect("built-in corpus data is valid")
    }

    /// An empty corpus, for callers that rely on external providers only.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            common_phrases: Vec::new(),
            common_source: common_phrase_source(),
        }
    }

    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    /// Find every corpus phrase occurring in the document.
    ///
    /// `original` is the verbatim document text, `doc` its normalized view,
    /// `segments` the analyzable units. Each hit is attached to the first
    /// segment overlapping its span; hits entirely inside discarded text are
    /// dropped so every match keeps referencing an existing segment.
    pub fn find_matches(
        &self,
        original: &str,
        doc: &NormalizedText,
        segments: &[Segment],
    ) -> Vec<Match> {
        let mut matches = Vec::new();
        for entry in &self.entries {
            for phrase in &entry.phrases {
                self.collect_phrase_hits(
                    original,
                    doc,
                    segments,
                    phrase,
                    &entry.source,
                    KNOWN_PHRASE_SIMILARITY,
                    MatchKind::Exact,
                    &mut matches,
                );
            }
        }
        for phrase in &self.common_phrases {
            self.collect_phrase_hits(
                original,
                doc,
                segments,
                phrase,
                &self.common_source,
                COMMON_PHRASE_SIMILARITY,
                MatchKind::CommonPhrase,
                &mut matches,
            );
        }
        matches
    }

    #[allow(clippy::too_many_arguments)]
    fn collect_phrase_hits(
        &self,
        original: &str,
        doc: &NormalizedText,
        segments: &[Segment],
        phrase: &str,
        source: &CorpusSource,
        similarity: f64,
        kind: MatchKind,
        matches: &mut Vec<Match>,
    ) {
        let needle = normalize_whitespace(phrase).to_lowercase();
        if needle.is_empty() {
            return;
        }
        let hay = doc.as_str();
        let mut from = 0usize;
        while let Some(found) = hay[from..].find(&needle) {
            let start = from + found;
            let end = start + needle.len();
            from = end;

            let Some((orig_start, orig_end)) = doc.original_span(start, end) else {
                continue;
            };
            let Some(segment) = segments
                .iter()
                .find(|s| s.start_offset < orig_end && orig_start < s.end_offset)
            else {
                continue;
            };

            matches.push(Match {
                segment_id: segment.id,
                original_text: original[orig_start..orig_end].to_string(),
                matched_text: phrase.to_string(),
                similarity,
                kind,
                start_offset: orig_start,
                end_offset: orig_end,
                candidate: Candidate {
                    snippet: phrase.to_string(),
                    title: source.title.clone(),
                    url: source.url.clone(),
                    domain: source.domain.clone(),
                    author: source.author.clone(),
                    source_type: source.source_type,
                    provider_name: CORPUS_PROVIDER_NAME.into(),
                },
            });
        }
    }
}

fn common_phrase_source() -> CorpusSource {
    CorpusSource {
        id: "common_phrase".into(),
        title: "Common Academic Phrases".into(),
        url: "https://academic-writing.edu/common-phrases".into(),
        domain: "academic-writing.edu".into(),
        author: Some("Academic Writing Guide".into()),
        source_type: SourceType::Reference,
        published: None,
    }
}

fn builtin_common_phrases() -> Vec<String> {
    [
        "research shows that",
        "studies have shown",
        "according to research",
        "it is important to note",
        "in conclusion",
        "furthermore",
        "however",
        "therefore",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn builtin_entries() -> Vec<CorpusEntry> {
    fn entry(
        topic: &str,
        id: &str,
        title: &str,
        url: &str,
        domain: &str,
        author: &str,
        published: &str,
        phrases: &[&str],
    ) -> CorpusEntry {
        CorpusEntry {
            topic: topic.into(),
            source: CorpusSource {
                id: id.into(),
                title: title.into(),
                url: url.into(),
                domain: domain.into(),
                author: Some(author.into()),
                source_type: SourceType::Academic,
                published: Some(published.into()),
            },
            phrases: phrases.iter().map(|p| (*p).to_string()).collect(),
        }
    }

    vec![
        entry(
            "artificial intelligence",
            "src_001",
            "Introduction to Artificial Intelligence and Machine Learning",
            "https://example-university.edu/ai-ml-intro",
            "example-university.edu",
            "Dr. Jane Smith",
            "2023-06-15",
            &[
                "artificial intelligence and machine learning have revolutionized",
                "machine learning algorithms",
                "artificial intelligence systems",
                "deep learning networks",
                "neural networks and artificial intelligence",
            ],
        ),
        entry(
            "climate change",
            "src_002",
            "Climate Change and Environmental Impact",
            "https://climate-research.org/environmental-study",
            "climate-research.org",
            "Dr. Michael Johnson",
            "2023-08-20",
            &[
                "climate change represents one of the most pressing challenges",
                "global warming and climate change",
                "rising temperatures and melting ice caps",
                "environmental impact of climate change",
            ],
        ),
        entry(
            "human brain",
            "src_003",
            "Neuroscience and Brain Function Research",
            "https://neuro-institute.edu/brain-research",
            "neuro-institute.edu",
            "Dr. Sarah Wilson",
            "2023-04-10",
            &[
                "human brain contains approximately 86 billion neurons",
                "neurons connected through synapses",
                "brain neural networks",
                "cognitive neuroscience research",
            ],
        ),
        entry(
            "machine learning",
            "src_004",
            "Advanced Machine Learning Techniques",
            "https://tech-university.edu/ml-advanced",
            "tech-university.edu",
            "Prof. David Chen",
            "2023-09-12",
            &[
                "machine learning enables computers to learn from experience",
                "supervised and unsupervised learning",
                "machine learning algorithms and data processing",
                "predictive modeling with machine learning",
            ],
        ),
    ]
}
