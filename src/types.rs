use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A minimally-sized analyzable unit of document text.
///
/// Offsets are half-open byte ranges into the *original* text (not the
/// normalized copy), always on `char` boundaries, so downstream reporting
/// can quote the source verbatim. Segments are produced once per run,
/// ordered by `start_offset` and non-overlapping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Segment {
    /// Zero-based index in segmentation order.
    pub id: usize,
    /// Verbatim slice of the original text, trimmed.
    pub text: String,
    /// Whitespace-collapsed form used for provider queries and scoring.
    pub normalized_text: String,
    pub start_offset: usize,
    pub end_offset: usize,
    pub word_count: usize,
}

/// Coarse classification of where a candidate snippet came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Academic,
    Preprint,
    Journal,
    Encyclopedia,
    News,
    Reference,
    Web,
}

impl SourceType {
    /// Classify a result domain the way the web-search adapters need it:
    /// academic hosts first, then news outlets, then encyclopedias,
    /// everything else is plain web.
    pub fn for_domain(domain: &str) -> Self {
        let domain = domain.to_ascii_lowercase();
        const ACADEMIC: [&str; 5] = ["edu", "scholar", "researchgate", "arxiv", "pubmed"];
        const NEWS: [&str; 5] = ["news", "cnn", "bbc", "reuters", "times"];
        if ACADEMIC.iter().any(|marker| domain.contains(marker)) {
            SourceType::Academic
        } else if NEWS.iter().any(|marker| domain.contains(marker)) {
            SourceType::News
        } else if domain.contains("wikipedia") {
            SourceType::Encyclopedia
        } else {
            SourceType::Web
        }
    }
}

/// A snippet of external text plus source metadata, proposed as a possible
/// match source. Produced by a provider adapter or the static corpus;
/// immutable and local to one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The reference text the document is compared against.
    #[serde(rename = "text")]
    pub snippet: String,
    pub title: String,
    pub url: String,
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub source_type: SourceType,
    pub provider_name: String,
}

/// Match tier, derived solely from the similarity score via fixed
/// thresholds. Corpus common-phrase hits keep their tag regardless of score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    NearExact,
    Paraphrased,
    CommonPhrase,
}

impl MatchKind {
    pub const EXACT_THRESHOLD: f64 = 0.9;
    pub const NEAR_EXACT_THRESHOLD: f64 = 0.75;

    /// Tier a similarity score that already cleared the match threshold.
    pub fn from_similarity(similarity: f64) -> Self {
        if similarity >= Self::EXACT_THRESHOLD {
            MatchKind::Exact
        } else if similarity >= Self::NEAR_EXACT_THRESHOLD {
            MatchKind::NearExact
        } else {
            MatchKind::Paraphrased
        }
    }
}

/// A scored association between one segment and one candidate that cleared
/// the similarity threshold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub segment_id: usize,
    /// Verbatim document text covered by this match.
    pub original_text: String,
    /// The candidate text it matched.
    pub matched_text: String,
    /// Similarity score in [0, 1].
    pub similarity: f64,
    #[serde(rename = "matchType")]
    pub kind: MatchKind,
    /// Byte offsets into the original document text; always within the
    /// owning segment's range, or the exact found substring for corpus hits.
    pub start_offset: usize,
    pub end_offset: usize,
    #[serde(rename = "source")]
    pub candidate: Candidate,
}

/// Deduplicated projection of a candidate's origin, unique per run by
/// normalized `(title, url)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SourceRecord {
    pub id: String,
    pub title: String,
    pub url: String,
    pub domain: String,
    pub source_type: SourceType,
}

/// Coarse risk tier derived from the overall similarity score.
/// Ordered, so tiers compare as `Low < Medium < High`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const MEDIUM_THRESHOLD: f64 = 0.10;
    pub const HIGH_THRESHOLD: f64 = 0.40;

    /// Total mapping: every value in [0, 1] lands in exactly one tier.
    pub fn from_similarity(similarity: f64) -> Self {
        if similarity >= Self::HIGH_THRESHOLD {
            RiskLevel::High
        } else if similarity >= Self::MEDIUM_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Core result of one analysis run, before report envelope fields are added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Fraction of the document's bytes covered by at least one match.
    pub overall_similarity: f64,
    pub risk_level: RiskLevel,
    /// Sorted by descending similarity, ties by ascending start offset.
    pub matches: Vec<Match>,
    pub sources: Vec<SourceRecord>,
    pub segments_analyzed: usize,
    pub matches_found: usize,
}

/// Per-kind match counts for the report summary block.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MatchKindCounts {
    pub exact: usize,
    pub near_exact: usize,
    pub paraphrased: usize,
    pub common_phrase: usize,
}

impl MatchKindCounts {
    pub fn tally(matches: &[Match]) -> Self {
        let mut counts = MatchKindCounts::default();
        for m in matches {
            match m.kind {
                MatchKind::Exact => counts.exact += 1,
                MatchKind::NearExact => counts.near_exact += 1,
                MatchKind::Paraphrased => counts.paraphrased += 1,
                MatchKind::CommonPhrase => counts.common_phrase += 1,
            }
        }
        counts
    }
}

/// Aggregate statistics attached to the report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub total_matches: usize,
    pub sources_found: usize,
    pub highest_similarity: f64,
    pub match_kinds: MatchKindCounts,
}

/// The external report contract handed to report/citation collaborators.
///
/// Field names on the wire are the camelCase forms other components rely on
/// (`documentId`, `overallSimilarity`, `riskLevel`, `status`, `analyzedAt`,
/// `filename`, `matches`, `sources`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub document_id: String,
    pub overall_similarity: f64,
    pub risk_level: RiskLevel,
    pub status: String,
    pub analyzed_at: DateTime<Utc>,
    pub filename: String,
    pub word_count: usize,
    pub character_count: usize,
    pub segments_analyzed: usize,
    pub matches_found: usize,
    pub matches: Vec<Match>,
    pub sources: Vec<SourceRecord>,
    pub analysis_summary: AnalysisSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_kind_tiers_follow_thresholds() {
        assert_eq!(MatchKind::from_similarity(1.0), MatchKind::Exact);
        assert_eq!(MatchKind::from_similarity(0.9), MatchKind::Exact);
        assert_eq!(MatchKind::from_similarity(0.89), MatchKind::NearExact);
        assert_eq!(MatchKind::from_similarity(0.75), MatchKind::NearExact);
        assert_eq!(MatchKind::from_similarity(0.6), MatchKind::Paraphrased);
    }

    #[test]
    fn risk_levels_are_total_over_unit_interval() {
        assert_eq!(RiskLevel::from_similarity(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_similarity(0.09), RiskLevel::Low);
        assert_eq!(RiskLevel::from_similarity(0.10), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_similarity(0.39), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_similarity(0.40), RiskLevel::High);
        assert_eq!(RiskLevel::from_similarity(1.0), RiskLevel::High);
    }

    #[test]
    fn source_type_domain_classification() {
        assert_eq!(
            SourceType::for_domain("example-university.edu"),
            SourceType::Academic
        );
        assert_eq!(SourceType::for_domain("scholar.google.com"), SourceType::Academic);
        assert_eq!(SourceType::for_domain("www.bbc.co.uk"), SourceType::News);
        assert_eq!(
            SourceType::for_domain("en.wikipedia.org"),
            SourceType::Encyclopedia
        );
        assert_eq!(SourceType::for_domain("blog.example.com"), SourceType::Web);
    }

    #[test]
    fn match_kind_serializes_snake_case() {
        let json = serde_json::to_string(&MatchKind::NearExact).unwrap();
        assert_eq!(json, "\"near_exact\"");
        let json = serde_json::to_string(&MatchKind::CommonPhrase).unwrap();
        assert_eq!(json, "\"common_phrase\"");
    }

    #[test]
    fn candidate_serializes_spec_field_names() {
        let candidate = Candidate {
            snippet: "some snippet".into(),
            title: "A Title".into(),
            url: "https://example.org/paper".into(),
            domain: "example.org".into(),
            author: None,
            source_type: SourceType::Web,
            provider_name: "duckduckgo".into(),
        };
        let value = serde_json::to_value(&candidate).unwrap();
        assert_eq!(value["text"], "some snippet");
        assert_eq!(value["sourceType"], "web");
        assert_eq!(value["providerName"], "duckduckgo");
        assert!(value.get("author").is_none());
    }
}
