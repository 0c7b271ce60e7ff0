//! The serialized report is an external contract: report and citation
//! collaborators key on exact field names.

use crosscheck::{AnalysisConfig, AnalysisEngine};

#[tokio::test]
async fn report_serializes_the_contract_field_names() {
    let text = "Artificial intelligence and machine learning have revolutionized the world.";
    let engine = AnalysisEngine::new(AnalysisConfig::default().with_min_segment_words(5))
        .expect("engine builds");
    let report = engine
        .analyze(text, "essay.txt")
        .await
        .expect("analysis should succeed");

    let value = serde_json::to_value(&report).expect("report serializes");

    for key in [
        "documentId",
        "overallSimilarity",
        "riskLevel",
        "status",
        "analyzedAt",
        "filename",
        "matches",
        "sources",
        "wordCount",
        "characterCount",
        "analysisSummary",
    ] {
        assert!(value.get(key).is_some(), "missing report field {key}");
    }

    assert_eq!(value["status"], "completed");
    assert_eq!(value["filename"], "essay.txt");
    assert!(value["riskLevel"].as_str().is_some());

    let first_match = &value["matches"][0];
    for key in [
        "segmentId",
        "originalText",
        "matchedText",
        "similarity",
        "matchType",
        "startOffset",
        "endOffset",
        "source",
    ] {
        assert!(first_match.get(key).is_some(), "missing match field {key}");
    }
    assert_eq!(first_match["matchType"], "exact");

    let first_source = &value["sources"][0];
    for key in ["id", "title", "url", "domain", "sourceType"] {
        assert!(first_source.get(key).is_some(), "missing source field {key}");
    }
    assert_eq!(first_source["sourceType"], "academic");

    let summary = &value["analysisSummary"];
    for key in ["totalMatches", "sourcesFound", "highestSimilarity", "matchKinds"] {
        assert!(summary.get(key).is_some(), "missing summary field {key}");
    }
}

#[tokio::test]
async fn report_round_trips_through_json() {
    let text = "Machine learning enables computers to learn from experience without explicit programming.";
    let engine = AnalysisEngine::new(AnalysisConfig::default().with_min_segment_words(5))
        .expect("engine builds");
    let report = engine
        .analyze(text, "notes.txt")
        .await
        .expect("analysis should succeed");

    let json = serde_json::to_string(&report).expect("report serializes");
    let back: crosscheck::AnalysisReport =
        serde_json::from_str(&json).expect("report deserializes");
    assert_eq!(report, back);
}
