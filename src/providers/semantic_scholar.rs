//! Semantic Scholar paper search (Graph API, JSON).

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ProviderError;
use crate::types::{Candidate, SourceType};

use super::{clip_snippet, domain_of, fetch_json, truncate_chars, SearchProvider, API_USER_AGENT};

const ENDPOINT: &str = "https://api.semanticscholar.org/graph/v1/paper/search";
const MAX_QUERY_CHARS: usize = 500;
const ABSTRACT_CHARS: usize = 150;

/// JSON adapter for the Semantic Scholar Graph API.
#[derive(Debug, Default, Clone, Copy)]
pub struct SemanticScholarProvider;

impl SemanticScholarProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SearchProvider for SemanticScholarProvider {
    fn name(&self) -> &'static str {
        "semantic_scholar"
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<Candidate>, ProviderError> {
        let params = [
            ("query", truncate_chars(query, MAX_QUERY_CHARS).to_string()),
            ("limit", max_results.to_string()),
            (
                "fields",
                "title,authors,year,abstract,url,venue,citationCount".into(),
            ),
        ];
        let body = fetch_json(ENDPOINT, &params, API_USER_AGENT).await?;
        Ok(parse_papers(&body, max_results))
    }
}

/// Walk the `data` array of a paper-search response.
fn parse_papers(body: &Value, max_results: usize) -> Vec<Candidate> {
    let Some(papers) = body["data"].as_array() else {
        return Vec::new();
    };

    let mut candidates = Vec::new();
    for paper in papers.iter().take(max_results) {
        let title = paper["title"].as_str().unwrap_or("Untitled").to_string();

        let authors: Vec<String> = paper["authors"]
            .as_array()
            .map(|list| {
                list.iter()
                    .take(3)
                    .filter_map(|author| author["name"].as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let venue = paper["venue"].as_str().unwrap_or("");
        let year = paper["year"].as_i64().map(|y| y.to_string()).unwrap_or_default();
        let abstract_text = paper["abstract"].as_str().unwrap_or("");
        let citations = paper["citationCount"].as_i64().unwrap_or(0);
        let url = paper["url"].as_str().unwrap_or("").to_string();

        let mut snippet_parts = Vec::new();
        if !venue.is_empty() {
            snippet_parts.push(format!("Published in {venue}"));
        }
        if !year.is_empty() {
            snippet_parts.push(format!("({year})"));
        }
        if citations > 0 {
            snippet_parts.push(format!("Cited {citations} times"));
        }
        if !abstract_text.is_empty() {
            snippet_parts.push(clip_snippet(abstract_text, ABSTRACT_CHARS));
        }
        let snippet = if snippet_parts.is_empty() {
            "Academic paper".to_string()
        } else {
            snippet_parts.join(". ")
        };

        candidates.push(Candidate {
            snippet,
            title,
            domain: domain_of(&url),
            url,
            author: (!authors.is_empty()).then(|| authors.join(", ")),
            source_type: SourceType::Academic,
            provider_name: "semantic_scholar".into(),
        });
    }
    candidates
}
