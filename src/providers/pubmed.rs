//! PubMed search over the NCBI E-utilities (two-phase JSON lookup).

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ProviderError;
use crate::types::{Candidate, SourceType};

use super::{fetch_json, truncate_chars, SearchProvider, API_USER_AGENT};

const SEARCH_ENDPOINT: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi";
const SUMMARY_ENDPOINT: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esummary.fcgi";
const MAX_QUERY_CHARS: usize = 500;

/// E-utilities adapter: `esearch` resolves the query to PMIDs, `esummary`
/// fetches the record metadata. Both legs share the per-call timeout.
#[derive(Debug, Default, Clone, Copy)]
pub struct PubMedProvider;

impl PubMedProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SearchProvider for PubMedProvider {
    fn name(&self) -> &'static str {
        "pubmed"
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<Candidate>, ProviderError> {
        let search_params = [
            ("db", "pubmed".to_string()),
            ("term", truncate_chars(query, MAX_QUERY_CHARS).to_string()),
            ("retmax", max_results.to_string()),
            ("retmode", "json".into()),
            ("sort", "relevance".into()),
        ];
        let search_body = fetch_json(SEARCH_ENDPOINT, &search_params, API_USER_AGENT).await?;
        let pmids = parse_pmids(&search_body);
        if pmids.is_empty() {
            return Ok(Vec::new());
        }

        let summary_params = [
            ("db", "pubmed".to_string()),
            ("id", pmids.join(",")),
            ("retmode", "json".into()),
        ];
        let summary_body = fetch_json(SUMMARY_ENDPOINT, &summary_params, API_USER_AGENT).await?;
        Ok(parse_summaries(&summary_body, &pmids))
    }
}

fn parse_pmids(body: &Value) -> Vec<String> {
    body["esearchresult"]["idlist"]
        .as_array()
        .map(|ids| {
            ids.iter()
                .filter_map(|id| id.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Build candidates from an `esummary` result, in the PMID order the search
/// leg returned. Records the summary endpoint does not know are skipped.
fn parse_summaries(body: &Value, pmids: &[String]) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for pmid in pmids {
        let record = &body["result"][pmid.as_str()];
        if record.is_null() {
            continue;
        }

        let title = record["title"].as_str().unwrap_or("Untitled").to_string();
        let authors: Vec<String> = record["authors"]
            .as_array()
            .map(|list| {
                list.iter()
                    .take(3)
                    .filter_map(|author| author["name"].as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let journal = record["fulljournalname"].as_str().unwrap_or("");
        let year = record["pubdate"]
            .as_str()
            .and_then(|date| date.split_whitespace().next())
            .unwrap_or("");

        let mut snippet_parts = Vec::new();
        if !journal.is_empty() {
            snippet_parts.push(format!("Published in {journal}"));
        }
        if !year.is_empty() {
            snippet_parts.push(format!("({year})"));
        }
        snippet_parts.push("Medical/Life Sciences research".to_string());

        candidates.push(Candidate {
            snippet: snippet_parts.join(". "),
            title,
            url: format!("https://pubmed.ncbi.nlm.nih.gov/{pmid}/"),
            domain: "pubmed.ncbi.nlm.nih.gov".into(),
            author: (!authors.is_empty()).then(|| authors.join(", ")),
            source_type: SourceType::Journal,
            provider_name: "pubmed".into(),
        });
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pmids_parse_from_search_leg() {
        let body = json!({
            "esearchresult": {"count": "2", "idlist": ["12345678", "87654321"]}
        });
        assert_eq!(parse_pmids(&body), vec!["12345678", "87654321"]);
        assert!(parse_pmids(&json!({})).is_empty());
    }

    #[test]
    fn summaries_parse_into_candidates() {
        let pmids = vec!["12345678".to_string(), "99999999".to_string()];
        let body = json!({
            "result": {
                "uids": ["12345678"],
                "12345678": {
                    "title": "Gut microbiome and human health",
                    "authors": [{"name": "Smith J"}, {"name": "Doe A"}],
                    "fulljournalname": "Nature Medicine",
                    "pubdate": "2021 Mar 15"
                }
            }
        });

        let candidates = parse_summaries(&body, &pmids);
        assert_eq!(candidates.len(), 1);

        let first = &candidates[0];
        assert_eq!(first.title, "Gut microbiome and human health");
        assert_eq!(first.url, "https://pubmed.ncbi.nlm.nih.gov/12345678/");
        assert_eq!(
            first.snippet,
            "Published in Nature Medicine. (2021). Medical/Life Sciences research"
        );
        assert_eq!(first.author.as_deref(), Some("Smith J, Doe A"));
        assert_eq!(first.source_type, SourceType::Journal);
    }

    #[test]
    fn sparse_summary_still_produces_candidate() {
        let pmids = vec!["1".to_string()];
        let body = json!({"result": {"1": {}}});
        let candidates = parse_summaries(&body, &pmids);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Untitled");
        assert_eq!(candidates[0].snippet, "Medical/Life Sciences research");
    }
}
