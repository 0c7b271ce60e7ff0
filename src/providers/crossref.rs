//! CrossRef published-works search (JSON REST API).

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ProviderError;
use crate::types::{Candidate, SourceType};

use super::{domain_of, fetch_json, truncate_chars, SearchProvider, API_USER_AGENT};

const ENDPOINT: &str = "https://api.crossref.org/works";
const MAX_QUERY_CHARS: usize = 500;

/// JSON adapter for `api.crossref.org`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrossrefProvider;

impl CrossrefProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SearchProvider for CrossrefProvider {
    fn name(&self) -> &'static str {
        "crossref"
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<Candidate>, ProviderError> {
        let params = [
            ("query", truncate_chars(query, MAX_QUERY_CHARS).to_string()),
            ("rows", max_results.to_string()),
            ("sort", "relevance".into()),
            ("order", "desc".into()),
        ];
        let body = fetch_json(ENDPOINT, &params, API_USER_AGENT).await?;
        Ok(parse_works(&body, max_results))
    }
}

/// Walk the `message.items` array. Field shapes vary per record; anything
/// missing degrades to an empty string rather than dropping the response.
fn parse_works(body: &Value, max_results: usize) -> Vec<Candidate> {
    let Some(items) = body["message"]["items"].as_array() else {
        return Vec::new();
    };

    let mut candidates = Vec::new();
    for item in items.iter().take(max_results) {
        let title = item["title"][0].as_str().unwrap_or("Untitled").to_string();

        let authors: Vec<String> = item["author"]
            .as_array()
            .map(|list| {
                list.iter()
                    .take(3)
                    .filter_map(|author| {
                        let family = author["family"].as_str()?;
                        let given = author["given"].as_str().unwrap_or("");
                        Some(format!("{given} {family}").trim().to_string())
                    })
                    .collect()
            })
            .unwrap_or_default();

        let journal = item["container-title"][0].as_str().unwrap_or("").to_string();
        let year = publication_year(item);

        let mut url = item["URL"].as_str().unwrap_or("").to_string();
        if url.is_empty() {
            if let Some(doi) = item["DOI"].as_str() {
                url = format!("https://doi.org/{doi}");
            }
        }

        let mut snippet_parts = Vec::new();
        if !journal.is_empty() {
            snippet_parts.push(format!("Published in {journal}"));
        }
        if !year.is_empty() {
            snippet_parts.push(format!("({year})"));
        }
        let snippet = if snippet_parts.is_empty() {
            "Academic publication".to_string()
        } else {
            snippet_parts.join(". ")
        };

        candidates.push(Candidate {
            snippet,
            title,
            domain: domain_of(&url),
            url,
            author: (!authors.is_empty()).then(|| authors.join(", ")),
            source_type: SourceType::Journal,
            provider_name: "crossref".into(),
        });
    }
    candidates
}

/// Year from `published-print` falling back to `published-online`.
fn publication_year(item: &Value) -> String {
    for key in ["published-print", "published-online"] {
        if let Some(year) = item[key]["date-parts"][0][0].as_i64() {
            return year.to_string();
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_body() -> Value {
        json!({
            "status": "ok",
            "message": {
                "items": [
                    {
                        "title": ["Deep Residual Learning for Image Recognition"],
                        "author": [
                            {"given": "Kaiming", "family": "He"},
                            {"given": "Xiangyu", "family": "Zhang"},
                            {"given": "Shaoqing", "family": "Ren"},
                            {"given": "Jian", "family": "Sun"}
                        ],
                        "container-title": ["IEEE CVPR"],
                        "published-print": {"date-parts": [[2016, 6]]},
                        "URL": "https://doi.org/10.1109/cvpr.2016.90",
                        "DOI": "10.1109/cvpr.2016.90"
                    },
                    {
                        "title": [],
                        "DOI": "10.0000/sparse.record"
                    }
                ]
            }
        })
    }

    #[test]
    fn works_parse_into_candidates() {
        let candidates = parse_works(&sample_body(), 5);
        assert_eq!(candidates.len(), 2);

        let first = &candidates[0];
        assert_eq!(first.title, "Deep Residual Learning for Image Recognition");
        assert_eq!(first.author.as_deref(), Some("Kaiming He, Xiangyu Zhang, Shaoqing Ren"));
        assert_eq!(first.snippet, "Published in IEEE CVPR. (2016)");
        assert_eq!(first.domain, "doi.org");
        assert_eq!(first.source_type, SourceType::Journal);
    }

    #[test]
    fn sparse_records_degrade_instead_of_failing() {
        let candidates = parse_works(&sample_body(), 5);
        let sparse = &candidates[1];
        assert_eq!(sparse.title, "Untitled");
        assert_eq!(sparse.url, "https://doi.org/10.0000/sparse.record");
        assert_eq!(sparse.snippet, "Academic publication");
        assert!(sparse.author.is_none());
    }

    #[test]
    fn missing_items_yield_nothing() {
        assert!(parse_works(&json!({"message": {}}), 5).is_empty());
        assert!(parse_works(&json!({}), 5).is_empty());
    }

    #[test]
    fn row_cap_is_respected() {
        assert_eq!(parse_works(&sample_body(), 1).len(), 1);
    }
}
