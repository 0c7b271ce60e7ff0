//! arXiv preprint search over the public Atom feed.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ProviderError;
use crate::types::{Candidate, SourceType};

use super::{
    clip_snippet, domain_of, fetch_text, flatten_html, strip_query_punctuation, truncate_chars,
    SearchProvider, API_USER_AGENT,
};

const ENDPOINT: &str = "https://export.arxiv.org/api/query";
const MAX_QUERY_CHARS: usize = 200;
const SNIPPET_CHARS: usize = 200;

static ENTRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<entry>(.*?)</entry>").expect("valid entry regex"));
static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<title[^>]*>(.*?)</title>").expect("valid title regex"));
static SUMMARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<summary[^>]*>(.*?)</summary>").expect("valid summary regex"));
static ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<id>(.*?)</id>").expect("valid id regex"));
static AUTHOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<name>(.*?)</name>").expect("valid author regex"));

/// Atom/XML adapter for `export.arxiv.org`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArxivProvider;

impl ArxivProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SearchProvider for ArxivProvider {
    fn name(&self) -> &'static str {
        "arxiv"
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<Candidate>, ProviderError> {
        // The arXiv query parser rejects most punctuation; strip it up front.
        let cleaned = strip_query_punctuation(query);
        let cleaned = truncate_chars(&cleaned, MAX_QUERY_CHARS);
        let params = [
            ("search_query", format!("all:{cleaned}")),
            ("start", "0".into()),
            ("max_results", max_results.to_string()),
            ("sortBy", "relevance".into()),
            ("sortOrder", "descending".into()),
        ];
        let body = fetch_text(ENDPOINT, &params, API_USER_AGENT).await?;
        Ok(parse_atom_feed(&body, max_results))
    }
}

/// Pull candidates out of an Atom feed. There is no XML crate in this
/// stack; entries are small and regular enough that compiled regexes over
/// the `<entry>` blocks extract every field we use. Entries missing a title
/// or abstract are skipped; other fields degrade to empty strings.
fn parse_atom_feed(xml: &str, max_results: usize) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for entry in ENTRY_RE.captures_iter(xml).take(max_results) {
        let block = &entry[1];
        let title = capture_text(&TITLE_RE, block);
        let summary = capture_text(&SUMMARY_RE, block);
        if title.is_empty() || summary.is_empty() {
            continue;
        }
        let url = capture_text(&ID_RE, block);
        let authors: Vec<String> = AUTHOR_RE
            .captures_iter(block)
            .take(3)
            .map(|c| flatten_html(&c[1]))
            .filter(|name| !name.is_empty())
            .collect();

        candidates.push(Candidate {
            snippet: clip_snippet(&summary, SNIPPET_CHARS),
            title,
            domain: domain_of(&url),
            url,
            author: (!authors.is_empty()).then(|| authors.join(", ")),
            source_type: SourceType::Preprint,
            provider_name: "arxiv".into(),
        });
    }
    candidates
}

fn capture_text(re: &Regex, block: &str) -> String {
    re.captures(block)
        .map(|c| flatten_html(&c[1]))
        .unwrap_or_default()
}
