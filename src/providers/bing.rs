//! Bing web search via the public results page.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ProviderError;
use crate::types::{Candidate, SourceType};

use super::{
    domain_of, fetch_text, flatten_html, truncate_chars, SearchProvider, BROWSER_USER_AGENT,
};

const ENDPOINT: &str = "https://www.bing.com/search";
const MAX_QUERY_CHARS: usize = 100;

static RESULT_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<li class="b_algo"[^>]*>(.*?)</li>"#).expect("valid result block regex")
});
static TITLE_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<h2[^>]*>\s*<a[^>]*href="([^"]*)"[^>]*>(.*?)</a>"#)
        .expect("valid title link regex")
});
static SNIPPET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<p[^>]*>(.*?)</p>").expect("valid snippet regex"));

/// HTML-scrape adapter for `bing.com/search`. Organic results sit in
/// `li.b_algo` blocks with an `h2 > a` title link and a `p` snippet.
#[derive(Debug, Default, Clone, Copy)]
pub struct BingProvider;

impl BingProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SearchProvider for BingProvider {
    fn name(&self) -> &'static str {
        "bing"
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<Candidate>, ProviderError> {
        let params = [
            ("q", truncate_chars(query, MAX_QUERY_CHARS).to_string()),
            ("form", "QBLH".into()),
        ];
        let body = fetch_text(ENDPOINT, &params, BROWSER_USER_AGENT).await?;
        Ok(parse_results(&body, max_results))
    }
}

fn parse_results(html: &str, max_results: usize) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for block in RESULT_BLOCK_RE.captures_iter(html).take(max_results) {
        let block = &block[1];
        let Some(link) = TITLE_LINK_RE.captures(block) else {
            continue;
        };
        let Some(snippet) = SNIPPET_RE.captures(block) else {
            continue;
        };

        let url = link[1].to_string();
        let title = flatten_html(&link[2]);
        let snippet = flatten_html(&snippet[1]);
        if title.is_empty() || url.is_empty() || snippet.is_empty() {
            continue;
        }
        let domain = domain_of(&url);
        candidates.push(Candidate {
            snippet,
            title,
            url,
            source_type: SourceType::for_domain(&domain),
            domain,
            author: None,
            provider_name: "bing".into(),
        });
    }
    candidates
}
