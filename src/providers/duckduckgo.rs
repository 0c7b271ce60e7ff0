//! DuckDuckGo web search via the plain-HTML results page.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ProviderError;
use crate::types::{Candidate, SourceType};

use super::{
    domain_of, fetch_text, flatten_html, truncate_chars, SearchProvider, BROWSER_USER_AGENT,
};

const ENDPOINT: &str = "https://html.duckduckgo.com/html/";
const MAX_QUERY_CHARS: usize = 100;

static RESULT_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<a[^>]*class="result__a"[^>]*href="([^"]*)"[^>]*>(.*?)</a>"#)
        .expect("valid result link regex")
});
static SNIPPET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)class="result__snippet"[^>]*>(.*?)</a>"#).expect("valid snippet regex")
});

/// HTML-scrape adapter for `html.duckduckgo.com`. The page is static
/// markup with stable `result__*` class names; links and snippets are
/// extracted pairwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct DuckDuckGoProvider;

impl DuckDuckGoProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<Candidate>, ProviderError> {
        let params = [("q", truncate_chars(query, MAX_QUERY_CHARS).to_string())];
        let body = fetch_text(ENDPOINT, &params, BROWSER_USER_AGENT).await?;
        Ok(parse_results(&body, max_results))
    }
}

fn parse_results(html: &str, max_results: usize) -> Vec<Candidate> {
    let links = RESULT_LINK_RE.captures_iter(html);
    let snippets = SNIPPET_RE.captures_iter(html);

    let mut candidates = Vec::new();
    for (link, snippet) in links.zip(snippets).take(max_results) {
        let url = resolve_result_url(&link[1]);
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
            provider_name: "duckduckgo".into(),
        });
    }
    candidates
}

/// Result hrefs are protocol-relative redirect links carrying the real
/// target percent-encoded in the `uddg` parameter; unwrap it when present.
fn resolve_result_url(href: &str) -> String {
    let absolute = if let Some(rest) = href.strip_prefix("//") {
        format!("https://{rest}")
    } else if href.starts_with('/') {
        format!("https://duckduckgo.com{href}")
    } else {
        href.to_string()
    };

    if let Ok(parsed) = reqwest::Url::parse(&absolute) {
        if let Some((_, target)) = parsed.query_pairs().find(|(key, _)| key == "uddg") {
            return target.into_owned();
        }
    }
    absolute
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
<div class="result results_links results_links_deep web-result">
  <h2 class="result__title">
    <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fen.wikipedia.org%2Fwiki%2FMachine_learning&amp;rut=abc">Machine learning - Wikipedia</a>
  </h2>
  <a class="result__snippet" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fen.wikipedia.org%2Fwiki%2FMachine_learning">Machine learning is a field of study in <b>artificial intelligence</b> concerned with algorithms.</a>
</div>
<div class="result results_links results_links_deep web-result">
  <h2 class="result__title">
    <a rel="nofollow" class="result__a" href="https://www.bbc.co.uk/news/technology">AI news coverage</a>
  </h2>
  <a class="result__snippet" href="https://www.bbc.co.uk/news/technology">Latest reporting on artificial intelligence.</a>
</div>
</body></html>"#;

    #[test]
    fn results_parse_with_unwrapped_redirects() {
        let candidates = parse_results(PAGE, 5);
        assert_eq!(candidates.len(), 2);

        let first = &candidates[0];
        assert_eq!(first.title, "Machine learning - Wikipedia");
        assert_eq!(first.url, "https://en.wikipedia.org/wiki/Machine_learning");
        assert_eq!(first.domain, "en.wikipedia.org");
        assert_eq!(first.source_type, SourceType::Encyclopedia);
        assert!(first.snippet.contains("artificial intelligence"));
        assert!(!first.snippet.contains("<b>"));
    }

    #[test]
    fn direct_urls_pass_through_and_classify() {
        let candidates = parse_results(PAGE, 5);
        let second = &candidates[1];
        assert_eq!(second.url, "https://www.bbc.co.uk/news/technology");
        assert_eq!(second.source_type, SourceType::News);
    }

    #[test]
    fn result_cap_applies() {
        assert_eq!(parse_results(PAGE, 1).len(), 1);
    }

    #[test]
    fn pages_without_results_yield_nothing() {
        assert!(parse_results("<html><body>No results.</body></html>", 5).is_empty());
    }

    #[test]
    fn relative_hrefs_are_anchored_to_duckduckgo() {
        assert_eq!(
            resolve_result_url("/l/?kh=1"),
            "https://duckduckgo.com/l/?kh=1"
        );
    }
}
