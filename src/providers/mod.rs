//! Provider adapters: a uniform capability interface over heterogeneous
//! external snippet sources.
//!
//! Every adapter implements [`SearchProvider`]: build a provider-specific
//! query, issue one or more bounded network calls through the shared pooled
//! client, and parse the native response format (Atom, JSON, or result-page
//! HTML) into [`Candidate`] records. Missing or malformed fields degrade to
//! empty strings; a failing provider returns a typed [`ProviderError`]
//! that the retrieval coordinator absorbs, so one bad source only ever
//! means fewer candidates.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ProviderError;
use crate::types::Candidate;

mod arxiv;
mod bing;
mod crossref;
mod duckduckgo;
mod pubmed;
mod semantic_scholar;

pub use arxiv::ArxivProvider;
pub use bing::BingProvider;
pub use crossref::CrossrefProvider;
pub use duckduckgo::DuckDuckGoProvider;
pub use pubmed::PubMedProvider;
pub use semantic_scholar::SemanticScholarProvider;

/// Identifying header sent to the metadata APIs.
pub(crate) const API_USER_AGENT: &str = "crosscheck/0.1 (+https://github.com/bravo1goingdark/crosscheck)";

/// Browser-style header for the public result pages, which reject obvious bots.
pub(crate) const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Per-request timeout applied to every provider call.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// Process-wide HTTP client with connection pooling. Read-only after
// construction, safe for unlimited concurrent callers.
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(16)
        .build()
        .expect("failed to build HTTP client")
});

/// An external source of candidate snippets.
///
/// Implementations must be cheap to share (`Send + Sync`) and must not hold
/// mutable state across calls; each `search` is independent.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Stable provider name, recorded on every candidate it produces.
    fn name(&self) -> &'static str;

    /// Look up snippets for one query. At most `max_results` candidates
    /// come back; errors are typed and recovered by the caller.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<Candidate>, ProviderError>;
}

/// GET a provider URL and return the response body as text.
pub(crate) async fn fetch_text(
    url: &str,
    query: &[(&str, String)],
    user_agent: &str,
) -> Result<String, ProviderError> {
    let response = HTTP_CLIENT
        .get(url)
        .query(query)
        .header(reqwest::header::USER_AGENT, user_agent)
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status(status.as_u16()));
    }
    Ok(response.text().await?)
}

/// GET a provider URL and parse the response body as JSON.
pub(crate) async fn fetch_json(
    url: &str,
    query: &[(&str, String)],
    user_agent: &str,
) -> Result<serde_json::Value, ProviderError> {
    let body = fetch_text(url, query, user_agent).await?;
    serde_json::from_str(&body).map_err(|e| ProviderError::Parse(e.to_string()))
}

/// Truncate a query on a char boundary. Providers cap query length rather
/// than rejecting long sentences outright.
pub(crate) fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Replace characters a strict query parser rejects with spaces and
/// collapse the result.
pub(crate) fn strip_query_punctuation(s: &str) -> String {
    let replaced: String = s
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch == '_' || ch.is_whitespace() {
                ch
            } else {
                ' '
            }
        })
        .collect();
    crate::segment::normalize_whitespace(&replaced)
}

/// Host part of a URL, or empty when the URL does not parse.
pub(crate) fn domain_of(url: &str) -> String {
    reqwest::Url::parse(url.trim())
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_default()
}

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

/// Flatten an HTML fragment to plain text. Scraped snippets carry inline
/// markup (`<b>`, entities): tags are stripped first so the renderer adds
/// no emphasis markers, then html2text decodes the entities.
pub(crate) fn flatten_html(fragment: &str) -> String {
    let stripped = TAG_RE.replace_all(fragment, " ");
    let text = html2text::from_read(stripped.as_bytes(), 400).unwrap_or_else(|_| stripped.into_owned());
    crate::segment::normalize_whitespace(&text)
}

/// First `max_chars` characters of a snippet, with an ellipsis when cut.
pub(crate) fn clip_snippet(text: &str, max_chars: usize) -> String {
    let clipped = truncate_chars(text, max_chars);
    if clipped.len() < text.len() {
        format!("{clipped}...")
    } else {
        clipped.to_string()
    }
}
