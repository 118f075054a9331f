//! Wikipedia summaries via the MediaWiki action API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{LookupError, ReferenceLookup};

/// Public endpoint for English Wikipedia
pub const DEFAULT_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";

/// Looks up the best search hit for a topic and returns its lead sentences
#[derive(Debug, Clone)]
pub struct WikipediaClient {
    client: Client,
    endpoint: String,
    sentences: u32,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    query: Option<QueryResult>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    info: String,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    index: u32,
    extract: Option<String>,
    pageprops: Option<serde_json::Map<String, serde_json::Value>>,
}

impl Page {
    fn is_disambiguation(&self) -> bool {
        self.pageprops
            .as_ref()
            .is_some_and(|props| props.contains_key("disambiguation"))
    }
}

impl WikipediaClient {
    /// Create a client for `endpoint` asking for `sentences` lead sentences
    pub fn new(
        endpoint: impl Into<String>,
        sentences: u32,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            sentences: sentences.max(1),
        })
    }
}

#[async_trait]
impl ReferenceLookup for WikipediaClient {
    async fn summarize(&self, topic: &str) -> Result<String, LookupError> {
        let sentences = self.sentences.to_string();
        debug!(topic, endpoint = %self.endpoint, "wikipedia lookup");

        let response: ApiResponse = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
                ("generator", "search"),
                ("gsrsearch", topic),
                ("gsrlimit", "1"),
                ("prop", "extracts|pageprops"),
                ("ppprop", "disambiguation"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("exsentences", sentences.as_str()),
                ("redirects", "1"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(LookupError::Malformed(format!("{}: {}", error.code, error.info)));
        }

        let page = response
            .query
            .and_then(|query| query.pages.into_iter().min_by_key(|page| page.index))
            .ok_or_else(|| LookupError::NotFound(topic.to_string()))?;

        if page.is_disambiguation() {
            return Err(LookupError::Ambiguous(page.title));
        }

        let extract = page.extract.unwrap_or_default();
        let extract = extract.trim();
        if extract.is_empty() {
            return Err(LookupError::NotFound(page.title));
        }

        debug!(title = %page.title, "wikipedia summary found");
        Ok(extract.to_string())
    }
}
