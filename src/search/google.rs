use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::interface::{SearchError, SearchHit, SearchProvider};
use crate::config::SearchConfig;

/// Google Custom Search JSON API
#[derive(Debug, Clone)]
pub struct GoogleSearch {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    engine_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
}

impl From<RawItem> for SearchHit {
    fn from(item: RawItem) -> Self {
        Self {
            title: item.title.unwrap_or_else(|| "No title".to_string()),
            link: item.link.unwrap_or_else(|| "No link".to_string()),
            snippet: item.snippet.unwrap_or_else(|| "No snippet".to_string()),
        }
    }
}

impl GoogleSearch {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            engine_id: config.engine_id.clone(),
        }
    }
}

#[async_trait]
impl SearchProvider for GoogleSearch {
    async fn search(&self, query: &str, count: u8) -> Result<Vec<SearchHit>, SearchError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(SearchError::MissingCredentials("GOOGLE_API_KEY"))?;
        let cx = self
            .engine_id
            .as_deref()
            .ok_or(SearchError::MissingCredentials("GOOGLE_CSE_ID"))?;

        info!(query, count, "Searching");
        let num = count.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("key", key), ("cx", cx), ("q", query), ("num", num.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status { status, body });
        }

        let body = response.bytes().await?;
        let parsed: SearchResponse = serde_json::from_slice(&body)?;
        let hits: Vec<SearchHit> = parsed
            .items
            .into_iter()
            .take(usize::from(count))
            .map(SearchHit::from)
            .collect();

        debug!("Found {} results for {:?}", hits.len(), query);
        Ok(hits)
    }
}
