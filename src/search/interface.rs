use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One organic search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search is not configured: {0} is missing")]
    MissingCredentials(&'static str),
    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("search API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("search response is not valid JSON: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

/// Web search backend
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Return at most `count` results for `query`, best first
    async fn search(&self, query: &str, count: u8) -> Result<Vec<SearchHit>, SearchError>;
}
