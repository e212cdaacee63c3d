use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use super::extract::extract_reply;
use super::interface::{WorkflowClient, WorkflowError, WorkflowRequest};
use crate::config::LangflowConfig;

/// Client for a Langflow `run` endpoint
#[derive(Debug, Clone)]
pub struct LangflowClient {
    client: Client,
    api_url: Option<String>,
    api_key: Option<String>,
}

impl LangflowClient {
    pub fn new(config: &LangflowConfig) -> Result<Self, WorkflowError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        if let Some(url) = &config.api_url {
            info!("Initialized LangflowClient: api_url={}", url);
        }

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl WorkflowClient for LangflowClient {
    async fn run(&self, input: &str) -> Result<String, WorkflowError> {
        let url = self.api_url.as_deref().ok_or(WorkflowError::NotConfigured)?;

        info!(input, "Sending to Langflow");
        let mut request = self.client.post(url).json(&WorkflowRequest::chat(input));
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WorkflowError::Status(status));
        }

        let body = response.bytes().await?;
        let envelope: Value = serde_json::from_slice(&body)?;
        debug!(%envelope, "Received from Langflow");

        let reply = extract_reply(&envelope)?;
        info!(reply = %reply, "Extracted workflow reply");
        Ok(reply)
    }
}
