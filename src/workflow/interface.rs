use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body posted to the workflow run endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRequest {
    pub input_value: String,
    pub output_type: String,
    pub input_type: String,
}

impl WorkflowRequest {
    /// Chat-in, chat-out run for a single utterance
    pub fn chat(input: &str) -> Self {
        Self {
            input_value: input.to_string(),
            output_type: "chat".to_string(),
            input_type: "chat".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("workflow endpoint is not configured")]
    NotConfigured,
    #[error("workflow request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("workflow endpoint returned {0}")]
    Status(reqwest::StatusCode),
    #[error("workflow response is not valid JSON: {0}")]
    InvalidBody(#[from] serde_json::Error),
    #[error("workflow response carried no reply text")]
    NoReply,
    #[error("workflow response has an unexpected shape: {0}")]
    Malformed(String),
}

impl WorkflowError {
    /// Sentence spoken to the caller in place of a reply
    pub fn spoken_fallback(&self) -> &'static str {
        match self {
            WorkflowError::NotConfigured => "I'm sorry, the AI service is not configured.",
            WorkflowError::Transport(_) | WorkflowError::Status(_) => {
                "I'm sorry, I'm having trouble connecting to the AI service right now."
            }
            WorkflowError::InvalidBody(_) => {
                "I'm sorry, I received an invalid response from the AI service."
            }
            WorkflowError::NoReply => {
                "I received a response from the AI, but couldn't extract the message."
            }
            WorkflowError::Malformed(_) => {
                "I received a response from the AI, but couldn't parse it properly."
            }
        }
    }
}

/// Conversational workflow that turns caller speech into a reply
#[async_trait]
pub trait WorkflowClient: Send + Sync {
    /// Run the workflow for one utterance and return the text to speak
    async fn run(&self, input: &str) -> Result<String, WorkflowError>;
}
