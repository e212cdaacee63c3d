#![allow(dead_code)]

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response, Router};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

use callbridge::config::Config;
use callbridge::search::{SearchError, SearchHit, SearchProvider};
use callbridge::workflow::{WorkflowClient, WorkflowError};
use callbridge::{app, AppState};

/// Workflow stand-in that records every input it receives.
pub struct FakeWorkflow {
    outcome: Box<dyn Fn() -> Result<String, WorkflowError> + Send + Sync>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeWorkflow {
    pub fn replying(reply: &str) -> Arc<Self> {
        let reply = reply.to_string();
        Arc::new(Self {
            outcome: Box::new(move || Ok(reply.clone())),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(make: fn() -> WorkflowError) -> Arc<Self> {
        Arc::new(Self {
            outcome: Box::new(move || Err(make())),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkflowClient for FakeWorkflow {
    async fn run(&self, input: &str) -> Result<String, WorkflowError> {
        self.calls.lock().unwrap().push(input.to_string());
        (self.outcome)()
    }
}

/// Search stand-in returning canned hits and recording `(query, count)`.
pub struct FakeSearch {
    hits: Option<Vec<SearchHit>>,
    pub calls: Mutex<Vec<(String, u8)>>,
}

impl FakeSearch {
    pub fn with_hits(hits: Vec<SearchHit>) -> Arc<Self> {
        Arc::new(Self {
            hits: Some(hits),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn unconfigured() -> Arc<Self> {
        Arc::new(Self {
            hits: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(String, u8)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for FakeSearch {
    async fn search(&self, query: &str, count: u8) -> Result<Vec<SearchHit>, SearchError> {
        self.calls.lock().unwrap().push((query.to_string(), count));
        match &self.hits {
            Some(hits) => Ok(hits.iter().take(usize::from(count)).cloned().collect()),
            None => Err(SearchError::MissingCredentials("GOOGLE_API_KEY")),
        }
    }
}

pub fn hit(title: &str, link: &str, snippet: &str) -> SearchHit {
    SearchHit {
        title: title.to_string(),
        link: link.to_string(),
        snippet: snippet.to_string(),
    }
}

pub fn test_app(
    config: Config,
    workflow: Arc<dyn WorkflowClient>,
    search: Arc<dyn SearchProvider>,
) -> Router {
    app(AppState::with_clients(config, workflow, search))
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}
