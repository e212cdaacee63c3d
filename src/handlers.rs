use axum::{
    extract::{Query, State},
    http::StatusCode,
    Form, Json,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::search::SearchHit;
use crate::state::AppState;
use crate::twiml::{Gather, VoiceResponse};

pub const VOICE_PATH: &str = "/voice";
pub const SERVICE_NAME: &str = "callbridge";

pub const GREETING: &str = "Hello! How can I help you today?";
pub const NO_INPUT_GOODBYE: &str = "I didn't hear anything. Goodbye!";

/// Google caps a single Custom Search page at ten results.
const MAX_SEARCH_RESULTS: u8 = 10;

/// Fields Twilio posts to a voice webhook that this service reads.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VoiceWebhook {
    pub call_sid: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub speech_result: Option<String>,
    pub confidence: Option<String>,
}

impl VoiceWebhook {
    /// Transcribed speech, if the caller said anything.
    pub fn speech(&self) -> Option<&str> {
        self.speech_result
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Twilio voice webhook: answer the call or reply to the caller's speech.
///
/// Every response ends by gathering more speech with this endpoint as the
/// action. On a turn without speech the caller is greeted, and if the gather
/// times out they hear a goodbye before the call is hung up.
pub async fn voice(
    State(state): State<AppState>,
    form: Option<Form<VoiceWebhook>>,
) -> VoiceResponse {
    let webhook = form.map(|Form(webhook)| webhook).unwrap_or_default();
    let mut response = VoiceResponse::new();

    match webhook.speech() {
        Some(speech) => {
            info!(
                call_sid = ?webhook.call_sid,
                from = ?webhook.from,
                confidence = ?webhook.confidence,
                "User said: {}", speech
            );
            let reply = match state.workflow.run(speech).await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!(call_sid = ?webhook.call_sid, "Workflow call failed: {}", e);
                    e.spoken_fallback().to_string()
                }
            };
            response.say(reply).gather(Gather::speech(VOICE_PATH));
        }
        None => {
            info!(call_sid = ?webhook.call_sid, to = ?webhook.to, "Greeting caller");
            response
                .say(GREETING)
                .gather(Gather::speech(VOICE_PATH))
                .say(NO_INPUT_GOODBYE)
                .hangup();
        }
    }

    response
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    /// Kept as text so out-of-range or junk values fall back instead of 400ing.
    pub num: Option<String>,
}

impl SearchParams {
    /// Requested result count clamped to what one API page can return.
    /// Unparsable values use `default`.
    pub fn count(&self, default: u8) -> u8 {
        let requested = self
            .num
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .unwrap_or(i64::from(default));
        u8::try_from(requested.clamp(1, i64::from(MAX_SEARCH_RESULTS)))
            .unwrap_or(MAX_SEARCH_RESULTS)
    }
}

#[derive(Debug, Serialize)]
pub struct RankedHit {
    pub index: usize,
    #[serde(flatten)]
    pub hit: SearchHit,
}

#[derive(Debug, Serialize)]
pub struct SearchReport {
    pub status: &'static str,
    pub message: String,
    pub results_count: usize,
    pub results: Vec<RankedHit>,
}

/// Run a web search and return the top results.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> (StatusCode, Json<SearchReport>) {
    let search_config = &state.config.search;
    let count = params.count(search_config.result_count);
    let query = params
        .q
        .filter(|q| !q.trim().is_empty())
        .unwrap_or_else(|| search_config.default_query.clone());

    match state.search.search(&query, count).await {
        Ok(hits) => {
            info!("Found {} results for {:?}", hits.len(), query);
            let results: Vec<RankedHit> = hits
                .into_iter()
                .enumerate()
                .map(|(i, hit)| RankedHit { index: i + 1, hit })
                .collect();
            (
                StatusCode::OK,
                Json(SearchReport {
                    status: "success",
                    message: format!("Found {} results for '{}'", results.len(), query),
                    results_count: results.len(),
                    results,
                }),
            )
        }
        Err(e) => {
            error!("Search failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SearchReport {
                    status: "error",
                    message: e.to_string(),
                    results_count: 0,
                    results: Vec::new(),
                }),
            )
        }
    }
}

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    }))
}
