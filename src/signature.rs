//! Twilio request signing (`X-Twilio-Signature`).
//!
//! The signature is base64(HMAC-SHA1(auth_token, url + params)) where `url` is
//! the full URL Twilio requested and `params` are the POSTed form fields
//! sorted by name, each written as name immediately followed by value.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha1::Sha1;
use thiserror::Error;
use tracing::{debug, warn};

use crate::state::AppState;

type HmacSha1 = Hmac<Sha1>;

pub const SIGNATURE_HEADER: &str = "x-twilio-signature";

const MAX_WEBHOOK_BODY: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("missing X-Twilio-Signature header")]
    Missing,
    #[error("X-Twilio-Signature does not match request")]
    Mismatch,
    #[error("signature validation is enabled but {0} is not configured")]
    NotConfigured(&'static str),
    #[error("failed to read webhook body: {0}")]
    Body(String),
}

impl IntoResponse for SignatureError {
    fn into_response(self) -> Response {
        let status = match self {
            SignatureError::Missing | SignatureError::Mismatch => StatusCode::FORBIDDEN,
            SignatureError::NotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SignatureError::Body(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

fn signing_mac(auth_token: &str, url: &str, params: &[(String, String)]) -> Option<HmacSha1> {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort();

    // HMAC accepts keys of any length, so this only fails on an impossible digest.
    let mut mac = HmacSha1::new_from_slice(auth_token.as_bytes()).ok()?;
    mac.update(url.as_bytes());
    for (name, value) in sorted {
        mac.update(name.as_bytes());
        mac.update(value.as_bytes());
    }
    Some(mac)
}

/// Compute the expected signature for `url` and form `params`.
pub fn compute_signature(auth_token: &str, url: &str, params: &[(String, String)]) -> String {
    signing_mac(auth_token, url, params)
        .map(|mac| STANDARD.encode(mac.finalize().into_bytes()))
        .unwrap_or_default()
}

/// Check a base64 `signature` against `url` and form `params` in constant time.
pub fn verify_signature(
    auth_token: &str,
    url: &str,
    params: &[(String, String)],
    signature: &str,
) -> bool {
    let Ok(provided) = STANDARD.decode(signature.trim()) else {
        return false;
    };
    signing_mac(auth_token, url, params)
        .map(|mac| mac.verify_slice(&provided).is_ok())
        .unwrap_or(false)
}

/// Rejects webhook calls without a valid signature when validation is enabled.
pub async fn require_twilio_signature(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, SignatureError> {
    if !state.config.twilio.validate_signature {
        return Ok(next.run(request).await);
    }

    let token = state
        .config
        .twilio
        .auth_token
        .as_deref()
        .ok_or(SignatureError::NotConfigured("TWILIO_AUTH_TOKEN"))?;
    let base_url = state
        .config
        .server
        .public_base_url
        .as_deref()
        .ok_or(SignatureError::NotConfigured("PUBLIC_BASE_URL"))?;

    let signature = request
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or(SignatureError::Missing)?;

    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let url = format!("{}{}", base_url.trim_end_matches('/'), path_and_query);

    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, MAX_WEBHOOK_BODY)
        .await
        .map_err(|e| SignatureError::Body(e.to_string()))?;

    let params: Vec<(String, String)> = if parts.method == Method::POST {
        url::form_urlencoded::parse(&bytes)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    } else {
        Vec::new()
    };

    if !verify_signature(token, &url, &params, &signature) {
        warn!(url = %url, "Rejected webhook with invalid signature");
        return Err(SignatureError::Mismatch);
    }
    debug!(url = %url, "Webhook signature verified");

    let request = Request::from_parts(parts, Body::from(bytes));
    Ok(next.run(request).await)
}
