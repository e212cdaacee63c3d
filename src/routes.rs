use axum::{
    middleware,
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{health_check, search, voice, VOICE_PATH};
use crate::signature::require_twilio_signature;
use crate::state::AppState;

pub fn create_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // Twilio voice webhook
        .route(
            VOICE_PATH,
            get(voice)
                .post(voice)
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_twilio_signature,
                )),
        )
        .route("/search", get(search))
        .route("/health", get(health_check))
}

/// Full application router with shared layers applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes(&state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
