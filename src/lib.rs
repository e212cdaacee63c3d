//! Telephony webhook bridge: relays caller speech to a conversational
//! workflow and speaks the reply back as TwiML. Also exposes a web search
//! passthrough and a health check.

pub mod config;
pub mod handlers;
pub mod routes;
pub mod search;
pub mod signature;
pub mod state;
pub mod twiml;
pub mod workflow;

pub use config::Config;
pub use routes::app;
pub use state::AppState;
