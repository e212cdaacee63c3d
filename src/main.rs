use anyhow::Result;
use std::net::{IpAddr, SocketAddr};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use callbridge::config::{Config, EXAMPLE_ENV};
use callbridge::{app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("callbridge=debug,tower_http=debug")),
        )
        .init();

    let config = match std::env::var("CONFIG_PATH") {
        Ok(path) => {
            let config = Config::load(&path)?;
            info!("Loaded configuration from: {}", path);
            config
        }
        Err(_) => Config::from_env()?,
    };

    let missing = config.missing_required();
    if !missing.is_empty() {
        error!("Please set {} environment variables.", missing.join(", "));
        error!("You can create a .env file in the working directory, for example:\n{}", EXAMPLE_ENV);
        anyhow::bail!("missing required configuration: {}", missing.join(", "));
    }

    if config.search.api_key.is_none() || config.search.engine_id.is_none() {
        warn!("GOOGLE_API_KEY or GOOGLE_CSE_ID not set; /search will return errors");
    }
    if config.twilio.validate_signature && config.server.public_base_url.is_none() {
        warn!("TWILIO_VALIDATE_SIGNATURE is on but PUBLIC_BASE_URL is not set; /voice will reject calls");
    }

    let host: IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::new(host, config.server.port);

    let app_state = AppState::new(config)?;
    let app = app(app_state);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
