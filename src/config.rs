use serde::{Deserialize, Serialize};
use std::fs;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub twilio: TwilioConfig,
    #[serde(default)]
    pub langflow: LangflowConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Externally visible base URL, e.g. `https://voice.example.com`.
    /// Twilio signs the URL it called, so signature checks need it.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TwilioConfig {
    #[serde(default)]
    pub account_sid: Option<String>,
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default)]
    pub validate_signature: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LangflowConfig {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub engine_id: Option<String>,
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_search_query")]
    pub default_query: String,
    #[serde(default = "default_result_count")]
    pub result_count: u8,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_search_endpoint() -> String {
    "https://www.googleapis.com/customsearch/v1".to_string()
}

fn default_search_query() -> String {
    "S3 bucket interview questions AWS".to_string()
}

fn default_result_count() -> u8 {
    3
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_base_url: None,
        }
    }
}

impl Default for LangflowConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            engine_id: None,
            endpoint: default_search_endpoint(),
            default_query: default_search_query(),
            result_count: default_result_count(),
        }
    }
}

/// Variables the service refuses to start without.
pub const REQUIRED_VARS: [&str; 3] = ["TWILIO_ACCOUNT_SID", "TWILIO_AUTH_TOKEN", "LANGFLOW_API_URL"];

/// Printed when required variables are missing.
pub const EXAMPLE_ENV: &str = "\
TWILIO_ACCOUNT_SID=ACxxxxxxxxxxxxxxxxxxxxxxxxxxxxx
TWILIO_AUTH_TOKEN=your_auth_token
LANGFLOW_API_URL=http://localhost:7860/api/v1/run/your_flow_id
LANGFLOW_API_KEY=your_langflow_api_key_if_any";

impl Config {
    /// Build from defaults plus process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Read a YAML file, then let the environment override it.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        let mut config: Config =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_string(),
                source,
            })?;
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Overlay values found through `lookup`. Empty values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = parse_var(&get, "PORT")? {
            self.server.port = port;
        }
        if let Some(url) = get("PUBLIC_BASE_URL") {
            self.server.public_base_url = Some(url);
        }

        if let Some(sid) = get("TWILIO_ACCOUNT_SID") {
            self.twilio.account_sid = Some(sid);
        }
        if let Some(token) = get("TWILIO_AUTH_TOKEN") {
            self.twilio.auth_token = Some(token);
        }
        if let Some(validate) = parse_var(&get, "TWILIO_VALIDATE_SIGNATURE")? {
            self.twilio.validate_signature = validate;
        }

        if let Some(url) = get("LANGFLOW_API_URL") {
            self.langflow.api_url = Some(url);
        }
        if let Some(key) = get("LANGFLOW_API_KEY") {
            self.langflow.api_key = Some(key);
        }
        if let Some(timeout) = parse_var(&get, "LANGFLOW_TIMEOUT_SECS")? {
            self.langflow.timeout_secs = timeout;
        }

        if let Some(key) = get("GOOGLE_API_KEY") {
            self.search.api_key = Some(key);
        }
        if let Some(cx) = get("GOOGLE_CSE_ID") {
            self.search.engine_id = Some(cx);
        }
        if let Some(endpoint) = get("GOOGLE_SEARCH_URL") {
            self.search.endpoint = endpoint;
        }
        if let Some(query) = get("SEARCH_DEFAULT_QUERY") {
            self.search.default_query = query;
        }
        if let Some(count) = parse_var(&get, "SEARCH_RESULT_COUNT")? {
            self.search.result_count = count;
        }

        Ok(())
    }

    /// Names of required variables that are still unset.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let present = [
            self.twilio.account_sid.is_some(),
            self.twilio.auth_token.is_some(),
            self.langflow.api_url.is_some(),
        ];
        REQUIRED_VARS
            .iter()
            .zip(present)
            .filter(|(_, present)| !present)
            .map(|(name, _)| *name)
            .collect()
    }
}

fn parse_var<T, G>(get: &G, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value: raw }),
        None => Ok(None),
    }
}
