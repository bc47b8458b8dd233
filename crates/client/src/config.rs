//! Client configuration: backend origins and the relay path.

use std::env;

use url::Url;

#[cfg(target_os = "android")]
const DEFAULT_API_URL: &str = "http://10.0.2.2:3000";
#[cfg(not(target_os = "android"))]
const DEFAULT_API_URL: &str = "http://localhost:3000";

#[cfg(target_os = "android")]
const DEFAULT_MODEL_URL: &str = "http://10.0.2.2:8000";
#[cfg(not(target_os = "android"))]
const DEFAULT_MODEL_URL: &str = "http://localhost:8000";

const DEFAULT_CABLE_PATH: &str = "/cable";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is not a valid URL: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("{0} must use http or https")]
    UnsupportedScheme(&'static str),
}

/// Where the client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// REST backend origin; also hosts the relay.
    pub api_url: Url,
    /// Classification service origin.
    pub model_url: Url,
    pub cable_path: String,
}

impl ClientConfig {
    /// Host-platform defaults: the Android emulator reaches the host machine
    /// through 10.0.2.2.
    pub fn platform_default() -> Result<Self, ConfigError> {
        Self::new(DEFAULT_API_URL, DEFAULT_MODEL_URL)
    }

    pub fn new(api_url: &str, model_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_origin("api_url", api_url)?,
            model_url: parse_origin("model_url", model_url)?,
            cable_path: DEFAULT_CABLE_PATH.to_string(),
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `GREENWORLD_API_URL`: backend origin (default: platform dependent, port 3000)
    /// - `GREENWORLD_MODEL_URL`: classifier origin (default: platform dependent, port 8000)
    /// - `GREENWORLD_CABLE_PATH`: relay path on the backend (default: "/cable")
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_url =
            env::var("GREENWORLD_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let model_url =
            env::var("GREENWORLD_MODEL_URL").unwrap_or_else(|_| DEFAULT_MODEL_URL.to_string());

        let mut config = Self::new(&api_url, &model_url)?;
        if let Ok(path) = env::var("GREENWORLD_CABLE_PATH") {
            config.cable_path = path;
        }
        Ok(config)
    }

    pub fn with_cable_path(mut self, path: impl Into<String>) -> Self {
        self.cable_path = path.into();
        self
    }

    /// Relay address: the API origin with its scheme swapped to ws/wss.
    pub fn cable_url(&self) -> String {
        let origin = self.api_url.as_str().trim_end_matches('/');
        let ws_origin = if let Some(rest) = origin.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = origin.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            origin.to_string()
        };

        let path = self.cable_path.trim_start_matches('/');
        format!("{ws_origin}/{path}")
    }

    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.model_url.as_str().trim_end_matches('/'))
    }
}

fn parse_origin(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl { name, source })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::UnsupportedScheme(name)),
    }
}
