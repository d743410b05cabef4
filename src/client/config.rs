use secrecy::SecretString;

use crate::client::consts::{
    BASE_URL, COMMOTION_API_KEY, COMMOTION_MODEL, COMMOTION_TEMPERATURE, COMMOTION_VOICE,
    DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_VOICE,
};
use crate::error::Error;

#[derive(Clone)]
pub struct Config {
    base_url: String,
    api_key: SecretString,
    model: String,
}

pub struct ConfigBuilder {
    config: Config,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config {
                base_url: BASE_URL.to_string(),
                api_key: SecretString::from(String::new()),
                model: DEFAULT_MODEL.to_string(),
            },
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.config.api_key = SecretString::from(api_key.to_string());
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.config.model = model.to_string();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Reads the connection configuration from the process environment. The
    /// credential is mandatory; everything else has a documented default.
    pub fn from_env() -> Result<Self, Error> {
        let api_key = std::env::var(COMMOTION_API_KEY)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(Error::MissingApiKey)?;
        let model =
            std::env::var(COMMOTION_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Ok(Self {
            base_url: BASE_URL.to_string(),
            api_key: api_key.into(),
            model,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Voice identifier from the environment, defaulting to `tara`.
pub fn voice_from_env() -> String {
    std::env::var(COMMOTION_VOICE).unwrap_or_else(|_| DEFAULT_VOICE.to_string())
}

/// Sampling temperature from the environment, defaulting to 0.7. A value
/// that does not parse falls back to the default with a warning.
pub fn temperature_from_env() -> f32 {
    match std::env::var(COMMOTION_TEMPERATURE) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("invalid {}: {:?}, using default", COMMOTION_TEMPERATURE, raw);
            DEFAULT_TEMPERATURE
        }),
        Err(_) => DEFAULT_TEMPERATURE,
    }
}
