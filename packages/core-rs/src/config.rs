use crate::error::ConfigError;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_MAX_FILE_BYTES: u64 = 1_000_000;
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 30_000;
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

const ENV_API_KEY: &str = "API_KEY";
const ENV_API_KEY_FALLBACK: &str = "GEMINI_API_KEY";
const ENV_MODEL: &str = "SENTINEL_MODEL";
const ENV_ENDPOINT: &str = "SENTINEL_ENDPOINT";
const ENV_MAX_FILE_BYTES: &str = "SENTINEL_MAX_FILE_BYTES";
const ENV_MAX_CONTENT_CHARS: &str = "SENTINEL_MAX_CONTENT_CHARS";
const ENV_REQUEST_TIMEOUT_SECS: &str = "SENTINEL_REQUEST_TIMEOUT_SECS";

/// Soft bounds applied to user input before it reaches the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLimits {
    pub max_file_bytes: u64,
    pub max_content_chars: usize,
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub temperature: f32,
    /// `None` leaves the remote call unbounded.
    pub request_timeout: Option<Duration>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            request_timeout: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentinelConfig {
    pub limits: ScanLimits,
    pub classifier: ClassifierConfig,
}

impl SentinelConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = SentinelConfig::default();

        config.classifier.api_key = get(ENV_API_KEY).or_else(|| get(ENV_API_KEY_FALLBACK));
        if let Some(model) = get(ENV_MODEL) {
            config.classifier.model = model;
        }
        if let Some(endpoint) = get(ENV_ENDPOINT) {
            config.classifier.endpoint = endpoint.trim_end_matches('/').to_string();
        }
        if let Some(value) = get(ENV_MAX_FILE_BYTES) {
            config.limits.max_file_bytes = parse_value(ENV_MAX_FILE_BYTES, &value)?;
        }
        if let Some(value) = get(ENV_MAX_CONTENT_CHARS) {
            config.limits.max_content_chars = parse_value(ENV_MAX_CONTENT_CHARS, &value)?;
        }
        if let Some(value) = get(ENV_REQUEST_TIMEOUT_SECS) {
            let secs: u64 = parse_value(ENV_REQUEST_TIMEOUT_SECS, &value)?;
            config.classifier.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(config)
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
