//! Runtime configuration.
//!
//! Built once in `main` from CLI flags, an optional TOML file, and the
//! environment, then passed by reference to whatever needs it. Nothing below
//! `main` reads the environment.

use std::path::Path;

use serde::Deserialize;

use crate::cli::Args;
use crate::error::ConfigError;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8501;

#[derive(Debug, Clone)]
pub struct Config {
    /// Absent keys only fail the answer flow; the utility panel still works.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub host: String,
    pub port: u16,
    /// `None` leaves the completion call unbounded.
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            request_timeout_secs: None,
        }
    }
}

/// Optional settings file. The API key is deliberately not accepted here.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub base_url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub request_timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path: display, source })
    }
}

/// Values taken from the process environment at startup. `OPENAI_API_KEY` is the only one.
#[derive(Debug, Default, Clone)]
pub struct EnvValues {
    pub api_key: Option<String>,
}

impl EnvValues {
    /// Loads `.env` (if present) into the process environment, then reads it.
    pub fn capture(env_file: Option<&Path>) -> Self {
        match env_file {
            Some(path) => {
                if let Err(e) = dotenv::from_path(path) {
                    tracing::warn!(path = %path.display(), error = %e, "could not load env file");
                }
            }
            None => {
                dotenv::dotenv().ok();
            }
        }
        EnvValues {
            api_key: std::env::var("OPENAI_API_KEY").ok(),
        }
    }
}

impl Config {
    /// Precedence: CLI flag, then config file, then default. The key comes from the environment.
    pub fn resolve(args: &Args, file: FileConfig, env: EnvValues) -> Result<Self, ConfigError> {
        let api_key = env.api_key.filter(|k| !k.trim().is_empty());

        let defaults = Config::default();
        let temperature = args
            .temperature
            .or(file.temperature)
            .unwrap_or(defaults.temperature);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::Temperature(temperature));
        }

        Ok(Config {
            api_key,
            base_url: args.base_url.clone().or(file.base_url).unwrap_or(defaults.base_url),
            model: args.model.clone().or(file.model).unwrap_or(defaults.model),
            temperature,
            host: args.host.clone().or(file.host).unwrap_or(defaults.host),
            port: args.port.or(file.port).unwrap_or(defaults.port),
            request_timeout_secs: args.timeout.or(file.request_timeout_secs),
        })
    }

    /// The credential, for flows that cannot proceed without one.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
