use serde::Deserialize;
use std::fs;
use std::path::Path;

const ENV_CONFIG_PATH: &str = "VISAFLOW_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const ENV_SEED_ON_STARTUP: &str = "VISAFLOW_SEED_ON_STARTUP";

const DEFAULT_MAX_TOKENS: u64 = 900;
const DEFAULT_TEMPERATURE: f64 = 0.2;

/// Generative-engine tuning
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Model identifier; falls back to the provider default when unset
    #[serde(default)]
    pub model: Option<String>,
    /// Token budget for one assessment response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u64,
    /// Low temperature: this is a classification-like task, determinism
    /// beats creativity
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

fn default_max_tokens() -> u64 {
    DEFAULT_MAX_TOKENS
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub engine: EngineConfig,
    pub port: u16,
    pub host: String,
    /// Run the knowledge-store seed batch at startup
    pub seed_on_startup: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            port: 8080,
            host: "127.0.0.1".to_string(),
            seed_on_startup: true,
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let seed_on_startup = std::env::var(ENV_SEED_ON_STARTUP)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(true);

        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let engine = Self::load_config_file(&config_path)
            .map(|cf| cf.engine)
            .unwrap_or_default();

        Self {
            engine,
            port,
            host,
            seed_on_startup,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(ConfigFile::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
