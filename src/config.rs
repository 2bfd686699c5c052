use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::prompt;

/// Main configuration structure for MixCheck
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub groq: GroqConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqConfig {
    /// Resolved at startup; an empty key is not fatal here, it surfaces as a
    /// configuration error on each analysis attempt instead.
    pub api_key: String,
    pub model: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
}

impl Config {
    /// Load configuration from file with environment variable overrides.
    /// ALWAYS returns a valid config - never fails.
    pub fn load() -> Self {
        if dotenvy::dotenv().is_ok() {
            tracing::info!("Loaded .env from current directory");
        }

        let config_path =
            env::var("MIXCHECK_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            match fs::read_to_string(&config_path) {
                Ok(contents) => match serde_yaml::from_str::<Config>(&contents) {
                    Ok(config) => {
                        tracing::info!("Loaded configuration from {}", config_path);
                        config
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to parse config file {}: {} - using defaults",
                            config_path,
                            e
                        );
                        Self::default()
                    }
                },
                Err(e) => {
                    tracing::error!(
                        "Failed to read config file {}: {} - using defaults",
                        config_path,
                        e
                    );
                    Self::default()
                }
            }
        } else {
            Self::default()
        };

        config.apply_env_overrides();

        if let Err(e) = config.validate() {
            tracing::warn!("Config validation warnings: {} - continuing anyway", e);
        }

        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(name) = env::var("MIXCHECK_SERVER_NAME") {
            self.server.name = name;
        }
        if let Ok(api_key) = env::var("GROQ_API_KEY") {
            self.groq.api_key = api_key;
        }
        if let Ok(model) = env::var("GROQ_MODEL") {
            self.groq.model = model;
        }
        if let Ok(timeout) = env::var("MIXCHECK_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                self.groq.request_timeout_secs = secs;
            }
        }
        if let Ok(bind) = env::var("MIXCHECK_HTTP_BIND") {
            self.http.bind = bind;
        }
    }

    fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.groq.api_key.is_empty() {
            return Err("GROQ_API_KEY environment variable must be set".into());
        }
        if self.groq.request_timeout_secs == 0 {
            return Err("Request timeout cannot be 0".into());
        }
        if self.http.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(format!("Invalid http.bind (expected host:port): {}", self.http.bind).into());
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.groq.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "mixcheck".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            groq: GroqConfig {
                // Empty until apply_env_overrides resolves GROQ_API_KEY;
                // defaults stay free of env reads and side effects.
                api_key: String::new(),
                model: prompt::DEFAULT_MODEL.to_string(),
                request_timeout_secs: 30,
            },
            http: HttpConfig {
                bind: "127.0.0.1:8790".to_string(),
            },
        }
    }
}
