use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CheckerConfig {
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            listen_port: default_listen_port(),
            log_level: default_log_level(),
        }
    }
}

impl CheckerConfig {
    /// Load from the file named by CHECKER_CONFIG if set, otherwise use
    /// defaults. LISTEN_PORT and LOG_LEVEL env vars win over both.
    pub async fn load() -> Result<Self> {
        let mut config = match std::env::var("CHECKER_CONFIG") {
            Ok(path) => Self::load_file(&path).await?,
            Err(_) => Self::default(),
        };

        if let Ok(port) = std::env::var("LISTEN_PORT") {
            config.listen_port = port.parse()?;
        }
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.log_level = level;
        }
        config.validate_log_level()?;
        Ok(config)
    }

    async fn load_file(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path));
        }
        let content = fs::read_to_string(path).await?;
        let config: CheckerConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn get_tracing_level(&self) -> Result<tracing::Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(tracing::Level::TRACE),
            "debug" => Ok(tracing::Level::DEBUG),
            "info" => Ok(tracing::Level::INFO),
            "warn" | "warning" => Ok(tracing::Level::WARN),
            "error" => Ok(tracing::Level::ERROR),
            _ => Err(anyhow::anyhow!(
                "Invalid log level: {}. Valid levels are: trace, debug, info, warn, error",
                self.log_level
            )),
        }
    }

    pub fn validate_log_level(&self) -> Result<()> {
        self.get_tracing_level().map(|_| ())
    }
}
