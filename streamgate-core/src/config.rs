use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use streamgate_media_providers::BROWSER_USER_AGENT;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub proxy: ProxyConfig,
    pub providers: Vec<ProviderInstanceConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            proxy: ProxyConfig::default(),
            providers: default_providers(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub http_port: u16,
    /// Origin prefixed to proxy references; empty for same-origin paths
    pub public_base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            http_port: 8080,
            public_base_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

/// Outbound settings of the manifest and caption proxy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub user_agent: String,
    pub connect_timeout_seconds: u64,
    /// Whole-request timeout; unset so segment downloads are never cut short
    pub upstream_timeout_seconds: Option<u64>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            user_agent: BROWSER_USER_AGENT.to_string(),
            connect_timeout_seconds: 10,
            upstream_timeout_seconds: None,
        }
    }
}

impl ProxyConfig {
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    #[must_use]
    pub fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream_timeout_seconds.map(Duration::from_secs)
    }
}

/// Aggregator flavour an instance talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Returns HLS candidates in flat or nested JSON shapes
    Playlist,
    /// Returns playable URLs plus caption tracks
    Direct,
}

/// One configured aggregator instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInstanceConfig {
    pub id: String,
    pub kind: ProviderKind,
    pub base_url: String,
    #[serde(default = "default_provider_timeout")]
    pub timeout_seconds: u64,
    /// Merge order; lower comes first
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub excluded_qualities: Vec<u32>,
}

impl ProviderInstanceConfig {
    #[must_use]
    pub const fn budget(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

const fn default_provider_timeout() -> u64 {
    60
}

const fn default_true() -> bool {
    true
}

/// Primary playlist aggregator and secondary direct aggregator
fn default_providers() -> Vec<ProviderInstanceConfig> {
    vec![
        ProviderInstanceConfig {
            id: "aggregator-a".to_string(),
            kind: ProviderKind::Playlist,
            base_url: "https://playlist-aggregator.example".to_string(),
            timeout_seconds: 90,
            priority: 0,
            enabled: true,
            excluded_qualities: vec![1080],
        },
        ProviderInstanceConfig {
            id: "aggregator-b".to_string(),
            kind: ProviderKind::Direct,
            base_url: "https://direct-aggregator.example".to_string(),
            timeout_seconds: 45,
            priority: 1,
            enabled: true,
            excluded_qualities: Vec::new(),
        },
    ]
}

impl Config {
    /// Load configuration with priority:
    /// 1. Environment variables (highest priority)
    /// 2. Config file (if provided)
    /// 3. Defaults (lowest priority)
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        // Load config file if provided
        if let Some(path) = config_file {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
            }
        }

        // Override with environment variables (STREAMGATE_SERVER__HTTP_PORT, etc.)
        builder = builder.add_source(
            Environment::with_prefix("STREAMGATE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load from environment variables only (for Docker/K8s)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Load from file path
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::load(Some(path))
    }

    /// Get HTTP address
    #[must_use]
    pub fn http_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.http_port)
    }

    /// Enabled provider instances
    pub fn enabled_providers(&self) -> impl Iterator<Item = &ProviderInstanceConfig> {
        self.providers.iter().filter(|p| p.enabled)
    }

    /// Check the configuration, collecting every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.server.http_port == 0 {
            errors.push("server.http_port must be non-zero".to_string());
        }

        if !self.server.public_base_url.is_empty()
            && url::Url::parse(&self.server.public_base_url).is_err()
        {
            errors.push(format!(
                "server.public_base_url is not a valid URL: {:?}",
                self.server.public_base_url
            ));
        }

        if !matches!(
            self.logging.level.to_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "warning" | "error"
        ) {
            errors.push(format!("logging.level is invalid: {:?}", self.logging.level));
        }

        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            errors.push(format!(
                "logging.format must be \"json\" or \"pretty\": {:?}",
                self.logging.format
            ));
        }

        let mut ids = HashSet::new();
        for provider in &self.providers {
            if provider.id.trim().is_empty() {
                errors.push("providers[].id must not be empty".to_string());
            } else if !ids.insert(provider.id.as_str()) {
                errors.push(format!("duplicate provider id {:?}", provider.id));
            }
            match url::Url::parse(&provider.base_url) {
                Ok(u) if matches!(u.scheme(), "http" | "https") => {}
                _ => errors.push(format!(
                    "provider {:?} has an invalid base_url {:?}",
                    provider.id, provider.base_url
                )),
            }
            if provider.timeout_seconds == 0 {
                errors.push(format!("provider {:?} timeout_seconds must be non-zero", provider.id));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
