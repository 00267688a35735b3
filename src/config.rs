//! Application configuration.
//!
//! Layering, lowest to highest priority: built-in defaults, the optional
//! `sosmap.toml` in the working directory (or an explicit `--config`
//! file), then `SOSMAP_*` environment variables using `__` as the section
//! separator (`SOSMAP_SERVER__PORT=8080`).

use config::{Config, Environment, File, FileFormat, FileSourceFile};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

const MAX_ZOOM: u8 = 19;

fn env_source() -> Environment {
    Environment::with_prefix("SOSMAP")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    server: ServerConfig,
    ranking: RankingConfig,
    map: MapConfig,
    location: LocationConfig,
}

impl AppConfig {
    /// Load from `sosmap.toml` (optional) and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(Some(File::with_name("sosmap").required(false)), Some(env_source()))
    }

    /// Load from an explicit file that must exist, plus the environment.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with(Some(File::from(path).required(true)), Some(env_source()))
    }

    /// Built-in defaults only, ignoring files and the environment.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::load_with(None, None)
    }

    fn load_with(
        file: Option<File<FileSourceFile, FileFormat>>,
        env: Option<Environment>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000_i64)?
            .set_default("ranking.limit", 5_i64)?
            .set_default("ranking.highlighted", 5_i64)?
            .set_default("map.world_zoom", 2_i64)?
            .set_default("map.located_zoom", 15_i64)?
            .set_default("map.tile_url", "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png")?
            .set_default("map.attribution", "\u{00A9} OpenStreetMap contributors")?
            .set_default("location.ip_lookup_url", "https://ipapi.co/json/")?
            .set_default("location.user_agent", concat!("SosMap/", env!("CARGO_PKG_VERSION")))?
            .set_default("location.timeout_ms", 5000_i64)?;

        if let Some(file) = file {
            builder = builder.add_source(file);
        }
        if let Some(env) = env {
            builder = builder.add_source(env);
        }

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".into()));
        }
        if self.map.world_zoom > MAX_ZOOM || self.map.located_zoom > MAX_ZOOM {
            return Err(ConfigError::Invalid(format!("map zoom levels must be within 0..={}", MAX_ZOOM)));
        }
        if self.location.ip_lookup_url.trim().is_empty() {
            return Err(ConfigError::Invalid("location.ip_lookup_url must not be empty".into()));
        }
        Ok(())
    }

    pub fn server(&self) -> &ServerConfig {
        &self.server
    }

    pub fn ranking(&self) -> &RankingConfig {
        &self.ranking
    }

    pub fn map(&self) -> &MapConfig {
        &self.map
    }

    pub fn location(&self) -> &LocationConfig {
        &self.location
    }

    pub fn with_ranking(mut self, limit: Option<usize>, highlighted: Option<usize>) -> Self {
        if let Some(limit) = limit {
            self.ranking.limit = limit;
        }
        if let Some(highlighted) = highlighted {
            self.ranking.highlighted = highlighted;
        }
        self
    }

    pub fn with_ip_lookup_url(mut self, url: impl Into<String>) -> Self {
        self.location.ip_lookup_url = url.into();
        self
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.location.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_server(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.server.host = host;
        }
        if let Some(port) = port {
            self.server.port = port;
        }
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    host: String,
    port: u16,
}

impl ServerConfig {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankingConfig {
    limit: usize,
    highlighted: usize,
}

impl RankingConfig {
    /// How many markers the SOS button shows.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// How many of the shown markers are drawn blue.
    pub fn highlighted(&self) -> usize {
        self.highlighted
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub world_zoom: u8,
    pub located_zoom: u8,
    pub tile_url: String,
    pub attribution: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationConfig {
    ip_lookup_url: String,
    user_agent: String,
    timeout_ms: u64,
}

impl LocationConfig {
    pub fn ip_lookup_url(&self) -> &str {
        &self.ip_lookup_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
