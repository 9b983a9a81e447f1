//! Configuration loading and management
//!
//! The server reads an optional YAML file (path in `PULPIT_CONFIG`) and then
//! applies environment overrides. The client only needs its API base URL.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Default base URL used by [`ClientConfig`]
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:4000/api";

/// Which storage backend the server uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Mongodb,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            "mongodb" | "mongo" => Ok(StorageBackend::Mongodb),
            other => bail!("Unknown storage backend '{}'", other),
        }
    }
}

/// Storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// MongoDB connection string
    pub uri: String,

    /// MongoDB database name
    pub database: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            uri: "mongodb://localhost:27017".to_string(),
            database: "pulpit".to_string(),
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Prefix for content and upload routes
    pub api_prefix: String,

    pub storage: StorageConfig,

    /// Directory where uploaded files are written
    pub upload_dir: PathBuf,

    /// Allowed CORS origins; empty allows any
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            api_prefix: "/api".to_string(),
            storage: StorageConfig::default(),
            upload_dir: PathBuf::from("uploads"),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path))?;
        Self::from_yaml_str(&content).with_context(|| format!("Invalid config file '{}'", path))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load from `PULPIT_CONFIG` (defaults when unset), then apply environment overrides
    pub fn load() -> Result<Self> {
        let config = match std::env::var("PULPIT_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::from_yaml_file(path.trim())?,
            _ => Self::default(),
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up by environment variable name
    ///
    /// Recognized: `PULPIT_HOST`, `PORT`, `PULPIT_STORAGE`, `MONGODB_URI`,
    /// `MONGODB_DATABASE`, `PULPIT_UPLOAD_DIR`. Blank values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("PULPIT_HOST") {
            self.host = host;
        }
        if let Some(port) = get("PORT") {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT '{}'", port))?;
        }
        if let Some(backend) = get("PULPIT_STORAGE") {
            self.storage.backend = backend.parse()?;
        }
        if let Some(uri) = get("MONGODB_URI") {
            self.storage.uri = uri;
        }
        if let Some(database) = get("MONGODB_DATABASE") {
            self.storage.database = database;
        }
        if let Some(dir) = get("PULPIT_UPLOAD_DIR") {
            self.upload_dir = PathBuf::from(dir);
        }

        Ok(self)
    }

    /// `host:port` to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration for [`ApiClient`](crate::client::ApiClient)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL including the API prefix, without trailing slash
    pub api_base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        let url: String = api_base_url.into();
        Self {
            api_base_url: url.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Resolve once at startup from `PULPIT_API_BASE_URL`
    pub fn resolve() -> Self {
        Self::resolve_with(|key| std::env::var(key).ok())
    }

    pub fn resolve_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        lookup("PULPIT_API_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .map(Self::new)
            .unwrap_or_default()
    }
}
