//! Server configuration.

use std::path::{Path, PathBuf};

use cfpfinder_llm::LlmConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Cannot read config {}: {source}", path.display())]
    Read {
        /// Config path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`ServerConfig`].
    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        /// Config path.
        path: PathBuf,
        /// Underlying error.
        source: toml::de::Error,
    },
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Agenda markdown document
    #[serde(default = "default_agenda_path")]
    pub agenda_path: PathBuf,

    /// Directory of CFP write-ups
    #[serde(default = "default_cfp_dir")]
    pub cfp_dir: PathBuf,

    /// Host to bind to (HTTP transport)
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on (HTTP transport)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Model endpoint used for CFP matching
    #[serde(default)]
    pub llm: LlmConfig,
}

fn default_agenda_path() -> PathBuf {
    PathBuf::from("data/developers-conferences-agenda/README.md")
}

fn default_cfp_dir() -> PathBuf {
    PathBuf::from("cfps")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            agenda_path: default_agenda_path(),
            cfp_dir: default_cfp_dir(),
            host: default_host(),
            port: default_port(),
            llm: LlmConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
