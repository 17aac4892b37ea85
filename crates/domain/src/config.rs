//! Daemon configuration.
//!
//! Defaults run out of the box on a Docker host; a TOML file can
//! override any section and CLI flags override the file.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub dns_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            dns_port: 53,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Path of the resolver configuration supplying the upstream
    /// nameserver address.
    pub resolv_conf: PathBuf,
    /// Port queried on the upstream nameserver.
    pub port: u16,
    /// Timeout for one upstream round-trip, in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            resolv_conf: PathBuf::from("/etc/resolv.conf"),
            port: 53,
            timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DockerConfig {
    /// Unix socket of the Docker Engine API.
    pub socket: PathBuf,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            socket: PathBuf::from("/var/run/docker.sock"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub docker: DockerConfig,
    pub logging: LoggingConfig,
}

/// Values supplied on the command line; `Some` wins over the file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bind_address: Option<String>,
    pub dns_port: Option<u16>,
    pub resolv_conf: Option<PathBuf>,
    pub docker_socket: Option<PathBuf>,
    pub upstream_timeout_secs: Option<u64>,
}

impl Config {
    pub fn load(
        path: Option<&Path>,
        overrides: CliOverrides,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| {
                    ConfigError::Read {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
                toml::from_str(&text).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            None => Self::default(),
        };

        if let Some(bind) = overrides.bind_address {
            config.server.bind_address = bind;
        }
        if let Some(port) = overrides.dns_port {
            config.server.dns_port = port;
        }
        if let Some(resolv_conf) = overrides.resolv_conf {
            config.upstream.resolv_conf = resolv_conf;
        }
        if let Some(socket) = overrides.docker_socket {
            config.docker.socket = socket;
        }
        if let Some(timeout) = overrides.upstream_timeout_secs {
            config.upstream.timeout_secs = timeout;
        }

        Ok(config)
    }
}
