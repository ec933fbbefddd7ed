//! Settings for the reference task service.
//!
//! Each setting is taken from the first place that provides it: command-line
//! flag (or its environment variable), then the `[server]` table of
//! `~/.config/taskboard-server/config.toml`, then the built-in default.
//!
//! ```toml
//! [server]
//! bind_addr = "0.0.0.0:8000"
//! log_level = "debug"
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Address the service listens on when nothing else is configured.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

/// Log filter used when nothing else is configured.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors that can occur when loading server configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// The bind address is not a `host:port` socket address.
    #[error("invalid bind address {value:?}: {source}")]
    InvalidBindAddr {
        /// The rejected value.
        value: String,
        /// Parser error.
        source: std::net::AddrParseError,
    },
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    server: ServerTable,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ServerTable {
    bind_addr: Option<String>,
    log_level: Option<String>,
}

/// Command-line flags for `taskboard-server`.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Reference task service for the taskboard client")]
pub struct ServerCliArgs {
    /// Socket address to listen on, e.g. `0.0.0.0:8000` [default: 127.0.0.1:8000].
    #[arg(short, long, env = "TASKBOARD_SERVER_ADDR")]
    pub bind: Option<String>,

    /// Config file to read instead of `~/.config/taskboard-server/config.toml`.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `taskboard_server=trace` [default: info].
    #[arg(long, env = "TASKBOARD_SERVER_LOG")]
    pub log_level: Option<String>,
}

/// Resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Where the listener binds.
    pub bind_addr: SocketAddr,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ServerConfig {
    /// Reads the config file and merges it under `cli`.
    ///
    /// A missing file at the default location counts as empty; a missing
    /// `--config` file is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or if
    /// the chosen bind address does not parse.
    pub fn load(cli: &ServerCliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Self::resolve(cli, &file)
    }

    fn resolve(cli: &ServerCliArgs, file: &ConfigFile) -> Result<Self, ConfigError> {
        let raw_addr = cli
            .bind
            .as_deref()
            .or(file.server.bind_addr.as_deref())
            .unwrap_or(DEFAULT_BIND_ADDR);
        let bind_addr = raw_addr
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: raw_addr.to_string(),
                source,
            })?;

        let log_level = cli
            .log_level
            .clone()
            .or_else(|| file.server.log_level.clone())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            bind_addr,
            log_level,
        })
    }
}

fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    if let Some(path) = explicit_path {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        return Ok(toml::from_str(&contents)?);
    }

    let Some(config_dir) = dirs::config_dir() else {
        return Ok(ConfigFile::default());
    };
    let path = config_dir.join("taskboard-server").join("config.toml");
    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(source) => Err(ConfigError::ReadFile { path, source }),
    }
}
