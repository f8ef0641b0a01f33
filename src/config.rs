//! Host/port configuration.
//!
//! The config file holds the host on its first line and the port on its
//! second. Anything missing or unparsable falls back to
//! [`DEFAULT_HOST`]:[`DEFAULT_PORT`] as a whole.

use std::fs;
use std::io;
use std::num::ParseIntError;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::protocol::{DEFAULT_HOST, DEFAULT_PORT};

pub const DEFAULT_CONFIG_PATH: &str = "server_info.txt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),

    #[error("config is missing the {0} line")]
    MissingLine(&'static str),

    #[error("invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
}

/// Where to find the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    /// Read the two-line config file, falling back to the defaults on any error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(endpoint) => {
                info!(path = %path.display(), host = %endpoint.host, port = endpoint.port, "config loaded");
                endpoint
            }
            Err(e) => {
                let endpoint = Self::default();
                info!(
                    path = %path.display(),
                    error = %e,
                    "using default settings {}",
                    endpoint
                );
                endpoint
            }
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut lines = content.lines().map(str::trim);

        let host = lines
            .next()
            .filter(|line| !line.is_empty())
            .ok_or(ConfigError::MissingLine("host"))?;
        let port = lines.next().ok_or(ConfigError::MissingLine("port"))?.parse()?;

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Everything the server needs besides its quiz bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub endpoint: Endpoint,
    /// Stop accepting new clients once any client quits mid-quiz.
    pub shutdown_on_quit: bool,
}

impl ServerConfig {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            shutdown_on_quit: true,
        }
    }

    pub fn with_shutdown_on_quit(mut self, enabled: bool) -> Self {
        self.shutdown_on_quit = enabled;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(Endpoint::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_lines() {
        let endpoint = Endpoint::parse("  quiz.example.org \n 4321\n").unwrap();
        assert_eq!(endpoint.host, "quiz.example.org");
        assert_eq!(endpoint.port, 4321);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(Endpoint::parse(""), Err(ConfigError::MissingLine("host"))));
        assert!(matches!(Endpoint::parse("\n1234"), Err(ConfigError::MissingLine("host"))));
        assert!(matches!(Endpoint::parse("localhost"), Err(ConfigError::MissingLine("port"))));
        assert!(matches!(
            Endpoint::parse("localhost\nnot-a-port"),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            Endpoint::parse("localhost\n70000"),
            Err(ConfigError::InvalidPort(_))
        ));
    }

    #[test]
    fn test_malformed_config_falls_back_to_defaults() {
        let endpoint = Endpoint::parse("somewhere\nport?").unwrap_or_default();
        assert_eq!(endpoint.to_string(), "localhost:1234");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let endpoint = Endpoint::load_or_default("definitely/not/here/server_info.txt");
        assert_eq!(endpoint, Endpoint::default());
        assert_eq!(endpoint.host, "localhost");
        assert_eq!(endpoint.port, 1234);
    }

    #[test]
    fn test_server_config_defaults_to_shutdown_on_quit() {
        let config = ServerConfig::default();
        assert!(config.shutdown_on_quit);
        assert!(!config.with_shutdown_on_quit(false).shutdown_on_quit);
    }
}
