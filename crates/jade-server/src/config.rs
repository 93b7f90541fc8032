use anyhow::{Context, Result, bail};
use etcetera::BaseStrategy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::args::Cli;
use crate::constants::{
    BINARY_NAME, CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SEARCH_TIMEOUT_SECS,
    DEFAULT_TEMPLATES_DIR,
};

/// Settings for the page server.
///
/// Values come from the built-in defaults, then the TOML file, then the
/// command line, each layer overriding the previous one.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Directory holding the page templates
    pub templates_dir: PathBuf,
    /// Timeout applied to each completion request made by `/search`
    pub search_timeout_secs: u64,
    /// Override for the API base URL
    pub base_url: Option<String>,
    /// Override for the chat model
    pub model: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            templates_dir: PathBuf::from(DEFAULT_TEMPLATES_DIR),
            search_timeout_secs: DEFAULT_SEARCH_TIMEOUT_SECS,
            base_url: None,
            model: None,
        }
    }
}

impl ServerConfig {
    /// Build the effective configuration for a command line.
    ///
    /// A file named with `--config` must exist; the default file is optional.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::load(&path)?,
                _ => Self::default(),
            },
        };
        config.merge_cli(cli).validated()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: ServerConfig = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    fn merge_cli(mut self, cli: &Cli) -> Self {
        if let Some(host) = &cli.host {
            self.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(dir) = &cli.templates {
            self.templates_dir = dir.clone();
        }
        if let Some(secs) = cli.search_timeout {
            self.search_timeout_secs = secs;
        }
        self
    }

    fn validated(self) -> Result<Self> {
        if self.host.trim().is_empty() {
            bail!("Host must not be empty");
        }
        if self.search_timeout_secs == 0 {
            bail!("Search timeout must be at least one second");
        }
        Ok(self)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }
}

/// `<config dir>/jade/config.toml`, if a home directory can be determined
pub fn default_config_path() -> Option<PathBuf> {
    let strategy = etcetera::choose_base_strategy().ok()?;
    Some(
        strategy
            .config_dir()
            .join(BINARY_NAME)
            .join(CONFIG_FILE_NAME),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["jade"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.templates_dir, PathBuf::from("templates"));
        assert_eq!(config.search_timeout(), Duration::from_secs(200));
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "port = 3000\nmodel = \"gpt-4o-mini\"\n");

        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.model.as_deref(), Some("gpt-4o-mini"));
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "host = \"127.0.0.1\"\nport = 3000\nsearch_timeout_secs = 60\n");
        let path = path.to_str().unwrap();

        let config = ServerConfig::resolve(&cli(&["--config", path, "--port", "9000"])).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.search_timeout_secs, 60);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");

        let err = ServerConfig::resolve(&cli(&["--config", missing.to_str().unwrap()])).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "port = \"not a number\"\n");

        assert!(ServerConfig::load(&path).is_err());
    }

    #[test]
    fn test_zero_search_timeout_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "");
        let path = path.to_str().unwrap();

        let err =
            ServerConfig::resolve(&cli(&["--config", path, "--search-timeout", "0"])).unwrap_err();
        assert!(err.to_string().contains("Search timeout"));
    }
}
