//! Node configuration.
//!
//! Settings are layered, later sources winning:
//!
//! 1. built-in defaults,
//! 2. an optional configuration file (any format the `config` crate reads),
//! 3. `SCOOP_*` environment variables, e.g. `SCOOP_PORT=8080`,
//! 4. command-line flags.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::observability::LogFormat;

/// Configuration for the Scoop node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NodeConfig {
    /// Listen host.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Snapshot file used to persist the store. Persistence is off when unset.
    pub data_file: Option<PathBuf>,
    /// Never touch the snapshot file.
    pub test_mode: bool,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log format (pretty or json).
    pub log_format: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4000,
            data_file: None,
            test_mode: false,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

/// Values given on the command line. `None` keeps the lower layers' value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub data_file: Option<PathBuf>,
    pub test_mode: Option<bool>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
}

impl NodeConfig {
    /// Loads the configuration from every layer.
    pub fn load(file: Option<&Path>, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::load_with_env(file, overrides, Environment::with_prefix("SCOOP").try_parsing(true))
    }

    fn load_with_env(
        file: Option<&Path>,
        overrides: ConfigOverrides,
        env: Environment,
    ) -> Result<Self, ConfigError> {
        let defaults = NodeConfig::default();
        let mut builder = Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("test_mode", defaults.test_mode)?
            .set_default("log_level", defaults.log_level)?
            .set_default("log_format", defaults.log_format)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .add_source(env)
            .set_override_option("host", overrides.host)?
            .set_override_option("port", overrides.port.map(i64::from))?
            .set_override_option(
                "data_file",
                overrides
                    .data_file
                    .map(|p| p.to_string_lossy().into_owned()),
            )?
            .set_override_option("test_mode", overrides.test_mode)?
            .set_override_option("log_level", overrides.log_level)?
            .set_override_option("log_format", overrides.log_format)?
            .build()?
            .try_deserialize()
    }

    /// Address to listen on.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Snapshot file to load from and save to, unless running in test mode.
    pub fn snapshot_path(&self) -> Option<&Path> {
        if self.test_mode {
            return None;
        }
        self.data_file.as_deref()
    }

    /// Parsed log format.
    pub fn log_format(&self) -> LogFormat {
        LogFormat::parse(&self.log_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("SCOOP")
            .try_parsing(true)
            .source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let config = NodeConfig::load_with_env(None, ConfigOverrides::default(), env(&[])).unwrap();

        assert_eq!(config, NodeConfig::default());
        assert_eq!(config.listen_addr(), "127.0.0.1:4000");
        assert_eq!(config.snapshot_path(), None);
        assert_eq!(config.log_format(), LogFormat::Pretty);
    }

    #[test]
    fn test_environment_overrides_defaults() {
        let config = NodeConfig::load_with_env(
            None,
            ConfigOverrides::default(),
            env(&[
                ("SCOOP_PORT", "8080"),
                ("SCOOP_DATA_FILE", "db.json"),
                ("SCOOP_LOG_FORMAT", "json"),
            ]),
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.snapshot_path(), Some(Path::new("db.json")));
        assert_eq!(config.log_format(), LogFormat::Json);
    }

    #[test]
    fn test_flags_override_environment() {
        let overrides = ConfigOverrides {
            port: Some(9000),
            test_mode: Some(true),
            ..Default::default()
        };
        let config = NodeConfig::load_with_env(
            None,
            overrides,
            env(&[("SCOOP_PORT", "8080"), ("SCOOP_DATA_FILE", "db.json")]),
        )
        .unwrap();

        assert_eq!(config.port, 9000);
        assert!(config.test_mode);
        assert_eq!(config.snapshot_path(), None);
    }

    #[test]
    fn test_file_layer() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "host = \"0.0.0.0\"\nport = 5000\nlog_level = \"debug\"").unwrap();

        let config = NodeConfig::load_with_env(
            Some(file.path()),
            ConfigOverrides::default(),
            env(&[("SCOOP_PORT", "6000")]),
        )
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 6000);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = NodeConfig::load_with_env(
            None,
            ConfigOverrides::default(),
            env(&[("SCOOP_PORT", "not-a-port")]),
        );
        assert!(result.is_err());
    }
}
