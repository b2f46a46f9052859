use prism_relay::RelayOptions;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Everything `prism relay` can be told, from a TOML file or flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub bind: SocketAddr,
    pub log_level: String,
    #[serde(flatten)]
    pub relay: RelayOptions,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 7411)),
            log_level: "info".to_string(),
            relay: RelayOptions::default(),
        }
    }
}

impl RelayConfig {
    /// Defaults, overlaid with the file at `path` when one is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(RelayConfig::parse("").unwrap(), RelayConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = RelayConfig::parse(
            r#"
bind = "0.0.0.0:9000"
popup = "popup/custom.html"

[icons]
"16" = "small.png"
"#,
        )
        .unwrap();
        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.relay.popup, "popup/custom.html");
        assert_eq!(config.relay.agent_script, "/content-script.js");
        assert_eq!(config.relay.icons.len(), 1);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_rendered_config_parses_back() {
        let config = RelayConfig::default();
        let text = config.to_toml().unwrap();
        assert!(text.contains("bind = \"127.0.0.1:7411\""));
        assert_eq!(RelayConfig::parse(&text).unwrap(), config);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"debug\"").unwrap();
        let config = RelayConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.log_level, "debug");

        assert!(RelayConfig::load(None).is_ok());
    }

    #[test]
    fn test_load_errors_name_the_file() {
        let err = RelayConfig::load(Some(Path::new("/nonexistent/prism.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/prism.toml"));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bind = 12").unwrap();
        let err = RelayConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
