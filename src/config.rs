//! Configuration module

use std::env;
use std::path::PathBuf;

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind host
    pub host: String,

    /// Bind port
    pub port: u16,

    /// Explicit artifact directory, searched before the defaults
    pub models_dir: Option<PathBuf>,

    /// Emit JSON log lines instead of text
    pub json_logs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5050,
            models_dir: None,
            json_logs: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            host: lookup("ML_SERVICE_HOST").unwrap_or(defaults.host),

            port: lookup("ML_SERVICE_PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),

            models_dir: lookup("ML_MODELS_DIR")
                .filter(|d| !d.is_empty())
                .map(PathBuf::from),

            json_logs: lookup("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(defaults.json_logs),
        }
    }

    /// `host:port` for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_with(&[]);

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5050);
        assert!(config.models_dir.is_none());
        assert!(!config.json_logs);
        assert_eq!(config.bind_addr(), "127.0.0.1:5050");
    }

    #[test]
    fn test_overrides() {
        let config = config_with(&[
            ("ML_SERVICE_HOST", "0.0.0.0"),
            ("ML_SERVICE_PORT", "8088"),
            ("ML_MODELS_DIR", "/opt/models"),
            ("LOG_FORMAT", "JSON"),
        ]);

        assert_eq!(config.bind_addr(), "0.0.0.0:8088");
        assert_eq!(config.models_dir, Some(PathBuf::from("/opt/models")));
        assert!(config.json_logs);
    }

    #[test]
    fn test_unparsable_port_falls_back() {
        let config = config_with(&[("ML_SERVICE_PORT", "not-a-port")]);
        assert_eq!(config.port, 5050);
    }
}
