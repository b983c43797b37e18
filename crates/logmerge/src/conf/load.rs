//! Load — config loading from file and environment variables.

use std::fs;
use std::path::Path;

use super::model::{ConfigError, MergeConfig};

pub const CONFIG_FILE_ENV: &str = "LOGMERGE_CONFIG_FILE";
pub const DEFAULT_CONFIG_FILE: &str = "logmerge.toml";

impl MergeConfig {
    /// Load configuration from file and environment variables
    /// Priority: Environment Variables > Config File > Defaults
    ///
    /// Command-line flags are applied on top by the caller.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var(CONFIG_FILE_ENV)
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", config_path);
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Override settings from environment variables, read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(output) = lookup("LOGMERGE_OUTPUT") {
            self.output = output;
        }
        if let Some(regex) = lookup("LOGMERGE_TIMESTAMP_REGEX") {
            self.timestamp.regex = Some(regex);
        }
        if let Some(format) = lookup("LOGMERGE_TIMESTAMP_FORMAT") {
            self.timestamp.format = Some(format);
        }
        if let Some(colorize) = lookup("LOGMERGE_COLORIZE").and_then(|s| s.parse().ok()) {
            self.colorize = colorize;
        }
        if let Some(no_prefix) = lookup("LOGMERGE_NO_PREFIX").and_then(|s| s.parse().ok()) {
            self.no_prefix = no_prefix;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut cfg = MergeConfig {
            output: "from_file".into(),
            ..Default::default()
        };
        cfg.apply_env(env(&[
            ("LOGMERGE_OUTPUT", "from_env"),
            ("LOGMERGE_COLORIZE", "true"),
        ]));
        assert_eq!(cfg.output, "from_env");
        assert!(cfg.colorize);
    }

    #[test]
    fn test_env_timestamp_pair() {
        let mut cfg = MergeConfig::default();
        cfg.apply_env(env(&[
            ("LOGMERGE_TIMESTAMP_REGEX", r"^(\d+) "),
            ("LOGMERGE_TIMESTAMP_FORMAT", "%s"),
        ]));
        assert_eq!(cfg.timestamp.regex.as_deref(), Some(r"^(\d+) "));
        assert_eq!(cfg.timestamp.format.as_deref(), Some("%s"));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_invalid_bool_ignored() {
        let mut cfg = MergeConfig::default();
        cfg.apply_env(env(&[("LOGMERGE_NO_PREFIX", "maybe")]));
        assert!(!cfg.no_prefix);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logmerge.toml");
        fs::write(&path, "output = \"nightly\"\nno_prefix = true\n").unwrap();

        let cfg = MergeConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.output, "nightly");
        assert!(cfg.no_prefix);
    }

    #[test]
    fn test_from_file_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "output = [").unwrap();

        let err = MergeConfig::from_file(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_from_file_missing() {
        let err = MergeConfig::from_file("/no/such/logmerge.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
