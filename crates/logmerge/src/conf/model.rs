//! Model — MergeConfig and related structs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timestamp::{CustomGrammar, GrammarError, TimestampRecognizer};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Requires both timestamp regex and format or none")]
    IncompleteTimestamp,

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error("Requires at least two logfiles (got {0})")]
    NotEnoughLogs(usize),

    #[error("output prefix must not be empty")]
    EmptyOutput,

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Output filename prefix; `.log` is appended
    pub output: String,
    /// Labels for sources, in order
    pub prefixes: Vec<String>,
    pub no_prefix: bool,
    pub colorize: bool,
    pub timestamp: TimestampConfig,
}

/// Custom timestamp grammar. Both fields or neither; with neither, the
/// JAMF Software Server grammar is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestampConfig {
    /// Regex with exactly one capture group around the timestamp
    pub regex: Option<String>,
    /// chrono strftime format for the captured text
    pub format: Option<String>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            output: "merged".to_string(),
            prefixes: Vec::new(),
            no_prefix: false,
            colorize: false,
            timestamp: TimestampConfig::default(),
        }
    }
}

impl TimestampConfig {
    /// Compile the configured grammar, or the JAMF preset when unset.
    pub fn grammar(&self) -> Result<CustomGrammar, ConfigError> {
        match (&self.regex, &self.format) {
            (Some(regex), Some(format)) => Ok(CustomGrammar::new(regex, format)?),
            (None, None) => Ok(CustomGrammar::jamf()?),
            _ => Err(ConfigError::IncompleteTimestamp),
        }
    }

    pub fn recognizer(&self) -> Result<TimestampRecognizer, ConfigError> {
        Ok(TimestampRecognizer::with_custom(self.grammar()?))
    }
}

impl MergeConfig {
    /// Validate configuration values. Compiles the custom grammar so a bad
    /// regex or format is reported before any file is opened.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.trim().is_empty() {
            return Err(ConfigError::EmptyOutput);
        }
        self.timestamp.grammar()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::{GrammarKind, Presets};

    // ── Defaults ────────────────────────────────────────────────

    #[test]
    fn test_merge_config_defaults() {
        let cfg = MergeConfig::default();
        assert_eq!(cfg.output, "merged");
        assert!(cfg.prefixes.is_empty());
        assert!(!cfg.no_prefix);
        assert!(!cfg.colorize);
        assert_eq!(cfg.timestamp, TimestampConfig::default());
    }

    #[test]
    fn test_defaults_validate() {
        assert!(MergeConfig::default().validate().is_ok());
    }

    // ── Validation ──────────────────────────────────────────────

    #[test]
    fn test_regex_without_format_rejected() {
        let cfg = MergeConfig {
            timestamp: TimestampConfig {
                regex: Some(r"^(\d+)".into()),
                format: None,
            },
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::IncompleteTimestamp)));
    }

    #[test]
    fn test_format_without_regex_rejected() {
        let cfg = MergeConfig {
            timestamp: TimestampConfig {
                regex: None,
                format: Some("%s".into()),
            },
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::IncompleteTimestamp)));
    }

    #[test]
    fn test_malformed_regex_fails_fast() {
        let cfg = MergeConfig {
            timestamp: TimestampConfig {
                regex: Some(r"^(\d+".into()),
                format: Some("%Y".into()),
            },
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Grammar(_))));
    }

    #[test]
    fn test_empty_output_rejected() {
        let cfg = MergeConfig {
            output: "  ".into(),
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::EmptyOutput)));
    }

    #[test]
    fn test_recognizer_carries_custom_grammar() {
        let ts = TimestampConfig {
            regex: Some(r"^ (\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2},\d{3})".into()),
            format: Some("%Y-%m-%dT%H:%M:%S,%f".into()),
        };
        let r = ts.recognizer().unwrap();
        assert!(r.custom().is_some());
        assert!(r.recognize(b" 2024-01-01T10:00:00,250 msg\n").is_some());
    }

    #[test]
    fn test_unset_grammar_is_jamf_preset() {
        let r = TimestampConfig::default().recognizer().unwrap();
        assert_eq!(r.custom().map(|g| g.pattern()), Some(Presets::JAMF_PATTERN));

        let hit = r.recognize(b" 2024-01-01T10:00:00,250 msg\n").unwrap();
        assert_eq!(hit.grammar, GrammarKind::Custom);
        // Built-in grammars stay active behind the preset
        assert!(r.recognize(b"1700000000 epoch\n").is_some());
    }

    #[test]
    fn test_configured_grammar_replaces_preset() {
        let ts = TimestampConfig {
            regex: Some(r"^\[(\d+)\]".into()),
            format: Some("%s".into()),
        };
        let r = ts.recognizer().unwrap();
        assert!(r.recognize(b" 2024-01-01T10:00:00,250 msg\n").is_none());
        assert!(r.recognize(b"[1700000000] msg\n").is_some());
    }

    // ── TOML ────────────────────────────────────────────────────

    #[test]
    fn test_toml_partial_uses_defaults() {
        let cfg: MergeConfig = toml::from_str(
            r#"
            colorize = true
            prefixes = ["web", "db"]

            [timestamp]
            regex = '^\[(\S+)\]'
            format = "%Y-%m-%dT%H:%M:%S"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.output, "merged");
        assert!(cfg.colorize);
        assert_eq!(cfg.prefixes, vec!["web", "db"]);
        assert_eq!(cfg.timestamp.regex.as_deref(), Some(r"^\[(\S+)\]"));
        assert!(cfg.validate().is_ok());
    }
}
