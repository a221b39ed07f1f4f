//! TOML configuration parser for levels.toml.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tag_level::{Level, RegistryLimits, DEFAULT_MAX_WAIT_MS, WILDCARD};

/// Parsed and validated level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelsConfig {
    /// Level for tags without an override.
    pub default_level: Level,
    /// Read-path lock wait, in milliseconds.
    pub max_wait_ms: u64,
    /// Registry memory budget.
    pub limits: RegistryLimits,
    /// Per-tag overrides, ordered by tag.
    levels: BTreeMap<String, Level>,
}

/// Raw TOML structure.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLevelsConfig {
    /// Default level name (defaults to "verbose")
    default: Option<String>,
    max_wait_ms: Option<u64>,
    limits: Option<RegistryLimits>,
    /// tag = "level"
    #[serde(default)]
    levels: BTreeMap<String, String>,
}

impl Default for LevelsConfig {
    fn default() -> Self {
        Self {
            default_level: Level::MOST_VERBOSE,
            max_wait_ms: DEFAULT_MAX_WAIT_MS,
            limits: RegistryLimits::DEFAULT,
            levels: BTreeMap::new(),
        }
    }
}

impl LevelsConfig {
    /// Parse from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Parse from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawLevelsConfig = toml::from_str(content)?;

        let default_level = match raw.default.as_deref() {
            None => Level::MOST_VERBOSE,
            Some(name) => name.parse().map_err(|e| {
                ConfigError::Validation(format!("Invalid default level '{name}': {e}"))
            })?,
        };

        let mut levels = BTreeMap::new();
        for (tag, name) in raw.levels {
            validate_tag(&tag)?;
            let level: Level = name.parse().map_err(|e| {
                ConfigError::Validation(format!("Invalid level '{name}' for tag '{tag}': {e}"))
            })?;
            levels.insert(tag, level);
        }

        let config = Self {
            default_level,
            max_wait_ms: raw.max_wait_ms.unwrap_or(DEFAULT_MAX_WAIT_MS),
            limits: raw.limits.unwrap_or_default(),
            levels,
        };
        config.check_limits()?;
        Ok(config)
    }

    /// Overrides in tag order.
    pub fn levels(&self) -> impl Iterator<Item = (&str, Level)> {
        self.levels.iter().map(|(tag, &level)| (tag.as_str(), level))
    }

    /// Override for `tag`, if configured.
    pub fn level_of(&self, tag: &str) -> Option<Level> {
        self.levels.get(tag).copied()
    }

    /// Number of per-tag overrides.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Presets that the registry could not hold would be dropped silently at
    /// startup, so reject them here instead.
    fn check_limits(&self) -> Result<(), ConfigError> {
        if self.levels.len() > self.limits.max_overrides {
            return Err(ConfigError::Validation(format!(
                "{} tag levels configured but limits.max_overrides is {}",
                self.levels.len(),
                self.limits.max_overrides
            )));
        }
        let text: usize = self.levels.keys().map(String::len).sum();
        if text > self.limits.max_tag_bytes {
            return Err(ConfigError::Validation(format!(
                "configured tags need {text} bytes but limits.max_tag_bytes is {}",
                self.limits.max_tag_bytes
            )));
        }
        Ok(())
    }
}

fn validate_tag(tag: &str) -> Result<(), ConfigError> {
    if tag.is_empty() {
        return Err(ConfigError::Validation("Empty tag not allowed".into()));
    }
    if tag == WILDCARD {
        return Err(ConfigError::Validation(
            "'*' is not a tag; set `default` instead".into(),
        ));
    }
    if tag.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ConfigError::Validation(format!(
            "Invalid tag {tag:?}: whitespace and control characters not allowed"
        )));
    }
    Ok(())
}

/// Errors from reading or validating levels.toml.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse levels config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid levels config: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml = r#"
default = "info"
max_wait_ms = 25

[limits]
max_overrides = 4
max_tag_bytes = 64

[levels]
wifi = "warn"
net = "D"
"#;
        let config = LevelsConfig::from_str(toml).unwrap();
        assert_eq!(config.default_level, Level::Info);
        assert_eq!(config.max_wait_ms, 25);
        assert_eq!(config.limits, RegistryLimits::new(4, 64));
        assert_eq!(
            config.levels().collect::<Vec<_>>(),
            vec![("net", Level::Debug), ("wifi", Level::Warn)]
        );
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = LevelsConfig::from_str("").unwrap();
        assert_eq!(config, LevelsConfig::default());
        assert!(config.is_empty());
    }

    #[test]
    fn partial_limits_fill_in_defaults() {
        let config = LevelsConfig::from_str("[limits]\nmax_overrides = 8\n").unwrap();
        assert_eq!(config.limits.max_overrides, 8);
        assert_eq!(config.limits.max_tag_bytes, RegistryLimits::DEFAULT.max_tag_bytes);
    }

    #[test]
    fn reject_wildcard_tag() {
        let result = LevelsConfig::from_str("[levels]\n\"*\" = \"error\"\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn reject_empty_and_spaced_tags() {
        assert!(LevelsConfig::from_str("[levels]\n\"\" = \"error\"\n").is_err());
        assert!(LevelsConfig::from_str("[levels]\n\"a b\" = \"error\"\n").is_err());
    }

    #[test]
    fn reject_unknown_level() {
        let err = LevelsConfig::from_str("[levels]\nnet = \"loud\"\n").unwrap_err();
        assert!(err.to_string().contains("loud"));

        let err = LevelsConfig::from_str("default = \"chatty\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn reject_overrides_beyond_limits() {
        let toml = r#"
[limits]
max_overrides = 1

[levels]
a = "info"
b = "info"
"#;
        assert!(matches!(
            LevelsConfig::from_str(toml),
            Err(ConfigError::Validation(_))
        ));

        let toml = "[limits]\nmax_tag_bytes = 3\n[levels]\nwifi = \"info\"\n";
        assert!(LevelsConfig::from_str(toml).is_err());
    }

    #[test]
    fn reject_unknown_keys_and_bad_toml() {
        assert!(matches!(
            LevelsConfig::from_str("colour = true\n"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            LevelsConfig::from_str("[levels\n"),
            Err(ConfigError::Parse(_))
        ));
    }
}
