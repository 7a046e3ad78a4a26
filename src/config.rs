use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::domain::progress::{DEFAULT_GAME_VERSION, DEFAULT_WORLD_ICON};
use crate::filter::DEFAULT_SEARCH_LIMIT;
use crate::stats::DEFAULT_RECENT_LIMIT;
use crate::store::WorldDefaults;

pub const DEFAULT_CONFIG_PATH: &str = ".craftlist/config.toml";
const DEFAULT_WORLD_NAME: &str = "My World";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Alternate dataset JSON; the embedded dataset is used when unset.
    pub dataset: Option<PathBuf>,
    pub default_world_name: String,
    pub default_world_icon: String,
    pub default_version: String,
    pub recent_limit: usize,
    pub search_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: None,
            default_world_name: DEFAULT_WORLD_NAME.to_string(),
            default_world_icon: DEFAULT_WORLD_ICON.to_string(),
            default_version: DEFAULT_GAME_VERSION.to_string(),
            recent_limit: DEFAULT_RECENT_LIMIT,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl Config {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file; using defaults");
                return Ok(Self::default());
            }
            Err(err) => return Err(ConfigError::Io(err)),
        };
        let config = Self::from_toml(&raw)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub(crate) fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(raw)?;
        if config.search_limit == 0 {
            return Err(ConfigError::Invalid(
                "search_limit must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn world_defaults(&self) -> WorldDefaults {
        let fallback = WorldDefaults::default();
        WorldDefaults {
            name: non_blank_or(&self.default_world_name, fallback.name),
            icon: non_blank_or(&self.default_world_icon, fallback.icon),
            version: non_blank_or(&self.default_version, fallback.version),
        }
    }
}

fn non_blank_or(value: &str, fallback: String) -> String {
    match value.trim() {
        "" => fallback,
        trimmed => trimmed.to_string(),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "failed to read config: {}", err),
            ConfigError::Toml(err) => write!(f, "invalid config TOML: {}", err),
            ConfigError::Invalid(message) => write!(f, "invalid config: {}", message),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Toml(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Toml(value)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use uuid::Uuid;

    use super::{Config, ConfigError};

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join(format!("craftlist-config-{}.toml", Uuid::now_v7()));
        let config = Config::load(&path).expect("missing config should be fine");
        assert_eq!(config, Config::default());
        assert_eq!(config.recent_limit, 10);
        assert_eq!(config.search_limit, 50);
        assert_eq!(config.world_defaults().name, "My World");
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let config = Config::from_toml(
            r#"
dataset = "custom/tasks.json"
default_world_name = "Hardcore"
recent_limit = 3
"#,
        )
        .expect("config should parse");
        assert_eq!(config.dataset, Some(PathBuf::from("custom/tasks.json")));
        assert_eq!(config.recent_limit, 3);
        assert_eq!(config.search_limit, 50);

        let defaults = config.world_defaults();
        assert_eq!(defaults.name, "Hardcore");
        assert_eq!(defaults.icon, "🌍");
        assert_eq!(defaults.version, "1.21");
    }

    #[test]
    fn blank_world_defaults_fall_back() {
        let config = Config::from_toml("default_world_icon = \"  \"\n").expect("parse");
        assert_eq!(config.world_defaults().icon, "🌍");
    }

    #[test]
    fn malformed_or_unknown_keys_are_errors() {
        assert!(matches!(
            Config::from_toml("recent_limit = \"many\""),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            Config::from_toml("colour = \"red\""),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            Config::from_toml("search_limit = 0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = std::env::temp_dir().join(format!("craftlist-config-{}", Uuid::now_v7()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("config.toml");
        std::fs::write(&path, "search_limit = 5\n").expect("write config");

        let config = Config::load(&path).expect("config should load");
        assert_eq!(config.search_limit, 5);

        let _ = std::fs::remove_dir_all(dir);
    }
}
