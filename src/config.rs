//! Configuration for the langbase runtime.
//!
//! Read from `~/.config/langbase/config.yaml` unless a path is given. A
//! missing file is not an error; every field has a default.

use langbase_casing::Locale;
use langbase_names::NameSource;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("I/O error reading config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The config file contained invalid YAML.
    #[error("YAML parse error in config: {0}")]
    Parse(#[from] serde_yaml_ng::Error),
}

/// Log verbosity, shared by the config file and the `--log-level` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Compressed name resource to use instead of the embedded one.
    pub names_resource: Option<PathBuf>,

    /// Locale tag used when a casing request does not name one.
    pub default_locale: String,

    /// Log level used when neither `--log-level` nor `RUST_LOG` is set.
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            names_resource: None,
            default_locale: "und".to_string(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load from the default config path.
    ///
    /// # Errors
    ///
    /// See [`Config::load_from`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`, falling back to defaults when the file is absent.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file exists but cannot be read, and
    /// [`ConfigError::Parse`] if it is not a valid config document.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        log::info!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&contents)
    }

    /// Parse a config document. An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on invalid YAML or unknown enum values.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(contents)?)
    }

    /// Get the configuration file path (using XDG convention)
    pub fn config_path() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("langbase").join("config.yaml")
            } else {
                PathBuf::from("config.yaml")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Some(home_dir) = dirs::home_dir() {
                home_dir
                    .join(".config")
                    .join("langbase")
                    .join("config.yaml")
            } else {
                PathBuf::from("config.yaml")
            }
        }
    }

    /// Where character names are loaded from.
    pub fn name_source(&self) -> NameSource {
        match &self.names_resource {
            Some(path) => NameSource::File(path.clone()),
            None => NameSource::Embedded,
        }
    }

    pub fn locale(&self) -> Locale {
        Locale::new(&self.default_locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.names_resource.is_none());
        assert!(config.locale().is_root());
        assert_eq!(config.log_level, LogLevel::Warn);
        assert!(matches!(config.name_source(), NameSource::Embedded));
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = Config::from_yaml("default_locale: tr-TR\n").expect("parse");
        assert_eq!(config.locale().language(), "tr");
        assert_eq!(config.log_level, LogLevel::Warn);
        assert!(config.names_resource.is_none());
    }

    #[test]
    fn test_full_document() {
        let yaml = "names_resource: /opt/names.dat\ndefault_locale: lt\nlog_level: debug\n";
        let config = Config::from_yaml(yaml).expect("parse");
        assert_eq!(config.names_resource, Some(PathBuf::from("/opt/names.dat")));
        assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Debug);
        assert!(matches!(
            config.name_source(),
            NameSource::File(p) if p == Path::new("/opt/names.dat")
        ));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(Config::from_yaml("").expect("parse"), Config::default());
        assert_eq!(Config::from_yaml("  \n").expect("parse"), Config::default());
    }

    #[test]
    fn test_invalid_level_rejected() {
        assert!(matches!(
            Config::from_yaml("log_level: loud\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_config_path_ends_with_app_dir() {
        let path = Config::config_path();
        #[cfg(not(target_os = "windows"))]
        {
            if dirs::home_dir().is_some() {
                assert!(path.ends_with(".config/langbase/config.yaml"));
            }
        }
        #[cfg(target_os = "windows")]
        {
            if dirs::config_dir().is_some() {
                assert!(path.ends_with("langbase/config.yaml"));
            }
        }
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("config.yaml"));
    }
}
