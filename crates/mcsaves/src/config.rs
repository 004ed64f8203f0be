use std::path::{Path, PathBuf};

use memcard::ScanOptions;
use serde::{Deserialize, Serialize};

use crate::Error;

pub const CONFIG_FILE_NAME: &str = "mcsaves.toml";
pub const DEFAULT_LIBRARY_DIR: &str = "memcards";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanOptions,
    pub library: LibraryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub dir: PathBuf,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_LIBRARY_DIR),
        }
    }
}

impl Config {
    pub fn from_toml_str(str: &str) -> Result<Self, Error> {
        let config = toml::from_str::<Config>(str).map_err(|e| Error::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.scan.offsets.is_empty() {
            return Err(Error::ConfigError(
                "scan.offsets must list at least one offset".to_string(),
            ));
        }
        if self.scan.max_length == 0 {
            return Err(Error::ConfigError(
                "scan.max_length must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config, Error> {
    let str = std::fs::read_to_string(path)?;
    Config::from_toml_str(&str)
}

/// Loads `explicit` when given; otherwise `mcsaves.toml` from the working
/// directory if present, falling back to the defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<Config, Error> {
    if let Some(path) = explicit {
        log::debug!("loading config from {}", path.display());
        return load_config(path);
    }

    let local = Path::new(CONFIG_FILE_NAME);
    if local.is_file() {
        log::debug!("loading config from {CONFIG_FILE_NAME}");
        load_config(local)
    } else {
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memcard::Locator;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml_str("").expect("empty config");
        assert_eq!(config, Config::default());
        assert_eq!(config.scan.offsets, vec![0x1A00, 0x2000, 0x4000]);
        assert_eq!(config.scan.max_slots, 100);
        assert_eq!(config.scan.max_length, 10 * 1024 * 1024);
        assert_eq!(config.library.dir, PathBuf::from("memcards"));
    }

    #[test]
    fn partial_scan_section_keeps_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [scan]
            offsets = [0x2000]
            locator = "auto"

            [library]
            dir = "/data/memcards"
            "#,
        )
        .expect("valid config");

        assert_eq!(config.scan.offsets, vec![0x2000]);
        assert_eq!(config.scan.locator, Locator::Auto);
        assert_eq!(config.scan.max_slots, 100);
        assert_eq!(config.library.dir, PathBuf::from("/data/memcards"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            Config::from_toml_str("[scan]\noffsets = []"),
            Err(Error::ConfigError(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[scan]\nmax_length = 0"),
            Err(Error::ConfigError(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[scan]\nlocator = \"native\""),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = Config::default();
        config.scan.locator = Locator::Superblock;
        let text = config.to_toml_string().expect("serialize");
        assert_eq!(Config::from_toml_str(&text).expect("parse"), config);
    }
}
