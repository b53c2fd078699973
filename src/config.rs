use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, IoResultExt, Result};

/// default build file name inside the context directory
pub const DEFAULT_TARFILE: &str = "Tarfile";

/// default per-directory ignore file name
pub const DEFAULT_IGNORE_FILE: &str = ".tarignore";

/// build configuration, optionally loaded from a toml file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// build file name looked up in the context directory
    pub tarfile: String,
    /// ignore file consulted in every source directory
    pub ignore_file: String,
    /// compression applied to the finished archive
    pub compression: Compression,
    /// zstd level when compression is zstd
    pub zstd_level: i32,
}

impl Config {
    /// load config from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_path(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).with_path(path)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tarfile: DEFAULT_TARFILE.to_string(),
            ignore_file: DEFAULT_IGNORE_FILE.to_string(),
            compression: Compression::None,
            zstd_level: 3,
        }
    }
}

/// output compression
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// plain tar
    #[default]
    None,
    /// zstd-compressed tar
    Zstd,
}

impl FromStr for Compression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Compression::None),
            "zstd" => Ok(Compression::Zstd),
            _ => Err(Error::InvalidCompression(s.to_string())),
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compression::None => write!(f, "none"),
            Compression::Zstd => write!(f, "zstd"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_toml_roundtrip() {
        let config = Config {
            tarfile: "Buildfile".to_string(),
            ignore_file: ".buildignore".to_string(),
            compression: Compression::Zstd,
            zstd_level: 9,
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config, parsed);
    }

    #[test]
    fn test_config_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tarfile, "Tarfile");
        assert_eq!(config.ignore_file, ".tarignore");
    }

    #[test]
    fn test_config_partial_toml() {
        let toml_str = r#"
compression = "zstd"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.compression, Compression::Zstd);
        assert_eq!(config.zstd_level, 3);
        assert_eq!(config.ignore_file, DEFAULT_IGNORE_FILE);
    }

    #[test]
    fn test_config_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tarbuild.toml");

        let config = Config {
            compression: Compression::Zstd,
            ..Default::default()
        };
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_config_load_missing() {
        let dir = tempdir().unwrap();
        let err = Config::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_compression_parse() {
        assert_eq!("none".parse::<Compression>().unwrap(), Compression::None);
        assert_eq!("ZSTD".parse::<Compression>().unwrap(), Compression::Zstd);
        assert!(matches!(
            "gzip".parse::<Compression>(),
            Err(Error::InvalidCompression(_))
        ));
        assert_eq!(Compression::Zstd.to_string(), "zstd");
    }
}
