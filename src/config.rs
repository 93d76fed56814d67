//! Optional TOML configuration shared by the binaries.
//!
//! ```toml
//! [paths]
//! outlets = "data/outlets.csv"
//! boundaries = "data/regions.geojson"
//! store = "data/outlets.sled"
//!
//! [rules]
//! max_lng = 1.5
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::coords::CoordinateRules;

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "atlas.toml";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub rules: CoordinateRules,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PathsConfig {
    pub outlets: PathBuf,
    pub boundaries: PathBuf,
    pub store: PathBuf,
    pub outliers_report: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            outlets: PathBuf::from("data/outlets.csv"),
            boundaries: PathBuf::from("data/regions.geojson"),
            store: PathBuf::from("data/outlets.sled"),
            outliers_report: PathBuf::from("outliers_report.md"),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Use the explicit path if given, else `atlas.toml` if present, else defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            info!("Loading config from {}", path.display());
            return Self::load_from_file(path);
        }

        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.exists() {
            info!("Loading config from {}", fallback.display());
            return Self::load_from_file(fallback);
        }

        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let config: Config = toml::from_str(
            r#"
            [paths]
            store = "/var/lib/atlas/store"

            [rules]
            max_lng = 1.5
            "#,
        )
        .unwrap();

        assert_eq!(config.paths.store, PathBuf::from("/var/lib/atlas/store"));
        assert_eq!(config.paths.outlets, PathBuf::from("data/outlets.csv"));
        assert_eq!(config.rules.max_lng, 1.5);
        assert_eq!(config.rules.min_lat, 4.0);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.rules.sign_repair_min, 1.5);
        assert_eq!(config.paths.boundaries, PathBuf::from("data/regions.geojson"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas.toml");
        fs::write(&path, "[paths]\noutlets = \"extract.csv\"\n").unwrap();

        let config = Config::discover(Some(&path)).unwrap();
        assert_eq!(config.paths.outlets, PathBuf::from("extract.csv"));

        assert!(Config::load_from_file(dir.path().join("missing.toml")).is_err());
    }
}
