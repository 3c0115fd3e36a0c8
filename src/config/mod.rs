//! Profile-based zone configuration with JSON persistence
//!
//! A profile is an ordered list of zone rectangles; profiles are selected by
//! name with a reserved default. Malformed or missing fields deserialize to
//! documented defaults instead of failing the load.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::common::types::Rect;
use crate::constants;

/// One snapping target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneConfig {
    #[serde(default = "default_zone_rect")]
    pub rect: Rect,
}

fn default_zone_rect() -> Rect {
    Rect::new(
        0,
        0,
        constants::defaults::zone::WIDTH,
        constants::defaults::zone::HEIGHT,
    )
}

/// Named, ordered group of zones
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub zones: Vec<ZoneConfig>,
}

/// Top-level configuration: profile name → profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,

    #[serde(skip, default = "default_profile_name")]
    current: String,
}

fn default_profile_name() -> String {
    constants::config::DEFAULT_PROFILE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(default_profile_name(), Profile::default());
        Self {
            profiles,
            current: default_profile_name(),
        }
    }
}

impl Config {
    pub fn path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(constants::config::APP_DIR);
        path.push(constants::config::FILENAME);
        path
    }

    /// Load the configuration, falling back to an in-memory default when no
    /// file exists yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {path:?}"))?;
        let mut config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON from {path:?}"))?;

        // The reserved default profile always exists.
        config
            .profiles
            .entry(default_profile_name())
            .or_default();

        info!(profiles = config.profiles.len(), "loaded configuration");
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create config directory {parent:?}"))?;
        }
        let json = serde_json::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, json).with_context(|| format!("failed to write config to {path:?}"))?;
        info!(path = %path.display(), "saved configuration");
        Ok(())
    }

    /// Select `name` as the active profile, creating it on first use.
    pub fn select_profile(&mut self, name: &str) {
        self.profiles.entry(name.to_string()).or_default();
        self.current = name.to_string();
    }

    /// Zones of the active profile (the default profile when the selected
    /// name has vanished).
    pub fn current_zones(&self) -> &[ZoneConfig] {
        self.profiles
            .get(&self.current)
            .or_else(|| self.profiles.get(constants::config::DEFAULT_PROFILE))
            .map(|profile| profile.zones.as_slice())
            .unwrap_or(&[])
    }

    pub fn current_profile_mut(&mut self) -> &mut Profile {
        self.profiles.entry(self.current.clone()).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_reserved_profile() {
        let config = Config::default();
        assert!(
            config
                .profiles
                .contains_key(constants::config::DEFAULT_PROFILE)
        );
        assert!(config.current_zones().is_empty());
    }

    #[test]
    fn test_select_profile_creates_and_switches() {
        let mut config = Config::default();
        config.select_profile("gaming");
        config
            .current_profile_mut()
            .zones
            .push(ZoneConfig { rect: Rect::new(0, 0, 500, 500) });

        assert_eq!(config.current_zones().len(), 1);

        config.select_profile(constants::config::DEFAULT_PROFILE);
        assert!(config.current_zones().is_empty());
    }

    #[test]
    fn test_zone_missing_rect_gets_default() {
        let zone: ZoneConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(zone.rect, Rect::new(0, 0, 100, 100));
    }

    #[test]
    fn test_profile_shape_errors_fall_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"profiles": {"work": {}}}"#).unwrap();
        assert!(config.profiles["work"].zones.is_empty());

        let config: Config = serde_json::from_str("{}").unwrap();
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.select_profile("two-monitors");
        config.current_profile_mut().zones = vec![
            ZoneConfig { rect: Rect::new(0, 0, 960, 1080) },
            ZoneConfig { rect: Rect::new(960, 0, 960, 1080) },
        ];
        config.save_to(&path).unwrap();

        let mut loaded = Config::load_from(&path).unwrap();
        loaded.select_profile("two-monitors");
        assert_eq!(loaded.current_zones(), config.current_zones());
        // The reserved profile is restored even when absent from the file.
        assert!(
            loaded
                .profiles
                .contains_key(constants::config::DEFAULT_PROFILE)
        );
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.json")).unwrap();
        assert!(
            config
                .profiles
                .contains_key(constants::config::DEFAULT_PROFILE)
        );
    }
}
