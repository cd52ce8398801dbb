// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Converter configuration.
//!
//! Settings for scene segmentation and side-table handling, loaded from
//! a YAML file. Every field has a default so a partial file is valid.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::cks::DEFAULT_SONG_NAME;
use crate::convert::ExportOptions;
use crate::timing::DEFAULT_BEATS_PER_BAR;

/// Converter settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConverterConfig {
    /// Beats per bar
    #[serde(default = "default_beats_per_bar")]
    pub beats_per_bar: f64,
    /// Scene length in bars used on export
    #[serde(default = "default_scene_length_bars")]
    pub scene_length_bars: u32,
    /// Song name written on export
    #[serde(default = "default_song_name")]
    pub song_name: String,
    /// Attach the side-table on export
    #[serde(default = "default_include_metadata")]
    pub include_metadata: bool,
    /// Value for the side-table's `exportedFrom`
    #[serde(default = "default_exported_from")]
    pub exported_from: String,
}

fn default_beats_per_bar() -> f64 {
    DEFAULT_BEATS_PER_BAR
}
fn default_scene_length_bars() -> u32 {
    8
}
fn default_song_name() -> String {
    DEFAULT_SONG_NAME.to_string()
}
fn default_include_metadata() -> bool {
    true
}
fn default_exported_from() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            beats_per_bar: default_beats_per_bar(),
            scene_length_bars: default_scene_length_bars(),
            song_name: default_song_name(),
            include_metadata: default_include_metadata(),
            exported_from: default_exported_from(),
        }
    }
}

impl ConverterConfig {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }

    /// Check values the converter cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(self.beats_per_bar > 0.0) {
            bail!("beats_per_bar must be positive, got {}", self.beats_per_bar);
        }
        if self.scene_length_bars == 0 {
            bail!("scene_length_bars must be at least 1");
        }
        Ok(())
    }

    /// Options for the conversion facade
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            song_name: self.song_name.clone(),
            scene_length_bars: self.scene_length_bars,
            beats_per_bar: self.beats_per_bar,
            include_metadata: self.include_metadata,
            exported_from: self.exported_from.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
beats_per_bar: 3
scene_length_bars: 4
song_name: "Waltz"
include_metadata: false
"#;

        let config = ConverterConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.beats_per_bar, 3.0);
        assert_eq!(config.scene_length_bars, 4);
        assert_eq!(config.song_name, "Waltz");
        assert!(!config.include_metadata);
        assert_eq!(config.exported_from, "cyclone");
    }

    #[test]
    fn test_default_values() {
        let config = ConverterConfig::from_yaml("song_name: Minimal\n").unwrap();
        assert_eq!(config.beats_per_bar, 4.0);
        assert_eq!(config.scene_length_bars, 8);
        assert!(config.include_metadata);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(ConverterConfig::from_yaml("beats_per_bar: 0\n").is_err());
        assert!(ConverterConfig::from_yaml("scene_length_bars: 0\n").is_err());
        assert!(ConverterConfig::from_yaml("scene_length_bars: [").is_err());
    }

    #[test]
    fn test_export_options() {
        let config = ConverterConfig {
            scene_length_bars: 16,
            ..Default::default()
        };
        let options = config.export_options();
        assert_eq!(options.scene_length_bars, 16);
        assert_eq!(options.song_name, DEFAULT_SONG_NAME);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cyclone.yaml");

        let original = ConverterConfig {
            song_name: "Round Trip".to_string(),
            beats_per_bar: 7.0,
            ..Default::default()
        };
        original.save(&path).unwrap();

        let loaded = ConverterConfig::load(&path).unwrap();
        assert_eq!(original, loaded);
    }
}
