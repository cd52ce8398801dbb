// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Editor side-table stored under `_cyclone_metadata`.
//!
//! The hardware ignores this block. It maps wire names to stable handles
//! so the editor keeps identity across repeated import/export cycles, and
//! records track colors and display order.

pub mod ids;
pub mod mapping;

pub use ids::{EntityKind, IdGenerator, RandomIds, SequentialIds};
pub use mapping::{
    ensure, forget_pattern, forget_scene, forget_track, generate, generate_for_timeline, strip,
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::cks::Extra;

/// Side-table format version written by this crate
pub const METADATA_VERSION: &str = "1.0.0";

/// Track colors, cycled by track number
pub const TRACK_PALETTE: [&str; 8] = [
    "#ff6b6b", "#4ecdc4", "#ffd93d", "#6c5ce7", "#a8e6cf", "#ff8b94", "#74b9ff", "#fdcb6e",
];

/// Color for a 1-based track number
pub fn track_color(track_number: u32) -> &'static str {
    let index = track_number.saturating_sub(1) as usize % TRACK_PALETTE.len();
    TRACK_PALETTE[index]
}

/// Handle for a pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternMapping {
    pub react_key: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Handle, color and number for a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackMapping {
    pub react_key: String,
    pub color: String,
    pub track_number: u32,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Handle for a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneMapping {
    pub react_key: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Wire name -> mapping tables
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UiMappings {
    #[serde(default)]
    pub patterns: IndexMap<String, PatternMapping>,
    #[serde(default)]
    pub tracks: IndexMap<String, TrackMapping>,
    #[serde(default)]
    pub scenes: IndexMap<String, SceneMapping>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// The side-table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycloneMetadata {
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_from: Option<String>,
    #[serde(default)]
    pub current_song_name: String,
    #[serde(default)]
    pub ui_mappings: UiMappings,
    #[serde(default)]
    pub track_order: Vec<String>,
    #[serde(default)]
    pub scene_order: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl CycloneMetadata {
    /// Create an empty side-table pointing at a song
    pub fn new(current_song_name: impl Into<String>) -> Self {
        Self {
            version: METADATA_VERSION.to_string(),
            exported_at: None,
            exported_from: None,
            current_song_name: current_song_name.into(),
            ui_mappings: UiMappings::default(),
            track_order: Vec::new(),
            scene_order: Vec::new(),
            extra: Extra::new(),
        }
    }

    /// Handle for a pattern name
    pub fn pattern_handle(&self, name: &str) -> Option<&str> {
        self.ui_mappings.patterns.get(name).map(|m| m.react_key.as_str())
    }

    /// Mapping for a track key
    pub fn track(&self, key: &str) -> Option<&TrackMapping> {
        self.ui_mappings.tracks.get(key)
    }

    /// Handle for a scene name
    pub fn scene_handle(&self, name: &str) -> Option<&str> {
        self.ui_mappings.scenes.get(name).map(|m| m.react_key.as_str())
    }

    /// Record when and by what the file was written
    pub fn stamp(&mut self, exported_from: impl Into<String>) {
        self.exported_at = Some(chrono::Utc::now().to_rfc3339());
        self.exported_from = Some(exported_from.into());
    }
}
