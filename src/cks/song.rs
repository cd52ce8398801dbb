// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song file container.
//!
//! The root object maps song names to song bodies under `song_data`, with
//! an optional `_cyclone_metadata` side-table next to it.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{present, Extra, Nullable, PatternDefinition, SceneDefinition};
use crate::arrangement::naming;
use crate::metadata::CycloneMetadata;

/// Scratch scene the hardware uses for live edits; ignored for arrangement
pub const WORKSCENE: &str = "workscene";

/// Song name used when a file holds no songs
pub const DEFAULT_SONG_NAME: &str = "New Song";

/// Output routing for a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentAssignment {
    pub output: String,
    /// MIDI channel (1-16) for multi-channel instruments
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub multi_channel: Nullable<u8>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// One song: its patterns, scenes and instrument routing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongBody {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub instrument_assignments: Nullable<IndexMap<String, InstrumentAssignment>>,
    pub patterns: IndexMap<String, PatternDefinition>,
    pub scenes: IndexMap<String, SceneDefinition>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Default for SongBody {
    fn default() -> Self {
        Self {
            instrument_assignments: None,
            patterns: IndexMap::new(),
            scenes: IndexMap::new(),
            extra: Extra::new(),
        }
    }
}

impl SongBody {
    /// Scenes in file order, excluding the work scene
    pub fn arranged_scenes(&self) -> impl Iterator<Item = (&String, &SceneDefinition)> {
        self.scenes.iter().filter(|(name, _)| name.as_str() != WORKSCENE)
    }

    /// Distinct track numbers assigned a pattern in any arranged scene
    pub fn assigned_track_numbers(&self) -> BTreeSet<u32> {
        self.arranged_scenes()
            .flat_map(|(_, scene)| scene.assignments())
            .filter_map(|(track_key, _)| naming::track_number(track_key))
            .collect()
    }

    /// Every track key the song refers to (assignments, mutes and
    /// instrument routing), deduplicated and sorted by track number.
    /// Keys that do not parse are dropped.
    pub fn referenced_track_keys(&self) -> Vec<(String, u32)> {
        let scene_keys = self.arranged_scenes().flat_map(|(_, scene)| {
            scene.assignments().map(|(key, _)| key).chain(scene.mutes())
        });
        let routing_keys = self
            .instrument_assignments
            .iter()
            .flatten()
            .flat_map(|m| m.keys())
            .map(String::as_str);

        let mut keys: Vec<(String, u32)> = Vec::new();
        for key in scene_keys.chain(routing_keys) {
            let Some(number) = naming::track_number(key) else {
                continue;
            };
            if !keys.iter().any(|(k, _)| k == key) {
                keys.push((key.to_string(), number));
            }
        }
        keys.sort_by_key(|(_, number)| *number);
        keys
    }
}

/// Root of a CKS file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CksFile {
    pub song_data: IndexMap<String, SongBody>,
    #[serde(
        rename = "_cyclone_metadata",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub metadata: Option<CycloneMetadata>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl CksFile {
    /// Create a file holding a single song
    pub fn with_song(name: impl Into<String>, body: SongBody) -> Self {
        let mut song_data = IndexMap::new();
        song_data.insert(name.into(), body);
        Self {
            song_data,
            metadata: None,
            extra: Extra::new(),
        }
    }

    /// Name of the first song in file order
    pub fn first_song_name(&self) -> Option<&str> {
        self.song_data.keys().next().map(String::as_str)
    }

    /// Song the editor is working on: the side-table's pointer when it
    /// names an existing song, otherwise the first song
    pub fn current_song_name(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .map(|m| m.current_song_name.as_str())
            .filter(|name| self.song_data.contains_key(*name))
            .or_else(|| self.first_song_name())
    }

    /// Body of the current song
    pub fn current_song(&self) -> Option<(&str, &SongBody)> {
        let name = self.current_song_name()?;
        self.song_data.get(name).map(|body| (name, body))
    }
}
