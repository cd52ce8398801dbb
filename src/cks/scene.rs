// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scene definitions.
//!
//! A scene is a fixed-length block of hardware playback time carrying at
//! most one pattern per track.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{present, Extra, Nullable};

/// How the hardware moves on from a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Advance {
    /// Continue to the next scene when this one ends
    Auto,
    /// Loop until the player advances
    Manual,
}

impl Default for Advance {
    fn default() -> Self {
        Advance::Auto
    }
}

/// A scene as stored in the `scenes` map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDefinition {
    /// Global bar offset
    pub gbar: u32,
    /// Length in bars
    pub length: u32,
    /// Advance mode
    pub advance: Advance,
    /// Track key -> pattern name
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub pattern_assignments: Nullable<IndexMap<String, String>>,
    /// Track keys muted when the scene starts
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub initial_mutes: Nullable<Vec<String>>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl SceneDefinition {
    /// Create an empty scene
    pub fn new(gbar: u32, length: u32, advance: Advance) -> Self {
        Self {
            gbar,
            length,
            advance,
            pattern_assignments: None,
            initial_mutes: None,
            extra: Extra::new(),
        }
    }

    /// Iterate (track key, pattern name) assignments in file order
    pub fn assignments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pattern_assignments
            .iter()
            .flatten()
            .flat_map(|map| map.iter())
            .map(|(track, pattern)| (track.as_str(), pattern.as_str()))
    }

    /// Assign a pattern to a track, replacing any previous assignment
    pub fn assign(&mut self, track_key: impl Into<String>, pattern: impl Into<String>) {
        self.pattern_assignments
            .get_or_insert(None)
            .get_or_insert_with(IndexMap::new)
            .insert(track_key.into(), pattern.into());
    }

    /// Track keys muted when the scene starts
    pub fn mutes(&self) -> impl Iterator<Item = &str> {
        self.initial_mutes.iter().flatten().flatten().map(String::as_str)
    }

    /// Check whether a track starts muted in this scene
    pub fn is_muted(&self, track_key: &str) -> bool {
        self.mutes().any(|m| m == track_key)
    }

    /// Add a track to the initial mute list
    pub fn mute(&mut self, track_key: impl Into<String>) {
        let key = track_key.into();
        let mutes = self.initial_mutes.get_or_insert(None).get_or_insert_with(Vec::new);
        if !mutes.contains(&key) {
            mutes.push(key);
        }
    }

    /// Number of assigned tracks
    pub fn assignment_count(&self) -> usize {
        self.assignments().count()
    }
}
