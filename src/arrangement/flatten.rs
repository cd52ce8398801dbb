// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scene flattening (scenes -> timeline).
//!
//! Scenes are laid end to end in file order. Every arranged scene takes up
//! its declared length whether or not it assigns anything; the `gbar`
//! field is not used for placement.

use tracing::debug;

use super::naming::{track_key, track_number};
use super::timeline::{PatternInstance, SceneMarker, Timeline, Track};
use crate::cks::{PatternType, SongBody};
use crate::timing::{bars_to_beats, scene_duration};

/// Handle for the placement of a pattern on a track within a scene
pub fn placement_id(scene_name: &str, track_key: &str) -> String {
    format!("{}:{}", scene_name, track_key)
}

/// Flatten one song into a timeline.
///
/// Handles default to wire names (track keys, pattern names, scene names).
/// Track keys that do not parse and pattern names with no definition are
/// skipped.
pub fn flatten(song_name: &str, song: &SongBody, beats_per_bar: f64) -> Timeline {
    let tracks: Vec<Track> = song
        .assigned_track_numbers()
        .into_iter()
        .map(|number| Track::new(track_key(number), number))
        .collect();

    let mut patterns = Vec::new();
    let mut scenes = Vec::new();
    let mut current_position = 0.0;

    for (scene_name, scene) in song.arranged_scenes() {
        let length = scene_duration(scene, beats_per_bar);
        scenes.push(SceneMarker {
            id: scene_name.clone(),
            name: scene_name.clone(),
            position: current_position,
            duration: length,
        });

        for (key, pattern_name) in scene.assignments() {
            if track_number(key).is_none() {
                debug!(scene = %scene_name, track = key, "skipping unparseable track key");
                continue;
            }
            let Some(definition) = song.patterns.get(pattern_name) else {
                debug!(
                    scene = %scene_name,
                    pattern = pattern_name,
                    "skipping dangling pattern reference"
                );
                continue;
            };

            let pattern_type = definition.pattern_type();
            let bars = match pattern_type {
                PatternType::P3 => definition.bars().map(<[_]>::to_vec),
                PatternType::Ck => None,
            };

            patterns.push(PatternInstance {
                id: placement_id(scene_name, key),
                track_id: key.to_string(),
                position: current_position,
                duration: bars_to_beats(definition.bar_count() as f64, beats_per_bar),
                label: Some(pattern_name.to_string()),
                pattern_type,
                muted: scene.is_muted(key),
                bars,
                logical_duration: Some(bars_to_beats(
                    definition.logical_bars() as f64,
                    beats_per_bar,
                )),
                pattern_id: Some(pattern_name.to_string()),
                scene: Some(scene_name.clone()),
            });
        }

        current_position += length;
    }

    Timeline {
        song_name: song_name.to_string(),
        tracks,
        patterns,
        scenes,
    }
}
