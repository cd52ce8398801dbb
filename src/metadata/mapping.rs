// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Side-table generation and repair.
//!
//! Repair is additive: the keys a song requires are collected first, then
//! any that lack an entry get one. Existing entries are never replaced, so
//! an entity keeps its handle for as long as it exists.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::{
    track_color, CycloneMetadata, EntityKind, IdGenerator, PatternMapping, SceneMapping,
    TrackMapping, METADATA_VERSION,
};
use crate::arrangement::{pattern_name, track_key, PatternInstance, Track};
use crate::cks::{CksFile, Extra, SongBody, DEFAULT_SONG_NAME};

/// Keys a song needs side-table entries for
#[derive(Debug, Clone, Default, PartialEq)]
struct RequiredKeys {
    patterns: Vec<String>,
    /// Track key and its number, sorted by number
    tracks: Vec<(String, u32)>,
    /// Arranged scene names sorted by global bar offset
    scenes: Vec<String>,
}

impl RequiredKeys {
    fn collect(song: &SongBody) -> Self {
        let mut scenes: Vec<(&String, u32)> = song
            .arranged_scenes()
            .map(|(name, scene)| (name, scene.gbar))
            .collect();
        scenes.sort_by_key(|(_, gbar)| *gbar);

        Self {
            patterns: song.patterns.keys().cloned().collect(),
            tracks: song.referenced_track_keys(),
            scenes: scenes.into_iter().map(|(name, _)| name.clone()).collect(),
        }
    }
}

/// Insert entries for required keys that have none. Returns the number of
/// entries added.
fn insert_missing(
    metadata: &mut CycloneMetadata,
    required: &RequiredKeys,
    ids: &mut dyn IdGenerator,
) -> usize {
    let mut added = 0;
    let mappings = &mut metadata.ui_mappings;

    for name in &required.patterns {
        if !mappings.patterns.contains_key(name) {
            mappings.patterns.insert(
                name.clone(),
                PatternMapping {
                    react_key: ids.next_id(EntityKind::Pattern),
                    extra: Extra::new(),
                },
            );
            added += 1;
        }
    }

    for (key, number) in &required.tracks {
        if !mappings.tracks.contains_key(key) {
            mappings.tracks.insert(
                key.clone(),
                TrackMapping {
                    react_key: ids.next_id(EntityKind::Track),
                    color: track_color(*number).to_string(),
                    track_number: *number,
                    extra: Extra::new(),
                },
            );
            added += 1;
        }
        if !metadata.track_order.contains(key) {
            metadata.track_order.push(key.clone());
        }
    }

    for name in &required.scenes {
        if !mappings.scenes.contains_key(name) {
            mappings.scenes.insert(
                name.clone(),
                SceneMapping {
                    react_key: ids.next_id(EntityKind::Scene),
                    extra: Extra::new(),
                },
            );
            added += 1;
        }
        if !metadata.scene_order.contains(name) {
            metadata.scene_order.push(name.clone());
        }
    }

    added
}

/// Build a fresh side-table for one song
pub fn generate(song_name: &str, song: &SongBody, ids: &mut dyn IdGenerator) -> CycloneMetadata {
    let mut metadata = CycloneMetadata::new(song_name);
    let added = insert_missing(&mut metadata, &RequiredKeys::collect(song), ids);
    debug!(song = song_name, entries = added, "generated side-table");
    metadata
}

/// Build a side-table for freshly exported data, keeping the editor's
/// existing track and pattern handles so they survive the round trip
pub fn generate_for_timeline(
    song_name: &str,
    song: &SongBody,
    tracks: &[Track],
    patterns: &[PatternInstance],
    ids: &mut dyn IdGenerator,
) -> CycloneMetadata {
    let mut metadata = CycloneMetadata::new(song_name);

    for (index, track) in tracks.iter().enumerate() {
        let number = index as u32 + 1;
        let key = track_key(number);
        metadata.ui_mappings.tracks.insert(
            key.clone(),
            TrackMapping {
                react_key: track.id.clone(),
                color: track
                    .color
                    .clone()
                    .unwrap_or_else(|| track_color(number).to_string()),
                track_number: number,
                extra: Extra::new(),
            },
        );
        metadata.track_order.push(key);
    }

    let numbers: HashMap<&str, u32> = metadata
        .ui_mappings
        .tracks
        .values()
        .map(|m| (m.react_key.as_str(), m.track_number))
        .collect();
    let mut known: Vec<(String, String)> = Vec::new();
    for pattern in patterns {
        let track = numbers.get(pattern.track_id.as_str());
        let (Some(handle), Some(&number)) = (&pattern.pattern_id, track) else {
            continue;
        };
        let name = pattern
            .label
            .clone()
            .unwrap_or_else(|| pattern_name(number, 0, pattern.pattern_type));
        if song.patterns.contains_key(&name) && !known.iter().any(|(n, _)| *n == name) {
            known.push((name, handle.clone()));
        }
    }
    for (name, handle) in known {
        metadata.ui_mappings.patterns.insert(
            name,
            PatternMapping {
                react_key: handle,
                extra: Extra::new(),
            },
        );
    }

    insert_missing(&mut metadata, &RequiredKeys::collect(song), ids);
    metadata
}

/// Make sure the file carries a complete side-table for its current song.
///
/// Attaches a generated table when there is none; otherwise repairs the
/// existing one in place without touching entries that are already there.
/// Returns whether anything changed. Calling it again is a no-op.
pub fn ensure(file: &mut CksFile, ids: &mut dyn IdGenerator) -> bool {
    if file.metadata.is_none() {
        let name = file.first_song_name().unwrap_or(DEFAULT_SONG_NAME).to_string();
        let metadata = match file.song_data.get(&name) {
            Some(song) => generate(&name, song, ids),
            None => CycloneMetadata::new(name),
        };
        file.metadata = Some(metadata);
        return true;
    }
    let Some(metadata) = file.metadata.as_mut() else {
        return false;
    };

    let before = metadata.clone();

    if !file.song_data.contains_key(&metadata.current_song_name) {
        if let Some(first) = file.song_data.keys().next() {
            warn!(
                missing = %metadata.current_song_name,
                replacement = %first,
                "side-table points at a song that no longer exists"
            );
            metadata.current_song_name = first.clone();
        }
    }

    if metadata.version.is_empty() {
        metadata.version = METADATA_VERSION.to_string();
    }

    if let Some(song) = file.song_data.get(&metadata.current_song_name) {
        let added = insert_missing(metadata, &RequiredKeys::collect(song), ids);
        if added > 0 {
            debug!(song = %metadata.current_song_name, entries = added, "repaired side-table");
        }
    }

    *metadata != before
}

/// Copy of the file without the side-table, ready for the hardware
pub fn strip(file: &CksFile) -> CksFile {
    CksFile {
        song_data: file.song_data.clone(),
        metadata: None,
        extra: file.extra.clone(),
    }
}

/// Drop the entry for a removed pattern
pub fn forget_pattern(metadata: &mut CycloneMetadata, name: &str) -> Option<PatternMapping> {
    metadata.ui_mappings.patterns.shift_remove(name)
}

/// Drop the entry and order slot for a removed track
pub fn forget_track(metadata: &mut CycloneMetadata, key: &str) -> Option<TrackMapping> {
    metadata.track_order.retain(|k| k != key);
    metadata.ui_mappings.tracks.shift_remove(key)
}

/// Drop the entry and order slot for a removed scene
pub fn forget_scene(metadata: &mut CycloneMetadata, name: &str) -> Option<SceneMapping> {
    metadata.scene_order.retain(|n| n != name);
    metadata.ui_mappings.scenes.shift_remove(name)
}
