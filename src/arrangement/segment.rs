// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scene segmentation (timeline -> scenes).
//!
//! The timeline is cut into fixed-width windows. Each window becomes a
//! scene holding, per track, the earliest pattern that overlaps it. Later
//! patterns on the same track in the same window are dropped because a
//! scene can only assign one pattern per track.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::naming::{pattern_name, track_key};
use super::timeline::{PatternInstance, Track};
use crate::cks::{Advance, PatternDefinition, PatternType, SceneDefinition, SongBody};
use crate::timing::{bars_to_beats, beats_to_bars};

/// Window size used when cutting the timeline into scenes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneGrid {
    /// Scene length in bars
    pub scene_length_bars: u32,
    /// Beats per bar
    pub beats_per_bar: f64,
}

impl SceneGrid {
    /// Create a grid
    pub fn new(scene_length_bars: u32, beats_per_bar: f64) -> Self {
        Self {
            scene_length_bars,
            beats_per_bar,
        }
    }

    /// Width of one scene in beats
    pub fn scene_beats(&self) -> f64 {
        bars_to_beats(self.scene_length_bars as f64, self.beats_per_bar)
    }

    /// Number of windows needed to cover `duration` beats. Non-finite
    /// durations yield no windows; huge ones are clamped to `u32::MAX`.
    pub fn scene_count(&self, duration: f64) -> u32 {
        let width = self.scene_beats();
        if !width.is_finite() || width <= 0.0 || !duration.is_finite() || duration <= 0.0 {
            return 0;
        }
        (duration / width).ceil().min(u32::MAX as f64) as u32
    }
}

/// Name of the n-th emitted scene (0-based)
pub fn scene_name(index: usize) -> String {
    format!("Scene {}", index + 1)
}

/// Cut a timeline into scenes and the pattern definitions they reference.
///
/// Tracks are numbered by their position in `tracks`. Patterns on tracks
/// that are not in the list are skipped, and windows with no surviving
/// assignment are not emitted.
pub fn segment(tracks: &[Track], patterns: &[PatternInstance], grid: SceneGrid) -> SongBody {
    let mut body = SongBody::default();

    let track_numbers: HashMap<&str, u32> = tracks
        .iter()
        .enumerate()
        .map(|(i, track)| (track.id.as_str(), i as u32 + 1))
        .collect();

    let duration = patterns.iter().map(PatternInstance::end).fold(0.0, f64::max);
    let count = grid.scene_count(duration);

    let mut placed: Vec<(u32, &PatternInstance)> = patterns
        .iter()
        .filter_map(|p| match track_numbers.get(p.track_id.as_str()) {
            Some(&number) => Some((number, p)),
            None => {
                debug!(pattern = %p.id, track = %p.track_id, "skipping pattern on unknown track");
                None
            }
        })
        .collect();
    placed.sort_by(|(_, a), (_, b)| a.position.total_cmp(&b.position));

    let width = grid.scene_beats();
    for index in 0..count {
        let start = index as f64 * width;
        let end = start + width;

        let mut winners: BTreeMap<u32, &PatternInstance> = BTreeMap::new();
        for (number, pattern) in placed.iter().filter(|(_, p)| p.intersects(start, end)) {
            if let Some(kept) = winners.get(number) {
                debug!(
                    dropped = %pattern.id,
                    kept = %kept.id,
                    track = number,
                    scene = index,
                    "track already has a pattern in this scene"
                );
                continue;
            }
            winners.insert(*number, *pattern);
        }

        if winners.is_empty() {
            continue;
        }

        let mut scene = SceneDefinition::new(
            index.saturating_mul(grid.scene_length_bars),
            grid.scene_length_bars,
            Advance::Auto,
        );
        for (number, pattern) in winners {
            let name = pattern
                .label
                .clone()
                .unwrap_or_else(|| pattern_name(number, 0, pattern.pattern_type));
            body.patterns
                .entry(name.clone())
                .or_insert_with(|| definition_for(number, pattern, grid.beats_per_bar));

            let key = track_key(number);
            if pattern.muted {
                scene.mute(key.clone());
            }
            scene.assign(key, name);
        }

        body.scenes.insert(scene_name(body.scenes.len()), scene);
    }

    body
}

/// Hardware definition for a placed pattern
fn definition_for(
    track_number: u32,
    pattern: &PatternInstance,
    beats_per_bar: f64,
) -> PatternDefinition {
    let bars = beats_to_bars(pattern.duration, beats_per_bar).round().max(1.0) as u32;
    match pattern.pattern_type {
        PatternType::P3 => {
            let data = pattern.bars.clone().unwrap_or_default();
            PatternDefinition::new_p3(track_number, bars, data)
        }
        PatternType::Ck => PatternDefinition::new_ck(track_number, bars),
    }
}
