// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Bar/beat conversion.
//!
//! Beat quantities are never rounded here: fractional beats are valid
//! timeline positions and must survive a bars -> beats -> bars trip.

use crate::cks::SceneDefinition;

/// Beats per bar when the caller does not specify one (4/4)
pub const DEFAULT_BEATS_PER_BAR: f64 = 4.0;

/// Convert a bar count to beats
pub fn bars_to_beats(bars: f64, beats_per_bar: f64) -> f64 {
    bars * beats_per_bar
}

/// Convert a beat count to bars
pub fn beats_to_bars(beats: f64, beats_per_bar: f64) -> f64 {
    beats / beats_per_bar
}

/// Length of a scene in beats
pub fn scene_duration(scene: &SceneDefinition, beats_per_bar: f64) -> f64 {
    bars_to_beats(scene.length as f64, beats_per_bar)
}
