// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Arrangement conversion between the timeline and scenes.
//!
//! This module provides:
//! - Timeline: tracks, placed patterns and scene markers in beats
//! - Segmenting: timeline -> fixed-length scenes
//! - Flattening: scenes -> timeline, in file order
//! - Bar expansion and hardware naming helpers

pub mod bars;
pub mod flatten;
pub mod naming;
pub mod segment;
pub mod timeline;

pub use bars::{BarOccurrence, BarSequence};
pub use flatten::{flatten, placement_id};
pub use naming::{pattern_name, track_key, track_number};
pub use segment::{scene_name, segment, SceneGrid};
pub use timeline::{PatternInstance, SceneMarker, Timeline, Track};
