// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timing module.
//!
//! Bar and beat arithmetic shared by the scene segmenter and flattener.

pub mod beats;

pub use beats::{bars_to_beats, beats_to_bars, scene_duration, DEFAULT_BEATS_PER_BAR};
