// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Continuous-timeline model exchanged with the editor.
//!
//! All positions and durations are absolute beats from the timeline origin.

use crate::cks::{Bar, PatternType};

/// A lane on the timeline
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Stable handle used by the editor
    pub id: String,
    /// Display name
    pub name: String,
    /// 1-based track number
    pub number: u32,
    /// Display color, e.g. "#ff6b6b"
    pub color: Option<String>,
}

impl Track {
    /// Create a track with a generated display name
    pub fn new(id: impl Into<String>, number: u32) -> Self {
        Self {
            id: id.into(),
            name: format!("Track {}", number),
            number,
            color: None,
        }
    }

    /// Builder: set color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// A pattern placed on a track
#[derive(Debug, Clone, PartialEq)]
pub struct PatternInstance {
    /// Handle of this placement
    pub id: String,
    /// Handle of the track it sits on
    pub track_id: String,
    /// Start in beats
    pub position: f64,
    /// Length in beats
    pub duration: f64,
    /// Pattern name; generated on export when absent
    pub label: Option<String>,
    pub pattern_type: PatternType,
    pub muted: bool,
    /// Full step data for P3 patterns
    pub bars: Option<Vec<Bar>>,
    /// Played length in beats once bar repeats are expanded
    pub logical_duration: Option<f64>,
    /// Stable handle of the underlying pattern definition
    pub pattern_id: Option<String>,
    /// Scene the placement came from on import
    pub scene: Option<String>,
}

impl PatternInstance {
    /// Create a placement with no label or step data
    pub fn new(
        id: impl Into<String>,
        track_id: impl Into<String>,
        position: f64,
        duration: f64,
    ) -> Self {
        Self {
            id: id.into(),
            track_id: track_id.into(),
            position,
            duration,
            label: None,
            pattern_type: PatternType::P3,
            muted: false,
            bars: None,
            logical_duration: None,
            pattern_id: None,
            scene: None,
        }
    }

    /// End position in beats (exclusive)
    pub fn end(&self) -> f64 {
        self.position + self.duration
    }

    /// Check whether this placement overlaps `[start, end)`
    pub fn intersects(&self, start: f64, end: f64) -> bool {
        self.position < end && self.end() > start
    }

    /// Builder: set label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Builder: set pattern type
    pub fn with_type(mut self, pattern_type: PatternType) -> Self {
        self.pattern_type = pattern_type;
        self
    }

    /// Builder: mark muted
    pub fn muted(mut self) -> Self {
        self.muted = true;
        self
    }

    /// Builder: attach step data
    pub fn with_bars(mut self, bars: Vec<Bar>) -> Self {
        self.bars = Some(bars);
        self
    }
}

/// Scene boundary shown on the timeline
#[derive(Debug, Clone, PartialEq)]
pub struct SceneMarker {
    pub id: String,
    pub name: String,
    pub position: f64,
    pub duration: f64,
}

/// Result of importing one song
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Timeline {
    pub song_name: String,
    pub tracks: Vec<Track>,
    pub patterns: Vec<PatternInstance>,
    pub scenes: Vec<SceneMarker>,
}

impl Timeline {
    /// End of the last pattern in beats
    pub fn duration(&self) -> f64 {
        self.patterns.iter().map(PatternInstance::end).fold(0.0, f64::max)
    }

    /// Look up a track by handle
    pub fn track(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Patterns on one track, in timeline order
    pub fn patterns_on(&self, track_id: &str) -> Vec<&PatternInstance> {
        let mut patterns: Vec<_> =
            self.patterns.iter().filter(|p| p.track_id == track_id).collect();
        patterns.sort_by(|a, b| a.position.total_cmp(&b.position));
        patterns
    }
}
