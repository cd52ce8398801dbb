// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pattern definitions.
//!
//! Patterns come in two kinds, tagged by the `type` field:
//! - `P3`: step patterns, optionally carrying full per-bar step data
//! - `CK`: chord/clock patterns that only describe their length
//!
//! Optional pattern-level fields are [`Nullable`] and only written back
//! when they were present in the source, `null` included.

use serde::{Deserialize, Serialize};

use super::{present, Extra, Nullable};
use crate::arrangement::bars::BarSequence;

/// Steps in one bar of a P3 pattern
pub const STEPS_PER_BAR: usize = 16;

/// Pattern kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternType {
    P3,
    #[serde(rename = "CK")]
    Ck,
}

impl PatternType {
    /// Tag as written in the wire format and in generated names
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::P3 => "P3",
            PatternType::Ck => "CK",
        }
    }
}

impl Default for PatternType {
    fn default() -> Self {
        PatternType::P3
    }
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One bar of P3 step data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Playback direction ("forward", "reverse", ...)
    pub direction: String,
    /// Time base, e.g. "1/16"
    pub tbase: String,
    /// Number of active steps
    pub last_step: i32,
    /// Transpose offset
    pub xpos: i32,
    /// Repeat count; absent, `null` or below 1 plays once
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub reps: Nullable<i32>,
    /// Loop flag
    pub gbar: bool,
    pub note: [String; STEPS_PER_BAR],
    pub velo: [i32; STEPS_PER_BAR],
    pub length: [i32; STEPS_PER_BAR],
    pub delay: [i32; STEPS_PER_BAR],
    pub gate: [u8; STEPS_PER_BAR],
    pub tie: [u8; STEPS_PER_BAR],
    pub skip: [u8; STEPS_PER_BAR],
    #[serde(rename = "note_X")]
    pub note_x: [u8; STEPS_PER_BAR],
    #[serde(rename = "aux_A_value")]
    pub aux_a_value: [i32; STEPS_PER_BAR],
    #[serde(rename = "aux_B_value")]
    pub aux_b_value: [i32; STEPS_PER_BAR],
    #[serde(rename = "aux_C_value")]
    pub aux_c_value: [i32; STEPS_PER_BAR],
    #[serde(rename = "aux_D_value")]
    pub aux_d_value: [i32; STEPS_PER_BAR],
    #[serde(rename = "aux_A_flag")]
    pub aux_a_flag: [u8; STEPS_PER_BAR],
    #[serde(rename = "aux_B_flag")]
    pub aux_b_flag: [u8; STEPS_PER_BAR],
    #[serde(rename = "aux_C_flag")]
    pub aux_c_flag: [u8; STEPS_PER_BAR],
    #[serde(rename = "aux_D_flag")]
    pub aux_d_flag: [u8; STEPS_PER_BAR],
    #[serde(flatten)]
    pub extra: Extra,
}

impl Default for Bar {
    fn default() -> Self {
        Self {
            direction: "forward".to_string(),
            tbase: "1/16".to_string(),
            last_step: STEPS_PER_BAR as i32,
            xpos: 0,
            reps: Some(Some(1)),
            gbar: false,
            note: std::array::from_fn(|_| "C4".to_string()),
            velo: [100; STEPS_PER_BAR],
            length: [1; STEPS_PER_BAR],
            delay: [0; STEPS_PER_BAR],
            gate: [0; STEPS_PER_BAR],
            tie: [0; STEPS_PER_BAR],
            skip: [0; STEPS_PER_BAR],
            note_x: [0; STEPS_PER_BAR],
            aux_a_value: [0; STEPS_PER_BAR],
            aux_b_value: [0; STEPS_PER_BAR],
            aux_c_value: [0; STEPS_PER_BAR],
            aux_d_value: [0; STEPS_PER_BAR],
            aux_a_flag: [0; STEPS_PER_BAR],
            aux_b_flag: [0; STEPS_PER_BAR],
            aux_c_flag: [0; STEPS_PER_BAR],
            aux_d_flag: [0; STEPS_PER_BAR],
            extra: Extra::new(),
        }
    }
}

impl Bar {
    /// Effective repeat count (at least 1)
    pub fn repeat_count(&self) -> u32 {
        self.reps.flatten().unwrap_or(1).max(1) as u32
    }

    /// Effective active step count (never negative)
    pub fn active_steps(&self) -> u32 {
        self.last_step.max(0) as u32
    }

    /// Builder: set repeat count
    pub fn with_reps(mut self, reps: i32) -> Self {
        self.reps = Some(Some(reps));
        self
    }

    /// Builder: set active step count
    pub fn with_last_step(mut self, last_step: i32) -> Self {
        self.last_step = last_step;
        self
    }
}

/// A P3 pattern, with or without embedded step data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct P3Pattern {
    pub creator_track: u32,
    pub saved: bool,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub bar_count: Nullable<u32>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub loop_start: Nullable<i32>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub loop_end: Nullable<i32>,
    #[serde(
        rename = "aux_A",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub aux_a: Nullable<String>,
    #[serde(
        rename = "aux_B",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub aux_b: Nullable<String>,
    #[serde(
        rename = "aux_C",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub aux_c: Nullable<String>,
    #[serde(
        rename = "aux_D",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub aux_d: Nullable<String>,
    /// Opaque accumulator settings; `null` is kept as `Value::Null`
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub accumulator_config: Option<serde_json::Value>,
    /// Step data; absent for P3 patterns saved without data
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub bars: Nullable<Vec<Bar>>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A CK pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CkPattern {
    pub creator_track: u32,
    pub saved: bool,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub bar_count: Nullable<u32>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub last_step: Nullable<i32>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A pattern as stored in the `patterns` map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PatternDefinition {
    P3(P3Pattern),
    #[serde(rename = "CK")]
    Ck(CkPattern),
}

impl PatternDefinition {
    /// Create a P3 pattern; empty step data is stored as "no data"
    pub fn new_p3(creator_track: u32, bar_count: u32, bars: Vec<Bar>) -> Self {
        PatternDefinition::P3(P3Pattern {
            creator_track,
            saved: false,
            bar_count: Some(Some(bar_count)),
            loop_start: None,
            loop_end: None,
            aux_a: None,
            aux_b: None,
            aux_c: None,
            aux_d: None,
            accumulator_config: None,
            bars: if bars.is_empty() { None } else { Some(Some(bars)) },
            extra: Extra::new(),
        })
    }

    /// Create a CK pattern
    pub fn new_ck(creator_track: u32, bar_count: u32) -> Self {
        PatternDefinition::Ck(CkPattern {
            creator_track,
            saved: false,
            bar_count: Some(Some(bar_count)),
            last_step: None,
            extra: Extra::new(),
        })
    }

    /// Get the kind tag
    pub fn pattern_type(&self) -> PatternType {
        match self {
            PatternDefinition::P3(_) => PatternType::P3,
            PatternDefinition::Ck(_) => PatternType::Ck,
        }
    }

    /// Track number that created the pattern
    pub fn creator_track(&self) -> u32 {
        match self {
            PatternDefinition::P3(p) => p.creator_track,
            PatternDefinition::Ck(p) => p.creator_track,
        }
    }

    /// Whether the pattern is saved on the device
    pub fn is_saved(&self) -> bool {
        match self {
            PatternDefinition::P3(p) => p.saved,
            PatternDefinition::Ck(p) => p.saved,
        }
    }

    /// Declared bar count (1 when absent)
    pub fn bar_count(&self) -> u32 {
        let declared = match self {
            PatternDefinition::P3(p) => p.bar_count,
            PatternDefinition::Ck(p) => p.bar_count,
        };
        declared.flatten().unwrap_or(1)
    }

    /// Step data, if this is a P3 pattern that carries it
    pub fn bars(&self) -> Option<&[Bar]> {
        match self {
            PatternDefinition::P3(p) => p.bars.as_ref().and_then(|bars| bars.as_deref()),
            PatternDefinition::Ck(_) => None,
        }
    }

    /// Bar count after expanding repetitions, falling back to the
    /// declared count when there is no step data
    pub fn logical_bars(&self) -> u32 {
        match self.bars() {
            Some(bars) if !bars.is_empty() => {
                BarSequence::new(bars).expanded_bar_count()
            }
            _ => self.bar_count(),
        }
    }
}
