// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! CKS wire format.
//!
//! This module provides:
//! - Song file: the `song_data` container and optional side-table
//! - Patterns: tagged P3/CK definitions with per-bar step data
//! - Scenes: fixed-length blocks with per-track pattern assignments
//!
//! Every level carries an `extra` bag so fields this crate does not
//! understand are written back verbatim. Optional known fields are
//! [`Nullable`] so an explicit `null` survives a round trip.

use serde::{Deserialize, Deserializer};

pub mod pattern;
pub mod scene;
pub mod song;

pub use pattern::{Bar, CkPattern, P3Pattern, PatternDefinition, PatternType, STEPS_PER_BAR};
pub use scene::{Advance, SceneDefinition};
pub use song::{CksFile, InstrumentAssignment, SongBody, DEFAULT_SONG_NAME, WORKSCENE};

/// Unknown fields carried through import/export untouched
pub type Extra = serde_json::Map<String, serde_json::Value>;

/// Optional field that keeps an absent key apart from an explicit `null`:
/// `None` is absent, `Some(None)` is `null`.
pub type Nullable<T> = Option<Option<T>>;

/// `deserialize_with` for fields that may be absent: any present value,
/// `null` included, becomes `Some`. Pair with `#[serde(default)]`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
