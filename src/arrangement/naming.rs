// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Hardware-compatible names for tracks and patterns.

use crate::cks::PatternType;

const TRACK_PREFIX: &str = "track_";

/// Parse the 1-based track number out of a `track_<N>` key
pub fn track_number(track_key: &str) -> Option<u32> {
    let digits = track_key.strip_prefix(TRACK_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|n| *n > 0)
}

/// Build the wire key for a track number
pub fn track_key(number: u32) -> String {
    format!("{}{}", TRACK_PREFIX, number)
}

/// Generated pattern name, e.g. `T3_P3_00`
pub fn pattern_name(track_number: u32, index: u32, pattern_type: PatternType) -> String {
    format!("T{}_{}_{:02}", track_number, pattern_type, index)
}
