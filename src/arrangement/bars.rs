// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Bar repetition expansion.
//!
//! A P3 pattern stores each bar once together with a repeat count. The
//! expander computes the played length and walks the bars as the device
//! plays them, handing out references to the stored bars instead of copies.

use crate::cks::Bar;
use crate::timing::bars_to_beats;

/// One played pass of a stored bar
#[derive(Debug, Clone, Copy)]
pub struct BarOccurrence<'a> {
    /// Index of the bar in the pattern
    pub source_index: usize,
    /// Which repetition of that bar this is (0-based)
    pub repetition: u32,
    /// The stored bar, shared by every repetition
    pub bar: &'a Bar,
}

/// Repetition-aware view over a pattern's bars
#[derive(Debug, Clone, Copy, Default)]
pub struct BarSequence<'a> {
    bars: &'a [Bar],
}

impl<'a> BarSequence<'a> {
    /// Wrap a slice of bars
    pub fn new(bars: &'a [Bar]) -> Self {
        Self { bars }
    }

    /// Wrap optional step data; absent data behaves as an empty pattern
    pub fn from_option(bars: Option<&'a [Bar]>) -> Self {
        Self::new(bars.unwrap_or(&[]))
    }

    /// Number of bars played, counting repeats. Saturates at `u32::MAX`.
    pub fn expanded_bar_count(&self) -> u32 {
        self.bars
            .iter()
            .fold(0u32, |total, bar| total.saturating_add(bar.repeat_count()))
    }

    /// Number of steps played, counting repeats. Saturates at `u32::MAX`.
    pub fn expanded_step_count(&self) -> u32 {
        self.bars.iter().fold(0u32, |total, bar| {
            total.saturating_add(bar.active_steps().saturating_mul(bar.repeat_count()))
        })
    }

    /// Played length in beats
    pub fn expanded_duration(&self, beats_per_bar: f64) -> f64 {
        bars_to_beats(self.expanded_bar_count() as f64, beats_per_bar)
    }

    /// Walk every played bar in order
    pub fn occurrences(&self) -> impl Iterator<Item = BarOccurrence<'a>> + 'a {
        let bars = self.bars;
        bars.iter().enumerate().flat_map(|(source_index, bar)| {
            (0..bar.repeat_count()).map(move |repetition| BarOccurrence {
                source_index,
                repetition,
                bar,
            })
        })
    }

    /// Stored bars
    pub fn bars(&self) -> &'a [Bar] {
        self.bars
    }
}
