// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Conversion entry points.
//!
//! This module provides:
//! - `parse`/`serialize`: CKS text <-> `CksFile`
//! - `import`: current song -> timeline, decorated with side-table handles
//! - `export`: timeline -> `CksFile`, with or without a side-table
//! - `export_clean`: hardware-ready text with the side-table removed
//! - `Converter`: the above bundled with options and a handle generator

pub mod error;

pub use error::{ConvertError, Result};

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::arrangement::{flatten, segment, PatternInstance, SceneGrid, Timeline, Track};
use crate::cks::{CksFile, SongBody, DEFAULT_SONG_NAME};
use crate::metadata::{self, track_color, CycloneMetadata, IdGenerator, RandomIds};
use crate::timing::DEFAULT_BEATS_PER_BAR;

/// Options shared by import and export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Name of the song written on export
    pub song_name: String,
    /// Scene length in bars
    pub scene_length_bars: u32,
    /// Beats per bar
    pub beats_per_bar: f64,
    /// Attach the side-table on export
    pub include_metadata: bool,
    /// Value for the side-table's `exportedFrom`
    pub exported_from: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            song_name: DEFAULT_SONG_NAME.to_string(),
            scene_length_bars: 8,
            beats_per_bar: DEFAULT_BEATS_PER_BAR,
            include_metadata: true,
            exported_from: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

impl ExportOptions {
    /// Reject settings that cannot produce scenes
    pub fn validate(&self) -> Result<()> {
        if self.scene_length_bars == 0 {
            return Err(ConvertError::InvalidOptions(
                "scene length must be at least one bar".into(),
            ));
        }
        if !(self.beats_per_bar > 0.0) || !self.beats_per_bar.is_finite() {
            return Err(ConvertError::InvalidOptions(format!(
                "beats per bar must be positive, got {}",
                self.beats_per_bar
            )));
        }
        Ok(())
    }

    /// Scene window for segmenting
    pub fn grid(&self) -> SceneGrid {
        SceneGrid::new(self.scene_length_bars, self.beats_per_bar)
    }

    /// Builder: set song name
    pub fn with_song_name(mut self, name: impl Into<String>) -> Self {
        self.song_name = name.into();
        self
    }

    /// Builder: set scene length
    pub fn with_scene_length(mut self, bars: u32) -> Self {
        self.scene_length_bars = bars;
        self
    }

    /// Builder: leave the side-table out
    pub fn without_metadata(mut self) -> Self {
        self.include_metadata = false;
        self
    }
}

/// Parse CKS text.
///
/// Fails when the text is not JSON, when the top level has no `song_data`
/// object, or when a song body does not match the wire schema.
pub fn parse(text: &str) -> Result<CksFile> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Object(root) = &value else {
        return Err(ConvertError::NotAnObject);
    };
    if !matches!(root.get("song_data"), Some(Value::Object(_))) {
        return Err(ConvertError::MissingSongData {
            found: root.keys().cloned().collect(),
        });
    }

    match serde_json::from_value::<CksFile>(value.clone()) {
        Ok(file) => Ok(file),
        Err(source) => Err(locate_shape_error(&value, source)),
    }
}

/// Attribute a schema error to the first song that fails on its own
fn locate_shape_error(value: &Value, source: serde_json::Error) -> ConvertError {
    let songs = value.get("song_data").and_then(Value::as_object);
    for (name, body) in songs.into_iter().flatten() {
        if let Err(err) = serde_json::from_value::<SongBody>(body.clone()) {
            return ConvertError::InvalidShape {
                song: Some(name.clone()),
                source: err,
            };
        }
    }
    ConvertError::InvalidShape { song: None, source }
}

/// Serialize with tab indentation, as the hardware writes its files
pub fn serialize(file: &CksFile) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    file.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Import the current song as a timeline.
///
/// The current song is the one the side-table points at, or the first
/// song. A file with no songs yields an empty timeline.
pub fn import(file: &CksFile, beats_per_bar: f64) -> Timeline {
    let Some((name, song)) = file.current_song() else {
        return Timeline {
            song_name: DEFAULT_SONG_NAME.to_string(),
            ..Default::default()
        };
    };

    let mut timeline = flatten(name, song, beats_per_bar);
    match &file.metadata {
        Some(metadata) => apply_handles(&mut timeline, metadata),
        None => {
            for track in &mut timeline.tracks {
                track.color = Some(track_color(track.number).to_string());
            }
        }
    }

    info!(
        song = name,
        tracks = timeline.tracks.len(),
        patterns = timeline.patterns.len(),
        scenes = timeline.scenes.len(),
        "imported song"
    );
    timeline
}

/// Swap wire names for side-table handles where the table has them
fn apply_handles(timeline: &mut Timeline, metadata: &CycloneMetadata) {
    let mut track_ids: HashMap<String, String> = HashMap::new();
    for track in &mut timeline.tracks {
        match metadata.track(&track.id) {
            Some(mapping) => {
                track_ids.insert(track.id.clone(), mapping.react_key.clone());
                track.id = mapping.react_key.clone();
                track.color = Some(mapping.color.clone());
            }
            None => track.color = Some(track_color(track.number).to_string()),
        }
    }

    for pattern in &mut timeline.patterns {
        if let Some(id) = track_ids.get(&pattern.track_id) {
            pattern.track_id = id.clone();
        }
        let handle = pattern.label.as_deref().and_then(|name| metadata.pattern_handle(name));
        if let Some(handle) = handle {
            pattern.pattern_id = Some(handle.to_string());
        }
    }

    for scene in &mut timeline.scenes {
        if let Some(handle) = metadata.scene_handle(&scene.name) {
            scene.id = handle.to_string();
        }
    }
}

/// Export a timeline as a single-song file
pub fn export(
    tracks: &[Track],
    patterns: &[PatternInstance],
    options: &ExportOptions,
    ids: &mut dyn IdGenerator,
) -> Result<CksFile> {
    options.validate()?;

    let body = segment(tracks, patterns, options.grid());
    info!(
        song = %options.song_name,
        scenes = body.scenes.len(),
        patterns = body.patterns.len(),
        "exported timeline"
    );

    let side_table = options.include_metadata.then(|| {
        let mut table =
            metadata::generate_for_timeline(&options.song_name, &body, tracks, patterns, ids);
        table.stamp(options.exported_from.clone());
        table
    });

    let mut file = CksFile::with_song(options.song_name.clone(), body);
    file.metadata = side_table;
    Ok(file)
}

/// Serialize without the side-table
pub fn export_clean(file: &CksFile) -> Result<String> {
    serialize(&metadata::strip(file))
}

/// Read and parse a CKS file
pub fn load_file<P: AsRef<Path>>(path: P) -> anyhow::Result<CksFile> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read CKS file: {:?}", path.as_ref()))?;
    parse(&text).with_context(|| format!("Failed to parse CKS file: {:?}", path.as_ref()))
}

/// Write a CKS file, optionally stripping the side-table
pub fn save_file<P: AsRef<Path>>(path: P, file: &CksFile, clean: bool) -> anyhow::Result<()> {
    let text = if clean { export_clean(file)? } else { serialize(file)? };
    std::fs::write(path.as_ref(), text)
        .with_context(|| format!("Failed to write CKS file: {:?}", path.as_ref()))
}

/// Conversion facade holding options and a handle generator
pub struct Converter<G: IdGenerator = RandomIds> {
    options: ExportOptions,
    ids: G,
}

impl Converter<RandomIds> {
    /// Create a converter with unique random handles
    pub fn new(options: ExportOptions) -> Self {
        Self::with_ids(options, RandomIds::new())
    }
}

impl Default for Converter<RandomIds> {
    fn default() -> Self {
        Self::new(ExportOptions::default())
    }
}

impl<G: IdGenerator> Converter<G> {
    /// Create a converter with a specific handle generator
    pub fn with_ids(options: ExportOptions, ids: G) -> Self {
        Self { options, ids }
    }

    /// Get options
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Parse CKS text
    pub fn parse(&self, text: &str) -> Result<CksFile> {
        parse(text)
    }

    /// Complete the side-table, then import the current song
    pub fn import(&mut self, file: &mut CksFile) -> Timeline {
        metadata::ensure(file, &mut self.ids);
        import(file, self.options.beats_per_bar)
    }

    /// Repair the side-table in place
    pub fn ensure(&mut self, file: &mut CksFile) -> bool {
        metadata::ensure(file, &mut self.ids)
    }

    /// Export a timeline
    pub fn export(&mut self, tracks: &[Track], patterns: &[PatternInstance]) -> Result<CksFile> {
        export(tracks, patterns, &self.options, &mut self.ids)
    }

    /// Serialize, keeping the side-table
    pub fn serialize(&self, file: &CksFile) -> Result<String> {
        serialize(file)
    }

    /// Serialize for the hardware
    pub fn export_clean(&self, file: &CksFile) -> Result<String> {
        export_clean(file)
    }
}
