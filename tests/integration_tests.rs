// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for Cyclone
//!
//! These tests exercise the public conversion API end to end.

use cyclone::arrangement::{BarSequence, PatternInstance, Track};
use cyclone::cks::{PatternType, WORKSCENE};
use cyclone::metadata::{self, SequentialIds};
use cyclone::timing::{bars_to_beats, beats_to_bars};
use cyclone::{
    export, export_clean, import, parse, serialize, ConvertError, Converter, ExportOptions,
};
use serde_json::Value;

const NIGHT_DRIVE: &str = include_str!("fixtures/night_drive.cks");

fn as_value(text: &str) -> Value {
    serde_json::from_str(text).unwrap()
}

/// Import, repair and clean-export a file with no side-table: the result
/// must equal the input, unknown fields included.
#[test]
fn test_round_trip_identity() {
    let mut file = parse(NIGHT_DRIVE).unwrap();
    let mut converter = Converter::with_ids(ExportOptions::default(), SequentialIds::new());

    let timeline = converter.import(&mut file);
    assert!(!timeline.patterns.is_empty());
    assert!(file.metadata.is_some());

    let clean = converter.export_clean(&file).unwrap();
    assert_eq!(as_value(&clean), as_value(NIGHT_DRIVE));
    assert!(clean.contains("\"scratch\""));
    assert!(clean.contains("\"velocity_curve\""));

    let out = as_value(&clean);
    let song = &out["song_data"]["Night Drive"];
    assert_eq!(song["scenes"]["Intro"].get("initial_mutes"), Some(&Value::Null));
    assert_eq!(song["scenes"]["Break"].get("pattern_assignments"), Some(&Value::Null));
    assert_eq!(song["patterns"]["T2_P3_01"].get("loop_start"), Some(&Value::Null));
    assert_eq!(song["patterns"]["T2_P3_01"].get("accumulator_config"), Some(&Value::Null));
    assert_eq!(
        song["instrument_assignments"]["track_2"].get("multi_channel"),
        Some(&Value::Null)
    );
    let lead_bars = song["patterns"]["T1_P3_00"]["bars"].as_array().unwrap();
    assert!(lead_bars[1].get("reps").is_none());
}

#[test]
fn test_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("copy.cks");

    let mut file = cyclone::load_file(write_fixture(&dir)).unwrap();
    metadata::ensure(&mut file, &mut SequentialIds::new());
    cyclone::save_file(&path, &file, true).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("{\n\t\"song_data\""));
    assert_eq!(as_value(&text), as_value(NIGHT_DRIVE));
}

fn write_fixture(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("night_drive.cks");
    std::fs::write(&path, NIGHT_DRIVE).unwrap();
    path
}

#[test]
fn test_fixture_import_layout() {
    let file = parse(NIGHT_DRIVE).unwrap();
    let timeline = import(&file, 4.0);

    assert_eq!(timeline.song_name, "Night Drive");
    let numbers: Vec<u32> = timeline.tracks.iter().map(|t| t.number).collect();
    assert_eq!(numbers, vec![1, 2]);

    let markers: Vec<(&str, f64)> = timeline
        .scenes
        .iter()
        .map(|s| (s.name.as_str(), s.position))
        .collect();
    assert_eq!(markers, vec![("Verse", 0.0), ("Intro", 16.0), ("Break", 48.0)]);
    assert!(timeline.scenes.iter().all(|s| s.name != WORKSCENE));

    let placed: Vec<(&str, &str, f64, f64, bool)> = timeline
        .patterns
        .iter()
        .map(|p| {
            (
                p.track_id.as_str(),
                p.label.as_deref().unwrap(),
                p.position,
                p.duration,
                p.muted,
            )
        })
        .collect();
    assert_eq!(
        placed,
        vec![
            ("track_1", "T1_P3_00", 0.0, 8.0, false),
            ("track_2", "T2_P3_01", 0.0, 16.0, true),
            ("track_2", "T2_CK_00", 16.0, 4.0, false),
        ]
    );

    let lead = &timeline.patterns[0];
    assert_eq!(lead.bars.as_ref().map(Vec::len), Some(2));
    assert_eq!(lead.logical_duration, Some(16.0));
    assert_eq!(timeline.patterns[2].pattern_type, PatternType::Ck);
}

#[test]
fn test_bar_repetition_from_file() {
    let file = parse(NIGHT_DRIVE).unwrap();
    let pattern = &file.song_data["Night Drive"].patterns["T1_P3_00"];
    let seq = BarSequence::from_option(pattern.bars());

    // reps 3 then absent, with 16 and 8 active steps
    assert_eq!(seq.expanded_bar_count(), 4);
    assert_eq!(seq.expanded_step_count(), 56);
    let sources: Vec<usize> = seq.occurrences().map(|o| o.source_index).collect();
    assert_eq!(sources, vec![0, 0, 0, 1]);
}

#[test]
fn test_bar_repetition_expansion() {
    let bars = vec![
        cyclone::cks::Bar::default().with_reps(3),
        cyclone::cks::Bar::default().with_reps(1),
    ];
    let seq = BarSequence::new(&bars);

    assert_eq!(seq.expanded_bar_count(), 4);
    assert_eq!(seq.expanded_step_count(), 64);
    let occurrences: Vec<_> = seq.occurrences().collect();
    assert_eq!(occurrences.len(), 4);
    assert_eq!(
        occurrences.iter().map(|o| o.source_index).collect::<Vec<_>>(),
        vec![0, 0, 0, 1]
    );
    assert_eq!(
        occurrences.iter().map(|o| o.repetition).collect::<Vec<_>>(),
        vec![0, 1, 2, 0]
    );
}

#[test]
fn test_bar_beat_inverse_law() {
    for bars in [0.0, 0.5, 1.0, 3.75, 12.0, 99.0] {
        for n in 1..=16 {
            let n = n as f64;
            assert_eq!(beats_to_bars(bars_to_beats(bars, n), n), bars);
        }
    }
}

#[test]
fn test_segmentation_conservation() {
    let tracks = vec![Track::new("lead", 1)];
    let patterns = vec![PatternInstance::new("p", "lead", 0.0, 96.0)];
    let options = ExportOptions::default().with_scene_length(8).without_metadata();

    let file = export(&tracks, &patterns, &options, &mut SequentialIds::new()).unwrap();
    let song = &file.song_data[options.song_name.as_str()];

    let gbars: Vec<u32> = song.scenes.values().map(|s| s.gbar).collect();
    assert_eq!(gbars, vec![0, 8, 16]);
    for scene in song.scenes.values() {
        let assigned: Vec<_> = scene.assignments().collect();
        assert_eq!(assigned, vec![("track_1", "T1_P3_00")]);
    }

    let timeline = import(&file, 4.0);
    let positions: Vec<f64> = timeline.patterns.iter().map(|p| p.position).collect();
    assert_eq!(positions, vec![0.0, 32.0, 64.0]);
    assert_eq!(timeline.tracks.len(), 1);
}

#[test]
fn test_import_follows_file_order() {
    let text = r#"{
        "song_data": {
            "Order": {
                "patterns": {
                    "A": { "type": "P3", "creator_track": 1, "saved": true }
                },
                "scenes": {
                    "scene 2": {
                        "gbar": 16, "length": 4, "advance": "auto",
                        "pattern_assignments": { "track_1": "A" }
                    },
                    "scene 1": {
                        "gbar": 0, "length": 4, "advance": "auto",
                        "pattern_assignments": { "track_1": "A" }
                    },
                    "scene 3": {
                        "gbar": 8, "length": 4, "advance": "auto",
                        "pattern_assignments": { "track_1": "A" }
                    }
                }
            }
        }
    }"#;

    let timeline = import(&parse(text).unwrap(), 4.0);
    let placed: Vec<(String, f64)> = timeline
        .patterns
        .iter()
        .map(|p| (p.scene.clone().unwrap(), p.position))
        .collect();
    assert_eq!(
        placed,
        vec![
            ("scene 2".to_string(), 0.0),
            ("scene 1".to_string(), 16.0),
            ("scene 3".to_string(), 32.0),
        ]
    );
}

#[test]
fn test_metadata_idempotence() {
    let mut file = parse(NIGHT_DRIVE).unwrap();
    let mut ids = SequentialIds::new();

    metadata::ensure(&mut file, &mut ids);
    let first = serialize(&file).unwrap();
    let handle = file
        .metadata
        .as_ref()
        .and_then(|m| m.pattern_handle("T1_P3_00"))
        .map(str::to_string);

    assert!(!metadata::ensure(&mut file, &mut ids));
    let second = serialize(&file).unwrap();
    assert_eq!(first, second);

    // a reparsed copy repairs to the same bytes as well
    let mut reparsed = parse(&second).unwrap();
    assert!(!metadata::ensure(&mut reparsed, &mut ids));
    assert_eq!(serialize(&reparsed).unwrap(), first);
    assert_eq!(
        reparsed.metadata.as_ref().and_then(|m| m.pattern_handle("T1_P3_00")).map(str::to_string),
        handle
    );
}

#[test]
fn test_overlap_conflict_resolution() {
    let tracks = vec![Track::new("t", 1)];
    let patterns = vec![
        PatternInstance::new("second", "t", 8.0, 16.0).with_label("SECOND"),
        PatternInstance::new("first", "t", 0.0, 16.0).with_label("FIRST"),
    ];
    let options = ExportOptions::default().with_scene_length(8).without_metadata();

    let file = export(&tracks, &patterns, &options, &mut SequentialIds::new()).unwrap();
    let song = &file.song_data[options.song_name.as_str()];

    assert_eq!(song.scenes.len(), 1);
    let assigned: Vec<_> = song.scenes["Scene 1"].assignments().collect();
    assert_eq!(assigned, vec![("track_1", "FIRST")]);
}

#[test]
fn test_handles_stable_across_cycles() {
    let tracks = vec![
        Track::new("editor-track-a", 1),
        Track::new("editor-track-b", 2).with_color("#abcdef"),
    ];
    let mut lead = PatternInstance::new("i1", "editor-track-a", 0.0, 32.0).with_label("LEAD");
    lead.pattern_id = Some("editor-pattern-lead".into());
    let patterns = vec![
        lead,
        PatternInstance::new("i2", "editor-track-b", 32.0, 32.0).with_type(PatternType::Ck),
    ];

    let mut converter = Converter::with_ids(
        ExportOptions::default().with_song_name("Cycle"),
        SequentialIds::new(),
    );
    let exported = converter.export(&tracks, &patterns).unwrap();
    let text = converter.serialize(&exported).unwrap();

    let mut reloaded = parse(&text).unwrap();
    let timeline = converter.import(&mut reloaded);
    let ids: Vec<&str> = timeline.tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["editor-track-a", "editor-track-b"]);
    assert_eq!(timeline.tracks[1].color.as_deref(), Some("#abcdef"));
    assert_eq!(timeline.patterns[0].pattern_id.as_deref(), Some("editor-pattern-lead"));

    // second cycle keeps the same handles
    let again = converter.export(&timeline.tracks, &timeline.patterns).unwrap();
    let mut reloaded = parse(&converter.serialize(&again).unwrap()).unwrap();
    let second = converter.import(&mut reloaded);
    assert_eq!(second.tracks, timeline.tracks);
    assert_eq!(
        second.patterns.iter().map(|p| &p.pattern_id).collect::<Vec<_>>(),
        timeline.patterns.iter().map(|p| &p.pattern_id).collect::<Vec<_>>()
    );
}

#[test]
fn test_format_errors_reported() {
    assert!(matches!(parse("{\"song_data\": "), Err(ConvertError::Json(_))));
    assert!(matches!(
        parse(r#"{"songs": {}}"#),
        Err(ConvertError::MissingSongData { .. })
    ));

    let err = parse(r#"{"song_data": {"Bad": {"patterns": {"P": {"type": "ZZ"}}, "scenes": {}}}}"#)
        .unwrap_err();
    assert!(err.to_string().contains("song 'Bad'"));
}

#[test]
fn test_clean_export_of_side_table_file() {
    let mut file = parse(NIGHT_DRIVE).unwrap();
    metadata::ensure(&mut file, &mut SequentialIds::new());
    let with_table = serialize(&file).unwrap();
    assert!(with_table.contains("_cyclone_metadata"));

    let clean = export_clean(&parse(&with_table).unwrap()).unwrap();
    assert_eq!(as_value(&clean), as_value(NIGHT_DRIVE));
}
