// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use anyhow::{anyhow, Result};
use cyclone::arrangement::BarSequence;
use cyclone::{load_file, save_file, Converter, ConverterConfig, Timeline};
use std::env;
use std::path::Path;

fn print_usage() {
    println!("CYCLONE - CKS Arrangement Converter");
    println!();
    println!("Usage: cyclone [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --info <FILE>                   Summarize the songs in a CKS file");
    println!("  --timeline <FILE>               Print the current song as a timeline");
    println!("  --clean <IN> <OUT>              Write a copy without the editor side-table");
    println!("  --ensure <IN> <OUT>             Write a copy with a complete side-table");
    println!("  --resegment <IN> <OUT> [CONFIG] Re-cut the current song into fixed scenes");
    println!("  --help                          Show this help message");
}

fn print_info(path: &Path) -> Result<()> {
    let file = load_file(path)?;
    println!("{}", path.display());
    if let Some(metadata) = &file.metadata {
        println!(
            "Side-table v{} (current song: {})",
            metadata.version, metadata.current_song_name
        );
    }

    for (name, song) in &file.song_data {
        let step_bars = song.patterns.values().fold(0u32, |total, p| {
            total.saturating_add(BarSequence::from_option(p.bars()).expanded_bar_count())
        });
        println!(
            "  {}: {} patterns ({} played bars of step data), {} scenes, {} tracks",
            name,
            song.patterns.len(),
            step_bars,
            song.arranged_scenes().count(),
            song.referenced_track_keys().len()
        );
    }
    Ok(())
}

fn print_timeline(timeline: &Timeline) {
    println!("Song: {}", timeline.song_name);
    for scene in &timeline.scenes {
        println!("  [{:>7.2} +{:>6.2}] {}", scene.position, scene.duration, scene.name);
    }
    for track in &timeline.tracks {
        println!("  {} ({})", track.name, track.color.as_deref().unwrap_or("-"));
        for pattern in timeline.patterns_on(&track.id) {
            println!(
                "    {:>7.2} +{:>6.2} {} {}{}",
                pattern.position,
                pattern.duration,
                pattern.pattern_type,
                pattern.label.as_deref().unwrap_or("?"),
                if pattern.muted { " (muted)" } else { "" }
            );
        }
    }
}

fn show_timeline(path: &Path) -> Result<()> {
    let mut file = load_file(path)?;
    let mut converter = Converter::default();
    let timeline = converter.import(&mut file);
    print_timeline(&timeline);
    Ok(())
}

fn write_clean(input: &Path, output: &Path) -> Result<()> {
    let file = load_file(input)?;
    save_file(output, &file, true)?;
    println!("Wrote {}", output.display());
    Ok(())
}

fn write_ensured(input: &Path, output: &Path) -> Result<()> {
    let mut file = load_file(input)?;
    let mut converter = Converter::default();
    if !converter.ensure(&mut file) {
        println!("Side-table already complete");
    }
    save_file(output, &file, false)?;
    println!("Wrote {}", output.display());
    Ok(())
}

fn resegment(input: &Path, output: &Path, config: Option<&Path>) -> Result<()> {
    let config = match config {
        Some(path) => ConverterConfig::load(path)?,
        None => ConverterConfig::default(),
    };
    let mut options = config.export_options();

    let mut file = load_file(input)?;
    let mut converter = Converter::new(options.clone());
    let timeline = converter.import(&mut file);

    options.song_name = timeline.song_name.clone();
    let mut converter = Converter::new(options);
    let exported = converter.export(&timeline.tracks, &timeline.patterns)?;
    save_file(output, &exported, !config.include_metadata)?;

    println!(
        "Wrote {} ({} scenes)",
        output.display(),
        exported.song_data.values().map(|s| s.scenes.len()).sum::<usize>()
    );
    Ok(())
}

fn required<'a>(args: &'a [String], index: usize, what: &str) -> Result<&'a Path> {
    args.get(index)
        .map(Path::new)
        .ok_or_else(|| anyhow!("{} requires {}", args[1], what))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("CYCLONE - CKS Arrangement Converter");
        println!("Run with --help for usage information");
        return Ok(());
    }

    match args[1].as_str() {
        "--info" => {
            print_info(required(&args, 2, "a file")?)?;
        }
        "--timeline" => {
            show_timeline(required(&args, 2, "a file")?)?;
        }
        "--clean" => {
            write_clean(
                required(&args, 2, "an input file")?,
                required(&args, 3, "an output file")?,
            )?;
        }
        "--ensure" => {
            write_ensured(
                required(&args, 2, "an input file")?,
                required(&args, 3, "an output file")?,
            )?;
        }
        "--resegment" => {
            resegment(
                required(&args, 2, "an input file")?,
                required(&args, 3, "an output file")?,
                args.get(4).map(Path::new),
            )?;
        }
        "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Unknown option: {}", args[1]);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
