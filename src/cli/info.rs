//! Info command implementations (track, palette)

use image::Rgba;
use std::path::Path;
use std::process::ExitCode;

use crate::animation::{species_track, AnimationTrack};
use crate::assets::{load_optional_image, AssetError, BACK_IMAGE, FRONT_IMAGE, SHINY_PALETTE};
use crate::palette::{load_shiny_palette, Palette};

use super::{EXIT_ERROR, EXIT_SUCCESS};

/// Format a color as `#rrggbb`, with alpha appended when not opaque.
fn hex(color: &Rgba<u8>) -> String {
    let [r, g, b, a] = color.0;
    if a == 255 {
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
    }
}

fn format_track(track: &AnimationTrack) -> Vec<String> {
    let mut lines: Vec<String> = track
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("{:>4}  frame {:>2}  {:>4}ms", i, entry.frame, entry.duration_ms))
        .collect();
    lines.push(format!("{} entries, {}ms total", track.len(), track.total_ms()));
    lines
}

/// Execute the track command
pub fn run_track(dir: &Path) -> ExitCode {
    match species_track(dir) {
        Ok(track) => {
            for line in format_track(&track) {
                println!("{}", line);
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Normal palette of a species, from its front sprite or else its back sprite.
fn species_palette(dir: &Path) -> Result<Option<(&'static str, Palette)>, AssetError> {
    for name in [FRONT_IMAGE, BACK_IMAGE] {
        if let Some(image) = load_optional_image(&dir.join(name))? {
            return Ok(Some((name, Palette::from_image(&image))));
        }
    }
    Ok(None)
}

fn print_palette(title: &str, palette: &Palette) {
    println!("{}:", title);
    if palette.is_empty() {
        println!("  (no colors)");
    }
    for (i, color) in palette.colors().iter().enumerate() {
        println!("  {:>2}  {}", i, hex(color));
    }
}

/// Execute the palette command
pub fn run_palette(dir: &Path) -> ExitCode {
    let mut code = ExitCode::from(EXIT_SUCCESS);

    match species_palette(dir) {
        Ok(Some((source, palette))) => print_palette(&format!("Normal ({})", source), &palette),
        Ok(None) => println!("Normal: no {} or {}", FRONT_IMAGE, BACK_IMAGE),
        Err(e) => {
            eprintln!("Error: {}", e);
            code = ExitCode::from(EXIT_ERROR);
        }
    }

    let shiny_path = dir.join(SHINY_PALETTE);
    match load_shiny_palette(&shiny_path) {
        Ok(palette) => print_palette(&format!("Shiny ({})", SHINY_PALETTE), &palette),
        Err(e) => {
            eprintln!("Error: {}", e);
            code = ExitCode::from(EXIT_ERROR);
        }
    }

    code
}
