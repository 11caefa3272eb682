//! Overworld follower sheets
//!
//! Source sheets hold six walk frames left to right:
//!
//! | Frames | Direction |
//! |--------|-----------|
//! | 0, 1   | left      |
//! | 2, 3   | up        |
//! | 4, 5   | down      |
//!
//! The game wants four frames per direction on a 128x128 sheet. Right-facing
//! frames are mirrored from the left ones, and the third up/down frame is a
//! mirror of the first. Mirroring a sprite with an odd width moves it half a
//! pixel, so with mirror correction on, frames whose dominant color drifts
//! from the second frame are nudged by one pixel.

use crate::assets::{load_image, load_resource_image, AssetError, Outcome, SpeciesDir};
use crate::canvas::{bounding_box, mirror, overlay, shifted};
use crate::color::{color_census, is_background, TRANSPARENT, TRANSPARENT_WHITE};
use crate::output::{follower_sprite_name, save_png, Variant};
use crate::species::SpeciesTable;
use crate::spritesheet::{compose_grid, slice_frames, SheetAxis};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};

/// File name pattern of overworld sheets inside a species directory.
pub const OVERWORLD_PATTERN: &str = "overworld*.png";

/// Marker in a sheet's file name that makes it the shiny variant.
pub const SHINY_MARKER: &str = "-shiny";

/// Sparkle decoration drawn over shiny sheets, relative to the resources dir.
pub const SPARKLES_IMAGE: &str = "sparkles.png";

/// Frames in a source walk sheet.
pub const WALK_FRAMES: usize = 6;

/// Columns (and rows) of the follower sheet.
pub const SHEET_COLUMNS: u32 = 4;

/// Edge length of one follower sheet cell.
pub const SHEET_CELL: u32 = 32;

/// Gap between a frame and the bottom of its cell.
pub const CELL_BOTTOM_MARGIN: u32 = 2;

/// Centroid drift (in pixels) that triggers a one pixel correction.
pub const CENTROID_THRESHOLD: f64 = 0.5;

/// Walk frames of one source sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkFrames {
    /// Left walk cycle
    pub left: [RgbaImage; 2],
    /// Up walk cycle
    pub up: [RgbaImage; 2],
    /// Down walk cycle
    pub down: [RgbaImage; 2],
}

impl WalkFrames {
    /// Cut a horizontal sheet into its six walk frames.
    pub fn from_sheet(sheet: &RgbaImage, path: &Path) -> Result<Self, AssetError> {
        let frames = slice_frames(sheet, SheetAxis::Horizontal)?;
        let frames: [RgbaImage; WALK_FRAMES] =
            frames.try_into().map_err(|frames: Vec<RgbaImage>| AssetError::FrameCount {
                path: path.to_path_buf(),
                expected: WALK_FRAMES,
                found: frames.len(),
            })?;
        let [left1, left2, up1, up2, down1, down2] = frames;

        Ok(Self { left: [left1, left2], up: [up1, up2], down: [down1, down2] })
    }
}

/// Mean x position of the most common foreground color of a frame.
///
/// Background colors, including fully transparent black, are ignored. Ties
/// go to the color seen first in row-major order.
pub fn horizontal_centroid(frame: &RgbaImage) -> Result<f64, AssetError> {
    let dominant = color_census(frame)
        .into_iter()
        .filter(|(_, color)| !is_background(color) && *color != TRANSPARENT)
        .fold(None, |best: Option<(usize, Rgba<u8>)>, (count, color)| match best {
            Some((best_count, _)) if best_count >= count => best,
            _ => Some((count, color)),
        })
        .map(|(_, color)| color)
        .ok_or(AssetError::NoDominantColor)?;

    let (sum, count) = frame
        .enumerate_pixels()
        .filter(|(_, _, pixel)| **pixel == dominant)
        .fold((0u64, 0u64), |(sum, count), (x, _, _)| (sum + u64::from(x), count + 1));

    Ok(sum as f64 / count as f64)
}

fn has_odd_width(frame: &RgbaImage) -> bool {
    bounding_box(frame).is_some_and(|(left, _, right, _)| (right - left) % 2 == 1)
}

/// Derive the third frame of an up or down walk cycle.
///
/// Returns the (possibly adjusted) first frame and the third frame. The
/// third frame mirrors the first; with `correct` set and an odd-width first
/// frame, the centroids of the first, second and mirrored frames decide
/// whether either frame is replaced by a mirror shifted one pixel.
pub fn third_frame(
    first: &RgbaImage,
    second: &RgbaImage,
    correct: bool,
) -> Result<(RgbaImage, RgbaImage), AssetError> {
    let mut third = mirror(first);
    if !correct || !has_odd_width(first) {
        return Ok((first.clone(), third));
    }

    let c1 = horizontal_centroid(first)?;
    let c2 = horizontal_centroid(second)?;
    let c3 = horizontal_centroid(&third)?;

    if c3 - c2 > CENTROID_THRESHOLD {
        third = shifted(&mirror(first), -1);
    }
    if c3 - c2 < -CENTROID_THRESHOLD {
        third = shifted(&mirror(first), 1);
    }

    let mut first = first.clone();
    if c1 - c2 > CENTROID_THRESHOLD {
        first = shifted(&mirror(&third), -1);
    }
    if c1 - c2 < -CENTROID_THRESHOLD {
        first = shifted(&mirror(&third), 1);
    }

    Ok((first, third))
}

/// Lay the walk frames out on the 4x4 follower sheet.
///
/// Rows are down, left, right, up; each row plays frames 1, 2, 3, 2 (left
/// and right reuse frame 1 as their third frame).
pub fn compose_sheet(frames: &WalkFrames, correct: bool) -> Result<RgbaImage, AssetError> {
    let [left1, left2] = &frames.left;
    let right1 = mirror(left1);
    let right2 = mirror(left2);
    let (up1, up3) = third_frame(&frames.up[0], &frames.up[1], correct)?;
    let (down1, down3) = third_frame(&frames.down[0], &frames.down[1], correct)?;
    let up2 = &frames.up[1];
    let down2 = &frames.down[1];

    let cells: [&RgbaImage; 16] = [
        &down1, down2, &down3, down2, //
        left1, left2, left1, left2, //
        &right1, &right2, &right1, &right2, //
        &up1, up2, &up3, up2,
    ];

    Ok(compose_grid(&cells, SHEET_COLUMNS, SHEET_CELL, CELL_BOTTOM_MARGIN, TRANSPARENT_WHITE))
}

/// Overworld sheets of a species directory, sorted by file name.
pub fn overworld_files(dir: &SpeciesDir) -> Result<Vec<PathBuf>, AssetError> {
    let pattern =
        format!("{}/{}", glob::Pattern::escape(&dir.path().to_string_lossy()), OVERWORLD_PATTERN);

    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => log::warn!("Error reading {}: {}", dir.path().display(), e),
        }
    }
    files.sort();
    Ok(files)
}

/// Variant of an overworld sheet, from its file name.
pub fn sheet_variant(path: &Path) -> Variant {
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    if name.contains(SHINY_MARKER) {
        Variant::Shiny
    } else {
        Variant::Normal
    }
}

/// Write the follower sheets of a species.
///
/// Every `overworld*.png` in the species directory becomes one
/// `{dex}-b-{n|s}{form}.png` in `out_dir`. Mirror correction applies when
/// `mirror_correction` is set and the species is not excluded. Species without
/// overworld sheets are skipped.
///
/// Sheets are written independently: a sheet that fails does not keep the
/// others from being written. The first failure is returned once every sheet
/// has been tried.
pub fn create_overworld_sprite(
    dir: &SpeciesDir,
    species: &SpeciesTable,
    out_dir: &Path,
    resources_dir: &Path,
    mirror_correction: bool,
) -> Result<Outcome, AssetError> {
    let files = overworld_files(dir)?;
    if files.is_empty() {
        log::debug!("Skipping overworld sprite for {}: no {}", dir.key(), OVERWORLD_PATTERN);
        return Ok(Outcome::missing(OVERWORLD_PATTERN));
    }

    let correct = mirror_correction && !species.is_mirror_excluded(dir.key());
    let dex = species.follower_dex(dir.key())?;
    let suffix = species.form_suffix(dir.key());

    let mut written = Vec::with_capacity(files.len());
    let mut first_error = None;
    for file in files {
        let path = out_dir.join(follower_sprite_name(dex, sheet_variant(&file), suffix));
        match write_sheet(&file, &path, resources_dir, correct) {
            Ok(()) => written.push(path),
            Err(e) => {
                log::warn!("Failed to create {}: {}", path.display(), e);
                first_error.get_or_insert(e);
            }
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }
    log::info!("Created overworld sprites for {}", dir.key());
    Ok(Outcome::Written(written))
}

fn write_sheet(
    file: &Path,
    path: &Path,
    resources_dir: &Path,
    correct: bool,
) -> Result<(), AssetError> {
    let frames = WalkFrames::from_sheet(&load_image(file)?, file)?;
    let mut sheet = compose_sheet(&frames, correct)?;

    if sheet_variant(file) == Variant::Shiny {
        let sparkles = load_resource_image(&resources_dir.join(SPARKLES_IMAGE))?;
        overlay(&mut sheet, &sparkles, 0, 0);
    }

    save_png(&sheet, path)?;
    Ok(())
}
