//! Menu icons
//!
//! An icon is one frame of the species' icon or overworld sheet, resized,
//! trimmed to its visible pixels and placed on a 36x36 canvas. The bottom
//! row stays free for the outline the game draws around icons.

use crate::assets::{
    AssetError, Outcome, SpeciesDir, ICON_IMAGE, OVERWORLD_IMAGE, OVERWORLD_SHINY_IMAGE,
};
use crate::canvas::{trim, with_margin};
use crate::color::TRANSPARENT_WHITE;
use crate::output::{icon_name, save_png};
use crate::species::SpeciesTable;
use crate::spritesheet::{slice_frames, SheetAxis};
use clap::ValueEnum;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Edge length of the icon canvas.
pub const ICON_CANVAS: u32 = 36;

/// Rows kept free below the icon.
pub const ICON_BOTTOM_MARGIN: u32 = 1;

/// Frame used for icons (first frame of the down walk cycle).
pub const ICON_FRAME: usize = 5;

/// Icon size before trimming.
///
/// | Size | Edge | Filter |
/// |------|------|--------|
/// | `small` | native (16px sheets) | none |
/// | `medium` | 26px | bicubic |
/// | `large` | 32px | nearest |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IconSize {
    /// Frames at their native size
    Small,
    /// Smoothed 26px, the default
    #[default]
    Medium,
    /// Pixel-doubled 32px
    Large,
}

impl IconSize {
    /// Target edge length in pixels, `None` to keep the frame's own size.
    pub fn edge(self) -> Option<u32> {
        match self {
            IconSize::Small => None,
            IconSize::Medium => Some(26),
            IconSize::Large => Some(32),
        }
    }

    /// Resampling filter used to reach the target size.
    pub fn filter(self) -> FilterType {
        match self {
            IconSize::Small | IconSize::Large => FilterType::Nearest,
            IconSize::Medium => FilterType::CatmullRom,
        }
    }

    /// Resize a square frame to this size.
    pub fn apply(self, frame: &RgbaImage) -> RgbaImage {
        match self.edge() {
            Some(edge) if frame.dimensions() != (edge, edge) => {
                imageops::resize(frame, edge, edge, self.filter())
            }
            _ => frame.clone(),
        }
    }
}

/// Source sheet of an icon: `icon.png`, else the overworld sheet of the
/// requested variant.
pub fn icon_source(dir: &SpeciesDir, shiny: bool) -> Option<&'static str> {
    let overworld = if shiny { OVERWORLD_SHINY_IMAGE } else { OVERWORLD_IMAGE };
    [ICON_IMAGE, overworld].into_iter().find(|name| dir.file(name).is_file())
}

/// Build an icon from the frames of a source sheet.
pub fn compose_icon(
    frames: &[RgbaImage],
    single_frame: bool,
    size: IconSize,
) -> Result<RgbaImage, AssetError> {
    let index = if single_frame { 0 } else { ICON_FRAME };
    let frame = frames
        .get(index)
        .ok_or(AssetError::FrameOutOfRange { frame: index, count: frames.len() })?;

    let icon = trim(&size.apply(frame));
    Ok(with_margin(&icon, ICON_CANVAS, ICON_BOTTOM_MARGIN, TRANSPARENT_WHITE))
}

/// Write the menu icon of a species as `{dex}-0.png` in `out_dir`.
///
/// Species without an icon or matching overworld sheet are skipped.
pub fn create_monster_icon(
    dir: &SpeciesDir,
    species: &SpeciesTable,
    out_dir: &Path,
    shiny: bool,
    size: IconSize,
) -> Result<Outcome, AssetError> {
    let Some(source) = icon_source(dir, shiny) else {
        log::debug!("Skipping monster icon for {}: no icon or overworld sheet", dir.key());
        return Ok(Outcome::missing(ICON_IMAGE));
    };
    let Some(sheet) = dir.optional_image(source)? else {
        return Ok(Outcome::missing(source));
    };

    let frames = slice_frames(&sheet, SheetAxis::Horizontal)?;
    let icon = compose_icon(&frames, species.is_single_frame_icon(dir.key()), size)?;

    let path = out_dir.join(icon_name(species.dex(dir.key())?));
    save_png(&icon, &path)?;

    log::info!("Created monster icon for {}", dir.key());
    Ok(Outcome::Written(vec![path]))
}
