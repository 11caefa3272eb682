//! Battle sprite assembly
//!
//! Front sprites are vertical frame sheets played back by the species'
//! animation scripts; back sprites are a single still image. Both are
//! written in a normal and a shiny variant, optionally placed on the 96x96
//! canvas the game expects.

use crate::animation::{species_track, AnimationTrack};
use crate::assets::{AssetError, Outcome, SpeciesDir, BACK_IMAGE, FRONT_IMAGE, SHINY_PALETTE};
use crate::canvas::with_margin;
use crate::gif::{render_gif, save_gif};
use crate::output::{battle_sprite_name, Facing, Variant};
use crate::palette::shiny_variant;
use crate::species::SpeciesTable;
use crate::spritesheet::{slice_frames, SheetAxis};
use image::{Rgba, RgbaImage};
use std::path::Path;

/// Edge length of the battle sprite canvas.
pub const BATTLE_CANVAS: u32 = 96;

/// Gap between a front sprite and the bottom of the canvas.
pub const FRONT_BOTTOM_MARGIN: u32 = 4;

/// Gap between a back sprite and the bottom of the canvas.
pub const BACK_BOTTOM_MARGIN: u32 = 12;

/// How battle sprites are placed on their canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleOptions {
    /// Place sprites on the fixed-size canvas
    pub margin: bool,
    /// Alpha of the white canvas fill
    pub background_alpha: u8,
}

impl Default for BattleOptions {
    fn default() -> Self {
        Self { margin: true, background_alpha: 0 }
    }
}

impl BattleOptions {
    fn background(&self) -> Rgba<u8> {
        Rgba([255, 255, 255, self.background_alpha])
    }

    fn place(&self, image: &RgbaImage, bottom_margin: u32) -> RgbaImage {
        if self.margin {
            with_margin(image, BATTLE_CANVAS, bottom_margin, self.background())
        } else {
            image.clone()
        }
    }
}

/// Frames and per-frame durations of a played-back animation.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    /// Frame images in display order
    pub frames: Vec<RgbaImage>,
    /// Display time of each frame in milliseconds
    pub durations_ms: Vec<u32>,
}

/// Pick the frames of `sheet_frames` in the order `track` plays them.
pub fn play_track(sheet_frames: &[RgbaImage], track: &AnimationTrack) -> Result<Animation, AssetError> {
    let mut frames = Vec::with_capacity(track.len());
    let mut durations_ms = Vec::with_capacity(track.len());

    for entry in track {
        let frame = sheet_frames
            .get(entry.frame)
            .ok_or(AssetError::FrameOutOfRange { frame: entry.frame, count: sheet_frames.len() })?;
        frames.push(frame.clone());
        durations_ms.push(entry.duration_ms);
    }

    Ok(Animation { frames, durations_ms })
}

/// Write the animated front sprites of a species.
///
/// Produces `{dex}-front-n.gif` and `{dex}-front-s.gif` in `out_dir`, or
/// skips the species if it has no `front.png`.
pub fn create_front_sprite(
    dir: &SpeciesDir,
    species: &SpeciesTable,
    out_dir: &Path,
    options: &BattleOptions,
) -> Result<Outcome, AssetError> {
    let Some(front) = dir.optional_image(FRONT_IMAGE)? else {
        log::debug!("Skipping front sprite for {}: no {}", dir.key(), FRONT_IMAGE);
        return Ok(Outcome::missing(FRONT_IMAGE));
    };

    let shiny = shiny_variant(&front, &dir.file(SHINY_PALETTE))?;
    let track = species_track(dir.path())?;
    let dex = species.dex(dir.key())?;

    let mut written = Vec::with_capacity(2);
    for (variant, image) in [(Variant::Normal, &front), (Variant::Shiny, &shiny)] {
        let sheet = slice_frames(image, SheetAxis::Vertical)?;
        let animation = play_track(&sheet, &track)?;
        let frames: Vec<RgbaImage> = animation
            .frames
            .iter()
            .map(|frame| options.place(frame, FRONT_BOTTOM_MARGIN))
            .collect();

        let path = out_dir.join(battle_sprite_name(dex, Facing::Front, variant));
        render_gif(&frames, &animation.durations_ms, true, &path)?;
        written.push(path);
    }

    log::info!("Created front battle sprites for {}", dir.key());
    Ok(Outcome::Written(written))
}

/// Write the still back sprites of a species.
///
/// Produces `{dex}-back-n.gif` and `{dex}-back-s.gif` in `out_dir`, or skips
/// the species if it has no `back.png`.
pub fn create_back_sprite(
    dir: &SpeciesDir,
    species: &SpeciesTable,
    out_dir: &Path,
    options: &BattleOptions,
) -> Result<Outcome, AssetError> {
    let Some(back) = dir.optional_image(BACK_IMAGE)? else {
        log::debug!("Skipping back sprite for {}: no {}", dir.key(), BACK_IMAGE);
        return Ok(Outcome::missing(BACK_IMAGE));
    };

    let shiny = shiny_variant(&back, &dir.file(SHINY_PALETTE))?;
    let dex = species.dex(dir.key())?;

    let mut written = Vec::with_capacity(2);
    for (variant, image) in [(Variant::Normal, &back), (Variant::Shiny, &shiny)] {
        let path = out_dir.join(battle_sprite_name(dex, Facing::Back, variant));
        save_gif(&options.place(image, BACK_BOTTOM_MARGIN), &path)?;
        written.push(path);
    }

    log::info!("Created back battle sprites for {}", dir.key());
    Ok(Outcome::Written(written))
}
