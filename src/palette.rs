//! Palette extraction and shiny recoloring
//!
//! Battle sprites carry at most two "real" colors next to the fixed
//! background colors. The shiny variant is produced by swapping those colors
//! for the ones listed in the species' `shiny.pal`:
//!
//! ```text
//!     RGB 30, 26, 11
//!     RGB 23, 16, 00
//! ```

use crate::color::{color_census, from_rgb555, is_background, luminance, MAX_5BIT};
use image::{Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Marker token that starts a color line in a palette file.
pub const RGB_MARKER: &str = "RGB";

/// Number of palette entries a recolor ever touches.
pub const MAX_REMAPPED: usize = 2;

/// Error during palette extraction, parsing or recoloring
#[derive(Debug, Error)]
pub enum PaletteError {
    /// Palette file could not be read
    #[error("failed to read palette {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Marker line without three integer channels
    #[error("line {line_no}: expected `RGB r, g, b`, found '{line}'")]
    InvalidLine { line_no: usize, line: String },
    /// Channel value outside the 5-bit range
    #[error("line {line_no}: channel value {value} is out of range 0-31")]
    ChannelOutOfRange { line_no: usize, value: u32 },
    /// Source image only contains background colors
    #[error("image has no non-background colors to recolor")]
    NoForegroundColors,
    /// Shiny palette has fewer colors than the image needs remapped
    #[error("shiny palette has {found} color(s), {needed} needed")]
    ShinyPaletteTooShort { needed: usize, found: usize },
}

/// An ordered list of colors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgba<u8>>,
}

impl Palette {
    /// Create a palette from a list of colors.
    pub fn new(colors: Vec<Rgba<u8>>) -> Self {
        Self { colors }
    }

    /// Extract the normal palette of a sprite.
    ///
    /// Collects the distinct colors of the image, drops the background colors
    /// and sorts the rest by luminance, brightest first. Equal luminance keeps
    /// the order of first appearance.
    pub fn from_image(image: &RgbaImage) -> Self {
        let mut colors: Vec<Rgba<u8>> = color_census(image)
            .into_iter()
            .map(|(_, color)| color)
            .filter(|color| !is_background(color))
            .collect();
        colors.sort_by(|a, b| luminance(b).total_cmp(&luminance(a)));
        Self { colors }
    }

    /// The colors in order.
    pub fn colors(&self) -> &[Rgba<u8>] {
        &self.colors
    }

    /// Get a color by index.
    pub fn get(&self, index: usize) -> Option<Rgba<u8>> {
        self.colors.get(index).copied()
    }

    /// Number of colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette has no colors.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Parse the text of a shiny palette file.
///
/// Every line whose first token is `RGB` contributes one opaque color built
/// from the next three integers (separated by whitespace and/or commas).
/// Other lines are ignored.
///
/// # Examples
///
/// ```
/// use dexsprite::palette::parse_shiny_palette;
/// use image::Rgba;
///
/// let palette = parse_shiny_palette("\tRGB 31, 31, 00\n\tRGB 00, 00, 31\n").unwrap();
/// assert_eq!(palette.colors(), &[Rgba([255, 255, 0, 255]), Rgba([0, 0, 255, 255])]);
/// ```
pub fn parse_shiny_palette(text: &str) -> Result<Palette, PaletteError> {
    let mut colors = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let mut tokens = raw
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty());

        if tokens.next() != Some(RGB_MARKER) {
            continue;
        }

        let mut channels = [0u8; 3];
        for channel in channels.iter_mut() {
            let value: u32 = tokens.next().and_then(|t| t.parse().ok()).ok_or_else(|| {
                PaletteError::InvalidLine { line_no, line: raw.trim().to_string() }
            })?;
            if value > u32::from(MAX_5BIT) {
                return Err(PaletteError::ChannelOutOfRange { line_no, value });
            }
            *channel = value as u8;
        }

        colors.push(from_rgb555(channels[0], channels[1], channels[2]));
    }

    Ok(Palette::new(colors))
}

/// Load and parse a shiny palette file.
pub fn load_shiny_palette(path: &Path) -> Result<Palette, PaletteError> {
    let text = fs::read_to_string(path)
        .map_err(|source| PaletteError::Io { path: path.to_path_buf(), source })?;
    parse_shiny_palette(&text)
}

/// Swap the normal palette of an image for the shiny one.
///
/// Pixels exactly equal to `normal[0]` become `shiny[0]`; if the normal palette
/// has a second color, pixels equal to it become `shiny[1]`. Colors past the
/// second are left alone.
///
/// # Errors
///
/// * `NoForegroundColors` if `normal` is empty
/// * `ShinyPaletteTooShort` if `shiny` cannot cover the remapped entries
pub fn recolor(
    image: &RgbaImage,
    normal: &Palette,
    shiny: &Palette,
) -> Result<RgbaImage, PaletteError> {
    if normal.is_empty() {
        return Err(PaletteError::NoForegroundColors);
    }

    let remapped = normal.len().min(MAX_REMAPPED);
    if shiny.len() < remapped {
        return Err(PaletteError::ShinyPaletteTooShort { needed: remapped, found: shiny.len() });
    }

    let pairs: Vec<(Rgba<u8>, Rgba<u8>)> =
        normal.colors[..remapped].iter().copied().zip(shiny.colors.iter().copied()).collect();

    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        if let Some((_, to)) = pairs.iter().find(|(from, _)| from == pixel) {
            *pixel = *to;
        }
    }
    Ok(out)
}

/// Extract the normal palette of `image`, read the shiny palette at
/// `palette_path`, and return the recolored image.
pub fn shiny_variant(image: &RgbaImage, palette_path: &Path) -> Result<RgbaImage, PaletteError> {
    let normal = Palette::from_image(image);
    if normal.is_empty() {
        return Err(PaletteError::NoForegroundColors);
    }
    if normal.len() > MAX_REMAPPED {
        log::warn!(
            "{} foreground colors found, only the first {} are recolored",
            normal.len(),
            MAX_REMAPPED
        );
    }

    let shiny = load_shiny_palette(palette_path)?;
    recolor(image, &normal, &shiny)
}
