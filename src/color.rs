//! Color utilities for sprite palettes
//!
//! Source sprites use a handful of fixed "background" colors around the
//! actual artwork. Palette files store 5-bit channels (`RGB 31, 20, 0`), which
//! are expanded to the 8-bit channels of RGBA images.

use image::{Rgba, RgbaImage};

/// Fully transparent white, the usual sprite background
pub const TRANSPARENT_WHITE: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Opaque white, used as outline/background fill
pub const OPAQUE_WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Opaque black, used for outlines
pub const OPAQUE_BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Fully transparent black, what freshly allocated canvases are filled with
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// The colors that never take part in palette swaps.
pub const BACKGROUND_COLORS: [Rgba<u8>; 3] = [TRANSPARENT_WHITE, OPAQUE_WHITE, OPAQUE_BLACK];

/// Largest value of a 5-bit channel.
pub const MAX_5BIT: u8 = 31;

/// Check whether a color is one of the fixed background colors.
pub fn is_background(color: &Rgba<u8>) -> bool {
    BACKGROUND_COLORS.contains(color)
}

/// Expand a 5-bit channel value (0-31) to 8 bits.
///
/// Uses the linear `v * 255 / 31` mapping with integer division, so
/// `0 -> 0` and `31 -> 255`. Values above 31 are clamped.
///
/// # Examples
///
/// ```
/// use dexsprite::color::expand_5bit;
///
/// assert_eq!(expand_5bit(0), 0);
/// assert_eq!(expand_5bit(16), 131);
/// assert_eq!(expand_5bit(31), 255);
/// ```
pub fn expand_5bit(value: u8) -> u8 {
    let v = u32::from(value.min(MAX_5BIT));
    (v * 255 / u32::from(MAX_5BIT)) as u8
}

/// Build an opaque color from three 5-bit channels.
pub fn from_rgb555(r: u8, g: u8, b: u8) -> Rgba<u8> {
    Rgba([expand_5bit(r), expand_5bit(g), expand_5bit(b), 255])
}

/// Perceptual luminance (Rec. 709 weights) used to order palettes.
pub fn luminance(color: &Rgba<u8>) -> f64 {
    let [r, g, b, _] = color.0;
    f64::from(r) * 0.2126 + f64::from(g) * 0.7152 + f64::from(b) * 0.0722
}

/// Count the distinct colors of an image.
///
/// Returns `(pixel count, color)` pairs in order of first appearance
/// (row-major scan), which keeps callers deterministic when they break ties.
pub fn color_census(image: &RgbaImage) -> Vec<(usize, Rgba<u8>)> {
    let mut census: Vec<(usize, Rgba<u8>)> = Vec::new();
    for pixel in image.pixels() {
        match census.iter_mut().find(|(_, c)| c == pixel) {
            Some((count, _)) => *count += 1,
            None => census.push((1, *pixel)),
        }
    }
    census
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_5bit_endpoints() {
        assert_eq!(expand_5bit(0), 0);
        assert_eq!(expand_5bit(31), 255);
    }

    #[test]
    fn test_expand_5bit_monotonic() {
        let mut prev = 0;
        for v in 0..=MAX_5BIT {
            let expanded = expand_5bit(v);
            assert!(expanded >= prev, "expand({}) = {} < {}", v, expanded, prev);
            prev = expanded;
        }
    }

    #[test]
    fn test_expand_5bit_clamps() {
        assert_eq!(expand_5bit(32), 255);
        assert_eq!(expand_5bit(255), 255);
    }

    #[test]
    fn test_from_rgb555() {
        assert_eq!(from_rgb555(31, 0, 10), Rgba([255, 0, 82, 255]));
    }

    #[test]
    fn test_is_background() {
        assert!(is_background(&TRANSPARENT_WHITE));
        assert!(is_background(&OPAQUE_WHITE));
        assert!(is_background(&OPAQUE_BLACK));
        // Transparent black is not a palette background
        assert!(!is_background(&TRANSPARENT));
        assert!(!is_background(&Rgba([200, 100, 50, 255])));
    }

    #[test]
    fn test_luminance_order() {
        let white = Rgba([255, 255, 255, 255]);
        let green = Rgba([0, 255, 0, 255]);
        let red = Rgba([255, 0, 0, 255]);
        assert!(luminance(&white) > luminance(&green));
        assert!(luminance(&green) > luminance(&red));
    }

    #[test]
    fn test_color_census_counts_and_order() {
        let mut img = RgbaImage::from_pixel(3, 1, TRANSPARENT_WHITE);
        img.put_pixel(1, 0, OPAQUE_BLACK);

        let census = color_census(&img);
        assert_eq!(census, vec![(2, TRANSPARENT_WHITE), (1, OPAQUE_BLACK)]);
    }
}
