//! Canvas helpers shared by the sprite assemblers
//!
//! The target engine expects sprites on fixed-size transparent canvases,
//! horizontally centered and sitting a few pixels above the bottom edge.

use image::{imageops, Rgba, RgbaImage};

/// Create a canvas filled with a single color.
pub fn blank_canvas(width: u32, height: u32, fill: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, fill)
}

/// Copy `image` onto `canvas` at a possibly negative offset.
///
/// Pixels are replaced, not blended, and anything outside the canvas is
/// clipped.
pub fn paste(canvas: &mut RgbaImage, image: &RgbaImage, x: i64, y: i64) {
    imageops::replace(canvas, image, x, y);
}

/// Blend `image` onto `canvas` at the given offset, using the image's own
/// alpha as the mask.
///
/// Every channel, alpha included, moves from the canvas value towards the
/// image value by `alpha / 255`. Opaque pixels replace the canvas and
/// transparent ones leave it untouched.
pub fn overlay(canvas: &mut RgbaImage, image: &RgbaImage, x: i64, y: i64) {
    let (width, height) = (i64::from(canvas.width()), i64::from(canvas.height()));
    for (ix, iy, src) in image.enumerate_pixels() {
        let (cx, cy) = (x + i64::from(ix), y + i64::from(iy));
        if cx < 0 || cy < 0 || cx >= width || cy >= height || src[3] == 0 {
            continue;
        }
        let mask = u32::from(src[3]);
        let dst = canvas.get_pixel_mut(cx as u32, cy as u32);
        for channel in 0..4 {
            dst[channel] = blend(dst[channel], src[channel], mask);
        }
    }
}

/// `(src * mask + dst * (255 - mask)) / 255`, rounded.
fn blend(dst: u8, src: u8, mask: u32) -> u8 {
    let t = u32::from(src) * mask + u32::from(dst) * (255 - mask) + 128;
    (((t >> 8) + t) >> 8) as u8
}

/// Offset that centers `size` within `extent` (rounding towards the left).
pub fn centered(extent: u32, size: u32) -> i64 {
    (i64::from(extent) - i64::from(size)).div_euclid(2)
}

/// Paste `image` into the cell at (`cell_x`, `cell_y`), centered
/// horizontally, with its bottom edge `bottom_margin` pixels above the
/// bottom of the cell.
pub fn paste_bottom_aligned(
    canvas: &mut RgbaImage,
    image: &RgbaImage,
    cell_x: u32,
    cell_y: u32,
    cell_width: u32,
    cell_height: u32,
    bottom_margin: u32,
) {
    let x = i64::from(cell_x) + centered(cell_width, image.width());
    let y = i64::from(cell_y) + i64::from(cell_height)
        - i64::from(bottom_margin)
        - i64::from(image.height());
    paste(canvas, image, x, y);
}

/// Place `image` on a new `size`x`size` canvas, centered and bottom aligned.
pub fn with_margin(image: &RgbaImage, size: u32, bottom_margin: u32, fill: Rgba<u8>) -> RgbaImage {
    let mut canvas = blank_canvas(size, size, fill);
    paste_bottom_aligned(&mut canvas, image, 0, 0, size, size, bottom_margin);
    canvas
}

/// Horizontal mirror image.
pub fn mirror(image: &RgbaImage) -> RgbaImage {
    imageops::flip_horizontal(image)
}

/// Copy of `image` moved `dx` pixels sideways on a transparent canvas of the
/// same size; pixels pushed past the edge are lost.
pub fn shifted(image: &RgbaImage, dx: i64) -> RgbaImage {
    let mut canvas = RgbaImage::new(image.width(), image.height());
    paste(&mut canvas, image, dx, 0);
    canvas
}

/// Bounding box of the pixels with non-zero alpha.
///
/// Returns `(left, top, right, bottom)` with exclusive right/bottom edges, or
/// `None` if the image is fully transparent.
pub fn bounding_box(image: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut bbox: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        bbox = Some(match bbox {
            None => (x, y, x + 1, y + 1),
            Some((l, t, r, b)) => (l.min(x), t.min(y), r.max(x + 1), b.max(y + 1)),
        });
    }
    bbox
}

/// Crop to the bounding box of the visible pixels. Fully transparent images
/// are returned unchanged.
pub fn trim(image: &RgbaImage) -> RgbaImage {
    match bounding_box(image) {
        Some((l, t, r, b)) => imageops::crop_imm(image, l, t, r - l, b - t).to_image(),
        None => image.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::TRANSPARENT;

    #[test]
    fn test_overlay_blends_alpha_linearly() {
        let mut canvas = RgbaImage::from_pixel(2, 1, TRANSPARENT);
        canvas.put_pixel(1, 0, Rgba([0, 0, 255, 255]));
        let half = RgbaImage::from_pixel(2, 1, Rgba([255, 255, 255, 128]));

        overlay(&mut canvas, &half, 0, 0);
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([128, 128, 128, 128]));
        assert_eq!(*canvas.get_pixel(1, 0), Rgba([128, 128, 127, 191]));
    }

    #[test]
    fn test_overlay_opaque_replaces_and_clips() {
        let mut canvas = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255]));
        let mut sparkle = RgbaImage::new(2, 2);
        sparkle.put_pixel(1, 1, Rgba([255, 255, 0, 255]));

        overlay(&mut canvas, &sparkle, 1, 1);
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([10, 20, 30, 255]));
        assert_eq!(*canvas.get_pixel(1, 1), Rgba([10, 20, 30, 255]));

        overlay(&mut canvas, &sparkle, -1, -1);
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([255, 255, 0, 255]));
    }

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    #[test]
    fn test_centered_rounds_left() {
        assert_eq!(centered(96, 56), 20);
        assert_eq!(centered(32, 15), 8);
        assert_eq!(centered(4, 7), -2);
    }

    #[test]
    fn test_with_margin_battle_layout() {
        let sprite = RgbaImage::from_pixel(56, 56, RED);
        let canvas = with_margin(&sprite, 96, 4, TRANSPARENT);

        assert_eq!(canvas.dimensions(), (96, 96));
        // x = 20, y = 96 - 4 - 56 = 36
        assert_eq!(*canvas.get_pixel(20, 36), RED);
        assert_eq!(*canvas.get_pixel(75, 91), RED);
        assert_eq!(*canvas.get_pixel(19, 36), TRANSPARENT);
        assert_eq!(*canvas.get_pixel(20, 92), TRANSPARENT);
    }

    #[test]
    fn test_paste_replaces_pixels() {
        let mut canvas = RgbaImage::from_pixel(2, 1, RED);
        let clear = RgbaImage::from_pixel(1, 1, TRANSPARENT);
        paste(&mut canvas, &clear, 1, 0);
        assert_eq!(*canvas.get_pixel(1, 0), TRANSPARENT);
    }

    #[test]
    fn test_paste_clips_negative_offset() {
        let mut canvas = RgbaImage::new(3, 1);
        let strip = RgbaImage::from_fn(3, 1, |x, _| Rgba([x as u8, 0, 0, 255]));
        paste(&mut canvas, &strip, -1, 0);
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([1, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(1, 0), Rgba([2, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(2, 0), TRANSPARENT);
    }

    #[test]
    fn test_shifted() {
        let mut img = RgbaImage::new(4, 1);
        img.put_pixel(1, 0, RED);

        assert_eq!(*shifted(&img, 1).get_pixel(2, 0), RED);
        assert_eq!(*shifted(&img, -1).get_pixel(0, 0), RED);
        assert_eq!(*shifted(&img, -1).get_pixel(1, 0), TRANSPARENT);
    }

    #[test]
    fn test_mirror() {
        let mut img = RgbaImage::new(3, 1);
        img.put_pixel(0, 0, RED);
        assert_eq!(*mirror(&img).get_pixel(2, 0), RED);
    }

    #[test]
    fn test_bounding_box() {
        let mut img = RgbaImage::new(8, 8);
        assert_eq!(bounding_box(&img), None);

        img.put_pixel(2, 3, RED);
        img.put_pixel(4, 6, RED);
        assert_eq!(bounding_box(&img), Some((2, 3, 5, 7)));
    }

    #[test]
    fn test_trim() {
        let mut img = RgbaImage::new(8, 8);
        img.put_pixel(2, 3, RED);
        img.put_pixel(4, 6, RED);
        let trimmed = trim(&img);
        assert_eq!(trimmed.dimensions(), (3, 4));
        assert_eq!(*trimmed.get_pixel(0, 0), RED);

        let empty = RgbaImage::new(5, 5);
        assert_eq!(trim(&empty).dimensions(), (5, 5));
    }
}
