//! Spritesheet slicing and grid composition
//!
//! Source sheets store frames as square tiles along a single axis: battle
//! sprites stack them vertically, overworld sheets run left to right.

use crate::canvas::{blank_canvas, paste_bottom_aligned};
use image::{imageops, Rgba, RgbaImage};
use thiserror::Error;

/// Error while slicing a sheet into frames
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SliceError {
    /// Sheet has a zero-sized dimension
    #[error("sheet is empty ({width}x{height})")]
    Empty { width: u32, height: u32 },
    /// Long axis is not a whole number of tiles
    #[error("sheet length {length} is not a multiple of the tile size {tile}")]
    UnevenTiling { length: u32, tile: u32 },
}

/// Direction in which frames are laid out on a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetAxis {
    /// Frames arranged left to right
    Horizontal,
    /// Frames arranged top to bottom
    Vertical,
}

impl SheetAxis {
    /// The long axis of an image (horizontal for square images).
    pub fn of(image: &RgbaImage) -> Self {
        if image.height() > image.width() {
            SheetAxis::Vertical
        } else {
            SheetAxis::Horizontal
        }
    }
}

/// Count the frames of a sheet laid out along `axis`.
///
/// The tile size is the extent across the axis, so a 96x16 horizontal sheet
/// holds six 16x16 frames.
pub fn frame_count(image: &RgbaImage, axis: SheetAxis) -> Result<u32, SliceError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(SliceError::Empty { width, height });
    }

    let (length, tile) = match axis {
        SheetAxis::Horizontal => (width, height),
        SheetAxis::Vertical => (height, width),
    };
    if length % tile != 0 {
        return Err(SliceError::UnevenTiling { length, tile });
    }
    Ok(length / tile)
}

/// Cut a sheet into its square frames.
///
/// # Examples
///
/// ```
/// use dexsprite::spritesheet::{slice_frames, SheetAxis};
/// use image::RgbaImage;
///
/// let sheet = RgbaImage::new(96, 16);
/// let frames = slice_frames(&sheet, SheetAxis::Horizontal).unwrap();
/// assert_eq!(frames.len(), 6);
/// assert_eq!(frames[0].dimensions(), (16, 16));
/// ```
pub fn slice_frames(image: &RgbaImage, axis: SheetAxis) -> Result<Vec<RgbaImage>, SliceError> {
    let count = frame_count(image, axis)?;
    let tile = match axis {
        SheetAxis::Horizontal => image.height(),
        SheetAxis::Vertical => image.width(),
    };

    let frames = (0..count)
        .map(|i| {
            let (x, y) = match axis {
                SheetAxis::Horizontal => (tile * i, 0),
                SheetAxis::Vertical => (0, tile * i),
            };
            imageops::crop_imm(image, x, y, tile, tile).to_image()
        })
        .collect();
    Ok(frames)
}

/// Lay frames out on a grid of fixed-size cells.
///
/// Each frame is horizontally centered in its cell and its bottom edge sits
/// `bottom_margin` pixels above the bottom of the cell. Cells are filled row
/// by row; the sheet is `columns` cells wide and tall enough for all frames.
pub fn compose_grid(
    frames: &[&RgbaImage],
    columns: u32,
    cell: u32,
    bottom_margin: u32,
    background: Rgba<u8>,
) -> RgbaImage {
    let columns = columns.max(1);
    let rows = (frames.len() as u32).div_ceil(columns).max(1);
    let mut sheet = blank_canvas(columns * cell, rows * cell, background);

    for (i, frame) in frames.iter().enumerate() {
        let col = (i as u32) % columns;
        let row = (i as u32) / columns;
        paste_bottom_aligned(&mut sheet, frame, col * cell, row * cell, cell, cell, bottom_margin);
    }

    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::TRANSPARENT;

    /// Horizontal sheet where frame `i` is filled with gray level `i * 10`
    fn numbered_sheet(count: u32, tile: u32) -> RgbaImage {
        RgbaImage::from_fn(count * tile, tile, |x, _| {
            let level = (x / tile * 10) as u8;
            Rgba([level, level, level, 255])
        })
    }

    #[test]
    fn test_slice_96x16_into_six_frames() {
        let sheet = numbered_sheet(6, 16);
        let frames = slice_frames(&sheet, SheetAxis::Horizontal).unwrap();

        assert_eq!(frames.len(), 6);
        for (i, frame) in frames.iter().enumerate() {
            assert_eq!(frame.dimensions(), (16, 16));
            let expected = imageops::crop_imm(&sheet, 16 * i as u32, 0, 16, 16).to_image();
            assert_eq!(frame, &expected);
        }
    }

    #[test]
    fn test_slice_vertical() {
        let sheet = RgbaImage::from_fn(8, 24, |_, y| Rgba([(y / 8) as u8, 0, 0, 255]));
        let frames = slice_frames(&sheet, SheetAxis::Vertical).unwrap();

        assert_eq!(frames.len(), 3);
        assert_eq!(*frames[2].get_pixel(0, 0), Rgba([2, 0, 0, 255]));
    }

    #[test]
    fn test_single_square_frame() {
        let sheet = RgbaImage::new(16, 16);
        assert_eq!(frame_count(&sheet, SheetAxis::Vertical), Ok(1));
        assert_eq!(frame_count(&sheet, SheetAxis::Horizontal), Ok(1));
    }

    #[test]
    fn test_uneven_tiling() {
        let sheet = RgbaImage::new(40, 16);
        assert_eq!(
            frame_count(&sheet, SheetAxis::Horizontal),
            Err(SliceError::UnevenTiling { length: 40, tile: 16 })
        );
    }

    #[test]
    fn test_empty_sheet() {
        let sheet = RgbaImage::new(0, 16);
        assert!(matches!(slice_frames(&sheet, SheetAxis::Horizontal), Err(SliceError::Empty { .. })));
    }

    #[test]
    fn test_axis_of() {
        assert_eq!(SheetAxis::of(&RgbaImage::new(96, 16)), SheetAxis::Horizontal);
        assert_eq!(SheetAxis::of(&RgbaImage::new(56, 168)), SheetAxis::Vertical);
        assert_eq!(SheetAxis::of(&RgbaImage::new(16, 16)), SheetAxis::Horizontal);
    }

    #[test]
    fn test_compose_grid_cell_placement() {
        let red = Rgba([255, 0, 0, 255]);
        let green = Rgba([0, 255, 0, 255]);
        let a = RgbaImage::from_pixel(2, 2, red);
        let b = RgbaImage::from_pixel(2, 2, green);

        let sheet = compose_grid(&[&a, &b, &a], 2, 4, 1, TRANSPARENT);
        assert_eq!(sheet.dimensions(), (8, 8));

        // Cell (0,0): x = (4-2)/2 = 1, y = 4-1-2 = 1
        assert_eq!(*sheet.get_pixel(1, 1), red);
        assert_eq!(*sheet.get_pixel(2, 2), red);
        assert_eq!(*sheet.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*sheet.get_pixel(1, 3), TRANSPARENT);

        // Cell (1,0)
        assert_eq!(*sheet.get_pixel(5, 1), green);

        // Cell (0,1), last cell stays empty
        assert_eq!(*sheet.get_pixel(1, 5), red);
        assert_eq!(*sheet.get_pixel(5, 5), TRANSPARENT);
    }

    #[test]
    fn test_compose_grid_no_frames() {
        let sheet = compose_grid(&[], 4, 32, 2, TRANSPARENT);
        assert_eq!(sheet.dimensions(), (128, 32));
    }
}
