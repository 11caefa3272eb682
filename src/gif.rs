//! GIF animation rendering
//!
//! Battle sprites are written as GIFs with a delay per frame. Every frame is
//! disposed to the background before the next one is drawn, so transparent
//! areas of a frame never show the previous frame through them.

use crate::output::{ensure_parent_dir, OutputError};
use image::RgbaImage;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Quantization speed handed to the GIF encoder (1 = best, 30 = fastest).
const QUANTIZE_SPEED: i32 = 10;

/// Render a sequence of frames as a GIF.
///
/// # Arguments
///
/// * `frames` - The image frames to include in the animation
/// * `durations_ms` - Display time of each frame in milliseconds
/// * `loop_anim` - Whether the animation should loop infinitely
/// * `path` - Output file path
///
/// # Returns
///
/// * `Ok(())` on success
/// * `Err(OutputError)` on failure
pub fn render_gif(
    frames: &[RgbaImage],
    durations_ms: &[u32],
    loop_anim: bool,
    path: &Path,
) -> Result<(), OutputError> {
    let Some(first) = frames.first() else {
        return Ok(());
    };
    if durations_ms.len() != frames.len() {
        return Err(OutputError::Mismatch { frames: frames.len(), durations: durations_ms.len() });
    }

    let (width, height) = gif_dimensions(first)?;
    ensure_parent_dir(path)?;

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let mut encoder = ::gif::Encoder::new(writer, width, height, &[])?;

    if loop_anim {
        encoder.set_repeat(::gif::Repeat::Infinite)?;
    }

    for (rgba_image, &duration_ms) in frames.iter().zip(durations_ms) {
        let (w, h) = gif_dimensions(rgba_image)?;
        let mut pixels = rgba_image.as_raw().clone();
        let mut frame = ::gif::Frame::from_rgba_speed(w, h, &mut pixels, QUANTIZE_SPEED);
        frame.delay = delay_cs(duration_ms);
        frame.dispose = ::gif::DisposalMethod::Background;
        encoder.write_frame(&frame)?;
    }

    Ok(())
}

/// Save a single image as a still GIF.
pub fn save_gif(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    render_gif(std::slice::from_ref(image), &[0], false, path)
}

/// GIF uses centiseconds (1/100th of a second) for delays.
fn delay_cs(duration_ms: u32) -> u16 {
    (duration_ms / 10).min(u32::from(u16::MAX)) as u16
}

fn gif_dimensions(image: &RgbaImage) -> Result<(u16, u16), OutputError> {
    let (w, h) = image.dimensions();
    match (u16::try_from(w), u16::try_from(h)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(OutputError::TooLarge { width: w, height: h }),
    }
}
