//! Species asset directories
//!
//! Each species has a directory of source art and scripts named after its
//! key. Some files are optional: a missing file means "nothing to generate"
//! and is reported as [`Outcome::Skipped`], while a file that exists but
//! cannot be decoded is an [`AssetError`].

use crate::animation::AnimationError;
use crate::output::OutputError;
use crate::palette::PaletteError;
use crate::species::SpeciesError;
use crate::spritesheet::SliceError;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Battle sprite facing the player
pub const FRONT_IMAGE: &str = "front.png";

/// Battle sprite seen from behind
pub const BACK_IMAGE: &str = "back.png";

/// Shiny palette
pub const SHINY_PALETTE: &str = "shiny.pal";

/// Dedicated icon sheet
pub const ICON_IMAGE: &str = "icon.png";

/// Normal overworld sheet
pub const OVERWORLD_IMAGE: &str = "overworld.png";

/// Shiny overworld sheet
pub const OVERWORLD_SHINY_IMAGE: &str = "overworld-shiny.png";

/// Error while turning a species' assets into outputs
#[derive(Debug, Error)]
pub enum AssetError {
    /// Image exists but could not be decoded
    #[error("failed to load image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// Palette extraction, parsing or recoloring failed
    #[error(transparent)]
    Palette(#[from] PaletteError),
    /// Animation script could not be interpreted
    #[error(transparent)]
    Animation(#[from] AnimationError),
    /// Sheet could not be cut into frames
    #[error(transparent)]
    Slice(#[from] SliceError),
    /// Species is missing from the lookup tables
    #[error(transparent)]
    Species(#[from] SpeciesError),
    /// File name pattern could not be compiled
    #[error("invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    /// Output could not be written
    #[error("failed to write output: {0}")]
    Output(#[from] OutputError),
    /// Animation refers to a frame the sheet does not have
    #[error("animation uses frame {frame} but the sheet has {count} frames")]
    FrameOutOfRange { frame: usize, count: usize },
    /// Sheet has the wrong number of frames
    #[error("{path} has {found} frames, expected {expected}")]
    FrameCount { path: PathBuf, expected: usize, found: usize },
    /// Frame has no foreground color to measure
    #[error("frame has no foreground color")]
    NoDominantColor,
    /// Shared resource file is missing
    #[error("missing resource {0}")]
    MissingResource(PathBuf),
}

/// What a generator did for one species.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Files written
    Written(Vec<PathBuf>),
    /// Nothing to do; the reason names the missing input
    Skipped(String),
}

impl Outcome {
    /// Skip because `file` is absent.
    pub fn missing(file: &str) -> Self {
        Outcome::Skipped(format!("no {}", file))
    }

    /// Files written, empty when skipped.
    pub fn outputs(&self) -> &[PathBuf] {
        match self {
            Outcome::Written(paths) => paths,
            Outcome::Skipped(_) => &[],
        }
    }
}

/// A species source directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SpeciesDir {
    key: String,
    path: PathBuf,
}

impl SpeciesDir {
    /// Wrap a directory; the key is its final path component.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let key = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        Self { key, path }
    }

    /// Species key (directory name).
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a file inside the directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Load an optional image of this species.
    pub fn optional_image(&self, name: &str) -> Result<Option<RgbaImage>, AssetError> {
        load_optional_image(&self.file(name))
    }
}

/// Load an image as RGBA.
pub fn load_image(path: &Path) -> Result<RgbaImage, AssetError> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|source| AssetError::Image { path: path.to_path_buf(), source })
}

/// Load an image that may legitimately be absent.
///
/// Returns `Ok(None)` if there is no file at `path`, and an error if the file
/// exists but cannot be decoded.
pub fn load_optional_image(path: &Path) -> Result<Option<RgbaImage>, AssetError> {
    if !path.is_file() {
        return Ok(None);
    }
    load_image(path).map(Some)
}

/// Load a shared resource image, failing with `MissingResource` if absent.
pub fn load_resource_image(path: &Path) -> Result<RgbaImage, AssetError> {
    load_optional_image(path)?.ok_or_else(|| AssetError::MissingResource(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::TempDir;

    #[test]
    fn test_species_dir_key() {
        let dir = SpeciesDir::new("sprites/pikachu");
        assert_eq!(dir.key(), "pikachu");
        assert_eq!(dir.file(FRONT_IMAGE), PathBuf::from("sprites/pikachu/front.png"));
    }

    #[test]
    fn test_optional_image_absent() {
        let temp = TempDir::new().unwrap();
        let loaded = load_optional_image(&temp.path().join("front.png")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_optional_image_present() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("front.png");
        RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255])).save(&path).unwrap();

        let loaded = load_optional_image(&path).unwrap().unwrap();
        assert_eq!(loaded.dimensions(), (2, 2));
    }

    #[test]
    fn test_optional_image_corrupt() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("front.png");
        std::fs::write(&path, b"not a png").unwrap();

        let err = load_optional_image(&path).unwrap_err();
        assert!(matches!(err, AssetError::Image { .. }));
    }

    #[test]
    fn test_resource_image_missing() {
        let temp = TempDir::new().unwrap();
        let err = load_resource_image(&temp.path().join("sparkles.png")).unwrap_err();
        assert!(matches!(err, AssetError::MissingResource(_)));
    }

    #[test]
    fn test_outcome_outputs() {
        assert!(Outcome::missing(FRONT_IMAGE).outputs().is_empty());
        assert_eq!(Outcome::missing(FRONT_IMAGE), Outcome::Skipped("no front.png".to_string()));

        let written = Outcome::Written(vec![PathBuf::from("a.gif")]);
        assert_eq!(written.outputs().len(), 1);
    }
}
