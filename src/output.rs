//! PNG output and file path generation

use image::RgbaImage;
use std::io;
use std::path::{Path, PathBuf};

/// Output subdirectory (below the sprites root) for battle sprites
pub const BATTLE_DIR: &str = "battlesprites";

/// Output subdirectory for overworld follower sheets
pub const FOLLOWER_DIR: &str = "followsprites";

/// Output subdirectory for menu icons
pub const ICON_DIR: &str = "monstericons";

/// Error type for output operations
#[derive(Debug)]
pub enum OutputError {
    /// IO error during file operations
    Io(io::Error),
    /// Image encoding error
    Image(image::ImageError),
    /// GIF encoding error
    Gif(::gif::EncodingError),
    /// Frame and duration lists differ in length
    Mismatch { frames: usize, durations: usize },
    /// Image does not fit the 16-bit GIF dimensions
    TooLarge { width: u32, height: u32 },
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Io(e) => write!(f, "IO error: {}", e),
            OutputError::Image(e) => write!(f, "Image error: {}", e),
            OutputError::Gif(e) => write!(f, "GIF error: {}", e),
            OutputError::Mismatch { frames, durations } => {
                write!(f, "{} frames but {} durations", frames, durations)
            }
            OutputError::TooLarge { width, height } => {
                write!(f, "{}x{} is too large for a GIF", width, height)
            }
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Io(e) => Some(e),
            OutputError::Image(e) => Some(e),
            OutputError::Gif(e) => Some(e),
            OutputError::Mismatch { .. } | OutputError::TooLarge { .. } => None,
        }
    }
}

impl From<io::Error> for OutputError {
    fn from(e: io::Error) -> Self {
        OutputError::Io(e)
    }
}

impl From<image::ImageError> for OutputError {
    fn from(e: image::ImageError) -> Self {
        OutputError::Image(e)
    }
}

impl From<::gif::EncodingError> for OutputError {
    fn from(e: ::gif::EncodingError) -> Self {
        OutputError::Gif(e)
    }
}

/// Normal or shiny coloring of a sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Regular colors
    Normal,
    /// Alternate palette
    Shiny,
}

impl Variant {
    /// Both variants, normal first.
    pub const ALL: [Variant; 2] = [Variant::Normal, Variant::Shiny];

    /// Single-letter code used in output file names.
    pub fn code(self) -> char {
        match self {
            Variant::Normal => 'n',
            Variant::Shiny => 's',
        }
    }
}

/// Which side of the monster a battle sprite shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    /// Opponent view, animated
    Front,
    /// Player view, still
    Back,
}

impl Facing {
    fn as_str(self) -> &'static str {
        match self {
            Facing::Front => "front",
            Facing::Back => "back",
        }
    }
}

/// Create the parent directory of `path` if it does not exist.
pub fn ensure_parent_dir(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Save an RGBA image to a PNG file.
///
/// # Arguments
///
/// * `image` - The image to save
/// * `path` - The output file path
///
/// # Returns
///
/// * `Ok(())` on success
/// * `Err(OutputError)` on failure
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    ensure_parent_dir(path)?;
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// File name of a battle sprite.
///
/// # Output Naming Rules
///
/// | Sprite | Output |
/// |--------|--------|
/// | Front, normal | `{dex}-front-n.gif` |
/// | Front, shiny | `{dex}-front-s.gif` |
/// | Back, normal | `{dex}-back-n.gif` |
/// | Back, shiny | `{dex}-back-s.gif` |
pub fn battle_sprite_name(dex: u32, facing: Facing, variant: Variant) -> String {
    format!("{}-{}-{}.gif", dex, facing.as_str(), variant.code())
}

/// File name of an overworld follower sheet: `{dex}-b-{n|s}{form}.png`.
pub fn follower_sprite_name(dex: u32, variant: Variant, form_suffix: &str) -> String {
    format!("{}-b-{}{}.png", dex, variant.code(), form_suffix)
}

/// File name of a menu icon: `{dex}-0.png`.
pub fn icon_name(dex: u32) -> String {
    format!("{}-0.png", dex)
}

/// Layout of the generated sprite tree below an output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    /// Create the layout for an output root (`<root>/sprites/...`).
    pub fn new(out_dir: &Path) -> Self {
        Self { root: out_dir.join("sprites") }
    }

    /// The `sprites` directory that holds every generated file.
    pub fn sprites_root(&self) -> &Path {
        &self.root
    }

    /// Directory for battle sprites.
    pub fn battle_dir(&self) -> PathBuf {
        self.root.join(BATTLE_DIR)
    }

    /// Directory for follower sheets.
    pub fn follower_dir(&self) -> PathBuf {
        self.root.join(FOLLOWER_DIR)
    }

    /// Directory for menu icons.
    pub fn icon_dir(&self) -> PathBuf {
        self.root.join(ICON_DIR)
    }

    /// Create all output directories.
    pub fn create_dirs(&self) -> Result<(), OutputError> {
        for dir in [self.battle_dir(), self.follower_dir(), self.icon_dir()] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Delete everything generated by a previous run.
    pub fn clear(&self) -> Result<(), OutputError> {
        if self.root.exists() {
            std::fs::remove_dir_all(&self.root)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::TempDir;

    #[test]
    fn test_battle_sprite_name() {
        assert_eq!(battle_sprite_name(25, Facing::Front, Variant::Normal), "25-front-n.gif");
        assert_eq!(battle_sprite_name(25, Facing::Front, Variant::Shiny), "25-front-s.gif");
        assert_eq!(battle_sprite_name(152, Facing::Back, Variant::Normal), "152-back-n.gif");
        assert_eq!(battle_sprite_name(152, Facing::Back, Variant::Shiny), "152-back-s.gif");
    }

    #[test]
    fn test_follower_sprite_name() {
        assert_eq!(follower_sprite_name(201, Variant::Normal, ""), "201-b-n.png");
        assert_eq!(follower_sprite_name(201, Variant::Shiny, "-5"), "201-b-s-5.png");
    }

    #[test]
    fn test_icon_name() {
        assert_eq!(icon_name(7), "7-0.png");
    }

    #[test]
    fn test_output_layout_paths() {
        let layout = OutputLayout::new(Path::new("output"));
        assert_eq!(layout.battle_dir(), PathBuf::from("output/sprites/battlesprites"));
        assert_eq!(layout.follower_dir(), PathBuf::from("output/sprites/followsprites"));
        assert_eq!(layout.icon_dir(), PathBuf::from("output/sprites/monstericons"));
    }

    #[test]
    fn test_output_layout_clear_and_create() {
        let temp = TempDir::new().unwrap();
        let layout = OutputLayout::new(temp.path());
        layout.create_dirs().unwrap();

        let stale = layout.icon_dir().join("1-0.png");
        std::fs::write(&stale, b"old").unwrap();
        let unrelated = temp.path().join("keep.txt");
        std::fs::write(&unrelated, b"keep").unwrap();

        layout.clear().unwrap();
        assert!(!stale.exists());
        assert!(!layout.sprites_root().exists());
        assert!(unrelated.exists());
    }

    #[test]
    fn test_save_png_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a/b/out.png");
        let img = RgbaImage::from_pixel(3, 3, Rgba([1, 2, 3, 255]));

        save_png(&img, &path).unwrap();
        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded, img);
    }
}
