//! Species discovery for the build.
//!
//! Every subdirectory of the sprites root is a species; its name is the
//! species key.

use crate::assets::SpeciesDir;
use glob::glob;
use std::path::{Path, PathBuf};

/// Error during species discovery.
#[derive(Debug)]
pub enum DiscoveryError {
    /// Sprites root does not exist or is not a directory
    MissingRoot(PathBuf),
    /// Invalid glob pattern
    InvalidPattern(String, glob::PatternError),
    /// IO error during directory enumeration
    Io(std::io::Error),
}

impl std::fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryError::MissingRoot(path) => {
                write!(f, "Sprites directory not found: {}", path.display())
            }
            DiscoveryError::InvalidPattern(pattern, err) => {
                write!(f, "Invalid glob pattern '{}': {}", pattern, err)
            }
            DiscoveryError::Io(err) => write!(f, "IO error during discovery: {}", err),
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiscoveryError::MissingRoot(_) => None,
            DiscoveryError::InvalidPattern(_, err) => Some(err),
            DiscoveryError::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for DiscoveryError {
    fn from(err: std::io::Error) -> Self {
        DiscoveryError::Io(err)
    }
}

/// Discover the species directories under `root`, sorted by key.
///
/// Plain files next to the species directories are ignored.
pub fn discover_species(root: &Path) -> Result<Vec<SpeciesDir>, DiscoveryError> {
    if !root.is_dir() {
        return Err(DiscoveryError::MissingRoot(root.to_path_buf()));
    }

    let pattern = format!("{}/*", glob::Pattern::escape(&root.to_string_lossy()));
    let paths = glob(&pattern).map_err(|e| DiscoveryError::InvalidPattern(pattern.clone(), e))?;

    let mut species = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) if path.is_dir() => species.push(SpeciesDir::new(path)),
            Ok(_) => {}
            Err(e) => log::warn!("Error reading path during discovery: {}", e),
        }
    }

    species.sort_by(|a, b| a.key().cmp(b.key()));
    Ok(species)
}
