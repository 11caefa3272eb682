//! Configuration loading and discovery for `dexsprite.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::DexConfig;
use crate::icon::IconSize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project configuration file
pub const CONFIG_FILE: &str = "dexsprite.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse dexsprite.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override sprites root
    pub sprites: Option<PathBuf>,
    /// Override output root
    pub out: Option<PathBuf>,
    /// Override resources directory
    pub resources: Option<PathBuf>,
    /// Number of parallel jobs
    pub jobs: Option<usize>,
    /// Odd-width mirror correction
    pub mirror: Option<bool>,
    /// Build icons from shiny sheets
    pub shiny_icons: Option<bool>,
    /// Icon size
    pub icon_size: Option<IconSize>,
}

/// Find dexsprite.toml by walking up from the current working directory.
///
/// # Returns
/// - `Some(path)` if a dexsprite.toml file is found
/// - `None` if no config file is found
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find dexsprite.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a dexsprite.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration.
///
/// # Example
/// ```ignore
/// let config = load_config(None)?;
/// let config = load_config(Some(Path::new("mod/dexsprite.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<DexConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(default_config()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<DexConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: DexConfig = toml::from_str(&contents)?;
    validated(config)
}

fn validated(config: DexConfig) -> Result<DexConfig, ConfigError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(config)
}

/// Configuration used when no dexsprite.toml is found.
pub fn default_config() -> DexConfig {
    DexConfig::default()
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut DexConfig, overrides: &CliOverrides) {
    if let Some(ref sprites) = overrides.sprites {
        config.project.sprites = sprites.clone();
    }
    if let Some(ref out) = overrides.out {
        config.project.out = out.clone();
    }
    if let Some(ref resources) = overrides.resources {
        config.project.resources = resources.clone();
    }

    if let Some(jobs) = overrides.jobs {
        config.build.jobs = jobs;
    }
    if let Some(mirror) = overrides.mirror {
        config.overworld.mirror = mirror;
    }
    if let Some(shiny) = overrides.shiny_icons {
        config.icons.shiny = shiny;
    }
    if let Some(size) = overrides.icon_size {
        config.icons.size = size;
    }
}

/// Merge overrides and re-check the result.
///
/// Flags can produce values a config file would be rejected for
/// (`--jobs 0`), so the merged config is validated again.
pub fn apply_overrides(mut config: DexConfig, overrides: &CliOverrides) -> Result<DexConfig, ConfigError> {
    merge_cli_overrides(&mut config, overrides);
    validated(config)
}

/// Get the project root directory from a config file path.
///
/// Returns the parent directory of the dexsprite.toml file.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}

/// Resolve a path relative to the project root.
///
/// If the path is absolute, returns it unchanged.
/// If relative, joins it with the project root.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}
