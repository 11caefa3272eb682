//! Configuration schema types for `dexsprite.toml`
//!
//! Defines the structure and validation rules for a sprite project.

use crate::icon::IconSize;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project layout section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Root of the species directories
    #[serde(default = "default_sprites")]
    pub sprites: PathBuf,
    /// Output root; generated files go to `<out>/sprites`
    #[serde(default = "default_out")]
    pub out: PathBuf,
    /// Directory holding `sparkles.png` and `atlasdata.txt`
    #[serde(default = "default_resources")]
    pub resources: PathBuf,
    /// Species table replacing the built-in one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<PathBuf>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            sprites: default_sprites(),
            out: default_out(),
            resources: default_resources(),
            species: None,
        }
    }
}

fn default_sprites() -> PathBuf {
    PathBuf::from("sprites")
}

fn default_out() -> PathBuf {
    PathBuf::from("output")
}

fn default_resources() -> PathBuf {
    PathBuf::from("resources")
}

/// Battle sprite settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleConfig {
    /// Place sprites on the 96x96 canvas
    #[serde(default = "default_true")]
    pub margin: bool,
    /// Alpha of the canvas fill
    #[serde(default)]
    pub background_alpha: u8,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self { margin: true, background_alpha: 0 }
    }
}

fn default_true() -> bool {
    true
}

/// Overworld sheet settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverworldConfig {
    /// Correct odd-width mirrored frames
    #[serde(default = "default_true")]
    pub mirror: bool,
}

impl Default for OverworldConfig {
    fn default() -> Self {
        Self { mirror: true }
    }
}

/// Menu icon settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconsConfig {
    /// Build icons from the shiny overworld sheet
    #[serde(default)]
    pub shiny: bool,
    /// Icon size
    #[serde(default)]
    pub size: IconSize,
}

/// Batch execution settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Number of species processed in parallel
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self { jobs: default_jobs() }
    }
}

fn default_jobs() -> usize {
    1
}

/// Complete `dexsprite.toml` configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DexConfig {
    /// Project layout
    #[serde(default)]
    pub project: ProjectConfig,
    /// Battle sprite settings
    #[serde(default)]
    pub battle: BattleConfig,
    /// Overworld sheet settings
    #[serde(default)]
    pub overworld: OverworldConfig,
    /// Menu icon settings
    #[serde(default)]
    pub icons: IconsConfig,
    /// Batch execution settings
    #[serde(default)]
    pub build: BuildConfig,
}

/// Validation error for config values
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Field path (e.g., "build.jobs")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dexsprite.toml: '{}' {}", self.field, self.message)
    }
}

impl DexConfig {
    /// Validate the configuration.
    ///
    /// Returns a list of validation errors, empty if valid.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        for (field, path) in [
            ("project.sprites", &self.project.sprites),
            ("project.out", &self.project.out),
            ("project.resources", &self.project.resources),
        ] {
            if path.as_os_str().is_empty() {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: "must be a non-empty path".to_string(),
                });
            }
        }

        // A full run deletes <out>/sprites
        if self.project.out.join("sprites") == self.project.sprites {
            errors.push(ConfigValidationError {
                field: "project.out".to_string(),
                message: "must not contain the sprites directory as <out>/sprites".to_string(),
            });
        }

        if self.build.jobs == 0 {
            errors.push(ConfigValidationError {
                field: "build.jobs".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        errors
    }

    /// Check if the configuration is valid.
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parse() {
        let config: DexConfig = toml::from_str("").unwrap();
        assert_eq!(config, DexConfig::default());
        assert_eq!(config.project.sprites, PathBuf::from("sprites"));
        assert_eq!(config.project.out, PathBuf::from("output"));
        assert_eq!(config.project.resources, PathBuf::from("resources"));
        assert!(config.battle.margin);
        assert_eq!(config.battle.background_alpha, 0);
        assert!(config.overworld.mirror);
        assert!(!config.icons.shiny);
        assert_eq!(config.icons.size, IconSize::Medium);
        assert_eq!(config.build.jobs, 1);
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[project]
sprites = "assets/mons"
out = "dist"
resources = "assets/shared"
species = "assets/species.toml"

[battle]
margin = false
background_alpha = 255

[overworld]
mirror = false

[icons]
shiny = true
size = "large"

[build]
jobs = 4
"#;
        let config: DexConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.project.sprites, PathBuf::from("assets/mons"));
        assert_eq!(config.project.out, PathBuf::from("dist"));
        assert_eq!(config.project.species, Some(PathBuf::from("assets/species.toml")));
        assert!(!config.battle.margin);
        assert_eq!(config.battle.background_alpha, 255);
        assert!(!config.overworld.mirror);
        assert!(config.icons.shiny);
        assert_eq!(config.icons.size, IconSize::Large);
        assert_eq!(config.build.jobs, 4);
        assert!(config.is_valid());
    }

    #[test]
    fn test_invalid_icon_size() {
        let result: Result<DexConfig, _> = toml::from_str("[icons]\nsize = \"huge\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_alpha_out_of_range() {
        let result: Result<DexConfig, _> = toml::from_str("[battle]\nbackground_alpha = 300\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_zero_jobs() {
        let config: DexConfig = toml::from_str("[build]\njobs = 0\n").unwrap();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "build.jobs");
    }

    #[test]
    fn test_validation_out_overlaps_sprites() {
        let config: DexConfig =
            toml::from_str("[project]\nsprites = \"work/sprites\"\nout = \"work\"\n").unwrap();
        assert!(config.validate().iter().any(|e| e.field == "project.out"));
    }

    #[test]
    fn test_validation_empty_path() {
        let config: DexConfig = toml::from_str("[project]\nresources = \"\"\n").unwrap();
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.field == "project.resources"));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigValidationError {
            field: "build.jobs".to_string(),
            message: "must be a positive integer".to_string(),
        };
        assert_eq!(err.to_string(), "dexsprite.toml: 'build.jobs' must be a positive integer");
    }
}
