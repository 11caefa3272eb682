//! Build context containing configuration and paths for a run.

use crate::battle::BattleOptions;
use crate::config::DexConfig;
use crate::icon::IconSize;
use std::path::{Path, PathBuf};

/// Build context containing configuration and paths for a run.
///
/// Paths in the configuration are relative to the project root (the
/// directory holding `dexsprite.toml`, or the working directory).
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// The loaded configuration
    config: DexConfig,
    /// Project root directory
    project_root: PathBuf,
    /// Whether to run in verbose mode
    verbose: bool,
}

impl BuildContext {
    /// Create a new build context.
    pub fn new(config: DexConfig, project_root: PathBuf) -> Self {
        Self { config, project_root, verbose: false }
    }

    /// Get the configuration.
    pub fn config(&self) -> &DexConfig {
        &self.config
    }

    /// Get the project root directory.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Root of the species directories.
    pub fn sprites_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.project.sprites)
    }

    /// Output root; generated files go below `<out>/sprites`.
    pub fn out_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.project.out)
    }

    /// Shared resources directory.
    pub fn resources_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.project.resources)
    }

    /// Project species table, if one is configured.
    pub fn species_path(&self) -> Option<PathBuf> {
        self.config.project.species.as_deref().map(|p| self.resolve_path(p))
    }

    /// Battle sprite placement.
    pub fn battle_options(&self) -> BattleOptions {
        BattleOptions {
            margin: self.config.battle.margin,
            background_alpha: self.config.battle.background_alpha,
        }
    }

    /// Whether overworld mirror correction is on.
    pub fn mirror(&self) -> bool {
        self.config.overworld.mirror
    }

    /// Whether icons come from the shiny sheet.
    pub fn shiny_icons(&self) -> bool {
        self.config.icons.shiny
    }

    /// Icon size.
    pub fn icon_size(&self) -> IconSize {
        self.config.icons.size
    }

    /// Number of species processed in parallel.
    pub fn jobs(&self) -> usize {
        self.config.build.jobs
    }

    /// Whether verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Set verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Resolve a path relative to the project root.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        crate::config::resolve_path(&self.project_root, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_config;

    #[test]
    fn test_context_paths() {
        let ctx = BuildContext::new(default_config(), PathBuf::from("/project"));

        assert_eq!(ctx.project_root(), Path::new("/project"));
        assert_eq!(ctx.sprites_dir(), PathBuf::from("/project/sprites"));
        assert_eq!(ctx.out_dir(), PathBuf::from("/project/output"));
        assert_eq!(ctx.resources_dir(), PathBuf::from("/project/resources"));
        assert_eq!(ctx.species_path(), None);
    }

    #[test]
    fn test_context_absolute_paths() {
        let mut config = default_config();
        config.project.out = PathBuf::from("/tmp/dist");
        config.project.species = Some(PathBuf::from("tables/species.toml"));
        let ctx = BuildContext::new(config, PathBuf::from("/project"));

        assert_eq!(ctx.out_dir(), PathBuf::from("/tmp/dist"));
        assert_eq!(ctx.species_path(), Some(PathBuf::from("/project/tables/species.toml")));
    }

    #[test]
    fn test_context_step_settings() {
        let mut config = default_config();
        config.battle.margin = false;
        config.battle.background_alpha = 128;
        config.icons.size = IconSize::Large;
        config.build.jobs = 4;
        let ctx = BuildContext::new(config, PathBuf::from("."));

        assert_eq!(ctx.battle_options(), BattleOptions { margin: false, background_alpha: 128 });
        assert!(ctx.mirror());
        assert!(!ctx.shiny_icons());
        assert_eq!(ctx.icon_size(), IconSize::Large);
        assert_eq!(ctx.jobs(), 4);
    }

    #[test]
    fn test_context_verbose() {
        let ctx = BuildContext::new(default_config(), PathBuf::from("."));
        assert!(!ctx.is_verbose());
        assert!(ctx.with_verbose(true).is_verbose());
    }
}
