//! Batch generation over all species.
//!
//! A [`Generator`] runs the four generation steps over every species
//! directory under the sprites root. Each step can run on its own; a full
//! [`Generator::run`] clears the output tree first and runs the selected
//! steps in the order front, back, overworld, icons.
//!
//! A failure for one species never stops a step. It is logged with the full
//! error chain, reported as a failed target, and the step moves on.

use crate::assets::{AssetError, Outcome, SpeciesDir};
use crate::battle::{create_back_sprite, create_front_sprite};
use crate::build::context::BuildContext;
use crate::build::discovery::{discover_species, DiscoveryError};
use crate::build::parallel::ParallelRunner;
use crate::build::progress::{ProgressEvent, ProgressReporter};
use crate::build::result::{BuildResult, Step, StepResult, TargetResult};
use crate::icon::create_monster_icon;
use crate::output::{OutputError, OutputLayout};
use crate::overworld::create_overworld_sprite;
use crate::species::{SpeciesError, SpeciesTable};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

/// Atlas file copied next to the follower sheets.
pub const ATLAS_FILE: &str = "atlasdata.txt";

/// Error that stops a step or a run.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Species directories could not be listed
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),
    /// Species table could not be loaded
    #[error("Species table error: {0}")]
    Species(#[from] SpeciesError),
    /// Output tree could not be prepared
    #[error("Output error: {0}")]
    Output(#[from] OutputError),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Worker pool could not be started
    #[error("Failed to start worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// Shared resource file is missing
    #[error("Missing resource: {}", .0.display())]
    MissingResource(PathBuf),
}

/// Steps a full run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSelection {
    /// Front battle sprites
    pub front: bool,
    /// Back battle sprites
    pub back: bool,
    /// Overworld follower sheets
    pub overworld: bool,
    /// Menu icons
    pub icons: bool,
}

impl StepSelection {
    /// Every step.
    pub fn all() -> Self {
        Self { front: true, back: true, overworld: true, icons: true }
    }

    /// Selected steps in run order.
    pub fn steps(&self) -> Vec<Step> {
        Step::ALL.into_iter().filter(|step| self.contains(*step)).collect()
    }

    /// Whether a step is selected.
    pub fn contains(&self, step: Step) -> bool {
        match step {
            Step::Front => self.front,
            Step::Back => self.back,
            Step::Overworld => self.overworld,
            Step::Icons => self.icons,
        }
    }
}

impl Default for StepSelection {
    fn default() -> Self {
        Self::all()
    }
}

/// Runs generation steps over every species of a project.
#[derive(Debug)]
pub struct Generator {
    context: BuildContext,
    species: SpeciesTable,
    layout: OutputLayout,
    runner: ParallelRunner,
}

impl Generator {
    /// Create a generator for a build context.
    ///
    /// Loads the project species table if one is configured, otherwise the
    /// built-in table.
    pub fn new(context: BuildContext) -> Result<Self, BuildError> {
        let species = match context.species_path() {
            Some(path) => SpeciesTable::load(&path)?,
            None => SpeciesTable::builtin()?,
        };
        let layout = OutputLayout::new(&context.out_dir());
        let runner = ParallelRunner::new(context.jobs());
        Ok(Self { context, species, layout, runner })
    }

    /// Replace the species table.
    pub fn with_species(mut self, species: SpeciesTable) -> Self {
        self.species = species;
        self
    }

    /// Get the build context.
    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    /// Get the species table.
    pub fn species(&self) -> &SpeciesTable {
        &self.species
    }

    /// Get the output layout.
    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Write front battle sprites for every species.
    pub fn generate_front(&self, reporter: &dyn ProgressReporter) -> Result<StepResult, BuildError> {
        let species = self.discover()?;
        self.front(&species, reporter)
    }

    /// Write back battle sprites for every species.
    pub fn generate_back(&self, reporter: &dyn ProgressReporter) -> Result<StepResult, BuildError> {
        let species = self.discover()?;
        self.back(&species, reporter)
    }

    /// Write follower sheets for every species, then copy the atlas file.
    ///
    /// A missing atlas fails the step once every species has been processed.
    pub fn generate_overworld(
        &self,
        mirror: bool,
        reporter: &dyn ProgressReporter,
    ) -> Result<StepResult, BuildError> {
        let species = self.discover()?;
        let result = self.overworld(&species, mirror, reporter)?;
        self.copy_atlas()?;
        Ok(result)
    }

    /// Write menu icons for every species.
    pub fn generate_icons(
        &self,
        shiny: bool,
        reporter: &dyn ProgressReporter,
    ) -> Result<StepResult, BuildError> {
        let species = self.discover()?;
        self.icons(&species, shiny, reporter)
    }

    /// Regenerate the whole output tree.
    ///
    /// Deletes `<out>/sprites`, recreates its three directories and runs the
    /// selected steps. Overworld mirroring and shiny icons follow the build
    /// context. A failed atlas copy is recorded on the overworld step and the
    /// remaining steps still run.
    pub fn run(
        &self,
        selection: &StepSelection,
        reporter: &dyn ProgressReporter,
    ) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        // Fail before deleting anything
        let species = self.discover()?;

        self.layout.clear()?;
        self.layout.create_dirs()?;

        let steps = selection.steps();
        reporter.report(ProgressEvent::BuildStarted { steps: steps.len() });

        let mut result = BuildResult::new();
        for step in steps {
            let step_result = match step {
                Step::Front => self.front(&species, reporter)?,
                Step::Back => self.back(&species, reporter)?,
                Step::Overworld => {
                    let mut step_result =
                        self.overworld(&species, self.context.mirror(), reporter)?;
                    if let Err(e) = self.copy_atlas() {
                        let message = error_chain(&e);
                        log::error!("Failed to copy {}: {}", ATLAS_FILE, message);
                        step_result.errors.push(message);
                    }
                    step_result
                }
                Step::Icons => self.icons(&species, self.context.shiny_icons(), reporter)?,
            };
            result.add_step(step_result);
        }
        result.total_duration = start.elapsed();

        reporter.report(ProgressEvent::BuildCompleted {
            success: result.is_success(),
            duration_ms: result.total_duration.as_millis() as u64,
            succeeded: result.success_count(),
            skipped: result.skipped_count(),
            failed: result.failed_count(),
        });

        Ok(result)
    }

    fn discover(&self) -> Result<Vec<SpeciesDir>, BuildError> {
        Ok(discover_species(&self.context.sprites_dir())?)
    }

    fn front(
        &self,
        species: &[SpeciesDir],
        reporter: &dyn ProgressReporter,
    ) -> Result<StepResult, BuildError> {
        let out = self.layout.battle_dir();
        let options = self.context.battle_options();
        self.run_step(Step::Front, species, reporter, |dir| {
            create_front_sprite(dir, &self.species, &out, &options)
        })
    }

    fn back(
        &self,
        species: &[SpeciesDir],
        reporter: &dyn ProgressReporter,
    ) -> Result<StepResult, BuildError> {
        let out = self.layout.battle_dir();
        let options = self.context.battle_options();
        self.run_step(Step::Back, species, reporter, |dir| {
            create_back_sprite(dir, &self.species, &out, &options)
        })
    }

    fn overworld(
        &self,
        species: &[SpeciesDir],
        mirror: bool,
        reporter: &dyn ProgressReporter,
    ) -> Result<StepResult, BuildError> {
        let out = self.layout.follower_dir();
        let resources = self.context.resources_dir();
        self.run_step(Step::Overworld, species, reporter, |dir| {
            create_overworld_sprite(dir, &self.species, &out, &resources, mirror)
        })
    }

    fn icons(
        &self,
        species: &[SpeciesDir],
        shiny: bool,
        reporter: &dyn ProgressReporter,
    ) -> Result<StepResult, BuildError> {
        let out = self.layout.icon_dir();
        let size = self.context.icon_size();
        self.run_step(Step::Icons, species, reporter, |dir| {
            create_monster_icon(dir, &self.species, &out, shiny, size)
        })
    }

    fn copy_atlas(&self) -> Result<PathBuf, BuildError> {
        let source = self.context.resources_dir().join(ATLAS_FILE);
        if !source.is_file() {
            return Err(BuildError::MissingResource(source));
        }

        let follower_dir = self.layout.follower_dir();
        fs::create_dir_all(&follower_dir)?;
        let target = follower_dir.join(ATLAS_FILE);
        fs::copy(&source, &target)?;

        log::info!("Copied {} to {}", ATLAS_FILE, follower_dir.display());
        Ok(target)
    }

    fn run_step<F>(
        &self,
        step: Step,
        species: &[SpeciesDir],
        reporter: &dyn ProgressReporter,
        generate: F,
    ) -> Result<StepResult, BuildError>
    where
        F: Fn(&SpeciesDir) -> Result<Outcome, AssetError> + Send + Sync,
    {
        let start = Instant::now();
        reporter.report(ProgressEvent::StepStarted { step, total_species: species.len() });

        let targets = self.runner.map(species, |dir| {
            let target = generate_target(step, dir, &generate);
            reporter.report(ProgressEvent::SpeciesCompleted {
                step,
                species: target.species.clone(),
                status: target.status.clone(),
                duration_ms: target.duration.as_millis() as u64,
            });
            target
        })?;

        let result = StepResult { step, targets, errors: Vec::new(), duration: start.elapsed() };
        reporter.report(ProgressEvent::StepCompleted {
            step,
            succeeded: result.success_count(),
            skipped: result.skipped_count(),
            failed: result.failed_count(),
            duration_ms: result.duration.as_millis() as u64,
        });

        Ok(result)
    }
}

/// Run one species through a step, turning any error into a failed target.
fn generate_target<F>(step: Step, dir: &SpeciesDir, generate: &F) -> TargetResult
where
    F: Fn(&SpeciesDir) -> Result<Outcome, AssetError>,
{
    let start = Instant::now();
    let key = dir.key().to_string();

    match generate(dir) {
        Ok(Outcome::Written(outputs)) => TargetResult::success(key, outputs, start.elapsed()),
        Ok(Outcome::Skipped(reason)) => TargetResult::skipped(key, reason, start.elapsed()),
        Err(err) => {
            let message = error_chain(&err);
            log::error!("Failed to create {} sprites for {}: {}", step, key, message);
            TargetResult::failed(key, message, start.elapsed())
        }
    }
}

/// Format an error and its sources as one line.
///
/// Sources whose text the message already contains are left out.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::progress::{CallbackProgress, NullProgress};
    use crate::build::result::BuildStatus;
    use crate::config::default_config;
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn project(root: &Path) -> Generator {
        fs::create_dir_all(root.join("sprites")).unwrap();
        fs::create_dir_all(root.join("resources")).unwrap();
        fs::write(root.join("resources").join(ATLAS_FILE), "atlas").unwrap();

        let context = BuildContext::new(default_config(), root.to_path_buf());
        let table = SpeciesTable::parse("[dex]\npikachu = 25\nraichu = 26\n").unwrap();
        Generator::new(context).unwrap().with_species(table)
    }

    #[test]
    fn test_step_selection() {
        assert_eq!(StepSelection::all().steps(), Step::ALL.to_vec());

        let selection = StepSelection { front: false, icons: false, ..StepSelection::all() };
        assert_eq!(selection.steps(), vec![Step::Back, Step::Overworld]);
        assert!(!selection.contains(Step::Icons));
    }

    #[test]
    fn test_generator_uses_builtin_table() {
        let temp = TempDir::new().unwrap();
        let context = BuildContext::new(default_config(), temp.path().to_path_buf());
        let generator = Generator::new(context).unwrap();
        assert_eq!(generator.species().dex("pikachu").unwrap(), 25);
    }

    #[test]
    fn test_generator_missing_species_table() {
        let temp = TempDir::new().unwrap();
        let mut config = default_config();
        config.project.species = Some(PathBuf::from("species.toml"));
        let context = BuildContext::new(config, temp.path().to_path_buf());

        assert!(matches!(Generator::new(context), Err(BuildError::Species(_))));
    }

    #[test]
    fn test_step_reports_every_species() {
        let temp = TempDir::new().unwrap();
        let generator = project(temp.path());
        fs::create_dir_all(temp.path().join("sprites/raichu")).unwrap();
        fs::create_dir_all(temp.path().join("sprites/pikachu")).unwrap();

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let reporter = CallbackProgress::new(move |event| sink.lock().unwrap().push(event));

        let result = generator.generate_back(&reporter).unwrap();
        assert_eq!(result.skipped_count(), 2);

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], ProgressEvent::StepStarted { step: Step::Back, total_species: 2 });
        match &events[1] {
            ProgressEvent::SpeciesCompleted { species, status, .. } => {
                assert_eq!(species, "pikachu");
                assert_eq!(*status, BuildStatus::Skipped);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(matches!(events[3], ProgressEvent::StepCompleted { skipped: 2, .. }));
    }

    #[test]
    fn test_species_failure_is_isolated() {
        let temp = TempDir::new().unwrap();
        let generator = project(temp.path());
        let broken = temp.path().join("sprites/pikachu");
        fs::create_dir_all(&broken).unwrap();
        fs::write(broken.join("back.png"), b"not a png").unwrap();
        fs::create_dir_all(temp.path().join("sprites/raichu")).unwrap();

        let result = generator.generate_back(&NullProgress::new()).unwrap();
        assert_eq!(result.failed_count(), 1);
        assert_eq!(result.skipped_count(), 1);

        let failed = result.target("pikachu").unwrap();
        assert!(matches!(&failed.status, BuildStatus::Failed(msg) if msg.contains("back.png")));
    }

    #[test]
    fn test_overworld_copies_atlas() {
        let temp = TempDir::new().unwrap();
        let generator = project(temp.path());

        generator.generate_overworld(true, &NullProgress::new()).unwrap();
        let copied = generator.layout().follower_dir().join(ATLAS_FILE);
        assert_eq!(fs::read_to_string(copied).unwrap(), "atlas");
    }

    #[test]
    fn test_overworld_missing_atlas() {
        let temp = TempDir::new().unwrap();
        let generator = project(temp.path());
        fs::remove_file(temp.path().join("resources").join(ATLAS_FILE)).unwrap();

        let err = generator.generate_overworld(true, &NullProgress::new()).unwrap_err();
        assert!(matches!(err, BuildError::MissingResource(_)));
    }

    #[test]
    fn test_run_missing_atlas_still_runs_icons() {
        let temp = TempDir::new().unwrap();
        let generator = project(temp.path());
        fs::remove_file(temp.path().join("resources").join(ATLAS_FILE)).unwrap();
        fs::create_dir_all(temp.path().join("sprites/pikachu")).unwrap();

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let reporter = CallbackProgress::new(move |event| sink.lock().unwrap().push(event));

        let result = generator.run(&StepSelection::all(), &reporter).unwrap();
        assert!(!result.is_success());

        let overworld = result.step(Step::Overworld).unwrap();
        assert_eq!(overworld.errors.len(), 1);
        assert!(overworld.errors[0].contains(ATLAS_FILE));
        assert_eq!(result.step(Step::Icons).unwrap().skipped_count(), 1);

        let events = events.lock().unwrap();
        assert!(matches!(events.last(), Some(ProgressEvent::BuildCompleted { success: false, .. })));
    }

    #[test]
    fn test_run_clears_previous_output() {
        let temp = TempDir::new().unwrap();
        let generator = project(temp.path());
        let stale = generator.layout().icon_dir().join("999-0.png");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, b"old").unwrap();
        let keep = temp.path().join("output").join("notes.txt");
        fs::write(&keep, b"keep").unwrap();

        let result = generator.run(&StepSelection::all(), &NullProgress::new()).unwrap();
        assert!(result.is_success());
        assert!(!stale.exists());
        assert!(keep.exists());
        assert!(generator.layout().battle_dir().is_dir());
        assert!(generator.layout().icon_dir().is_dir());
    }

    #[test]
    fn test_run_missing_sprites_root_keeps_output() {
        let temp = TempDir::new().unwrap();
        let generator = project(temp.path());
        fs::remove_dir_all(temp.path().join("sprites")).unwrap();
        fs::create_dir_all(generator.layout().icon_dir()).unwrap();

        let err = generator.run(&StepSelection::all(), &NullProgress::new()).unwrap_err();
        assert!(matches!(err, BuildError::Discovery(DiscoveryError::MissingRoot(_))));
        assert!(generator.layout().icon_dir().is_dir());
    }

    #[test]
    fn test_error_chain_skips_repeated_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = BuildError::Io(io);
        assert_eq!(error_chain(&err), "IO error: gone");

        let err = DiscoveryError::InvalidPattern(
            "[".to_string(),
            glob::Pattern::new("[").unwrap_err(),
        );
        let chain = error_chain(&err);
        assert!(chain.starts_with("Invalid glob pattern '['"));
    }
}
